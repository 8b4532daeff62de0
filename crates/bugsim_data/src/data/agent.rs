use super::genome::{Genome, NeuralEncoding};
use super::signal::SignalMemory;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::sync::Arc;
use uuid::Uuid;

/// 2D vector used for positions, velocities and forces.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction; zero for a zero-length (or non-finite) vector.
    #[must_use]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if !len.is_finite() || len <= f64::EPSILON {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / len, self.y / len)
    }

    /// Linear interpolation towards `other` by `t`.
    #[must_use]
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self * (1.0 - t) + other * t
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rescales to at most `max` length.
    #[must_use]
    pub fn clamp_length(self, max: f64) -> Vec2 {
        let len = self.length();
        if len > max && len > f64::EPSILON {
            self * (max / len)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Unique identification of an agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    /// Empty for spontaneously created agents, both parents otherwise.
    pub parents: Vec<Uuid>,
}

/// Body state of an agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Physiology {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Always within `[0, max_energy]` at tick boundaries.
    pub energy: f64,
    pub max_energy: f64,
    /// Age in ticks.
    pub age: u64,
    pub max_age: u64,
}

/// Priority tier picked by the behaviour resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Fleeing,
    FoodSeeking,
    ReproductionSeeking,
    Hunting,
    Exploring,
}

/// Another agent being tracked, with its last known position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedAgent {
    pub id: Uuid,
    pub position: Vec2,
}

/// A food site being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodTarget {
    pub site: u64,
    pub position: Vec2,
}

/// Per-behaviour cooldowns, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    pub flee: u32,
    pub hunt: u32,
    pub reproduction: u32,
    pub signal: u32,
    pub share: u32,
}

impl Cooldowns {
    /// Moves every counter one tick closer to zero.
    pub fn tick(&mut self) {
        self.flee = self.flee.saturating_sub(1);
        self.hunt = self.hunt.saturating_sub(1);
        self.reproduction = self.reproduction.saturating_sub(1);
        self.signal = self.signal.saturating_sub(1);
        self.share = self.share.saturating_sub(1);
    }
}

/// Targets and timers driving the behaviour resolver.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorState {
    pub food_target: Option<FoodTarget>,
    pub prey_target: Option<TrackedAgent>,
    pub threat_target: Option<TrackedAgent>,
    pub mate_target: Option<TrackedAgent>,
    pub cooldowns: Cooldowns,
    /// Heading of the restlessness term, in radians.
    pub wander_heading: f64,
    pub last_tier: Option<Tier>,
}

/// Position of an agent inside its social group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SocialRole {
    #[default]
    Loner,
    Member,
    Leader,
}

/// Group membership and received signals.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialState {
    pub group_id: Option<Uuid>,
    pub role: SocialRole,
    /// Emitter of the hunt call this agent answered, if any.
    pub hunt_leader: Option<Uuid>,
    pub memory: SignalMemory,
}

/// Kind of structure an agent can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Shelter,
    Cache,
    Trap,
}

/// A structure under construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub kind: StructureKind,
    pub site: Vec2,
    /// Resources still needed.
    pub required: f64,
    /// Resources already placed.
    pub progress: f64,
}

/// Construction state of an agent.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructionState {
    pub carried_resources: f64,
    pub blueprint: Option<Blueprint>,
}

/// Fitness-relevant history of one agent.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct LifeRecord {
    pub birth_tick: u64,
    pub offspring_count: u32,
    pub kills: u32,
    pub food_eaten: u32,
    pub signals_emitted: u32,
    pub structures_built: u32,
    pub peak_energy: f64,
    pub neural_grow_events: u32,
    pub neural_shrink_events: u32,
    /// Sampled energy levels, most recent last.
    pub energy_trajectory: VecDeque<f64>,
}

/// A simulated organism.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub identity: Identity,
    /// Heritable genome; replaced wholesale only by birth.
    pub genome: Arc<Genome>,
    /// Expressed decision network, starts as a copy of `genome.neural`.
    pub brain: NeuralEncoding,
    pub generation: u32,
    pub physiology: Physiology,
    pub behavior: BehaviorState,
    pub social: SocialState,
    pub construction: ConstructionState,
    pub record: LifeRecord,
}

impl Agent {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.identity.id
    }

    #[must_use]
    pub fn energy_fraction(&self) -> f64 {
        if self.physiology.max_energy <= 0.0 {
            return 0.0;
        }
        (self.physiology.energy / self.physiology.max_energy).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn age_fraction(&self) -> f64 {
        if self.physiology.max_age == 0 {
            return 1.0;
        }
        (self.physiology.age as f64 / self.physiology.max_age as f64).clamp(0.0, 1.0)
    }

    /// Death criterion: out of energy or out of time.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.physiology.energy <= 0.0 || self.physiology.age >= self.physiology.max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector_is_zero() {
        let v = Vec2::ZERO.normalized();
        assert_eq!(v, Vec2::ZERO);
        let nan = Vec2::new(f64::NAN, 1.0).normalized();
        assert_eq!(nan, Vec2::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_cooldowns_saturate_at_zero() {
        let mut c = Cooldowns {
            flee: 1,
            hunt: 0,
            reproduction: 3,
            signal: 0,
            share: 2,
        };
        c.tick();
        c.tick();
        assert_eq!(c.flee, 0);
        assert_eq!(c.hunt, 0);
        assert_eq!(c.reproduction, 1);
        assert_eq!(c.share, 0);
    }
}
