//! Priority behaviour resolver.
//!
//! Tiers are evaluated top-down and the first whose trigger holds decides the
//! tick's velocity:
//!
//! 1. Fleeing
//! 2. Food-seeking
//! 3. Reproduction-seeking
//! 4. Hunting
//! 5. Exploring (default)
//!
//! [`resolve`] is a pure function of its input, so identical state and
//! identical decisions always pick the same tier and velocity.

use crate::config::AppConfig;
use crate::systems::intel::Decision;
use bugsim_data::{Tier, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverInput<'a> {
    pub position: Vec2,
    /// Current speed from the energy economy.
    pub speed: f64,
    pub energy_fraction: f64,
    pub can_hunt: bool,
    pub reproduction_eligible: bool,
    pub threat: Option<Vec2>,
    /// Next waypoint towards the food target.
    pub food: Option<Vec2>,
    pub prey: Option<Vec2>,
    pub mate: Option<Vec2>,
    /// A danger alert was received recently.
    pub alarmed: bool,
    pub wander_heading: f64,
    pub decision: Option<&'a Decision>,
    /// Unit vector used when there is no decision.
    pub fallback_direction: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub tier: Tier,
    pub velocity: Vec2,
    /// Extra energy the chosen tier costs on top of movement.
    pub energy_cost: f64,
}

fn toward(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalized()
}

/// Mixes a target direction with the raw network direction. Falls back to
/// the target direction when the mix cancels out.
fn blend(direction: Vec2, raw: Vec2, weight: f64) -> Vec2 {
    let mixed = (direction * (1.0 - weight) + raw * weight).normalized();
    if mixed == Vec2::ZERO {
        direction
    } else {
        mixed
    }
}

#[must_use]
pub fn resolve(input: &ResolverInput, config: &AppConfig) -> Resolution {
    let behavior = &config.behavior;
    let Some(decision) = input.decision else {
        return Resolution {
            tier: Tier::Exploring,
            velocity: input.fallback_direction.normalized()
                * input.speed
                * behavior.fallback_speed_fraction,
            energy_cost: 0.0,
        };
    };
    let raw = decision.movement();

    if let Some(threat) = input.threat {
        let flee_threshold = if input.alarmed {
            behavior.flee_threshold * 0.5
        } else {
            behavior.flee_threshold
        };
        if input.position.distance(threat) <= behavior.flee_distance
            && decision.flee() > flee_threshold
        {
            let mut away = (input.position - threat).normalized();
            if away == Vec2::ZERO {
                away = input.fallback_direction.normalized();
            }
            return Resolution {
                tier: Tier::Fleeing,
                velocity: away * input.speed * behavior.flee_multiplier,
                energy_cost: config.metabolism.flee_cost,
            };
        }
    }

    if let Some(food) = input.food {
        if input.energy_fraction < config.metabolism.hungry_fraction {
            let dir = blend(toward(input.position, food), raw, behavior.food_blend);
            return Resolution {
                tier: Tier::FoodSeeking,
                velocity: dir * input.speed,
                energy_cost: 0.0,
            };
        }
    }

    if let Some(mate) = input.mate {
        if input.reproduction_eligible && decision.mate() > config.reproduction.desire_threshold {
            return Resolution {
                tier: Tier::ReproductionSeeking,
                velocity: toward(input.position, mate) * input.speed,
                energy_cost: 0.0,
            };
        }
    }

    if let Some(prey) = input.prey {
        if input.can_hunt && decision.hunt() > behavior.hunt_threshold {
            let dir = blend(toward(input.position, prey), raw, behavior.hunt_blend);
            return Resolution {
                tier: Tier::Hunting,
                velocity: dir * input.speed,
                energy_cost: 0.0,
            };
        }
    }

    let mut direction = raw;
    if input.energy_fraction > config.metabolism.well_fed_fraction {
        let heading = Vec2::new(input.wander_heading.cos(), input.wander_heading.sin());
        direction = (direction + heading * behavior.restlessness).clamp_length(1.0);
    }
    Resolution {
        tier: Tier::Exploring,
        velocity: direction * input.speed,
        energy_cost: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{ACTION_OUTPUTS, OUT_FLEE, OUT_HUNT, OUT_MATE, OUT_MOVE_X};

    fn decision(values: &[(usize, f32)]) -> Decision {
        let mut outputs = [0.0; ACTION_OUTPUTS];
        for &(i, v) in values {
            outputs[i] = v;
        }
        Decision { outputs }
    }

    fn input(d: &Decision) -> ResolverInput<'_> {
        ResolverInput {
            position: Vec2::new(50.0, 50.0),
            speed: 2.0,
            energy_fraction: 0.6,
            can_hunt: true,
            reproduction_eligible: true,
            threat: None,
            food: None,
            prey: None,
            mate: None,
            alarmed: false,
            wander_heading: 0.0,
            decision: Some(d),
            fallback_direction: Vec2::new(1.0, 0.0),
        }
    }

    #[test]
    fn test_flee_outranks_everything() {
        let config = AppConfig::default();
        let d = decision(&[(OUT_FLEE, 0.9), (OUT_HUNT, 0.9), (OUT_MATE, 0.9)]);
        let r = resolve(
            &ResolverInput {
                threat: Some(Vec2::new(40.0, 50.0)),
                food: Some(Vec2::new(60.0, 50.0)),
                prey: Some(Vec2::new(50.0, 60.0)),
                mate: Some(Vec2::new(50.0, 40.0)),
                energy_fraction: 0.1,
                ..input(&d)
            },
            &config,
        );
        assert_eq!(r.tier, Tier::Fleeing);
        assert!((r.velocity.x - 2.0 * config.behavior.flee_multiplier).abs() < 1e-9);
        assert_eq!(r.energy_cost, config.metabolism.flee_cost);
    }

    #[test]
    fn test_alarm_lowers_flee_threshold() {
        let config = AppConfig::default();
        let d = decision(&[(OUT_FLEE, 0.15)]);
        let base = ResolverInput {
            threat: Some(Vec2::new(45.0, 50.0)),
            ..input(&d)
        };
        assert_eq!(resolve(&base, &config).tier, Tier::Exploring);
        let alarmed = ResolverInput { alarmed: true, ..base };
        assert_eq!(resolve(&alarmed, &config).tier, Tier::Fleeing);
    }

    #[test]
    fn test_food_only_when_hungry() {
        let config = AppConfig::default();
        let d = decision(&[]);
        let hungry = ResolverInput {
            food: Some(Vec2::new(60.0, 50.0)),
            energy_fraction: 0.2,
            ..input(&d)
        };
        let r = resolve(&hungry, &config);
        assert_eq!(r.tier, Tier::FoodSeeking);
        assert!((r.velocity.length() - 2.0).abs() < 1e-9);
        assert!(r.velocity.x > 0.0);

        let sated = ResolverInput {
            energy_fraction: 0.6,
            ..hungry
        };
        assert_ne!(resolve(&sated, &config).tier, Tier::FoodSeeking);
    }

    #[test]
    fn test_reproduction_then_hunting() {
        let config = AppConfig::default();
        let d = decision(&[(OUT_MATE, 0.5), (OUT_HUNT, 0.5)]);
        let both = ResolverInput {
            mate: Some(Vec2::new(50.0, 55.0)),
            prey: Some(Vec2::new(55.0, 50.0)),
            ..input(&d)
        };
        assert_eq!(resolve(&both, &config).tier, Tier::ReproductionSeeking);
        let no_mate = ResolverInput { mate: None, ..both };
        assert_eq!(resolve(&no_mate, &config).tier, Tier::Hunting);
        let herbivore = ResolverInput {
            can_hunt: false,
            ..no_mate
        };
        assert_eq!(resolve(&herbivore, &config).tier, Tier::Exploring);
    }

    #[test]
    fn test_exploring_uses_raw_output() {
        let config = AppConfig::default();
        let d = decision(&[(OUT_MOVE_X, -0.5)]);
        let r = resolve(&input(&d), &config);
        assert_eq!(r.tier, Tier::Exploring);
        assert!((r.velocity.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_decision_falls_back() {
        let config = AppConfig::default();
        let d = decision(&[]);
        let r = resolve(
            &ResolverInput {
                decision: None,
                threat: Some(Vec2::new(49.0, 50.0)),
                ..input(&d)
            },
            &config,
        );
        assert_eq!(r.tier, Tier::Exploring);
        assert!((r.velocity.length() - 2.0 * config.behavior.fallback_speed_fraction).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let config = AppConfig::default();
        let d = decision(&[(OUT_MOVE_X, 0.3), (OUT_HUNT, 0.7)]);
        let i = ResolverInput {
            prey: Some(Vec2::new(70.0, 20.0)),
            ..input(&d)
        };
        assert_eq!(resolve(&i, &config), resolve(&i, &config));
    }
}
