use super::agent::{StructureKind, Vec2};
use super::genome::SpeciesKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Terrain classification reported by the terrain collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TerrainKind {
    #[default]
    Plains,
    Forest,
    Hill,
    Sand,
    Mud,
    Water,
    Wall,
}

impl TerrainKind {
    /// Ordinal scaled into [0, 1] for the sensory vector.
    #[must_use]
    pub fn sensory_value(self) -> f32 {
        let ordinal = match self {
            TerrainKind::Plains => 0,
            TerrainKind::Forest => 1,
            TerrainKind::Hill => 2,
            TerrainKind::Sand => 3,
            TerrainKind::Mud => 4,
            TerrainKind::Water => 5,
            TerrainKind::Wall => 6,
        };
        ordinal as f32 / 6.0
    }
}

/// Terrain at a position, as seen by one genome.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub kind: TerrainKind,
    /// Movement speed multiplier.
    pub speed: f64,
    /// Vision radius multiplier.
    pub vision: f64,
    /// Metabolic cost multiplier.
    pub energy_cost: f64,
    /// Gatherable construction material at this spot.
    pub resources: f64,
}

impl Default for TerrainSample {
    fn default() -> Self {
        Self {
            kind: TerrainKind::Plains,
            speed: 1.0,
            vision: 1.0,
            energy_cost: 1.0,
            resources: 0.0,
        }
    }
}

/// Combined season, weather and disaster modifiers at a position and tick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentEffects {
    /// Multiplier on base metabolic loss.
    pub energy_drain: f64,
    /// Multiplier on movement speed.
    pub speed: f64,
    /// Flat energy damage per tick.
    pub damage: f64,
    /// Added to the reproduction energy threshold.
    pub reproduction_threshold_adjustment: f64,
    /// Force added to the position each tick.
    pub displacement: Vec2,
}

impl Default for EnvironmentEffects {
    fn default() -> Self {
        Self {
            energy_drain: 1.0,
            speed: 1.0,
            damage: 0.0,
            reproduction_threshold_adjustment: 0.0,
            displacement: Vec2::ZERO,
        }
    }
}

/// Why an agent was removed from the population.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Predation,
}

/// Fitness-relevant metrics of one agent, for external analytics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PerformanceSnapshot {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub generation: u32,
    pub species: SpeciesKind,
    pub survival_ticks: u64,
    pub offspring_count: u32,
    pub kills: u32,
    pub food_eaten: u32,
    pub signals_emitted: u32,
    pub structures_built: u32,
    pub peak_energy: f64,
    pub final_energy: f64,
    pub energy_trajectory: Vec<f64>,
    pub hidden_neurons: usize,
    pub neural_grow_events: u32,
    pub neural_shrink_events: u32,
}

/// Aggregated statistics for the whole population, refreshed every tick.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PopulationStats {
    /// Number of living agents.
    pub population: usize,
    /// Births merged during the last tick.
    pub births: usize,
    /// Deaths removed during the last tick.
    pub deaths: usize,
    pub total_births: u64,
    pub total_deaths: u64,
    pub mean_energy: f64,
    pub mean_hidden_neurons: f64,
    pub max_generation: u32,
    pub species_counts: HashMap<SpeciesKind, usize>,
    /// Active broadcasts in the signal field.
    pub active_signals: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
/// Tagged union of all simulation events emitted during a tick.
///
/// Serialised with `#[serde(tag = "event")]` for streaming JSONL output.
pub enum LiveEvent {
    /// A new agent was merged into the population.
    Birth {
        id: Uuid,
        parents: Vec<Uuid>,
        gen: u32,
        tick: u64,
        timestamp: String,
        x: f64,
        y: f64,
    },
    /// An agent was removed from the population.
    Death {
        id: Uuid,
        cause: DeathCause,
        snapshot: Box<PerformanceSnapshot>,
        tick: u64,
        timestamp: String,
    },
    /// A successful hunt; `gains` holds each participant's actual share.
    Hunt {
        prey: Uuid,
        gains: Vec<(Uuid, f64)>,
        prey_loss: f64,
        tick: u64,
        timestamp: String,
    },
    /// Energy moved from one agent to another.
    EnergyShared {
        from: Uuid,
        to: Uuid,
        amount: f64,
        tick: u64,
        timestamp: String,
    },
    /// Adaptive scaling added capacity to a brain.
    NeuralGrowth {
        id: Uuid,
        hidden_neurons: usize,
        tick: u64,
        timestamp: String,
    },
    /// Adaptive scaling pruned a brain.
    NeuralPrune {
        id: Uuid,
        hidden_neurons: usize,
        tick: u64,
        timestamp: String,
    },
    /// A blueprint was completed.
    StructureBuilt {
        id: Uuid,
        kind: StructureKind,
        x: f64,
        y: f64,
        tick: u64,
        timestamp: String,
    },
    SignalEmitted {
        id: Uuid,
        kind: super::signal::SignalKind,
        strength: f32,
        tick: u64,
        timestamp: String,
    },
    /// The generation policy closed a generation.
    GenerationRollover {
        generation: u64,
        population: usize,
        max_generation: u32,
        tick: u64,
        timestamp: String,
    },
    /// Population dropped to zero.
    Extinction {
        tick: u64,
        timestamp: String,
    },
}

impl LiveEvent {
    /// Tick the event belongs to.
    #[must_use]
    pub fn tick(&self) -> u64 {
        match self {
            LiveEvent::Birth { tick, .. }
            | LiveEvent::Death { tick, .. }
            | LiveEvent::Hunt { tick, .. }
            | LiveEvent::EnergyShared { tick, .. }
            | LiveEvent::NeuralGrowth { tick, .. }
            | LiveEvent::NeuralPrune { tick, .. }
            | LiveEvent::StructureBuilt { tick, .. }
            | LiveEvent::SignalEmitted { tick, .. }
            | LiveEvent::GenerationRollover { tick, .. }
            | LiveEvent::Extinction { tick, .. } => *tick,
        }
    }
}
