//! Configuration management for simulation parameters.
//!
//! Every threshold, cost and multiplier used by the tick pipeline lives here,
//! grouped by concern. Sections map one-to-one onto `config.toml` tables.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` content passed to [`AppConfig::from_toml`] (overrides defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 200.0
//! height = 200.0
//! initial_population = 60
//! seed = 42
//!
//! [reproduction]
//! energy_threshold = 90.0
//!
//! [evolution]
//! mutation_rate = 0.05
//! ```

use serde::{Deserialize, Serialize};

/// Arena and world-level parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_population: usize,
    pub seed: Option<u64>,
    /// Simulated seconds per tick.
    pub tick_seconds: f64,
    /// Fraction of speed kept when bouncing off an arena wall.
    pub wall_damping: f64,
    /// Fraction of velocity kept when the target cell is impassable.
    pub impassable_damping: f64,
    pub initial_food: usize,
    pub max_food: usize,
    /// Chance per tick that a depleted food site regrows.
    pub food_regrow_chance: f64,
    /// Energy held by a fresh food site.
    pub food_energy: f64,
    /// Ticks per generation for the default generation policy.
    pub generation_ticks: u64,
    /// Length of one full season cycle in ticks.
    pub season_length: u64,
    /// Gatherable material per terrain sample.
    pub terrain_resources: f64,
    /// Edge length of a spatial hash cell.
    pub spatial_cell_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 200.0,
            initial_population: 60,
            seed: None,
            tick_seconds: 0.1,
            wall_damping: 0.5,
            impassable_damping: 0.0,
            initial_food: 80,
            max_food: 120,
            food_regrow_chance: 0.02,
            food_energy: 40.0,
            generation_ticks: 500,
            season_length: 4000,
            terrain_resources: 0.5,
            spatial_cell_size: 10.0,
        }
    }
}

/// Energy bookkeeping and body parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MetabolismConfig {
    pub base_metabolic_cost: f64,
    /// Energy per unit of velocity magnitude.
    pub move_cost: f64,
    /// Maximum energy of a size-1.0 body.
    pub base_max_energy: f64,
    /// Lifespan in ticks of a size-1.0 body before the size factor.
    pub base_max_age: u64,
    /// Energy fraction of spontaneously created agents.
    pub initial_energy_fraction: f64,
    /// Energy at which an agent reaches full speed.
    pub full_speed_energy: f64,
    /// Speed fraction kept when nearly exhausted.
    pub min_speed_fraction: f64,
    pub speed_scale: f64,
    /// Below this energy fraction an agent seeks food.
    pub hungry_fraction: f64,
    /// Above this energy fraction an agent counts as well fed.
    pub well_fed_fraction: f64,
    pub eat_distance: f64,
    /// Extra energy per tick spent while fleeing.
    pub flee_cost: f64,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            base_metabolic_cost: 0.05,
            move_cost: 0.01,
            base_max_energy: 150.0,
            base_max_age: 3000,
            initial_energy_fraction: 0.6,
            full_speed_energy: 100.0,
            min_speed_fraction: 0.3,
            speed_scale: 1.5,
            hungry_fraction: 0.5,
            well_fed_fraction: 0.75,
            eat_distance: 2.0,
            flee_cost: 0.05,
        }
    }
}

/// Genetic operator parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Per-gene mutation probability.
    pub mutation_rate: f32,
    /// Mutation delta bound: a mutated gene moves by `uniform(-strength, strength)`.
    pub mutation_strength: f32,
    /// Per-weight mutation probability.
    pub weight_mutation_rate: f32,
    pub weight_mutation_strength: f32,
    /// Base chance of a structural neural mutation, scaled by plasticity.
    pub structural_mutation_chance: f32,
    /// Chance that offspring switch species kind.
    pub species_shift_rate: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.1,
            mutation_strength: 0.2,
            weight_mutation_rate: 0.1,
            weight_mutation_strength: 0.5,
            structural_mutation_chance: 0.3,
            species_shift_rate: 0.01,
        }
    }
}

/// Neural energetic cost and adaptive scaling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NeuralConfig {
    pub neuron_cost: f64,
    pub connection_cost: f64,
    /// Ticks of neural upkeep the energy budget is measured against.
    pub cost_horizon_ticks: f64,
    pub grow_abundance_ratio: f64,
    pub prune_scarcity_ratio: f64,
    /// Per-tick roll scale applied to plasticity and pruning tendency.
    pub scaling_chance: f64,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            neuron_cost: 0.002,
            connection_cost: 0.0001,
            cost_horizon_ticks: 200.0,
            grow_abundance_ratio: 4.0,
            prune_scarcity_ratio: 1.0,
            scaling_chance: 0.02,
        }
    }
}

/// Behaviour resolver thresholds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    /// A threat closer than this can trigger fleeing.
    pub flee_distance: f64,
    pub flee_threshold: f32,
    pub flee_multiplier: f64,
    /// Weight of raw network output while seeking food.
    pub food_blend: f64,
    pub hunt_threshold: f32,
    /// Weight of raw network output while hunting.
    pub hunt_blend: f64,
    /// Weight of the wander heading while exploring well fed.
    pub restlessness: f64,
    /// Maximum wander heading change per tick, in radians.
    pub wander_turn: f64,
    /// Speed fraction of the fallback movement without a decision.
    pub fallback_speed_fraction: f64,
    /// Flee cooldown set by a received danger alert, in ticks.
    pub alarm_ticks: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            flee_distance: 30.0,
            flee_threshold: 0.2,
            flee_multiplier: 1.5,
            food_blend: 0.2,
            hunt_threshold: 0.1,
            hunt_blend: 0.3,
            restlessness: 0.3,
            wander_turn: 0.5,
            fallback_speed_fraction: 0.2,
            alarm_ticks: 20,
        }
    }
}

/// Hunting success and pack coordination.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HuntingConfig {
    pub base_success: f64,
    pub camouflage_factor: f64,
    pub max_success: f64,
    pub max_pack_bonus: f64,
    pub pack_saturation: f64,
    pub social_bonus_scale: f64,
    /// Hunters within this distance of the lead hunter form one pack.
    pub coordination_radius: f64,
    /// Distance at which an attack is possible.
    pub attack_range: f64,
    pub cooldown: u32,
    /// Energy spent on every attempt.
    pub attempt_cost: f64,
}

impl Default for HuntingConfig {
    fn default() -> Self {
        Self {
            base_success: 0.35,
            camouflage_factor: 0.3,
            max_success: 0.95,
            max_pack_bonus: 0.3,
            pack_saturation: 2.0,
            social_bonus_scale: 0.05,
            coordination_radius: 20.0,
            attack_range: 3.0,
            cooldown: 30,
            attempt_cost: 1.0,
        }
    }
}

/// Reproduction eligibility and cost.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReproductionConfig {
    pub energy_threshold: f64,
    pub maturity_age: u64,
    pub mate_distance: f64,
    /// Energy charged to each parent.
    pub cost: f64,
    pub child_energy: f64,
    pub cooldown: u32,
    pub desire_threshold: f32,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            energy_threshold: 80.0,
            maturity_age: 50,
            mate_distance: 15.0,
            cost: 30.0,
            child_energy: 45.0,
            cooldown: 100,
            desire_threshold: 0.0,
        }
    }
}

/// Signal protocol parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    /// Seconds until a signal fully decays.
    pub decay_window: f64,
    pub activation_floor: f32,
    pub broadcast_range: f64,
    /// Minimum sensitivity needed to receive anything.
    pub sensitivity_floor: f32,
    /// Energy per unit of emitted strength.
    pub emission_cost: f64,
    pub cooldown: u32,
    pub memory_capacity: usize,
    /// Network output needed for a voluntary emission.
    pub output_threshold: f32,
    /// Largest amount a single food share can move.
    pub share_cap: f64,
    /// Receivers below this energy fraction accept food shares.
    pub share_hunger_fraction: f64,
    /// Receivers must be this close to the share origin.
    pub share_distance: f64,
    pub share_cooldown: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            decay_window: 5.0,
            activation_floor: 0.01,
            broadcast_range: 40.0,
            sensitivity_floor: 0.1,
            emission_cost: 0.5,
            cooldown: 20,
            memory_capacity: 16,
            output_threshold: 0.3,
            share_cap: 10.0,
            share_hunger_fraction: 0.5,
            share_distance: 10.0,
            share_cooldown: 30,
        }
    }
}

/// Gather and build loop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConstructionConfig {
    pub build_threshold: f32,
    /// Energy fraction needed before any construction work.
    pub build_energy_fraction: f64,
    pub gather_rate: f64,
    pub gather_cost: f64,
    /// Most resources an agent can carry at once.
    pub carry_capacity: f64,
    pub build_rate: f64,
    pub build_cost: f64,
    pub shelter_required: f64,
    pub cache_required: f64,
    pub trap_required: f64,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            build_threshold: 0.3,
            build_energy_fraction: 0.6,
            gather_rate: 0.5,
            gather_cost: 0.05,
            carry_capacity: 5.0,
            build_rate: 0.5,
            build_cost: 0.1,
            shelter_required: 10.0,
            cache_required: 6.0,
            trap_required: 8.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub metabolism: MetabolismConfig,
    pub evolution: EvolutionConfig,
    pub neural: NeuralConfig,
    pub behavior: BehaviorConfig,
    pub hunting: HuntingConfig,
    pub reproduction: ReproductionConfig,
    pub signal: SignalConfig,
    pub construction: ConstructionConfig,
}

fn unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(
            self.world.width > 0.0 && self.world.width <= 10_000.0,
            "World width must be in (0, 10000]"
        );
        anyhow::ensure!(
            self.world.height > 0.0 && self.world.height <= 10_000.0,
            "World height must be in (0, 10000]"
        );
        anyhow::ensure!(
            self.world.initial_population <= 10_000,
            "Initial population too large (max 10000)"
        );
        anyhow::ensure!(self.world.tick_seconds > 0.0, "Tick length must be positive");
        anyhow::ensure!(
            unit(self.world.wall_damping) && unit(self.world.impassable_damping),
            "Damping factors must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.world.initial_food <= self.world.max_food,
            "Initial food exceeds max food"
        );
        anyhow::ensure!(
            unit(self.world.food_regrow_chance),
            "Food regrow chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(self.world.generation_ticks > 0, "Generation length must be positive");
        anyhow::ensure!(self.world.season_length > 0, "Season length must be positive");
        anyhow::ensure!(
            self.world.spatial_cell_size > 0.0,
            "Spatial cell size must be positive"
        );

        // Metabolism validation
        anyhow::ensure!(
            self.metabolism.base_metabolic_cost >= 0.0 && self.metabolism.move_cost >= 0.0,
            "Metabolic costs must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.base_max_energy > 0.0,
            "Base max energy must be positive"
        );
        anyhow::ensure!(self.metabolism.base_max_age > 0, "Base max age must be positive");
        anyhow::ensure!(
            self.metabolism.full_speed_energy > 0.0,
            "Full speed energy must be positive"
        );
        anyhow::ensure!(
            unit(self.metabolism.min_speed_fraction)
                && unit(self.metabolism.hungry_fraction)
                && unit(self.metabolism.well_fed_fraction)
                && unit(self.metabolism.initial_energy_fraction),
            "Metabolism fractions must be in [0.0, 1.0]"
        );

        // Evolution validation
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.mutation_rate)
                && (0.0..=1.0).contains(&self.evolution.weight_mutation_rate),
            "Mutation rates must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.evolution.mutation_strength >= 0.0 && self.evolution.weight_mutation_strength >= 0.0,
            "Mutation strength must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.structural_mutation_chance)
                && (0.0..=1.0).contains(&self.evolution.species_shift_rate),
            "Structural and species shift chances must be in [0.0, 1.0]"
        );

        // Neural validation
        anyhow::ensure!(
            self.neural.neuron_cost >= 0.0 && self.neural.connection_cost >= 0.0,
            "Neural costs must be non-negative"
        );
        anyhow::ensure!(
            self.neural.cost_horizon_ticks > 0.0,
            "Cost horizon must be positive"
        );
        anyhow::ensure!(
            self.neural.prune_scarcity_ratio <= self.neural.grow_abundance_ratio,
            "Prune ratio must not exceed grow ratio"
        );
        anyhow::ensure!(unit(self.neural.scaling_chance), "Scaling chance must be in [0.0, 1.0]");

        // Behavior validation
        anyhow::ensure!(
            self.behavior.wander_turn >= 0.0 && self.behavior.wander_turn.is_finite(),
            "Wander turn must be a finite non-negative angle"
        );
        anyhow::ensure!(
            self.behavior.flee_distance >= 0.0 && self.behavior.flee_multiplier > 0.0,
            "Flee distance and multiplier must be positive"
        );

        // Hunting validation
        anyhow::ensure!(
            unit(self.hunting.base_success) && unit(self.hunting.max_success),
            "Hunt success values must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.hunting.pack_saturation > 0.0,
            "Pack saturation must be positive"
        );

        // Reproduction validation
        anyhow::ensure!(
            self.reproduction.energy_threshold >= self.reproduction.cost,
            "Reproduction threshold must cover the parent cost"
        );
        anyhow::ensure!(
            self.reproduction.cost >= 0.0 && self.reproduction.child_energy > 0.0,
            "Reproduction energies must be positive"
        );

        // Signal validation
        anyhow::ensure!(self.signal.decay_window > 0.0, "Decay window must be positive");
        anyhow::ensure!(
            (0.0..1.0).contains(&self.signal.activation_floor),
            "Activation floor must be in [0.0, 1.0)"
        );
        anyhow::ensure!(self.signal.memory_capacity > 0, "Signal memory must hold something");
        anyhow::ensure!(self.signal.share_cap >= 0.0, "Share cap must be non-negative");

        // Construction validation
        anyhow::ensure!(
            self.construction.shelter_required > 0.0
                && self.construction.cache_required > 0.0
                && self.construction.trap_required > 0.0,
            "Structure requirements must be positive"
        );
        anyhow::ensure!(self.construction.carry_capacity > 0.0, "Carry capacity must be positive");

        Ok(())
    }

    /// Parses and validates configuration from TOML content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of the rule sections, identifying runs that share dynamics.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.metabolism).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.neural).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.hunting).as_bytes());
        hasher.update(format!("{:?}", self.reproduction).as_bytes());
        hasher.update(format!("{:?}", self.signal).as_bytes());
        hasher.update(format!("{:?}", self.construction).as_bytes());
        hex::encode(hasher.finalize())
    }
}
