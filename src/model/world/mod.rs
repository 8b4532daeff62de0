use crate::model::config::AppConfig;
use crate::model::generation::GenerationPolicy;
use crate::model::metrics::Metrics;
use crate::model::population::Population;
use crate::model::snapshot::PopulationSnapshot;
use bugsim_data::{PopulationStats, Signal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

pub mod finalize;
pub mod init;
pub mod systems;
pub mod update;

/// Multiplier used to spread per-agent seeds.
const SEED_MIX: u64 = 0x517C_C1B7_2722_0A95;

/// Salts separating the random streams of the per-agent phases.
pub(crate) const SALT_SIGNALS: u64 = 0x5167;
pub(crate) const SALT_ACT: u64 = 0xAC7;

/// Deterministic RNG for one agent in one phase of one tick.
///
/// Derived from the world seed, the tick and the agent id only, so parallel
/// phases give the same result however rayon schedules them.
#[must_use]
pub fn agent_rng(world_seed: u64, tick: u64, id: Uuid, salt: u64) -> ChaCha8Rng {
    let u = id.as_u128();
    let mut seed = tick.wrapping_add(world_seed).wrapping_mul(SEED_MIX);
    seed ^= (u >> 64) as u64;
    seed = seed.wrapping_mul(SEED_MIX);
    seed ^= u as u64;
    seed ^= salt.wrapping_mul(SEED_MIX);
    ChaCha8Rng::seed_from_u64(seed)
}

/// The population update loop.
///
/// Owns the agents, the broadcast signal field and the tick bookkeeping.
/// Environment collaborators are passed to [`World::update`] by the caller.
pub struct World {
    pub tick: u64,
    pub config: AppConfig,
    pub population: Population,
    /// Broadcasts emitted on earlier ticks that have not decayed yet.
    pub broadcasts: Vec<Signal>,
    pub pop_stats: PopulationStats,
    /// Generations closed by the policy so far.
    pub generation: u64,
    pub metrics: Metrics,
    pub policy: Box<dyn GenerationPolicy>,
    pub rng: ChaCha8Rng,
    pub seed: u64,
    view: PopulationSnapshot,
    extinct: bool,
}

impl World {
    /// Simulated time at the current tick, in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.tick as f64 * self.config.world.tick_seconds
    }

    /// Read-only view built at the start of the last tick.
    #[must_use]
    pub fn view(&self) -> &PopulationSnapshot {
        &self.view
    }

    #[must_use]
    pub fn total_energy(&self) -> f64 {
        crate::model::systems::stats::total_energy(self.population.as_slice())
    }
}
