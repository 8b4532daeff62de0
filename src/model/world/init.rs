use crate::model::config::AppConfig;
use crate::model::generation::{EveryNTicks, GenerationPolicy};
use crate::model::lifecycle;
use crate::model::metrics::Metrics;
use crate::model::population::Population;
use crate::model::snapshot::PopulationSnapshot;
use crate::model::world::World;
use bugsim_data::{Agent, PopulationStats, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

impl World {
    /// Validates `config` and spawns `world.initial_population` founders at
    /// random positions inside the arena.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = config
            .world
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let (w, h) = (config.world.width, config.world.height);
        let mut founders = Vec::with_capacity(config.world.initial_population);
        for _ in 0..config.world.initial_population {
            let position = Vec2::new(rng.gen_range(0.0..=w), rng.gen_range(0.0..=h));
            founders.push(lifecycle::create_agent_with_rng(position, 0, &config, &mut rng));
        }
        Self::assemble(config, founders, seed, rng)
    }

    /// Builds a world around an existing set of agents.
    pub fn from_agents(config: AppConfig, agents: Vec<Agent>) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = config.world.seed.unwrap_or(0);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self::assemble(config, agents, seed, rng)
    }

    /// Replaces the default generation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn GenerationPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Adds an agent between ticks.
    pub fn spawn(&mut self, agent: Agent) -> anyhow::Result<()> {
        self.population.push(agent)?;
        Ok(())
    }

    fn assemble(
        config: AppConfig,
        agents: Vec<Agent>,
        seed: u64,
        rng: ChaCha8Rng,
    ) -> anyhow::Result<Self> {
        let population = Population::from_agents(agents)?;
        let cell_size = config.world.spatial_cell_size;
        let view = PopulationSnapshot::new(config.world.width, config.world.height, cell_size);
        let policy = Box::new(EveryNTicks(config.world.generation_ticks));
        tracing::info!(
            agents = population.len(),
            seed = seed,
            fingerprint = %config.fingerprint(),
            "World created"
        );
        Ok(Self {
            tick: 0,
            population,
            broadcasts: Vec::new(),
            pop_stats: PopulationStats::default(),
            generation: 0,
            metrics: Metrics::new(),
            policy,
            rng,
            seed,
            view,
            extinct: false,
            config,
        })
    }
}
