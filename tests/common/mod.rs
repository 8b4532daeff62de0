pub mod macros;

use bugsim_data::{Agent, Genome, SpeciesKind, Vec2};
use bugsim_lib::model::config::AppConfig;
use bugsim_lib::model::environment::{
    Calm, FoodPatches, Habitat, Obstacle, OpenField, SeasonalClimate, Unclaimed,
};
use bugsim_lib::model::lifecycle;
use bugsim_lib::model::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    agents: Vec<Agent>,
    food: Vec<(Vec2, f64)>,
    obstacles: Vec<Obstacle>,
    seasons: bool,
    spawn_food: bool,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_population = 0;
        config.world.initial_food = 0;
        config.world.seed = Some(0);
        Self {
            config,
            agents: Vec::new(),
            food: Vec::new(),
            obstacles: Vec::new(),
            seasons: false,
            spawn_food: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64, energy: f64) -> Self {
        self.food.push((Vec2::new(x, y), energy));
        self
    }

    pub fn with_obstacle(mut self, min: Vec2, max: Vec2) -> Self {
        self.obstacles.push(Obstacle { min, max });
        self
    }

    /// Seasonal climate instead of neutral effects.
    pub fn with_seasons(mut self) -> Self {
        self.seasons = true;
        self
    }

    /// Regrowing food patches seeded from the world seed.
    pub fn with_food_spawn(mut self) -> Self {
        self.spawn_food = true;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> (World, Habitat) {
        let seed = self.config.world.seed.unwrap_or(0);
        let mut terrain = OpenField::new(&self.config);
        for o in self.obstacles {
            terrain = terrain.with_obstacle(o);
        }
        let mut food = if self.spawn_food {
            FoodPatches::new(&self.config, seed)
        } else {
            FoodPatches::empty(&self.config)
        };
        for (position, energy) in self.food {
            food.add_site(position, energy);
        }
        let habitat = Habitat {
            terrain: Box::new(terrain),
            climate: if self.seasons {
                Box::new(SeasonalClimate::new(self.config.world.season_length))
            } else {
                Box::new(Calm)
            },
            territory: Box::new(Unclaimed),
            food: Box::new(food),
        };

        let world = if self.agents.is_empty() {
            World::new(self.config).expect("Failed to create world in test builder")
        } else {
            World::from_agents(self.config, self.agents)
                .expect("Failed to create world in test builder")
        };
        (world, habitat)
    }
}

type GenomeMod = Box<dyn FnOnce(&mut Genome)>;

#[allow(dead_code)]
pub struct AgentBuilder {
    position: Vec2,
    energy: Option<f64>,
    max_energy: Option<f64>,
    age: u64,
    seed: u64,
    kind: Option<SpeciesKind>,
    genome_mods: Vec<GenomeMod>,
}

#[allow(dead_code)]
impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::new(10.0, 10.0),
            energy: None,
            max_energy: None,
            age: 0,
            seed: 1,
            kind: None,
            genome_mods: Vec::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn energy(mut self, amount: f64) -> Self {
        self.energy = Some(amount);
        self
    }

    pub fn max_energy(mut self, amount: f64) -> Self {
        self.max_energy = Some(amount);
        self
    }

    pub fn age(mut self, ticks: u64) -> Self {
        self.age = ticks;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn species(mut self, kind: SpeciesKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn genome<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut Genome) + 'static,
    {
        self.genome_mods.push(Box::new(modifier));
        self
    }

    pub fn build(self, config: &AppConfig) -> Agent {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut agent = lifecycle::create_agent_with_rng(self.position, 0, config, &mut rng);
        let mut genome = (*agent.genome).clone();
        if let Some(kind) = self.kind {
            genome.species.kind = kind;
        }
        for m in self.genome_mods {
            m(&mut genome);
        }
        agent.brain = genome.neural.clone();
        agent.genome = Arc::new(genome);
        if let Some(max) = self.max_energy {
            agent.physiology.max_energy = max;
        }
        if let Some(energy) = self.energy {
            agent.physiology.energy = energy;
        }
        agent.physiology.age = self.age;
        agent
    }
}
