//! Narrow interfaces to the world outside the agent core.
//!
//! Terrain, climate, territory and food are consumed through the traits in
//! this module and bundled into a [`Habitat`] that the tick loop receives as
//! an explicit parameter. The concrete types here are small standalone
//! implementations so the core can run and be tested on its own; they make
//! no attempt at world generation.

use crate::config::AppConfig;
use bugsim_data::{EnvironmentEffects, Genome, TerrainKind, TerrainSample, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terrain classification, movement modifiers and passability.
pub trait TerrainQuery: Send + Sync {
    fn terrain_at(&self, position: Vec2, genome: &Genome) -> TerrainSample;
    fn is_passable(&self, position: Vec2, genome: &Genome) -> bool;
    /// Next waypoint on the way from `from` to `to`.
    fn path_hint(&self, from: Vec2, to: Vec2, genome: &Genome) -> Vec2;
}

/// Season, weather and disaster modifiers.
pub trait ClimateEffects: Send + Sync {
    fn effects_at(&self, position: Vec2, tick: u64) -> EnvironmentEffects;
}

pub trait TerritoryQuery: Send + Sync {
    /// Crowding of the territory around `position`, in [0, 1].
    fn occupancy(&self, position: Vec2) -> f32;
    fn owner(&self, position: Vec2) -> Option<Uuid>;
}

/// Food sites agents can forage from.
pub trait FoodSupply: Send + Sync {
    /// Closest non-empty site within `radius`, as `(site id, position)`.
    fn nearest_food(&self, position: Vec2, radius: f64) -> Option<(u64, Vec2)>;
    /// Removes up to `max` energy from a site and returns what was removed.
    fn consume(&mut self, site: u64, max: f64) -> f64;
    /// Advances regrowth by one tick.
    fn tick(&mut self, _tick: u64) {}
    /// Number of non-empty sites.
    fn available(&self) -> usize;
}

/// All collaborators a tick needs, passed explicitly into the update loop.
pub struct Habitat {
    pub terrain: Box<dyn TerrainQuery>,
    pub climate: Box<dyn ClimateEffects>,
    pub territory: Box<dyn TerritoryQuery>,
    pub food: Box<dyn FoodSupply>,
}

impl Habitat {
    /// Open arena, seasonal climate, unclaimed territory and regrowing food.
    #[must_use]
    pub fn standalone(config: &AppConfig, seed: u64) -> Self {
        Self {
            terrain: Box::new(OpenField::new(config)),
            climate: Box::new(SeasonalClimate::new(config.world.season_length)),
            territory: Box::new(Unclaimed),
            food: Box::new(FoodPatches::new(config, seed)),
        }
    }

    /// Open arena with neutral climate and no food at all.
    #[must_use]
    pub fn barren(config: &AppConfig) -> Self {
        Self {
            terrain: Box::new(OpenField::new(config)),
            climate: Box::new(Calm),
            territory: Box::new(Unclaimed),
            food: Box::new(FoodPatches::empty(config)),
        }
    }
}

/// Axis-aligned impassable rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub min: Vec2,
    pub max: Vec2,
}

impl Obstacle {
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Flat plains arena with optional wall blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenField {
    pub width: f64,
    pub height: f64,
    pub resources: f64,
    pub obstacles: Vec<Obstacle>,
}

impl OpenField {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            width: config.world.width,
            height: config.world.height,
            resources: config.world.terrain_resources,
            obstacles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    fn blocked(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.contains(p))
    }
}

impl TerrainQuery for OpenField {
    fn terrain_at(&self, position: Vec2, _genome: &Genome) -> TerrainSample {
        if self.blocked(position) {
            return TerrainSample {
                kind: TerrainKind::Wall,
                speed: 0.0,
                resources: 0.0,
                ..TerrainSample::default()
            };
        }
        TerrainSample {
            resources: self.resources,
            ..TerrainSample::default()
        }
    }

    fn is_passable(&self, position: Vec2, _genome: &Genome) -> bool {
        position.is_finite()
            && (0.0..=self.width).contains(&position.x)
            && (0.0..=self.height).contains(&position.y)
            && !self.blocked(position)
    }

    fn path_hint(&self, _from: Vec2, to: Vec2, _genome: &Genome) -> Vec2 {
        to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const CYCLE: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    #[must_use]
    pub fn metabolism_multiplier(&self) -> f64 {
        match self {
            Season::Spring => 0.8,
            Season::Summer => 1.2,
            Season::Fall => 1.0,
            Season::Winter => 1.5,
        }
    }

    #[must_use]
    pub fn speed_multiplier(&self) -> f64 {
        match self {
            Season::Spring | Season::Fall => 1.0,
            Season::Summer => 1.1,
            Season::Winter => 0.8,
        }
    }

    /// Added to the reproduction energy threshold.
    #[must_use]
    pub fn reproduction_adjustment(&self) -> f64 {
        match self {
            Season::Spring => -5.0,
            Season::Summer => 0.0,
            Season::Fall => 5.0,
            Season::Winter => 15.0,
        }
    }

    #[must_use]
    pub fn next(&self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    fn smooth_step(t: f64) -> f64 {
        t * t * (3.0 - 2.0 * t)
    }

    fn blend(from: f64, to: f64, progress: f64) -> f64 {
        let t = Self::smooth_step(progress.clamp(0.0, 1.0));
        from + (to - from) * t
    }
}

/// Four-season cycle with smooth transitions over the last quarter of each season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalClimate {
    /// Ticks for a full year.
    pub cycle_length: u64,
}

impl SeasonalClimate {
    #[must_use]
    pub fn new(cycle_length: u64) -> Self {
        Self {
            cycle_length: cycle_length.max(4),
        }
    }

    /// Season at `tick` and the transition progress towards the next one.
    #[must_use]
    pub fn season_at(&self, tick: u64) -> (Season, f64) {
        let season_len = self.cycle_length / 4;
        let in_year = tick % (season_len * 4);
        let season = Season::CYCLE[(in_year / season_len) as usize % 4];
        let in_season = (in_year % season_len) as f64 / season_len as f64;
        let progress = ((in_season - 0.75) / 0.25).max(0.0);
        (season, progress)
    }
}

impl ClimateEffects for SeasonalClimate {
    fn effects_at(&self, _position: Vec2, tick: u64) -> EnvironmentEffects {
        let (season, progress) = self.season_at(tick);
        let next = season.next();
        EnvironmentEffects {
            energy_drain: Season::blend(
                season.metabolism_multiplier(),
                next.metabolism_multiplier(),
                progress,
            ),
            speed: Season::blend(season.speed_multiplier(), next.speed_multiplier(), progress),
            reproduction_threshold_adjustment: Season::blend(
                season.reproduction_adjustment(),
                next.reproduction_adjustment(),
                progress,
            ),
            ..EnvironmentEffects::default()
        }
    }
}

/// Neutral climate: no drain, speed or damage modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calm;

impl ClimateEffects for Calm {
    fn effects_at(&self, _position: Vec2, _tick: u64) -> EnvironmentEffects {
        EnvironmentEffects::default()
    }
}

/// The same effects everywhere and always.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantClimate(pub EnvironmentEffects);

impl ClimateEffects for ConstantClimate {
    fn effects_at(&self, _position: Vec2, _tick: u64) -> EnvironmentEffects {
        self.0
    }
}

/// Nobody owns anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unclaimed;

impl TerritoryQuery for Unclaimed {
    fn occupancy(&self, _position: Vec2) -> f32 {
        0.0
    }

    fn owner(&self, _position: Vec2) -> Option<Uuid> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodSite {
    pub id: u64,
    pub position: Vec2,
    pub energy: f64,
}

/// Scattered food sites that regrow after being eaten.
#[derive(Debug, Clone)]
pub struct FoodPatches {
    pub sites: Vec<FoodSite>,
    width: f64,
    height: f64,
    max_sites: usize,
    site_energy: f64,
    regrow_chance: f64,
    next_id: u64,
    rng: ChaCha8Rng,
}

impl FoodPatches {
    #[must_use]
    pub fn new(config: &AppConfig, seed: u64) -> Self {
        let mut patches = Self::empty(config);
        patches.rng = ChaCha8Rng::seed_from_u64(seed ^ 0xF00D);
        patches.max_sites = config.world.max_food;
        for _ in 0..config.world.initial_food {
            patches.spawn();
        }
        patches
    }

    /// No sites and no spontaneous spawning; sites can still be added by hand.
    #[must_use]
    pub fn empty(config: &AppConfig) -> Self {
        Self {
            sites: Vec::new(),
            width: config.world.width,
            height: config.world.height,
            max_sites: 0,
            site_energy: config.world.food_energy,
            regrow_chance: config.world.food_regrow_chance,
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Places a full site at `position` and returns its id.
    pub fn add_site(&mut self, position: Vec2, energy: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.sites.push(FoodSite {
            id,
            position,
            energy,
        });
        id
    }

    fn spawn(&mut self) {
        let position = Vec2::new(
            self.rng.gen_range(0.0..=self.width),
            self.rng.gen_range(0.0..=self.height),
        );
        self.add_site(position, self.site_energy);
    }
}

impl FoodSupply for FoodPatches {
    fn nearest_food(&self, position: Vec2, radius: f64) -> Option<(u64, Vec2)> {
        self.sites
            .iter()
            .filter(|s| s.energy > 0.0)
            .map(|s| (s, s.position.distance(position)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.id.cmp(&b.0.id)))
            .map(|(s, _)| (s.id, s.position))
    }

    fn consume(&mut self, site: u64, max: f64) -> f64 {
        let Some(s) = self.sites.iter_mut().find(|s| s.id == site) else {
            return 0.0;
        };
        let taken = s.energy.min(max.max(0.0));
        s.energy -= taken;
        taken
    }

    fn tick(&mut self, _tick: u64) {
        for i in 0..self.sites.len() {
            if self.sites[i].energy <= 0.0 && self.rng.gen_bool(self.regrow_chance) {
                self.sites[i].energy = self.site_energy;
            }
        }
        if self.sites.len() < self.max_sites && self.rng.gen_bool(self.regrow_chance) {
            self.spawn();
        }
    }

    fn available(&self) -> usize {
        self.sites.iter().filter(|s| s.energy > 0.0).count()
    }
}
