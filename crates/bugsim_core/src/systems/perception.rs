//! Sensory assembly.
//!
//! Builds the fixed-order sensory vector and the tick's candidate targets
//! from the agent, the frozen population view and the habitat queries.

use crate::config::AppConfig;
use crate::environment::Habitat;
use crate::neural::SENSORY_INPUTS;
use crate::snapshot::{AgentSnapshot, PopulationSnapshot};
use bugsim_data::{
    Agent, EnvironmentEffects, FoodTarget, TerrainSample, TrackedAgent, Vec2,
};

pub const IN_ENERGY: usize = 0;
pub const IN_AGE: usize = 1;
pub const IN_TERRAIN_KIND: usize = 2;
pub const IN_TERRAIN_SPEED: usize = 3;
pub const IN_TERRAIN_VISION: usize = 4;
pub const IN_TERRAIN_COST: usize = 5;
pub const IN_FOOD: usize = 6;
pub const IN_PREY: usize = 9;
pub const IN_PREDATOR: usize = 12;
pub const IN_MATE: usize = 15;
pub const IN_SEASON_DRAIN: usize = 18;
pub const IN_WEATHER_SPEED: usize = 19;
pub const IN_DISASTER_DAMAGE: usize = 20;
pub const IN_TERRITORY_OCCUPANCY: usize = 21;
pub const IN_TERRITORY_OWNED: usize = 22;
pub const IN_ALARM: usize = 23;

pub struct PerceptionContext<'a> {
    pub config: &'a AppConfig,
    pub habitat: &'a Habitat,
    pub view: &'a PopulationSnapshot,
    pub tick: u64,
}

/// Everything an agent sensed this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Perception {
    pub inputs: [f32; SENSORY_INPUTS],
    pub terrain: TerrainSample,
    pub effects: EnvironmentEffects,
    pub vision: f64,
    pub food: Option<FoodTarget>,
    pub prey: Option<TrackedAgent>,
    pub predator: Option<TrackedAgent>,
    pub mate: Option<TrackedAgent>,
}

#[inline]
fn unit(value: f64) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Direction and normalised distance, `(0, 0, 1)` when nothing is sensed.
fn relative(from: Vec2, to: Option<Vec2>, vision: f64) -> [f32; 3] {
    match to {
        Some(target) => {
            let dir = (target - from).normalized();
            let dist = if vision > 0.0 {
                from.distance(target) / vision
            } else {
                1.0
            };
            [unit(dir.x), unit(dir.y), unit(dist)]
        }
        None => [0.0, 0.0, 1.0],
    }
}

fn track(s: &AgentSnapshot) -> TrackedAgent {
    TrackedAgent {
        id: s.id,
        position: s.position,
    }
}

#[must_use]
pub fn perceive(agent: &Agent, ctx: &PerceptionContext) -> Perception {
    let genome = &agent.genome;
    let pos = agent.physiology.position;
    let terrain = ctx.habitat.terrain.terrain_at(pos, genome);
    let effects = ctx.habitat.climate.effects_at(pos, ctx.tick);
    let vision = (f64::from(genome.vision_radius) * terrain.vision).max(0.0);

    let own_kind = genome.species.kind;
    let own_size = genome.size;
    let mut prey: Option<(&AgentSnapshot, f64)> = None;
    let mut predator: Option<(&AgentSnapshot, f64)> = None;
    let mut mate: Option<(&AgentSnapshot, f64)> = None;
    let closer = |best: &Option<(&AgentSnapshot, f64)>, d: f64| best.map_or(true, |(_, bd)| d < bd);

    ctx.view.for_each_within(pos, vision, |other, dist| {
        if other.id == agent.id() {
            return;
        }
        if own_kind.preys_on(own_size, other.species, other.size) && closer(&prey, dist) {
            prey = Some((other, dist));
        }
        if other.species.preys_on(other.size, own_kind, own_size) && closer(&predator, dist) {
            predator = Some((other, dist));
        }
        if other.species == own_kind && other.reproduction_ready && closer(&mate, dist) {
            mate = Some((other, dist));
        }
    });

    let food = ctx
        .habitat
        .food
        .nearest_food(pos, vision)
        .map(|(site, position)| FoodTarget { site, position });

    let prey = prey.map(|(s, _)| track(s));
    let predator = predator.map(|(s, _)| track(s));
    let mate = mate.map(|(s, _)| track(s));

    let mut inputs = [0.0f32; SENSORY_INPUTS];
    inputs[IN_ENERGY] = unit(agent.energy_fraction());
    inputs[IN_AGE] = unit(agent.age_fraction());
    inputs[IN_TERRAIN_KIND] = terrain.kind.sensory_value();
    inputs[IN_TERRAIN_SPEED] = unit(terrain.speed - 1.0);
    inputs[IN_TERRAIN_VISION] = unit(terrain.vision - 1.0);
    inputs[IN_TERRAIN_COST] = unit(terrain.energy_cost - 1.0);
    inputs[IN_FOOD..IN_FOOD + 3].copy_from_slice(&relative(pos, food.map(|f| f.position), vision));
    inputs[IN_PREY..IN_PREY + 3].copy_from_slice(&relative(pos, prey.map(|p| p.position), vision));
    inputs[IN_PREDATOR..IN_PREDATOR + 3]
        .copy_from_slice(&relative(pos, predator.map(|p| p.position), vision));
    inputs[IN_MATE..IN_MATE + 3].copy_from_slice(&relative(pos, mate.map(|p| p.position), vision));
    inputs[IN_SEASON_DRAIN] = unit(effects.energy_drain - 1.0);
    inputs[IN_WEATHER_SPEED] = unit(effects.speed - 1.0);
    inputs[IN_DISASTER_DAMAGE] = unit(effects.damage);
    inputs[IN_TERRITORY_OCCUPANCY] = unit(f64::from(ctx.habitat.territory.occupancy(pos)));
    inputs[IN_TERRITORY_OWNED] = match ctx.habitat.territory.owner(pos) {
        None => 0.0,
        Some(owner) if owner == genome.lineage_id || Some(owner) == agent.social.group_id => 1.0,
        Some(_) => -1.0,
    };
    inputs[IN_ALARM] = if agent.behavior.cooldowns.flee > 0 { 1.0 } else { 0.0 };

    Perception {
        inputs,
        terrain,
        effects,
        vision,
        food,
        prey,
        predator,
        mate,
    }
}
