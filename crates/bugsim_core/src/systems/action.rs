//! Per-agent act phase.
//!
//! Runs in parallel over the population. Each call writes only to its own
//! agent; anything touching a second agent or the food supply is returned
//! as an [`InteractionCommand`].

use crate::config::AppConfig;
use crate::environment::{Habitat, TerrainQuery};
use crate::interaction::InteractionCommand;
use crate::lifecycle;
use crate::neural::ScalingOutcome;
use crate::signal;
use crate::snapshot::{AgentSnapshot, PopulationSnapshot};
use crate::systems::behavior::{self, ResolverInput};
use crate::systems::energy;
use crate::systems::intel::Decision;
use crate::systems::perception::Perception;
use crate::systems::social::{construction, reproduction, signaling};
use bugsim_data::{Agent, Genome, LiveEvent, Signal, SignalKind, SocialRole, Tier, TrackedAgent, Vec2};
use chrono::Utc;
use rand::Rng;
use std::f64::consts::TAU;

pub struct ActionContext<'a> {
    pub config: &'a AppConfig,
    pub habitat: &'a Habitat,
    pub view: &'a PopulationSnapshot,
    pub tick: u64,
    pub now: f64,
}

#[derive(Debug, Default)]
pub struct ActionOutput {
    pub commands: Vec<InteractionCommand>,
    pub signal: Option<Signal>,
    pub events: Vec<LiveEvent>,
    pub tier: Option<Tier>,
}

/// Moves by `velocity` plus any climate displacement.
///
/// The target is clamped to the arena first, redirecting velocity inward and
/// damping it; an impassable target keeps the agent in place and damps the
/// velocity instead. Returns the new position and velocity.
pub fn handle_movement(
    position: Vec2,
    velocity: Vec2,
    displacement: Vec2,
    terrain: &dyn TerrainQuery,
    genome: &Genome,
    config: &AppConfig,
) -> (Vec2, Vec2) {
    let world = &config.world;
    let mut velocity = velocity + displacement;
    if !velocity.is_finite() {
        velocity = Vec2::ZERO;
    }
    let mut target = position + velocity;

    if target.x < 0.0 {
        target.x = 0.0;
        velocity.x = velocity.x.abs() * world.wall_damping;
    } else if target.x > world.width {
        target.x = world.width;
        velocity.x = -velocity.x.abs() * world.wall_damping;
    }
    if target.y < 0.0 {
        target.y = 0.0;
        velocity.y = velocity.y.abs() * world.wall_damping;
    } else if target.y > world.height {
        target.y = world.height;
        velocity.y = -velocity.y.abs() * world.wall_damping;
    }

    if terrain.is_passable(target, genome) {
        (target, velocity)
    } else {
        (position, velocity * world.impassable_damping)
    }
}

fn refresh(target: Option<TrackedAgent>, view: &PopulationSnapshot) -> Option<TrackedAgent> {
    target.and_then(|t| {
        view.get(&t.id).map(|s| TrackedAgent {
            id: s.id,
            position: s.position,
        })
    })
}

fn still_prey(agent: &Agent, s: &AgentSnapshot) -> bool {
    let g = &agent.genome;
    g.species.kind.preys_on(g.size, s.species, s.size)
}

fn event_time() -> String {
    Utc::now().to_rfc3339()
}

/// Runs the behaviour resolver, movement, emission, construction, terminal
/// effects and adaptive scaling for one agent.
pub fn act<R: Rng>(
    agent: &mut Agent,
    perception: &Perception,
    decision: Option<&Decision>,
    ctx: &ActionContext,
    rng: &mut R,
) -> ActionOutput {
    let config = ctx.config;
    let mut out = ActionOutput::default();
    let id = agent.id();
    let position = agent.physiology.position;

    // Targets: fresh sightings first, then what signals told us.
    let threat = perception.predator.or_else(|| {
        if agent.behavior.cooldowns.flee > 0 {
            agent.behavior.threat_target
        } else {
            None
        }
    });
    let prey = perception.prey.or_else(|| {
        refresh(agent.behavior.prey_target, ctx.view)
            .filter(|t| ctx.view.get(&t.id).is_some_and(|s| still_prey(agent, s)))
    });
    let mate = perception.mate.or_else(|| {
        refresh(agent.behavior.mate_target, ctx.view)
            .filter(|t| ctx.view.get(&t.id).is_some_and(|s| s.reproduction_ready))
    });
    agent.behavior.food_target = perception.food;
    agent.behavior.threat_target = threat;
    agent.behavior.prey_target = prey;
    agent.behavior.mate_target = mate;
    if prey.is_none() {
        agent.social.hunt_leader = None;
    }

    let genome = agent.genome.clone();
    let speed = energy::current_speed(
        &genome,
        agent.physiology.energy,
        &perception.terrain,
        &perception.effects,
        &config.metabolism,
    );
    let threshold =
        config.reproduction.energy_threshold + perception.effects.reproduction_threshold_adjustment;
    let eligible = reproduction::is_eligible(agent, threshold, config);
    let food_waypoint = perception
        .food
        .map(|f| ctx.habitat.terrain.path_hint(position, f.position, &genome));
    let angle = rng.gen_range(0.0..TAU);

    let resolution = behavior::resolve(
        &ResolverInput {
            position,
            speed,
            energy_fraction: agent.energy_fraction(),
            can_hunt: genome.species.kind.can_hunt(),
            reproduction_eligible: eligible,
            threat: threat.map(|t| t.position),
            food: food_waypoint,
            prey: prey.map(|t| t.position),
            mate: mate.map(|t| t.position),
            alarmed: agent.behavior.cooldowns.flee > 0,
            wander_heading: agent.behavior.wander_heading,
            decision,
            fallback_direction: Vec2::new(angle.cos(), angle.sin()),
        },
        config,
    );
    out.tier = Some(resolution.tier);
    agent.behavior.last_tier = Some(resolution.tier);
    agent.behavior.wander_heading = (agent.behavior.wander_heading
        + rng.gen_range(-config.behavior.wander_turn..=config.behavior.wander_turn))
    .rem_euclid(TAU);

    let (new_pos, new_vel) = handle_movement(
        position,
        resolution.velocity,
        perception.effects.displacement,
        ctx.habitat.terrain.as_ref(),
        &genome,
        config,
    );
    energy::spend(agent, resolution.energy_cost);
    energy::spend(agent, energy::movement_cost(new_pos - position, &config.metabolism));
    agent.physiology.position = new_pos;
    agent.physiology.velocity = new_vel;

    if let Some(food) = perception.food {
        if new_pos.distance(food.position) <= config.metabolism.eat_distance
            && agent.energy_fraction() < config.metabolism.well_fed_fraction
        {
            out.commands.push(InteractionCommand::EatFood {
                agent: id,
                site: food.site,
            });
        }
    }

    if resolution.tier == Tier::Hunting {
        if let Some(prey) = prey {
            if agent.behavior.cooldowns.hunt == 0
                && new_pos.distance(prey.position) <= config.hunting.attack_range
            {
                out.commands.push(InteractionCommand::Hunt {
                    hunter: id,
                    prey: prey.id,
                });
                agent.behavior.cooldowns.hunt = config.hunting.cooldown;
                energy::spend(agent, config.hunting.attempt_cost);
            }
        }
    }

    if resolution.tier == Tier::ReproductionSeeking {
        if let Some(mate) = mate {
            if new_pos.distance(mate.position) <= config.reproduction.mate_distance {
                out.commands.push(InteractionCommand::Reproduce {
                    a: id,
                    b: mate.id,
                    threshold,
                });
            }
        }
    }

    if let Some((kind, payload)) =
        signaling::choose_emission(agent, perception, decision, resolution.tier, config)
    {
        if signal::may_emit(agent, rng) {
            let s = signal::emit(agent, kind, payload, ctx.now, &config.signal);
            if kind == SignalKind::GroupRally && agent.social.group_id.is_none() {
                agent.social.group_id = Some(id);
                agent.social.role = SocialRole::Leader;
            }
            out.events.push(LiveEvent::SignalEmitted {
                id,
                kind,
                strength: s.strength,
                tick: ctx.tick,
                timestamp: event_time(),
            });
            out.signal = Some(s);
        }
    }

    if let Some(d) = decision {
        if let Some(done) =
            construction::advance_construction(agent, d.build(), &perception.terrain, &config.construction)
        {
            out.events.push(LiveEvent::StructureBuilt {
                id,
                kind: done.kind,
                x: done.site.x,
                y: done.site.y,
                tick: ctx.tick,
                timestamp: event_time(),
            });
        }
    }

    // Terminal effects, applied whatever the tier.
    agent.physiology.age += 1;
    agent.behavior.cooldowns.tick();
    energy::spend(
        agent,
        energy::metabolic_loss(&genome, &perception.terrain, &perception.effects, &config.metabolism),
    );
    energy::spend(agent, energy::neural_cost(&agent.brain, &config.neural));
    energy::clamp_energy(agent);

    match crate::neural::scaling::adapt_with_rng(
        &agent.brain,
        agent.physiology.energy,
        &config.neural,
        rng,
    ) {
        ScalingOutcome::Grew(brain) => {
            agent.brain = brain;
            agent.record.neural_grow_events += 1;
            out.events.push(LiveEvent::NeuralGrowth {
                id,
                hidden_neurons: agent.brain.hidden_neurons(),
                tick: ctx.tick,
                timestamp: event_time(),
            });
        }
        ScalingOutcome::Pruned(brain) => {
            agent.brain = brain;
            agent.record.neural_shrink_events += 1;
            out.events.push(LiveEvent::NeuralPrune {
                id,
                hidden_neurons: agent.brain.hidden_neurons(),
                tick: ctx.tick,
                timestamp: event_time(),
            });
        }
        ScalingOutcome::Unchanged => {}
    }

    lifecycle::record_energy_sample(agent, ctx.tick);
    out
}
