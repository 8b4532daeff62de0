use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use bugsim_data::{
    Agent, BehaviorState, ConstructionState, DeathCause, Genome, Identity, LifeRecord,
    PerformanceSnapshot, Physiology, SocialState, Vec2,
};
use rand::Rng;
use std::f64::consts::TAU;
use std::sync::Arc;
use uuid::Uuid;

/// Ticks between two energy trajectory samples.
pub const TRAJECTORY_INTERVAL: u64 = 10;
/// Samples kept in an agent's energy trajectory.
pub const TRAJECTORY_LEN: usize = 64;

/// Spawns a founder with a random genome.
pub fn create_agent_with_rng<R: Rng>(
    position: Vec2,
    tick: u64,
    config: &AppConfig,
    rng: &mut R,
) -> Agent {
    let genome = Genome::new_random_with_rng(rng);
    let id = Uuid::from_u128(rng.gen::<u128>());
    let energy = genome.max_energy(&config.metabolism) * config.metabolism.initial_energy_fraction;
    let mut agent = create_agent_from_genome(genome, id, position, energy, 0, Vec::new(), tick, config);
    agent.behavior.wander_heading = rng.gen_range(0.0..TAU);
    agent
}

pub fn create_agent(position: Vec2, tick: u64, config: &AppConfig) -> Agent {
    let mut rng = rand::thread_rng();
    create_agent_with_rng(position, tick, config, &mut rng)
}

/// Builds an agent around an existing genome. The brain is expressed from
/// the genome's neural encoding.
#[allow(clippy::too_many_arguments)]
pub fn create_agent_from_genome(
    genome: Genome,
    id: Uuid,
    position: Vec2,
    energy: f64,
    generation: u32,
    parents: Vec<Uuid>,
    tick: u64,
    config: &AppConfig,
) -> Agent {
    let max_energy = genome.max_energy(&config.metabolism);
    let max_age = genome.max_age(&config.metabolism);
    let energy = energy.clamp(0.0, max_energy);
    let brain = genome.neural.clone();
    Agent {
        identity: Identity { id, parents },
        genome: Arc::new(genome),
        brain,
        generation,
        physiology: Physiology {
            position,
            velocity: Vec2::ZERO,
            energy,
            max_energy,
            age: 0,
            max_age,
        },
        behavior: BehaviorState::default(),
        social: SocialState::default(),
        construction: ConstructionState::default(),
        record: LifeRecord {
            birth_tick: tick,
            peak_energy: energy,
            ..LifeRecord::default()
        },
    }
}

/// Child of two parents: crossover, mutation, midpoint placement.
///
/// Charges nothing; the caller owns the energy bookkeeping.
pub fn create_offspring_with_rng<R: Rng>(
    a: &Agent,
    b: &Agent,
    tick: u64,
    config: &AppConfig,
    rng: &mut R,
) -> Agent {
    let child_genome = a
        .genome
        .crossover_with_rng(&b.genome, rng)
        .mutate_with_rng(&config.evolution, rng);
    let id = Uuid::from_u128(rng.gen::<u128>());
    let position = a
        .physiology
        .position
        .lerp(b.physiology.position, 0.5);
    let generation = a.generation.max(b.generation) + 1;
    let mut child = create_agent_from_genome(
        child_genome,
        id,
        position,
        config.reproduction.child_energy,
        generation,
        vec![a.id(), b.id()],
        tick,
        config,
    );
    child.behavior.wander_heading = rng.gen_range(0.0..TAU);
    child.social.group_id = a.social.group_id.or(b.social.group_id);
    if child.social.group_id.is_some() {
        child.social.role = bugsim_data::SocialRole::Member;
    }
    child
}

#[must_use]
pub fn death_cause(agent: &Agent, killed: bool) -> DeathCause {
    if killed {
        DeathCause::Predation
    } else if agent.physiology.age >= agent.physiology.max_age {
        DeathCause::OldAge
    } else {
        DeathCause::Starvation
    }
}

/// Fitness-relevant summary of an agent's life so far.
#[must_use]
pub fn performance_snapshot(agent: &Agent, tick: u64) -> PerformanceSnapshot {
    PerformanceSnapshot {
        id: agent.id(),
        lineage_id: agent.genome.lineage_id,
        generation: agent.generation,
        species: agent.genome.species.kind,
        survival_ticks: tick.saturating_sub(agent.record.birth_tick),
        offspring_count: agent.record.offspring_count,
        kills: agent.record.kills,
        food_eaten: agent.record.food_eaten,
        signals_emitted: agent.record.signals_emitted,
        structures_built: agent.record.structures_built,
        peak_energy: agent.record.peak_energy,
        final_energy: agent.physiology.energy,
        energy_trajectory: agent.record.energy_trajectory.iter().copied().collect(),
        hidden_neurons: agent.brain.hidden_neurons(),
        neural_grow_events: agent.record.neural_grow_events,
        neural_shrink_events: agent.record.neural_shrink_events,
    }
}

/// Updates peak energy and, on sampling ticks, the bounded trajectory.
pub fn record_energy_sample(agent: &mut Agent, tick: u64) {
    let energy = agent.physiology.energy;
    if energy > agent.record.peak_energy {
        agent.record.peak_energy = energy;
    }
    if tick % TRAJECTORY_INTERVAL == 0 {
        let trajectory = &mut agent.record.energy_trajectory;
        trajectory.push_back(energy);
        while trajectory.len() > TRAJECTORY_LEN {
            trajectory.pop_front();
        }
    }
}
