use crate::config::ConstructionConfig;
use crate::systems::energy;
use bugsim_data::{Agent, Blueprint, SpeciesKind, StructureKind, TerrainSample};

/// Structure an agent plans when it has no blueprint yet.
#[must_use]
pub fn preferred_structure(agent: &Agent) -> StructureKind {
    if agent.genome.species.kind == SpeciesKind::Carnivore {
        StructureKind::Trap
    } else if agent.genome.aggression < 0.5 {
        StructureKind::Shelter
    } else {
        StructureKind::Cache
    }
}

#[must_use]
pub fn required_resources(kind: StructureKind, config: &ConstructionConfig) -> f64 {
    match kind {
        StructureKind::Shelter => config.shelter_required,
        StructureKind::Cache => config.cache_required,
        StructureKind::Trap => config.trap_required,
    }
}

/// One tick of the gather and build loop.
///
/// Runs only while the build output clears its threshold and the agent holds
/// more than `build_energy_fraction` of its maximum energy. Carried resources
/// never exceed `carry_capacity` or what the blueprint still needs. Returns
/// the blueprint when the structure is completed this tick.
pub fn advance_construction(
    agent: &mut Agent,
    build_output: f32,
    terrain: &TerrainSample,
    config: &ConstructionConfig,
) -> Option<Blueprint> {
    if build_output <= config.build_threshold
        || agent.energy_fraction() <= config.build_energy_fraction
    {
        return None;
    }

    let Some(mut blueprint) = agent.construction.blueprint else {
        let kind = preferred_structure(agent);
        agent.construction.blueprint = Some(Blueprint {
            kind,
            site: agent.physiology.position,
            required: required_resources(kind, config),
            progress: 0.0,
        });
        return None;
    };

    let tools = agent.genome.tools;
    let carried = agent.construction.carried_resources;
    let room = (config.carry_capacity - carried)
        .min(blueprint.required - blueprint.progress - carried)
        .max(0.0);
    let gathered = (config.gather_rate
        * f64::from(tools.gathering_skill)
        * terrain.resources.max(0.0))
    .min(room);
    if gathered > 0.0 {
        agent.construction.carried_resources += gathered;
        energy::spend(agent, config.gather_cost);
    }

    let step = (config.build_rate * f64::from(tools.construction_skill))
        .min(agent.construction.carried_resources)
        .min(blueprint.required - blueprint.progress);
    if step > 0.0 {
        blueprint.progress += step;
        agent.construction.carried_resources -= step;
        energy::spend(agent, config.build_cost);
    }

    if blueprint.progress >= blueprint.required {
        agent.construction.blueprint = None;
        agent.record.structures_built += 1;
        Some(blueprint)
    } else {
        agent.construction.blueprint = Some(blueprint);
        None
    }
}
