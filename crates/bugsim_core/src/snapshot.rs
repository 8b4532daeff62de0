use crate::config::AppConfig;
use crate::spatial_hash::SpatialHash;
use crate::systems::social::reproduction;
use bugsim_data::{Agent, SpeciesKind, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Read-only copy of the parts of an agent other agents may observe.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub position: Vec2,
    pub velocity: Vec2,
    pub energy: f64,
    pub max_energy: f64,
    pub age: u64,
    pub generation: u32,
    pub species: SpeciesKind,
    pub size: f32,
    pub strength: f32,
    pub defense: f32,
    pub camouflage: f32,
    pub group_id: Option<Uuid>,
    /// Mature, rested and above the base energy threshold.
    pub reproduction_ready: bool,
}

impl AgentSnapshot {
    #[must_use]
    pub fn from_agent(agent: &Agent, config: &AppConfig) -> Self {
        Self {
            id: agent.id(),
            lineage_id: agent.genome.lineage_id,
            position: agent.physiology.position,
            velocity: agent.physiology.velocity,
            energy: agent.physiology.energy,
            max_energy: agent.physiology.max_energy,
            age: agent.physiology.age,
            generation: agent.generation,
            species: agent.genome.species.kind,
            size: agent.genome.size,
            strength: agent.genome.strength,
            defense: agent.genome.species.defense,
            camouflage: agent.genome.camouflage,
            group_id: agent.social.group_id,
            reproduction_ready: reproduction::is_eligible(
                agent,
                config.reproduction.energy_threshold,
                config,
            ),
        }
    }
}

/// Frozen view of the whole population for one tick.
///
/// Every read of another agent during the parallel phases goes through this
/// view, so no agent observes a half-updated neighbour.
#[derive(Clone, Debug, Default)]
pub struct PopulationSnapshot {
    pub agents: Vec<AgentSnapshot>,
    pub index: HashMap<Uuid, usize>,
    pub spatial: SpatialHash,
}

impl PopulationSnapshot {
    #[must_use]
    pub fn new(width: f64, height: f64, cell_size: f64) -> Self {
        Self {
            agents: Vec::new(),
            index: HashMap::new(),
            spatial: SpatialHash::new(cell_size, width, height),
        }
    }

    pub fn rebuild(&mut self, agents: &[Agent], config: &AppConfig) {
        self.agents.clear();
        self.agents
            .extend(agents.iter().map(|a| AgentSnapshot::from_agent(a, config)));
        self.index.clear();
        self.index
            .extend(self.agents.iter().enumerate().map(|(i, s)| (s.id, i)));
        let positions: Vec<Vec2> = self.agents.iter().map(|s| s.position).collect();
        self.spatial.build_parallel(&positions);
    }

    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&AgentSnapshot> {
        self.index.get(id).and_then(|&i| self.agents.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Visits every agent within `radius` of `center`, exact distance.
    pub fn for_each_within<'s, F>(&'s self, center: Vec2, radius: f64, mut f: F)
    where
        F: FnMut(&'s AgentSnapshot, f64),
    {
        self.spatial.query_callback(center, radius, |idx| {
            if let Some(other) = self.agents.get(idx) {
                let dist = center.distance(other.position);
                if dist <= radius {
                    f(other, dist);
                }
            }
        });
    }
}
