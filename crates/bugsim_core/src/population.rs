//! Ordered container of live agents.
//!
//! Births append, deaths remove, and identities stay unique. The id index is
//! kept in step with the vector so lookups by id never scan.

use bugsim_data::Agent;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the population container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PopulationError {
    /// An agent with this id is already present
    #[error("Duplicate agent id: {0}")]
    DuplicateId(Uuid),

    /// No agent with this id
    #[error("Unknown agent id: {0}")]
    UnknownId(Uuid),
}

pub type Result<T> = std::result::Result<T, PopulationError>;

#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: Vec<Agent>,
    index: HashMap<Uuid, usize>,
}

impl Population {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_agents(agents: Vec<Agent>) -> Result<Self> {
        let mut population = Self::new();
        for agent in agents {
            population.push(agent)?;
        }
        Ok(population)
    }

    /// Appends an agent at the end of the population order.
    pub fn push(&mut self, agent: Agent) -> Result<()> {
        let id = agent.id();
        if self.index.contains_key(&id) {
            return Err(PopulationError::DuplicateId(id));
        }
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    /// Removes one agent, keeping the order of the rest.
    pub fn remove(&mut self, id: &Uuid) -> Result<Agent> {
        let idx = self
            .index
            .get(id)
            .copied()
            .ok_or(PopulationError::UnknownId(*id))?;
        let agent = self.agents.remove(idx);
        self.reindex();
        Ok(agent)
    }

    /// Removes every agent matching `pred` and returns them in order.
    pub fn extract_if<F>(&mut self, mut pred: F) -> Vec<Agent>
    where
        F: FnMut(&Agent) -> bool,
    {
        let (removed, kept): (Vec<Agent>, Vec<Agent>) =
            std::mem::take(&mut self.agents).into_iter().partition(|a| pred(a));
        self.agents = kept;
        self.reindex();
        removed
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.index
            .extend(self.agents.iter().enumerate().map(|(i, a)| (a.id(), i)));
    }

    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&Agent> {
        self.index.get(id).map(|&i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Agent> {
        match self.index.get(id) {
            Some(&i) => self.agents.get_mut(i),
            None => None,
        }
    }

    #[must_use]
    pub fn index_of(&self, id: &Uuid) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Two distinct agents borrowed mutably at once.
    pub fn pair_mut(&mut self, a: &Uuid, b: &Uuid) -> Option<(&mut Agent, &mut Agent)> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        if i == j {
            return None;
        }
        if i < j {
            let (left, right) = self.agents.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.agents.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
    }

    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access to the agents in order. Ids must not be changed.
    pub fn as_mut_slice(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
