use crate::model::environment::Habitat;
use crate::model::lifecycle;
use crate::model::signal;
use crate::model::systems::energy;
use crate::model::systems::stats::{self, StatsContext};
use crate::model::world::World;
use bugsim_data::{Agent, LiveEvent};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

impl World {
    /// Tick boundary: clamps energy, removes the dead, merges newborns and
    /// refreshes the broadcast field, statistics and generation counter.
    pub fn finalize_tick(
        &mut self,
        habitat: &mut Habitat,
        events: &mut Vec<LiveEvent>,
        killed_ids: &HashSet<Uuid>,
        newborns: Vec<Agent>,
    ) -> anyhow::Result<()> {
        let tick = self.tick;
        let now = self.now();
        let timestamp = Utc::now().to_rfc3339();

        for agent in self.population.as_mut_slice() {
            energy::clamp_energy(agent);
        }

        let had_agents = !self.population.is_empty();
        let dead = self.population.extract_if(Agent::is_dead);
        let deaths = dead.len();
        for agent in dead {
            let cause = lifecycle::death_cause(&agent, killed_ids.contains(&agent.id()));
            tracing::debug!(tick = tick, id = %agent.id(), cause = ?cause, "Agent died");
            events.push(LiveEvent::Death {
                id: agent.id(),
                cause,
                snapshot: Box::new(lifecycle::performance_snapshot(&agent, tick)),
                tick,
                timestamp: timestamp.clone(),
            });
        }

        let births = newborns.len();
        for child in newborns {
            self.population.push(child)?;
        }

        signal::retain_active(&mut self.broadcasts, now);
        habitat.food.tick(tick);

        stats::update_population_stats(StatsContext {
            stats: &mut self.pop_stats,
            agents: self.population.as_slice(),
            births,
            deaths,
            active_signals: self.broadcasts.len(),
        });

        if self.policy.is_rollover(tick, self.population.len()) {
            self.generation += 1;
            self.metrics.increment_counter("generation_rollovers");
            tracing::info!(
                tick = tick,
                generation = self.generation,
                agents = self.population.len(),
                max_generation = self.pop_stats.max_generation,
                "Generation rollover"
            );
            events.push(LiveEvent::GenerationRollover {
                generation: self.generation,
                population: self.population.len(),
                max_generation: self.pop_stats.max_generation,
                tick,
                timestamp: timestamp.clone(),
            });
        }

        if self.population.is_empty() {
            if had_agents && !self.extinct {
                tracing::warn!(tick = tick, "Population went extinct");
                events.push(LiveEvent::Extinction { tick, timestamp });
            }
            self.extinct = true;
        } else {
            self.extinct = false;
        }

        self.record_event_counters(events, births, deaths);
        Ok(())
    }

    fn record_event_counters(&self, events: &[LiveEvent], births: usize, deaths: usize) {
        self.metrics.add_to_counter("births", births as u64);
        self.metrics.add_to_counter("deaths", deaths as u64);
        let (grown, pruned) = events.iter().fold((0u64, 0u64), |(g, p), e| match e {
            LiveEvent::NeuralGrowth { .. } => (g + 1, p),
            LiveEvent::NeuralPrune { .. } => (g, p + 1),
            _ => (g, p),
        });
        self.metrics.add_to_counter("neural_growth", grown);
        self.metrics.add_to_counter("neural_prune", pruned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use bugsim_data::{DeathCause, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_finalize_removes_dead_and_merges_newborns() {
        let mut config = AppConfig::default();
        config.world.seed = Some(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut starving = lifecycle::create_agent_with_rng(Vec2::new(1.0, 1.0), 0, &config, &mut rng);
        starving.physiology.energy = 0.0;
        let mut eaten = lifecycle::create_agent_with_rng(Vec2::new(2.0, 2.0), 0, &config, &mut rng);
        eaten.physiology.energy = 0.0;
        let alive = lifecycle::create_agent_with_rng(Vec2::new(3.0, 3.0), 0, &config, &mut rng);
        let child = lifecycle::create_agent_with_rng(Vec2::new(4.0, 4.0), 0, &config, &mut rng);
        let eaten_id = eaten.id();

        let mut world = World::from_agents(config.clone(), vec![starving, eaten, alive]).unwrap();
        world.tick = 1;
        let mut habitat = Habitat::barren(&config);
        let mut events = Vec::new();
        let killed: HashSet<Uuid> = [eaten_id].into_iter().collect();
        world
            .finalize_tick(&mut habitat, &mut events, &killed, vec![child])
            .unwrap();

        assert_eq!(world.population.len(), 2);
        assert_eq!(world.pop_stats.births, 1);
        assert_eq!(world.pop_stats.deaths, 2);
        let causes: Vec<DeathCause> = events
            .iter()
            .filter_map(|e| match e {
                LiveEvent::Death { cause, .. } => Some(*cause),
                _ => None,
            })
            .collect();
        assert_eq!(causes, vec![DeathCause::Starvation, DeathCause::Predation]);
        assert_eq!(world.metrics.counter("deaths"), 2);
    }

    #[test]
    fn test_extinction_reported_once() {
        let mut config = AppConfig::default();
        config.world.seed = Some(2);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut last = lifecycle::create_agent_with_rng(Vec2::new(1.0, 1.0), 0, &config, &mut rng);
        last.physiology.energy = 0.0;
        let mut world = World::from_agents(config.clone(), vec![last]).unwrap();
        let mut habitat = Habitat::barren(&config);

        let mut events = Vec::new();
        world
            .finalize_tick(&mut habitat, &mut events, &HashSet::new(), Vec::new())
            .unwrap();
        let mut again = Vec::new();
        world
            .finalize_tick(&mut habitat, &mut again, &HashSet::new(), Vec::new())
            .unwrap();

        let count = |evs: &[LiveEvent]| {
            evs.iter()
                .filter(|e| matches!(e, LiveEvent::Extinction { .. }))
                .count()
        };
        assert_eq!(count(&events), 1);
        assert_eq!(count(&again), 0);
    }
}
