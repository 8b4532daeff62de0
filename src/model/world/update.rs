use crate::model::environment::Habitat;
use crate::model::interaction::InteractionCommand;
use crate::model::systems::action::ActionContext;
use crate::model::systems::interaction::{self, InteractionContext};
use crate::model::world::{systems, World};
use bugsim_data::LiveEvent;
use std::time::Instant;

impl World {
    /// Advances the simulation by one tick.
    ///
    /// Runs the scatter/gather pipeline:
    /// - snapshot of every agent plus the spatial index
    /// - perception and inference (parallel, read-only)
    /// - signal delivery and processing (parallel, write-own)
    /// - behaviour and terminal effects (parallel, write-own)
    /// - sequential resolution of cross-agent commands
    /// - finalization: deaths, births, broadcasts, statistics
    ///
    /// # Arguments
    /// * `habitat` - Terrain, climate, territory and food collaborators
    ///
    /// # Returns
    /// Vector of live events that occurred this tick
    pub fn update(&mut self, habitat: &mut Habitat) -> anyhow::Result<Vec<LiveEvent>> {
        let started = Instant::now();
        self.tick += 1;
        let tick = self.tick;
        let now = self.now();
        let seed = self.seed;

        self.view.rebuild(self.population.as_slice(), &self.config);

        let frames = systems::perceive_and_decide(
            self.population.as_slice(),
            &self.config,
            habitat,
            &self.view,
            tick,
        );
        let undecided = frames.iter().filter(|f| f.decision.is_none()).count();
        if undecided > 0 {
            tracing::debug!(tick = tick, agents = undecided, "Agents fell back to exploring");
        }

        let signal_commands = systems::exchange_signals(
            self.population.as_mut_slice(),
            &self.broadcasts,
            &self.config,
            &self.view,
            seed,
            tick,
            now,
        );

        let outputs = {
            let ctx = ActionContext {
                config: &self.config,
                habitat: &*habitat,
                view: &self.view,
                tick,
                now,
            };
            systems::act_all(self.population.as_mut_slice(), &frames, &ctx, seed)
        };

        let mut events = Vec::new();
        let mut commands: Vec<InteractionCommand> = Vec::new();
        for (shares, output) in signal_commands.into_iter().zip(outputs) {
            commands.extend(shares);
            commands.extend(output.commands);
            events.extend(output.events);
            if let Some(signal) = output.signal {
                self.broadcasts.push(signal);
            }
        }
        tracing::trace!(tick = tick, commands = commands.len(), "Resolving commands");

        let resolved = {
            let mut ctx = InteractionContext {
                config: &self.config,
                food: habitat.food.as_mut(),
                tick,
                rng: &mut self.rng,
            };
            interaction::process_interaction_commands(&mut self.population, commands, &mut ctx)
        };
        self.metrics.add_to_counter("hunts", resolved.hunts as u64);
        events.extend(resolved.events);

        self.finalize_tick(
            habitat,
            &mut events,
            &resolved.killed_ids,
            resolved.newborns,
        )?;

        self.metrics
            .record_tick(started.elapsed(), self.population.len(), self.broadcasts.len());
        Ok(events)
    }

    /// Runs `ticks` updates, collecting every event.
    pub fn run(&mut self, habitat: &mut Habitat, ticks: u64) -> anyhow::Result<Vec<LiveEvent>> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.update(habitat)?);
        }
        Ok(events)
    }
}
