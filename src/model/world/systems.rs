//! Parallel phases of a tick. Each one writes only the agent it visits.

use crate::model::config::AppConfig;
use crate::model::environment::Habitat;
use crate::model::interaction::InteractionCommand;
use crate::model::signal;
use crate::model::snapshot::PopulationSnapshot;
use crate::model::systems::action::{self, ActionContext, ActionOutput};
use crate::model::systems::intel::{self, Decision};
use crate::model::systems::perception::{self, Perception, PerceptionContext};
use crate::model::systems::social::signaling;
use crate::model::world::{agent_rng, SALT_ACT, SALT_SIGNALS};
use bugsim_data::{Agent, Signal};
use rayon::prelude::*;

/// Everything an agent knows about the current tick before acting.
pub struct AgentFrame {
    pub perception: Perception,
    pub decision: Option<Decision>,
}

/// Perception and inference, read-only against the snapshot.
pub fn perceive_and_decide(
    agents: &[Agent],
    config: &AppConfig,
    habitat: &Habitat,
    view: &PopulationSnapshot,
    tick: u64,
) -> Vec<AgentFrame> {
    let ctx = PerceptionContext {
        config,
        habitat,
        view,
        tick,
    };
    agents
        .par_iter()
        .map(|agent| {
            let perception = perception::perceive(agent, &ctx);
            let decision = intel::decide(agent, &perception.inputs);
            AgentFrame {
                perception,
                decision,
            }
        })
        .collect()
}

/// Delivers the broadcast field to every agent, then lets each one act on
/// its memory. Returns the resulting commands per agent, in population order.
pub fn exchange_signals(
    agents: &mut [Agent],
    broadcasts: &[Signal],
    config: &AppConfig,
    view: &PopulationSnapshot,
    seed: u64,
    tick: u64,
    now: f64,
) -> Vec<Vec<InteractionCommand>> {
    agents
        .par_iter_mut()
        .map(|agent| {
            let mut rng = agent_rng(seed, tick, agent.id(), SALT_SIGNALS);
            let mut memory = std::mem::take(&mut agent.social.memory);
            for s in broadcasts {
                signal::receive(&mut memory, s, agent, now, &config.signal, &mut rng);
            }
            signal::evict(&mut memory, now, config.signal.memory_capacity);
            agent.social.memory = memory;
            signaling::process_signals(agent, view, now, config)
        })
        .collect()
}

/// Behaviour, movement, emission, construction and terminal effects.
pub fn act_all(
    agents: &mut [Agent],
    frames: &[AgentFrame],
    ctx: &ActionContext,
    seed: u64,
) -> Vec<ActionOutput> {
    agents
        .par_iter_mut()
        .zip(frames.par_iter())
        .map(|(agent, frame)| {
            let mut rng = agent_rng(seed, ctx.tick, agent.id(), SALT_ACT);
            action::act(
                agent,
                &frame.perception,
                frame.decision.as_ref(),
                ctx,
                &mut rng,
            )
        })
        .collect()
}
