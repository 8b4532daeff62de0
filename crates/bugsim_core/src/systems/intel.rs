use crate::neural::{
    NeuralLogic, ACTION_OUTPUTS, OUT_BUILD, OUT_FLEE, OUT_HUNT, OUT_MATE, OUT_MOVE_X, OUT_MOVE_Y,
    OUT_SHARE, OUT_SIGNAL, SENSORY_INPUTS,
};
use bugsim_data::{Agent, Vec2};

/// Network output for one agent and one tick.
///
/// Produced once per tick and passed by reference through the remaining
/// stages; it is never stored on the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub outputs: [f32; ACTION_OUTPUTS],
}

impl Decision {
    #[must_use]
    pub fn movement(&self) -> Vec2 {
        Vec2::new(
            f64::from(self.outputs[OUT_MOVE_X]),
            f64::from(self.outputs[OUT_MOVE_Y]),
        )
        .clamp_length(1.0)
    }

    #[must_use]
    pub fn flee(&self) -> f32 {
        self.outputs[OUT_FLEE]
    }

    #[must_use]
    pub fn mate(&self) -> f32 {
        self.outputs[OUT_MATE]
    }

    #[must_use]
    pub fn hunt(&self) -> f32 {
        self.outputs[OUT_HUNT]
    }

    #[must_use]
    pub fn signal(&self) -> f32 {
        self.outputs[OUT_SIGNAL]
    }

    #[must_use]
    pub fn share(&self) -> f32 {
        self.outputs[OUT_SHARE]
    }

    #[must_use]
    pub fn build(&self) -> f32 {
        self.outputs[OUT_BUILD]
    }
}

/// Runs the agent's brain. `None` when the brain does not honour the
/// sensory/action contract; the resolver then uses its fallback.
#[must_use]
pub fn decide(agent: &Agent, inputs: &[f32; SENSORY_INPUTS]) -> Option<Decision> {
    if !agent.brain.is_consistent() {
        return None;
    }
    let outputs = agent.brain.infer(inputs);
    if outputs.iter().all(|v| v.is_finite()) {
        Some(Decision { outputs })
    } else {
        None
    }
}
