//! Generation boundaries.
//!
//! The core has no intrinsic notion of a generation; an external policy
//! decides when a completed tick closes one.

/// Decides whether the tick that just completed rolls the generation over.
pub trait GenerationPolicy: Send + Sync {
    fn is_rollover(&mut self, tick: u64, population: usize) -> bool;
}

/// Rolls over every `n` ticks. `n == 0` never rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveryNTicks(pub u64);

impl Default for EveryNTicks {
    fn default() -> Self {
        Self(500)
    }
}

impl GenerationPolicy for EveryNTicks {
    fn is_rollover(&mut self, tick: u64, _population: usize) -> bool {
        self.0 > 0 && tick > 0 && tick % self.0 == 0
    }
}

/// Never rolls over.
#[derive(Debug, Default, Clone, Copy)]
pub struct Never;

impl GenerationPolicy for Never {
    fn is_rollover(&mut self, _tick: u64, _population: usize) -> bool {
        false
    }
}
