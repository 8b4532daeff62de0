//! Agent-to-agent behaviour: hunting, mating, signalling and building.

pub mod construction;
pub mod hunting;
pub mod reproduction;
pub mod signaling;

pub use hunting::{pack_bonus, success_chance, HuntOutcome};
pub use reproduction::{is_eligible, reproduce_pair};
