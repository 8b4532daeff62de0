pub use bugsim_core::{GenomeLogic, NeuralLogic};
pub mod config {
    pub use bugsim_core::config::*;
}
pub mod environment {
    pub use bugsim_core::environment::*;
}
pub mod generation {
    pub use bugsim_core::generation::*;
}
pub mod genome {
    pub use bugsim_core::genome::*;
}
pub mod interaction {
    pub use bugsim_core::interaction::*;
}
pub mod lifecycle {
    pub use bugsim_core::lifecycle::*;
}
pub mod metrics {
    pub use bugsim_core::metrics::*;
}
pub mod neural {
    pub use bugsim_core::neural::*;
}
pub mod population {
    pub use bugsim_core::population::*;
}
pub mod signal {
    pub use bugsim_core::signal::*;
}
pub mod snapshot {
    pub use bugsim_core::snapshot::*;
}
pub mod spatial_hash {
    pub use bugsim_core::spatial_hash::*;
}
pub mod systems {
    pub use bugsim_core::systems::*;
}

pub mod world;

pub mod state {
    pub use bugsim_data::*;
}
