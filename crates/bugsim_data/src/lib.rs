//! Core data structures for the bugsim agent simulation.
//!
//! Everything here is plain data: the behaviour that creates, evolves and
//! updates these values lives in `bugsim_core`.

pub mod data;

pub use data::agent::*;
pub use data::environment::*;
pub use data::genome::*;
pub use data::signal::*;
