//! Core data structures for the bugsim simulation.

pub mod agent;
pub mod environment;
pub mod genome;
pub mod signal;
