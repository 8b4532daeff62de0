//! Population update loop for the bugsim agent simulation.
//!
//! The behaviour lives in `bugsim_core` and the data in `bugsim_data`; this
//! crate wires them into [`model::world::World`], which advances a population
//! one tick at a time against caller-supplied environment collaborators.

pub mod model;

pub use model::world::World;
