//! Per-tick phases of the population update loop.

pub mod action;
pub mod behavior;
pub mod energy;
pub mod intel;
pub mod interaction;
pub mod perception;
pub mod social;
pub mod stats;
