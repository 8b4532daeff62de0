//! # Bugsim Core
//!
//! Behaviour for the bugsim neuroevolutionary agent simulation.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Genetic operators (random genomes, crossover, mutation)
//! - Layered feed-forward decision networks with structural evolution
//! - Sensory assembly and the five-tier behaviour resolver
//! - Energy economy, hunting, reproduction and construction
//! - The signal protocol between agents
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! Each tick runs as a scatter/gather pipeline:
//! - **Read-only phases**: perception and inference against a population snapshot
//! - **Write-own phases**: signals and actions mutate only the acting agent
//! - **Resolve**: cross-agent commands are applied sequentially in population order
//! - **Deterministic simulation**: per-agent RNGs derived from seed, tick and id
//!
//! ## Example
//!
//! ```
//! use bugsim_core::neural::{create_encoding_random_with_rng, forward::infer, SENSORY_INPUTS};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let net = create_encoding_random_with_rng(&mut rng);
//! let outputs = infer(&net, &[0.5; SENSORY_INPUTS]);
//! assert!(outputs.iter().all(|o| o.is_finite()));
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Environment collaborators (terrain, climate, territory, food)
pub mod environment;
/// Generation rollover policies
pub mod generation;
/// Genome random construction, crossover and mutation
pub mod genome;
/// Cross-agent commands produced by the act phase
pub mod interaction;
/// Agent creation, offspring and death records
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Decision network inference and structural evolution
pub mod neural;
/// Population container with id index
pub mod population;
/// Signal emission, reception and memory
pub mod signal;
/// Agent snapshots for parallel processing
pub mod snapshot;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// Tick phases (perception, intel, behaviour, action, interaction)
pub mod systems;

pub use environment::Habitat;
pub use genome::GenomeLogic;
pub use metrics::{init_logging, Metrics};
pub use neural::NeuralLogic;
pub use population::Population;
