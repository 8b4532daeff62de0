pub mod crossover;
pub mod mutation;
pub mod random;

use crate::config::{EvolutionConfig, MetabolismConfig};
pub use bugsim_data::{Gene, Genome, SpeciesKind, TraitRange};
use rand::Rng;

pub use mutation::mutate;

/// Trait defining the genetic interface of a heritable trait bundle.
///
/// All operators are total: they return a new value with every gene inside
/// its declared range and never modify their inputs.
pub trait GenomeLogic: Sized {
    fn new_random() -> Self;
    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self;
    #[must_use]
    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;
    #[must_use]
    fn crossover(&self, other: &Self) -> Self;
    #[must_use]
    fn mutate_with_rng<R: Rng>(&self, config: &EvolutionConfig, rng: &mut R) -> Self;
    /// Mean normalised per-gene difference, in [0, 1].
    fn distance(&self, other: &Self) -> f32;
    fn max_energy(&self, config: &MetabolismConfig) -> f64;
    fn max_age(&self, config: &MetabolismConfig) -> u64;
}

impl GenomeLogic for Genome {
    fn new_random() -> Self {
        let mut rng = rand::thread_rng();
        Self::new_random_with_rng(&mut rng)
    }

    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self {
        random::create_genome_random_with_rng(rng)
    }

    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        crossover::crossover_with_rng(self, other, rng)
    }

    fn crossover(&self, other: &Self) -> Self {
        let mut rng = rand::thread_rng();
        self.crossover_with_rng(other, &mut rng)
    }

    fn mutate_with_rng<R: Rng>(&self, config: &EvolutionConfig, rng: &mut R) -> Self {
        mutation::mutate_with_rng(self, config, rng)
    }

    fn distance(&self, other: &Self) -> f32 {
        let total: f32 = Gene::ALL
            .iter()
            .map(|g| {
                let r = g.range();
                (r.normalize(g.get(self)) - r.normalize(g.get(other))).abs()
            })
            .sum();
        let species = if self.species.kind == other.species.kind {
            0.0
        } else {
            1.0
        };
        (total + species) / (Gene::ALL.len() as f32 + 1.0)
    }

    fn max_energy(&self, config: &MetabolismConfig) -> f64 {
        config.base_max_energy * f64::from(self.size)
    }

    fn max_age(&self, config: &MetabolismConfig) -> u64 {
        let factor = 0.75 + 0.25 * f64::from(self.size);
        (config.base_max_age as f64 * factor).round().max(1.0) as u64
    }
}
