use crate::config::EvolutionConfig;
use crate::neural::NeuralLogic;
use bugsim_data::{Gene, Genome, SpeciesKind};
use rand::Rng;

/// Mutates a genome with explicit rate and strength, other knobs at defaults.
pub fn mutate<R: Rng>(genome: &Genome, rate: f32, strength: f32, rng: &mut R) -> Genome {
    let config = EvolutionConfig {
        mutation_rate: rate,
        mutation_strength: strength,
        ..EvolutionConfig::default()
    };
    mutate_with_rng(genome, &config, rng)
}

/// Adds `uniform(-strength, strength)` to `value`. Callers clamp.
///
/// A non-positive or non-finite strength leaves the value as is.
pub fn perturb<R: Rng>(value: f32, strength: f32, rng: &mut R) -> f32 {
    if !strength.is_finite() || strength <= 0.0 {
        return value;
    }
    value + rng.gen_range(-strength..=strength)
}

pub fn mutate_with_rng<R: Rng>(genome: &Genome, config: &EvolutionConfig, rng: &mut R) -> Genome {
    let mut out = genome.clone();

    for gene in Gene::ALL {
        // Neural genes mutate together with the network below.
        if matches!(gene, Gene::Plasticity | Gene::PruningTendency) {
            continue;
        }
        if rng.gen::<f32>() < config.mutation_rate {
            let value = perturb(gene.get(&out), config.mutation_strength, rng);
            gene.set(&mut out, value);
        }
    }

    out.neural = genome.neural.mutate_with_rng(config, rng);

    if rng.gen::<f32>() < config.species_shift_rate {
        out.species.kind = SpeciesKind::ALL[rng.gen_range(0..SpeciesKind::ALL.len())];
    }
    if rng.gen::<f32>() < config.mutation_rate {
        let shift = |c: u8, d: i16| (i16::from(c) + d).clamp(0, 255) as u8;
        out.color = (
            shift(out.color.0, rng.gen_range(-16..=16)),
            shift(out.color.1, rng.gen_range(-16..=16)),
            shift(out.color.2, rng.gen_range(-16..=16)),
        );
    }
    out
}
