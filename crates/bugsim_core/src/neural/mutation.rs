use super::topology;
use super::{MAX_HIDDEN_NEURONS, MIN_HIDDEN_NEURONS, WEIGHT_LIMIT};
use crate::config::EvolutionConfig;
use crate::genome::mutation::perturb;
use bugsim_data::{Activation, Gene, NeuralEncoding};
use rand::Rng;

/// Perturbs weights and biases in place, each with probability `rate`.
pub fn mutate_weights_with_rng<R: Rng>(
    net: &mut NeuralEncoding,
    rate: f32,
    strength: f32,
    rng: &mut R,
) {
    if strength <= 0.0 {
        return;
    }
    for value in net
        .weights
        .iter_mut()
        .chain(net.biases.iter_mut())
        .flat_map(|t| t.iter_mut())
    {
        if rng.gen::<f32>() < rate {
            *value = (*value + rng.gen_range(-strength..strength)).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
        }
    }
}

/// Applies one randomly chosen structural operator.
///
/// Returns `None` when the chosen operator does not apply to this topology.
pub fn mutate_structure_with_rng<R: Rng>(
    net: &NeuralEncoding,
    rng: &mut R,
) -> Option<NeuralEncoding> {
    let hidden_layers = net.layers.len().saturating_sub(2);
    match rng.gen_range(0..4) {
        0 => topology::grow_layer_with_rng(net, rng),
        1 => topology::shrink_layer_with_rng(net, rng),
        2 if hidden_layers > 0 => {
            let layer = rng.gen_range(1..=hidden_layers);
            let delta = rng.gen_range(1..=4usize);
            let current = net.layers[layer].neurons;
            let target = if rng.gen_bool(0.5) {
                (current + delta).min(MAX_HIDDEN_NEURONS)
            } else {
                current.saturating_sub(delta).max(MIN_HIDDEN_NEURONS)
            };
            topology::resize_layer_with_rng(net, layer, target, rng)
        }
        3 if hidden_layers > 0 => {
            let layer = rng.gen_range(1..=hidden_layers);
            let activation = Activation::HIDDEN[rng.gen_range(0..Activation::HIDDEN.len())];
            topology::swap_activation(net, layer, activation)
        }
        _ => None,
    }
}

/// Heritable mutation of a decision network.
///
/// Plasticity and pruning tendency mutate like every other gene; weights
/// mutate at their own rate; a structural change happens with a chance
/// scaled by plasticity.
pub fn mutate_with_rng<R: Rng>(
    net: &NeuralEncoding,
    config: &EvolutionConfig,
    rng: &mut R,
) -> NeuralEncoding {
    let mut out = net.clone();
    let genes = [
        (Gene::Plasticity.range(), &mut out.plasticity),
        (Gene::PruningTendency.range(), &mut out.pruning_tendency),
    ];
    for (range, slot) in genes {
        if rng.gen::<f32>() < config.mutation_rate {
            *slot = range.clamp(perturb(*slot, config.mutation_strength, rng));
        }
    }

    mutate_weights_with_rng(
        &mut out,
        config.weight_mutation_rate,
        config.weight_mutation_strength,
        rng,
    );

    if rng.gen::<f32>() < config.structural_mutation_chance * out.plasticity {
        if let Some(restructured) = mutate_structure_with_rng(&out, rng) {
            out = restructured;
        }
    }
    out
}
