//! Adaptive brain scaling: network size follows the energy budget.

use super::topology;
use crate::config::NeuralConfig;
use bugsim_data::NeuralEncoding;
use rand::Rng;

/// Neurons added or removed when the layer count is already at its bound.
const WIDTH_STEP: usize = 2;

/// Result of one adaptive scaling check.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalingOutcome {
    Unchanged,
    Grew(NeuralEncoding),
    Pruned(NeuralEncoding),
}

/// Per-tick upkeep of a network.
#[must_use]
pub fn energetic_cost(net: &NeuralEncoding, config: &NeuralConfig) -> f64 {
    config.neuron_cost * net.hidden_neurons() as f64
        + config.connection_cost * net.connection_count() as f64
}

/// How many upkeep horizons the current energy covers.
#[must_use]
pub fn energy_budget(net: &NeuralEncoding, energy: f64, config: &NeuralConfig) -> f64 {
    let cost = energetic_cost(net, config) * config.cost_horizon_ticks;
    if cost <= f64::EPSILON {
        return f64::INFINITY;
    }
    energy.max(0.0) / cost
}

fn widen<R: Rng>(net: &NeuralEncoding, rng: &mut R) -> Option<NeuralEncoding> {
    let n = net.layers.len();
    let (idx, layer) = net.layers[1..n - 1]
        .iter()
        .enumerate()
        .min_by_key(|(_, l)| l.neurons)?;
    topology::resize_layer_with_rng(net, idx + 1, layer.neurons + WIDTH_STEP, rng)
}

fn narrow<R: Rng>(net: &NeuralEncoding, rng: &mut R) -> Option<NeuralEncoding> {
    let n = net.layers.len();
    let (idx, layer) = net.layers[1..n - 1]
        .iter()
        .enumerate()
        .max_by_key(|(_, l)| l.neurons)?;
    topology::resize_layer_with_rng(net, idx + 1, layer.neurons.saturating_sub(WIDTH_STEP), rng)
}

/// Stochastically grows or prunes a network given its carrier's energy.
///
/// Growth needs abundant energy and a plasticity roll; pruning needs scarce
/// energy and a pruning-tendency roll. A layer is added or removed first;
/// at the layer bound the narrowest or widest hidden layer is resized instead.
pub fn adapt_with_rng<R: Rng>(
    net: &NeuralEncoding,
    energy: f64,
    config: &NeuralConfig,
    rng: &mut R,
) -> ScalingOutcome {
    if net.layers.len() < 3 {
        return ScalingOutcome::Unchanged;
    }
    let budget = energy_budget(net, energy, config);
    let roll: f64 = rng.gen();

    if budget > config.grow_abundance_ratio
        && roll < f64::from(net.plasticity) * config.scaling_chance
    {
        return topology::grow_layer_with_rng(net, rng)
            .or_else(|| widen(net, rng))
            .map_or(ScalingOutcome::Unchanged, ScalingOutcome::Grew);
    }
    if budget < config.prune_scarcity_ratio
        && roll < f64::from(net.pruning_tendency) * config.scaling_chance
    {
        return topology::shrink_layer_with_rng(net, rng)
            .or_else(|| narrow(net, rng))
            .map_or(ScalingOutcome::Unchanged, ScalingOutcome::Pruned);
    }
    ScalingOutcome::Unchanged
}
