use super::{
    ACTION_OUTPUTS, MAX_HIDDEN_NEURONS, MAX_LAYERS, MIN_HIDDEN_NEURONS, MIN_LAYERS,
    SENSORY_INPUTS, WEIGHT_LIMIT,
};
use bugsim_data::{Activation, LayerSpec, NeuralEncoding};
use rand::Rng;

/// Upper bound on hidden neurons for freshly generated layers.
const INITIAL_HIDDEN_MAX: usize = 8;

fn sensory_layer() -> LayerSpec {
    LayerSpec {
        neurons: SENSORY_INPUTS,
        activation: Activation::Identity,
    }
}

fn action_layer() -> LayerSpec {
    LayerSpec {
        neurons: ACTION_OUTPUTS,
        activation: Activation::Tanh,
    }
}

pub fn random_hidden_layer_with_rng<R: Rng>(rng: &mut R) -> LayerSpec {
    LayerSpec {
        neurons: rng.gen_range(MIN_HIDDEN_NEURONS..=INITIAL_HIDDEN_MAX),
        activation: Activation::HIDDEN[rng.gen_range(0..Activation::HIDDEN.len())],
    }
}

fn random_values<R: Rng>(len: usize, rng: &mut R) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

pub fn create_encoding_random_with_rng<R: Rng>(rng: &mut R) -> NeuralEncoding {
    let layer_count = rng.gen_range(MIN_LAYERS..=MAX_LAYERS);
    let mut layers = Vec::with_capacity(layer_count);
    layers.push(sensory_layer());
    for _ in 0..layer_count - 2 {
        layers.push(random_hidden_layer_with_rng(rng));
    }
    layers.push(action_layer());

    let mut weights = Vec::with_capacity(layer_count - 1);
    let mut biases = Vec::with_capacity(layer_count - 1);
    for pair in layers.windows(2) {
        weights.push(random_values(pair[1].neurons * pair[0].neurons, rng));
        biases.push(random_values(pair[1].neurons, rng));
    }

    NeuralEncoding {
        layers,
        weights,
        biases,
        plasticity: rng.gen(),
        pruning_tendency: rng.gen(),
    }
}

/// Reshapes a row-major matrix, keeping the overlapping region and filling
/// new cells with fresh random weights.
pub fn resize_matrix<R: Rng>(
    old: &[f32],
    old_rows: usize,
    old_cols: usize,
    new_rows: usize,
    new_cols: usize,
    rng: &mut R,
) -> Vec<f32> {
    let mut out = Vec::with_capacity(new_rows * new_cols);
    for r in 0..new_rows {
        for c in 0..new_cols {
            let kept = if r < old_rows && c < old_cols {
                old.get(r * old_cols + c).copied()
            } else {
                None
            };
            out.push(kept.unwrap_or_else(|| rng.gen_range(-1.0..1.0)));
        }
    }
    out
}

fn resize_vector<R: Rng>(old: &[f32], new_len: usize, rng: &mut R) -> Vec<f32> {
    (0..new_len)
        .map(|i| {
            old.get(i)
                .copied()
                .unwrap_or_else(|| rng.gen_range(-1.0..1.0))
        })
        .collect()
}

fn is_hidden(net: &NeuralEncoding, layer: usize) -> bool {
    layer > 0 && layer + 1 < net.layers.len()
}

pub fn is_consistent(net: &NeuralEncoding) -> bool {
    let n = net.layers.len();
    if !(MIN_LAYERS..=MAX_LAYERS).contains(&n) {
        return false;
    }
    if net.layers[0] != sensory_layer() || net.layers[n - 1] != action_layer() {
        return false;
    }
    let hidden_ok = net.layers[1..n - 1].iter().all(|l| {
        (MIN_HIDDEN_NEURONS..=MAX_HIDDEN_NEURONS).contains(&l.neurons)
            && Activation::HIDDEN.contains(&l.activation)
    });
    if !hidden_ok || net.weights.len() != n - 1 || net.biases.len() != n - 1 {
        return false;
    }
    let in_limit = |v: &f32| v.is_finite() && v.abs() <= WEIGHT_LIMIT;
    let tensors_ok = net.layers.windows(2).enumerate().all(|(i, pair)| {
        net.weights[i].len() == pair[1].neurons * pair[0].neurons
            && net.biases[i].len() == pair[1].neurons
            && net.weights[i].iter().all(in_limit)
            && net.biases[i].iter().all(in_limit)
    });
    tensors_ok
        && (0.0..=1.0).contains(&net.plasticity)
        && (0.0..=1.0).contains(&net.pruning_tendency)
}

/// Inserts `spec` as a new hidden layer at index `at`.
///
/// Only the connection block that the new layer splits is re-initialised;
/// every other weight and the biases of the downstream layer are kept.
pub fn insert_layer<R: Rng>(
    net: &NeuralEncoding,
    at: usize,
    spec: LayerSpec,
    rng: &mut R,
) -> Option<NeuralEncoding> {
    if net.layers.len() >= MAX_LAYERS || at == 0 || at >= net.layers.len() {
        return None;
    }
    let spec = LayerSpec {
        neurons: spec.neurons.clamp(MIN_HIDDEN_NEURONS, MAX_HIDDEN_NEURONS),
        activation: if Activation::HIDDEN.contains(&spec.activation) {
            spec.activation
        } else {
            Activation::Tanh
        },
    };
    let prev = net.layers[at - 1].neurons;
    let next = net.layers[at].neurons;

    let mut out = net.clone();
    out.layers.insert(at, spec);
    out.weights.splice(
        at - 1..at,
        [
            random_values(spec.neurons * prev, rng),
            random_values(next * spec.neurons, rng),
        ],
    );
    out.biases.insert(at - 1, random_values(spec.neurons, rng));
    Some(out)
}

/// Removes the hidden layer at `at`, bridging its neighbours.
///
/// The bridge keeps the removed layer's outgoing weights where shapes overlap.
pub fn remove_layer<R: Rng>(net: &NeuralEncoding, at: usize, rng: &mut R) -> Option<NeuralEncoding> {
    if net.layers.len() <= MIN_LAYERS || !is_hidden(net, at) {
        return None;
    }
    let prev = net.layers[at - 1].neurons;
    let removed = net.layers[at].neurons;
    let next = net.layers[at + 1].neurons;

    let bridge = resize_matrix(&net.weights[at], next, removed, next, prev, rng);

    let mut out = net.clone();
    out.layers.remove(at);
    out.weights.splice(at - 1..=at, [bridge]);
    out.biases.remove(at - 1);
    Some(out)
}

pub fn grow_layer_with_rng<R: Rng>(net: &NeuralEncoding, rng: &mut R) -> Option<NeuralEncoding> {
    if net.layers.len() >= MAX_LAYERS {
        return None;
    }
    let at = rng.gen_range(1..net.layers.len());
    let spec = random_hidden_layer_with_rng(rng);
    insert_layer(net, at, spec, rng)
}

pub fn shrink_layer_with_rng<R: Rng>(
    net: &NeuralEncoding,
    rng: &mut R,
) -> Option<NeuralEncoding> {
    if net.layers.len() <= MIN_LAYERS {
        return None;
    }
    let at = rng.gen_range(1..net.layers.len() - 1);
    remove_layer(net, at, rng)
}

/// Changes the neuron count of hidden layer `layer`, clamped to the hidden range.
pub fn resize_layer_with_rng<R: Rng>(
    net: &NeuralEncoding,
    layer: usize,
    neurons: usize,
    rng: &mut R,
) -> Option<NeuralEncoding> {
    if !is_hidden(net, layer) {
        return None;
    }
    let old = net.layers[layer].neurons;
    let neurons = neurons.clamp(MIN_HIDDEN_NEURONS, MAX_HIDDEN_NEURONS);
    if neurons == old {
        return None;
    }
    let prev = net.layers[layer - 1].neurons;
    let next = net.layers[layer + 1].neurons;

    let mut out = net.clone();
    out.layers[layer].neurons = neurons;
    out.weights[layer - 1] = resize_matrix(&net.weights[layer - 1], old, prev, neurons, prev, rng);
    out.biases[layer - 1] = resize_vector(&net.biases[layer - 1], neurons, rng);
    out.weights[layer] = resize_matrix(&net.weights[layer], next, old, next, neurons, rng);
    Some(out)
}

pub fn swap_activation(
    net: &NeuralEncoding,
    layer: usize,
    activation: Activation,
) -> Option<NeuralEncoding> {
    if !is_hidden(net, layer)
        || !Activation::HIDDEN.contains(&activation)
        || net.layers[layer].activation == activation
    {
        return None;
    }
    let mut out = net.clone();
    out.layers[layer].activation = activation;
    Some(out)
}
