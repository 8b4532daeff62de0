use super::{ACTION_OUTPUTS, SENSORY_INPUTS};
use bugsim_data::NeuralEncoding;

/// Deterministic feed-forward pass.
///
/// Missing tensor entries count as zero and non-finite values are zeroed, so
/// the output always has the fixed action dimensionality.
pub fn infer(net: &NeuralEncoding, inputs: &[f32; SENSORY_INPUTS]) -> [f32; ACTION_OUTPUTS] {
    let mut current: Vec<f32> = inputs
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect();

    if let Some(sensory) = net.layers.first() {
        for v in &mut current {
            *v = sensory.activation.apply(*v);
        }
    }

    let mut next = Vec::new();
    for (i, layer) in net.layers.iter().enumerate().skip(1) {
        let weights = net.weights.get(i - 1);
        let biases = net.biases.get(i - 1);
        let cols = current.len();

        next.clear();
        next.reserve(layer.neurons);
        for row in 0..layer.neurons {
            let mut sum = biases.and_then(|b| b.get(row)).copied().unwrap_or(0.0);
            if let Some(w) = weights.and_then(|w| w.get(row * cols..(row + 1) * cols)) {
                sum += w.iter().zip(&current).map(|(a, b)| a * b).sum::<f32>();
            }
            let out = layer.activation.apply(sum);
            next.push(if out.is_finite() { out } else { 0.0 });
        }
        std::mem::swap(&mut current, &mut next);
    }

    let mut outputs = [0.0; ACTION_OUTPUTS];
    for (o, v) in outputs.iter_mut().zip(current) {
        *o = v;
    }
    outputs
}
