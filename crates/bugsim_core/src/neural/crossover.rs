use bugsim_data::NeuralEncoding;
use rand::Rng;

/// Recombines two networks.
///
/// One parent's topology is picked as the base. Where the other parent has a
/// tensor at the same position, overlapping elements are inherited 50/50;
/// the rest stays with the base, so the child is always consistent.
pub fn crossover_with_rng<R: Rng>(
    a: &NeuralEncoding,
    b: &NeuralEncoding,
    rng: &mut R,
) -> NeuralEncoding {
    let (base, donor) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
    let mut child = base.clone();

    let hidden = child.layers.len().saturating_sub(1);
    for i in 1..hidden {
        if let Some(layer) = donor.layers.get(i) {
            if i + 1 < donor.layers.len() && rng.gen_bool(0.5) {
                child.layers[i].activation = layer.activation;
            }
        }
    }

    for i in 0..child.weights.len() {
        let (Some(donor_w), Some(donor_b)) = (donor.weights.get(i), donor.biases.get(i)) else {
            continue;
        };
        let rows = child.layers[i + 1].neurons;
        let cols = child.layers[i].neurons;
        let donor_rows = donor.layers[i + 1].neurons;
        let donor_cols = donor.layers[i].neurons;

        for r in 0..rows.min(donor_rows) {
            for c in 0..cols.min(donor_cols) {
                if rng.gen_bool(0.5) {
                    if let Some(v) = donor_w.get(r * donor_cols + c) {
                        child.weights[i][r * cols + c] = *v;
                    }
                }
            }
            if rng.gen_bool(0.5) {
                if let Some(v) = donor_b.get(r) {
                    child.biases[i][r] = *v;
                }
            }
        }
    }

    if rng.gen_bool(0.5) {
        child.plasticity = donor.plasticity;
    }
    if rng.gen_bool(0.5) {
        child.pruning_tendency = donor.pruning_tendency;
    }
    child
}
