use bugsim_lib::model::config::{EvolutionConfig, NeuralConfig};
use bugsim_lib::model::neural::{
    scaling, Activation, NeuralEncoding, NeuralLogic, ScalingOutcome, ACTION_OUTPUTS,
    MAX_HIDDEN_NEURONS, MAX_LAYERS, MIN_HIDDEN_NEURONS, MIN_LAYERS, SENSORY_INPUTS,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
enum Op {
    Grow,
    Shrink,
    Resize(usize, usize),
    Swap(usize, usize),
    Mutate,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Grow),
        Just(Op::Shrink),
        (0usize..12, 0usize..40).prop_map(|(l, n)| Op::Resize(l, n)),
        (0usize..12, 0usize..4).prop_map(|(l, a)| Op::Swap(l, a)),
        Just(Op::Mutate),
    ]
}

fn apply(net: &NeuralEncoding, op: &Op, rng: &mut ChaCha8Rng) -> NeuralEncoding {
    let changed = match op {
        Op::Grow => net.grow_layer_with_rng(rng),
        Op::Shrink => net.shrink_layer_with_rng(rng),
        Op::Resize(layer, neurons) => net.resize_layer_with_rng(*layer, *neurons, rng),
        Op::Swap(layer, a) => net.swap_activation(*layer, Activation::HIDDEN[a % Activation::HIDDEN.len()]),
        Op::Mutate => Some(net.mutate_with_rng(
            &EvolutionConfig {
                structural_mutation_chance: 1.0,
                ..EvolutionConfig::default()
            },
            rng,
        )),
    };
    changed.unwrap_or_else(|| net.clone())
}

fn assert_contract(net: &NeuralEncoding) -> Result<(), TestCaseError> {
    prop_assert!(net.is_consistent());
    prop_assert!((MIN_LAYERS..=MAX_LAYERS).contains(&net.layers.len()));
    prop_assert_eq!(net.layers[0].neurons, SENSORY_INPUTS);
    prop_assert_eq!(net.layers[net.layers.len() - 1].neurons, ACTION_OUTPUTS);
    for layer in &net.layers[1..net.layers.len() - 1] {
        prop_assert!((MIN_HIDDEN_NEURONS..=MAX_HIDDEN_NEURONS).contains(&layer.neurons));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn structural_sequences_keep_the_contract(
        seed in any::<u64>(),
        ops in prop::collection::vec(op(), 1..24),
        inputs in prop::array::uniform24(-1.0f32..=1.0),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut net = NeuralEncoding::new_random_with_rng(&mut rng);
        for op in &ops {
            net = apply(&net, op, &mut rng);
            assert_contract(&net)?;
            let out = net.infer(&inputs);
            prop_assert_eq!(out.len(), ACTION_OUTPUTS);
            prop_assert!(out.iter().all(|v| v.is_finite() && (-1.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn crossover_of_any_two_networks_is_consistent(a in any::<u64>(), b in any::<u64>()) {
        let mut ra = ChaCha8Rng::seed_from_u64(a);
        let mut rb = ChaCha8Rng::seed_from_u64(b);
        let mut x = NeuralEncoding::new_random_with_rng(&mut ra);
        let y = NeuralEncoding::new_random_with_rng(&mut rb);
        if let Some(grown) = x.grow_layer_with_rng(&mut ra) {
            x = grown;
        }
        let child = x.crossover_with_rng(&y, &mut ra);
        assert_contract(&child)?;
    }
}

#[test]
fn test_infer_is_deterministic_and_total() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let net = NeuralEncoding::new_random_with_rng(&mut rng);
    let inputs = [0.25; SENSORY_INPUTS];
    assert_eq!(net.infer(&inputs), net.infer(&inputs));

    let mut hostile = [f32::NAN; SENSORY_INPUTS];
    hostile[0] = f32::INFINITY;
    assert!(net.infer(&hostile).iter().all(|v| v.is_finite()));
}

#[test]
fn test_starving_brain_prunes_and_rich_brain_grows() {
    let config = NeuralConfig {
        scaling_chance: 1.0,
        ..NeuralConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut net = NeuralEncoding::new_random_with_rng(&mut rng);
    while net.layers.len() < MIN_LAYERS + 1 {
        net = net.grow_layer_with_rng(&mut rng).expect("below the layer bound");
    }
    net.plasticity = 1.0;
    net.pruning_tendency = 1.0;

    match scaling::adapt_with_rng(&net, 1.0e9, &config, &mut rng) {
        ScalingOutcome::Grew(grown) => {
            assert!(grown.is_consistent());
            assert!(grown.hidden_neurons() > net.hidden_neurons());
        }
        other => panic!("expected growth, got {other:?}"),
    }
    match scaling::adapt_with_rng(&net, 0.0, &config, &mut rng) {
        ScalingOutcome::Pruned(pruned) => {
            assert!(pruned.is_consistent());
            assert!(pruned.hidden_neurons() < net.hidden_neurons());
        }
        other => panic!("expected pruning, got {other:?}"),
    }
}
