use bugsim_lib::model::config::EvolutionConfig;
use bugsim_lib::model::genome::{Gene, Genome, GenomeLogic};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_genomes_stay_in_range(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let g = Genome::new_random_with_rng(&mut rng);
        prop_assert!(g.genes_in_range());
    }

    #[test]
    fn offspring_stay_in_range(
        seed in any::<u64>(),
        rate in 0.0f32..=1.0,
        strength in 0.0f32..=2.0,
        generations in 1usize..8,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = EvolutionConfig {
            mutation_rate: rate,
            mutation_strength: strength,
            ..EvolutionConfig::default()
        };
        let mut a = Genome::new_random_with_rng(&mut rng);
        let b = Genome::new_random_with_rng(&mut rng);
        for _ in 0..generations {
            a = a.crossover_with_rng(&b, &mut rng).mutate_with_rng(&config, &mut rng);
            prop_assert!(a.genes_in_range());
        }
    }

    #[test]
    fn mutation_moves_each_gene_at_most_strength(
        seed in any::<u64>(),
        rate in 0.0f32..=1.0,
        strength in 0.0f32..=5.0,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let parent = Genome::new_random_with_rng(&mut rng);
        let config = EvolutionConfig {
            mutation_rate: rate,
            mutation_strength: strength,
            ..EvolutionConfig::default()
        };
        let child = parent.mutate_with_rng(&config, &mut rng);
        for gene in Gene::ALL {
            let delta = (gene.get(&child) - gene.get(&parent)).abs();
            prop_assert!(
                delta <= strength + 1e-4,
                "{:?} moved by {} with strength {}", gene, delta, strength
            );
        }
    }

    #[test]
    fn out_of_range_writes_are_clamped(value in -1.0e6f32..1.0e6) {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut g = Genome::new_random_with_rng(&mut rng);
        for gene in Gene::ALL {
            gene.set(&mut g, value);
        }
        prop_assert!(g.genes_in_range());
    }
}

#[test]
fn test_crossover_never_touches_parents() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let a = Genome::new_random_with_rng(&mut rng);
    let b = Genome::new_random_with_rng(&mut rng);
    let (a0, b0) = (a.clone(), b.clone());
    let _ = a.crossover_with_rng(&b, &mut rng);
    let _ = a.mutate_with_rng(&EvolutionConfig::default(), &mut rng);
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

#[test]
fn test_hex_export_rejects_garbage() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let g = Genome::new_random_with_rng(&mut rng);
    assert_eq!(Genome::from_hex(&g.to_hex()).unwrap(), g);
    assert!(Genome::from_hex("zz").is_err());
    assert!(Genome::from_hex("").is_err());
}
