mod common;

use bugsim_data::{EnvironmentEffects, SpeciesKind, TerrainSample};
use bugsim_lib::model::config::{AppConfig, HuntingConfig, MetabolismConfig};
use bugsim_lib::model::environment::FoodPatches;
use bugsim_lib::model::interaction::InteractionCommand;
use bugsim_lib::model::population::Population;
use bugsim_lib::model::systems::energy;
use bugsim_lib::model::systems::interaction::{process_interaction_commands, InteractionContext};
use bugsim_lib::model::systems::social::hunting::resolve_hunt;
use common::AgentBuilder;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn sure_hunt() -> HuntingConfig {
    HuntingConfig {
        base_success: 100.0,
        max_success: 1.0,
        ..HuntingConfig::default()
    }
}

#[test]
fn test_current_speed_example() {
    let config = AppConfig::default();
    let agent = AgentBuilder::new()
        .genome(|g| g.speed = 2.0)
        .build(&config);
    let speed = energy::current_speed(
        &agent.genome,
        100.0,
        &TerrainSample::default(),
        &EnvironmentEffects::default(),
        &MetabolismConfig::default(),
    );
    assert!((speed - 3.0).abs() < 1e-9);

    let tired = energy::current_speed(
        &agent.genome,
        10.0,
        &TerrainSample::default(),
        &EnvironmentEffects::default(),
        &MetabolismConfig::default(),
    );
    assert!((tired - 0.9).abs() < 1e-9);
}

#[test]
fn test_hunt_payoff_capped_at_prey_energy() {
    let config = AppConfig::default();
    let predator = AgentBuilder::new()
        .seed(1)
        .species(SpeciesKind::Carnivore)
        .genome(|g| g.species.hunt_energy_gain = 50.0)
        .max_energy(500.0)
        .energy(100.0)
        .build(&config);
    let prey = AgentBuilder::new()
        .seed(2)
        .at(11.0, 10.0)
        .species(SpeciesKind::Herbivore)
        .energy(40.0)
        .build(&config);
    let (pid, qid) = (predator.id(), prey.id());
    let mut population = Population::from_agents(vec![predator, prey]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let outcome = resolve_hunt(&mut population, qid, &[pid], &sure_hunt(), &mut rng).unwrap();
    assert!(outcome.success);
    assert!(outcome.killed);
    assert_eq!(outcome.prey_loss, 40.0);
    assert_eq!(population.get(&pid).unwrap().physiology.energy, 140.0);
    assert_eq!(population.get(&qid).unwrap().physiology.energy, 0.0);
    assert_eq!(population.get(&pid).unwrap().record.kills, 1);
}

#[test]
fn test_pack_gains_sum_to_prey_loss() {
    let config = AppConfig::default();
    let lead = AgentBuilder::new()
        .seed(1)
        .species(SpeciesKind::Carnivore)
        .genome(|g| g.species.hunt_energy_gain = 60.0)
        .max_energy(500.0)
        .energy(100.0)
        .build(&config);
    let wing = AgentBuilder::new()
        .seed(4)
        .at(12.0, 10.0)
        .species(SpeciesKind::Carnivore)
        .max_energy(500.0)
        .energy(100.0)
        .build(&config);
    let prey = AgentBuilder::new()
        .seed(2)
        .at(11.0, 11.0)
        .species(SpeciesKind::Herbivore)
        .max_energy(500.0)
        .energy(200.0)
        .build(&config);
    let ids = [lead.id(), wing.id()];
    let qid = prey.id();
    let mut population = Population::from_agents(vec![lead, wing, prey]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let outcome = resolve_hunt(&mut population, qid, &ids, &sure_hunt(), &mut rng).unwrap();
    assert_eq!(outcome.pack.len(), 2);
    let gained: f64 = outcome.gains.iter().map(|(_, g)| g).sum();
    assert!((gained - outcome.prey_loss).abs() < 1e-9);
    assert!((outcome.prey_loss - 60.0).abs() < 1e-9);
    assert!((population.get(&qid).unwrap().physiology.energy - 140.0).abs() < 1e-9);
    assert!(!outcome.killed);
}

#[test]
fn test_transfer_never_exceeds_source() {
    assert_eq!(energy::transfer(50.0, 40.0), 40.0);
    assert_eq!(energy::transfer(10.0, 40.0), 10.0);
    assert_eq!(energy::transfer(-5.0, 40.0), 0.0);
    assert_eq!(energy::transfer(f64::NAN, 40.0), 0.0);
}

#[derive(Debug, Clone)]
enum Cmd {
    Hunt(usize, usize),
    Share(usize, usize, f64),
}

fn cmd(n: usize) -> impl Strategy<Value = Cmd> {
    prop_oneof![
        (0..n, 0..n).prop_map(|(a, b)| Cmd::Hunt(a, b)),
        (0..n, 0..n, 0.0f64..120.0).prop_map(|(a, b, x)| Cmd::Share(a, b, x)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resolve_pass_conserves_energy(
        energies in prop::collection::vec(0.0f64..150.0, 2..8),
        picks in prop::collection::vec(cmd(8), 0..24),
        seed in any::<u64>(),
    ) {
        let config = AppConfig::default();
        let n = energies.len();
        let agents: Vec<_> = energies
            .iter()
            .enumerate()
            .map(|(i, e)| {
                AgentBuilder::new()
                    .seed(seed.wrapping_add(i as u64))
                    .at(10.0 + i as f64, 10.0)
                    .species(if i % 2 == 0 { SpeciesKind::Carnivore } else { SpeciesKind::Herbivore })
                    .max_energy(200.0)
                    .energy(*e)
                    .build(&config)
            })
            .collect();
        let ids: Vec<_> = agents.iter().map(|a| a.id()).collect();
        let mut population = Population::from_agents(agents).unwrap();
        let before: f64 = population.iter().map(|a| a.physiology.energy).sum();

        let commands: Vec<InteractionCommand> = picks
            .into_iter()
            .map(|c| match c {
                Cmd::Hunt(a, b) => InteractionCommand::Hunt { hunter: ids[a % n], prey: ids[b % n] },
                Cmd::Share(a, b, x) => InteractionCommand::ShareEnergy { from: ids[a % n], to: ids[b % n], amount: x },
            })
            .collect();

        let mut food = FoodPatches::empty(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ctx = InteractionContext {
            config: &config,
            food: &mut food,
            tick: 1,
            rng: &mut rng,
        };
        process_interaction_commands(&mut population, commands, &mut ctx);

        let after: f64 = population.iter().map(|a| a.physiology.energy).sum();
        prop_assert!((before - after).abs() < 1e-6);
        for a in population.iter() {
            prop_assert!(a.physiology.energy >= 0.0);
            prop_assert!(a.physiology.energy <= a.physiology.max_energy + 1e-9);
        }
    }
}
