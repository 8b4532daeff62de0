//! Sequential resolve pass for cross-agent commands.
//!
//! Commands are applied in population order against live state. Every
//! transfer is capped by what the source still holds when its turn comes, so
//! energy is conserved however many commands target the same agent.

use crate::config::AppConfig;
use crate::environment::FoodSupply;
use crate::interaction::InteractionCommand;
use crate::population::Population;
use crate::systems::energy;
use crate::systems::social::{hunting, reproduction};
use bugsim_data::{Agent, LiveEvent};
use chrono::Utc;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub struct InteractionContext<'a, R: Rng> {
    pub config: &'a AppConfig,
    pub food: &'a mut dyn FoodSupply,
    pub tick: u64,
    pub rng: &'a mut R,
}

#[derive(Debug, Default)]
pub struct InteractionResult {
    pub events: Vec<LiveEvent>,
    /// Agents whose energy was taken to zero by a hunt.
    pub killed_ids: HashSet<Uuid>,
    /// Children to merge at the tick boundary.
    pub newborns: Vec<Agent>,
    pub hunts: usize,
    pub shared_energy: f64,
}

/// Moves up to `amount` from `from` to `to`. Returns what actually moved.
pub fn share_energy(population: &mut Population, from: &Uuid, to: &Uuid, amount: f64) -> f64 {
    let Some((donor, receiver)) = population.pair_mut(from, to) else {
        return 0.0;
    };
    if donor.is_dead() || receiver.is_dead() {
        return 0.0;
    }
    let moved = energy::transfer(
        amount.min(energy::headroom(receiver)),
        donor.physiology.energy,
    );
    donor.physiology.energy -= moved;
    receiver.physiology.energy += moved;
    moved
}

pub fn process_interaction_commands<R: Rng>(
    population: &mut Population,
    commands: Vec<InteractionCommand>,
    ctx: &mut InteractionContext<R>,
) -> InteractionResult {
    let mut result = InteractionResult::default();
    let timestamp = Utc::now().to_rfc3339();

    let mut packs: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for cmd in &commands {
        if let InteractionCommand::Hunt { hunter, prey } = cmd {
            packs.entry(*prey).or_default().push(*hunter);
        }
    }
    let mut hunted: HashSet<Uuid> = HashSet::new();
    let mut mated: HashSet<(Uuid, Uuid)> = HashSet::new();

    for cmd in commands {
        match cmd {
            InteractionCommand::Hunt { prey, .. } => {
                if !hunted.insert(prey) {
                    continue;
                }
                let hunters = packs.remove(&prey).unwrap_or_default();
                let Some(outcome) = hunting::resolve_hunt(
                    population,
                    prey,
                    &hunters,
                    &ctx.config.hunting,
                    ctx.rng,
                ) else {
                    continue;
                };
                result.hunts += 1;
                if outcome.success {
                    if outcome.killed {
                        result.killed_ids.insert(prey);
                    }
                    tracing::trace!(
                        tick = ctx.tick,
                        prey = %prey,
                        pack = outcome.pack.len(),
                        loss = outcome.prey_loss,
                        "Hunt succeeded"
                    );
                    result.events.push(LiveEvent::Hunt {
                        prey,
                        gains: outcome.gains,
                        prey_loss: outcome.prey_loss,
                        tick: ctx.tick,
                        timestamp: timestamp.clone(),
                    });
                }
            }
            InteractionCommand::ShareEnergy { from, to, amount } => {
                let moved = share_energy(population, &from, &to, amount);
                if moved > 0.0 {
                    result.shared_energy += moved;
                    result.events.push(LiveEvent::EnergyShared {
                        from,
                        to,
                        amount: moved,
                        tick: ctx.tick,
                        timestamp: timestamp.clone(),
                    });
                }
            }
            InteractionCommand::EatFood { agent, site } => {
                if let Some(a) = population.get_mut(&agent) {
                    if a.is_dead() {
                        continue;
                    }
                    let gain = ctx.food.consume(site, energy::headroom(a));
                    if gain > 0.0 {
                        a.physiology.energy += gain;
                        a.record.food_eaten += 1;
                    }
                }
            }
            InteractionCommand::Reproduce { a, b, threshold } => {
                let key = if a < b { (a, b) } else { (b, a) };
                if !mated.insert(key) {
                    continue;
                }
                let Some((pa, pb)) = population.pair_mut(&a, &b) else {
                    continue;
                };
                if let Some(child) = reproduction::reproduce_pair(
                    pa,
                    pb,
                    threshold,
                    ctx.tick,
                    ctx.config,
                    ctx.rng,
                ) {
                    result.events.push(LiveEvent::Birth {
                        id: child.id(),
                        parents: child.identity.parents.clone(),
                        gen: child.generation,
                        tick: ctx.tick,
                        timestamp: timestamp.clone(),
                        x: child.physiology.position.x,
                        y: child.physiology.position.y,
                    });
                    result.newborns.push(child);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::FoodPatches;
    use crate::lifecycle;
    use bugsim_data::{SpeciesKind, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn agent(x: f64, kind: SpeciesKind, energy: f64, rng: &mut ChaCha8Rng) -> Agent {
        let config = AppConfig::default();
        let mut a = lifecycle::create_agent_with_rng(Vec2::new(x, 0.0), 0, &config, rng);
        let mut g = (*a.genome).clone();
        g.species.kind = kind;
        a.genome = Arc::new(g);
        a.physiology.max_energy = 200.0;
        a.physiology.energy = energy;
        a.physiology.age = 100;
        a
    }

    #[test]
    fn test_share_capped_by_donor_across_commands() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let donor = agent(0.0, SpeciesKind::Herbivore, 15.0, &mut rng);
        let r1 = agent(1.0, SpeciesKind::Herbivore, 10.0, &mut rng);
        let r2 = agent(2.0, SpeciesKind::Herbivore, 10.0, &mut rng);
        let (d, a, b) = (donor.id(), r1.id(), r2.id());
        let mut pop = Population::from_agents(vec![donor, r1, r2]).unwrap();
        let mut food = FoodPatches::empty(&config);
        let mut ctx = InteractionContext {
            config: &config,
            food: &mut food,
            tick: 1,
            rng: &mut rng,
        };
        let cmds = vec![
            InteractionCommand::ShareEnergy { from: d, to: a, amount: 10.0 },
            InteractionCommand::ShareEnergy { from: d, to: b, amount: 10.0 },
        ];
        let res = process_interaction_commands(&mut pop, cmds, &mut ctx);
        assert_eq!(res.shared_energy, 15.0);
        assert_eq!(pop.get(&d).unwrap().physiology.energy, 0.0);
        assert_eq!(pop.get(&a).unwrap().physiology.energy, 20.0);
        assert_eq!(pop.get(&b).unwrap().physiology.energy, 15.0);
    }

    #[test]
    fn test_eat_food_capped_by_headroom() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let eater = agent(0.0, SpeciesKind::Herbivore, 190.0, &mut rng);
        let id = eater.id();
        let mut pop = Population::from_agents(vec![eater]).unwrap();
        let mut food = FoodPatches::empty(&config);
        let site = food.add_site(Vec2::new(0.5, 0.0), 40.0);
        let mut ctx = InteractionContext {
            config: &config,
            food: &mut food,
            tick: 1,
            rng: &mut rng,
        };
        process_interaction_commands(&mut pop, vec![InteractionCommand::EatFood { agent: id, site }], &mut ctx);
        assert_eq!(pop.get(&id).unwrap().physiology.energy, 200.0);
        assert_eq!(pop.get(&id).unwrap().record.food_eaten, 1);
    }

    #[test]
    fn test_mutual_reproduce_commands_make_one_child() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = agent(0.0, SpeciesKind::Omnivore, 150.0, &mut rng);
        let b = agent(5.0, SpeciesKind::Omnivore, 150.0, &mut rng);
        let (ia, ib) = (a.id(), b.id());
        let mut pop = Population::from_agents(vec![a, b]).unwrap();
        let mut food = FoodPatches::empty(&config);
        let mut ctx = InteractionContext {
            config: &config,
            food: &mut food,
            tick: 1,
            rng: &mut rng,
        };
        let cmds = vec![
            InteractionCommand::Reproduce { a: ia, b: ib, threshold: 80.0 },
            InteractionCommand::Reproduce { a: ib, b: ia, threshold: 80.0 },
        ];
        let res = process_interaction_commands(&mut pop, cmds, &mut ctx);
        assert_eq!(res.newborns.len(), 1);
        assert_eq!(pop.get(&ia).unwrap().physiology.energy, 120.0);
        assert_eq!(pop.get(&ib).unwrap().physiology.energy, 120.0);
        assert_eq!(pop.len(), 2);
    }
}
