use crate::config::AppConfig;
use crate::lifecycle;
use bugsim_data::Agent;
use rand::Rng;

/// Mature, rested and holding at least `threshold` energy.
#[must_use]
pub fn is_eligible(agent: &Agent, threshold: f64, config: &AppConfig) -> bool {
    !agent.is_dead()
        && agent.physiology.energy >= threshold
        && agent.physiology.age >= config.reproduction.maturity_age
        && agent.behavior.cooldowns.reproduction == 0
}

/// Attempts to breed `a` with `b`.
///
/// All checks run before any state changes. On success both parents pay the
/// fixed cost, get the cooldown and count one offspring, and the child is
/// returned for queueing. On failure neither parent is touched.
pub fn reproduce_pair<R: Rng>(
    a: &mut Agent,
    b: &mut Agent,
    threshold: f64,
    tick: u64,
    config: &AppConfig,
    rng: &mut R,
) -> Option<Agent> {
    let rules = &config.reproduction;
    if a.id() == b.id()
        || a.genome.species.kind != b.genome.species.kind
        || !is_eligible(a, threshold, config)
        || !is_eligible(b, threshold, config)
        || a.physiology.energy < rules.cost
        || b.physiology.energy < rules.cost
        || a.physiology.position.distance(b.physiology.position) > rules.mate_distance
    {
        return None;
    }

    let child = lifecycle::create_offspring_with_rng(a, b, tick, config, rng);
    for parent in [a, b] {
        parent.physiology.energy -= rules.cost;
        parent.behavior.cooldowns.reproduction = rules.cooldown;
        parent.behavior.mate_target = None;
        parent.record.offspring_count += 1;
    }
    Some(child)
}
