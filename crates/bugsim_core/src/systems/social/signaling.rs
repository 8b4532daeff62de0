use crate::config::AppConfig;
use crate::interaction::InteractionCommand;
use crate::signal;
use crate::snapshot::PopulationSnapshot;
use crate::systems::intel::Decision;
use crate::systems::perception::Perception;
use crate::systems::social::reproduction;
use bugsim_data::{Agent, SignalKind, SignalPayload, SocialRole, Tier, TrackedAgent};

/// Picks the signal an agent would broadcast in its current situation.
///
/// A visible predator always warrants a danger alert. Every other kind needs
/// the matching network output above `signal.output_threshold`: `Share` for
/// food shares and `Signal` for the rest.
#[must_use]
pub fn choose_emission(
    agent: &Agent,
    perception: &Perception,
    decision: Option<&Decision>,
    tier: Tier,
    config: &AppConfig,
) -> Option<(SignalKind, Option<SignalPayload>)> {
    if let Some(threat) = perception.predator {
        return Some((SignalKind::DangerAlert, Some(SignalPayload::ThreatId(threat.id))));
    }
    let decision = decision?;
    let threshold = config.signal.output_threshold;
    let talkative = decision.signal() > threshold;

    if talkative && tier == Tier::Hunting {
        if let Some(prey) = agent.behavior.prey_target {
            return Some((SignalKind::HuntCall, Some(SignalPayload::HuntTarget(prey.id))));
        }
    }
    if decision.share() > threshold && agent.energy_fraction() > config.metabolism.well_fed_fraction {
        return Some((
            SignalKind::FoodShare,
            Some(SignalPayload::EnergyAmount(config.signal.share_cap)),
        ));
    }
    if talkative
        && agent.behavior.mate_target.is_none()
        && reproduction::is_eligible(agent, config.reproduction.energy_threshold, config)
    {
        return Some((SignalKind::MatingCall, None));
    }
    if talkative && agent.social.group_id.is_none() && agent.genome.communication.social_response > 0.5
    {
        return Some((SignalKind::GroupRally, Some(SignalPayload::GroupSize(1))));
    }
    None
}

/// Applies the agent's actionable signals, highest priority first, and
/// marks them handled. Food shares come back as commands for the resolve
/// pass.
pub fn process_signals(
    agent: &mut Agent,
    view: &PopulationSnapshot,
    now: f64,
    config: &AppConfig,
) -> Vec<InteractionCommand> {
    let mut commands = Vec::new();
    let order = signal::by_priority(&agent.social.memory, &agent.genome, now);

    for idx in order {
        let Some(entry) = agent.social.memory.entries.get_mut(idx) else {
            continue;
        };
        entry.handled = true;
        let s = entry.signal;
        let emitter = view.get(&s.emitter);

        match s.kind {
            SignalKind::DangerAlert => {
                let threat = match s.payload {
                    Some(SignalPayload::ThreatId(id)) => view.get(&id).map(|t| TrackedAgent {
                        id,
                        position: t.position,
                    }),
                    _ => None,
                };
                agent.behavior.threat_target = threat.or(Some(TrackedAgent {
                    id: s.emitter,
                    position: s.origin,
                }));
                agent.behavior.cooldowns.flee = config.behavior.alarm_ticks;
            }
            SignalKind::HuntCall => {
                let genome = &agent.genome;
                if !genome.species.kind.can_hunt() {
                    continue;
                }
                if let Some(SignalPayload::HuntTarget(id)) = s.payload {
                    if let Some(prey) = view.get(&id) {
                        if id != agent.id()
                            && genome.species.kind.preys_on(genome.size, prey.species, prey.size)
                        {
                            agent.behavior.prey_target = Some(TrackedAgent {
                                id,
                                position: prey.position,
                            });
                            agent.social.hunt_leader = Some(s.emitter);
                        }
                    }
                }
            }
            SignalKind::FoodShare => {
                let Some(donor) = emitter else { continue };
                let near = donor.position.distance(agent.physiology.position)
                    <= config.signal.share_distance;
                let hungry = agent.energy_fraction() < config.signal.share_hunger_fraction;
                if near && hungry && agent.behavior.cooldowns.share == 0 {
                    let offered = match s.payload {
                        Some(SignalPayload::EnergyAmount(amount)) => amount,
                        _ => config.signal.share_cap,
                    };
                    commands.push(InteractionCommand::ShareEnergy {
                        from: donor.id,
                        to: agent.id(),
                        amount: offered.min(config.signal.share_cap).max(0.0),
                    });
                    agent.behavior.cooldowns.share = config.signal.share_cooldown;
                }
            }
            SignalKind::GroupRally => {
                if agent.social.group_id.is_none() {
                    let group = emitter.and_then(|e| e.group_id).unwrap_or(s.emitter);
                    agent.social.group_id = Some(group);
                    agent.social.role = SocialRole::Member;
                }
            }
            SignalKind::MatingCall => {
                let Some(mate) = emitter else { continue };
                if agent.behavior.mate_target.is_none()
                    && mate.species == agent.genome.species.kind
                    && reproduction::is_eligible(agent, config.reproduction.energy_threshold, config)
                {
                    agent.behavior.mate_target = Some(TrackedAgent {
                        id: mate.id,
                        position: mate.position,
                    });
                }
            }
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use bugsim_data::{ReceivedSignal, Signal, SpeciesKind, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;
    use uuid::Uuid;

    fn agent(x: f64, kind: SpeciesKind, rng: &mut ChaCha8Rng) -> Agent {
        let config = AppConfig::default();
        let mut a = lifecycle::create_agent_with_rng(Vec2::new(x, 0.0), 0, &config, rng);
        let mut g = (*a.genome).clone();
        g.species.kind = kind;
        g.size = 1.0;
        g.communication.memory_duration = 10.0;
        a.genome = Arc::new(g);
        a
    }

    fn deliver(to: &mut Agent, kind: SignalKind, from: &Agent, payload: Option<SignalPayload>) {
        to.social.memory.entries.push_back(ReceivedSignal {
            signal: Signal {
                kind,
                origin: from.physiology.position,
                emitter: from.id(),
                strength: 1.0,
                emitted_at: 0.0,
                decay_window: 5.0,
                activation_floor: 0.01,
                payload,
            },
            received_at: 0.0,
            handled: false,
        });
    }

    #[test]
    fn test_danger_alert_sets_threat_and_alarm() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let predator = agent(30.0, SpeciesKind::Carnivore, &mut rng);
        let friend = agent(5.0, SpeciesKind::Herbivore, &mut rng);
        let mut me = agent(0.0, SpeciesKind::Herbivore, &mut rng);
        let mut view = PopulationSnapshot::new(200.0, 200.0, 20.0);
        view.rebuild(&[predator.clone(), friend.clone(), me.clone()], &config);

        deliver(&mut me, SignalKind::DangerAlert, &friend, Some(SignalPayload::ThreatId(predator.id())));
        let cmds = process_signals(&mut me, &view, 0.1, &config);
        assert!(cmds.is_empty());
        assert_eq!(me.behavior.threat_target.map(|t| t.id), Some(predator.id()));
        assert_eq!(me.behavior.cooldowns.flee, config.behavior.alarm_ticks);
        assert!(me.social.memory.entries.iter().all(|e| e.handled));
    }

    #[test]
    fn test_food_share_becomes_command_when_hungry_and_near() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let donor = agent(4.0, SpeciesKind::Herbivore, &mut rng);
        let mut me = agent(0.0, SpeciesKind::Herbivore, &mut rng);
        me.physiology.energy = 1.0;
        let mut view = PopulationSnapshot::new(200.0, 200.0, 20.0);
        view.rebuild(&[donor.clone(), me.clone()], &config);

        deliver(&mut me, SignalKind::FoodShare, &donor, Some(SignalPayload::EnergyAmount(50.0)));
        let cmds = process_signals(&mut me, &view, 0.1, &config);
        assert_eq!(
            cmds,
            vec![InteractionCommand::ShareEnergy {
                from: donor.id(),
                to: me.id(),
                amount: config.signal.share_cap,
            }]
        );
        assert_eq!(me.behavior.cooldowns.share, config.signal.share_cooldown);

        deliver(&mut me, SignalKind::FoodShare, &donor, None);
        me.social.memory.entries[1].signal.emitted_at = 0.05;
        assert!(process_signals(&mut me, &view, 0.2, &config).is_empty());
    }

    #[test]
    fn test_rally_and_hunt_call() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let leader = agent(3.0, SpeciesKind::Carnivore, &mut rng);
        let prey = agent(20.0, SpeciesKind::Herbivore, &mut rng);
        let mut me = agent(0.0, SpeciesKind::Carnivore, &mut rng);
        let mut view = PopulationSnapshot::new(200.0, 200.0, 20.0);
        view.rebuild(&[leader.clone(), prey.clone(), me.clone()], &config);

        deliver(&mut me, SignalKind::GroupRally, &leader, None);
        deliver(&mut me, SignalKind::HuntCall, &leader, Some(SignalPayload::HuntTarget(prey.id())));
        me.social.memory.entries[1].signal.emitted_at = 0.01;
        process_signals(&mut me, &view, 0.1, &config);
        assert_eq!(me.social.group_id, Some(leader.id()));
        assert_eq!(me.social.role, SocialRole::Member);
        assert_eq!(me.behavior.prey_target.map(|t| t.id), Some(prey.id()));
        assert_eq!(me.social.hunt_leader, Some(leader.id()));
    }

    #[test]
    fn test_herbivore_ignores_hunt_call() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let caller = agent(3.0, SpeciesKind::Carnivore, &mut rng);
        let mut me = agent(0.0, SpeciesKind::Herbivore, &mut rng);
        let mut view = PopulationSnapshot::new(200.0, 200.0, 20.0);
        view.rebuild(&[caller.clone(), me.clone()], &config);
        deliver(&mut me, SignalKind::HuntCall, &caller, Some(SignalPayload::HuntTarget(Uuid::nil())));
        process_signals(&mut me, &view, 0.1, &config);
        assert!(me.behavior.prey_target.is_none());
        assert!(me.social.memory.entries[0].handled);
    }
}
