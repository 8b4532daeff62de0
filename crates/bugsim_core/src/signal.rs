//! Signal protocol mechanics: emission, reception and memory upkeep.
//!
//! What each signal kind *does* to a receiver lives in
//! `systems::social::signaling`; this module only handles the protocol.

use crate::config::SignalConfig;
use bugsim_data::{Agent, Genome, ReceivedSignal, Signal, SignalKind, SignalMemory, SignalPayload};
use rand::Rng;

/// Cooldown is over and the frequency roll succeeds.
pub fn may_emit<R: Rng>(agent: &Agent, rng: &mut R) -> bool {
    agent.behavior.cooldowns.signal == 0
        && rng.gen::<f32>() < agent.genome.communication.frequency
}

/// Energy charged for emitting at `strength`.
#[must_use]
pub fn emission_cost(strength: f32, config: &SignalConfig) -> f64 {
    config.emission_cost * f64::from(strength.clamp(0.0, 1.0))
}

/// Emits a signal from `agent`: sets the cooldown, charges the emission cost
/// and returns the broadcast.
///
/// Callers check [`may_emit`] first.
pub fn emit(
    agent: &mut Agent,
    kind: SignalKind,
    payload: Option<SignalPayload>,
    now: f64,
    config: &SignalConfig,
) -> Signal {
    let strength = agent.genome.communication.signal_strength.clamp(0.0, 1.0);
    agent.behavior.cooldowns.signal = config.cooldown;
    agent.physiology.energy = (agent.physiology.energy - emission_cost(strength, config)).max(0.0);
    agent.record.signals_emitted += 1;
    Signal {
        kind,
        origin: agent.physiology.position,
        emitter: agent.id(),
        strength,
        emitted_at: now,
        decay_window: config.decay_window,
        activation_floor: config.activation_floor,
        payload,
    }
}

/// Offers a broadcast to a receiver. Returns true when it was accepted into
/// the receiver's memory.
pub fn receive<R: Rng>(
    memory: &mut SignalMemory,
    signal: &Signal,
    receiver: &Agent,
    now: f64,
    config: &SignalConfig,
    rng: &mut R,
) -> bool {
    if signal.emitter == receiver.id() || !signal.is_active(now) {
        return false;
    }
    let comms = &receiver.genome.communication;
    if comms.sensitivity < config.sensitivity_floor {
        return false;
    }
    if receiver.physiology.position.distance(signal.origin) > config.broadcast_range {
        return false;
    }
    if memory.contains(signal) {
        return false;
    }
    if rng.gen::<f32>() <= 1.0 - comms.trust {
        return false;
    }
    memory.entries.push_back(ReceivedSignal {
        signal: *signal,
        received_at: now,
        handled: false,
    });
    true
}

/// Drops decayed entries, then the oldest ones above capacity.
pub fn evict(memory: &mut SignalMemory, now: f64, capacity: usize) {
    memory.entries.retain(|e| e.signal.is_active(now));
    while memory.entries.len() > capacity {
        memory.entries.pop_front();
    }
}

/// Still within the receiver's memory duration and not yet acted upon.
#[must_use]
pub fn is_actionable(entry: &ReceivedSignal, genome: &Genome, now: f64) -> bool {
    !entry.handled
        && entry.signal.is_active(now)
        && now - entry.received_at <= f64::from(genome.communication.memory_duration)
}

/// Indices of actionable entries, highest priority first. Equal priorities
/// keep their arrival order.
#[must_use]
pub fn by_priority(memory: &SignalMemory, genome: &Genome, now: f64) -> Vec<usize> {
    let mut order: Vec<usize> = memory
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| is_actionable(e, genome, now))
        .map(|(i, _)| i)
        .collect();
    order.sort_by_key(|&i| std::cmp::Reverse(memory.entries[i].signal.kind.priority()));
    order
}

/// Keeps only broadcasts that are still active.
pub fn retain_active(broadcasts: &mut Vec<Signal>, now: f64) {
    broadcasts.retain(|s| s.is_active(now));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::lifecycle;
    use bugsim_data::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn agent_at(x: f64, rng: &mut ChaCha8Rng) -> Agent {
        let config = AppConfig::default();
        let mut a = lifecycle::create_agent_with_rng(Vec2::new(x, 0.0), 0, &config, rng);
        let mut genome = (*a.genome).clone();
        genome.communication.trust = 1.0;
        genome.communication.sensitivity = 1.0;
        genome.communication.frequency = 1.0;
        genome.communication.memory_duration = 10.0;
        genome.communication.signal_strength = 0.8;
        a.genome = Arc::new(genome);
        a
    }

    #[test]
    fn test_emit_sets_cooldown_and_charges_strength() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = agent_at(0.0, &mut rng);
        let before = a.physiology.energy;
        assert!(may_emit(&a, &mut rng));
        let s = emit(&mut a, SignalKind::HuntCall, None, 1.0, &config.signal);
        assert_eq!(a.behavior.cooldowns.signal, config.signal.cooldown);
        assert!((before - a.physiology.energy - 0.5 * 0.8).abs() < 1e-6);
        assert!(!may_emit(&a, &mut rng));
        assert!((s.strength - 0.8).abs() < 1e-6);
        assert_eq!(a.record.signals_emitted, 1);
    }

    #[test]
    fn test_decay_window_boundary() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut a = agent_at(0.0, &mut rng);
        let s = emit(&mut a, SignalKind::DangerAlert, None, 10.0, &config.signal);
        assert!(s.is_active(14.9));
        assert!(!s.is_active(15.1));
        assert_eq!(s.current_strength(15.0), 0.0);
    }

    #[test]
    fn test_receive_filters_and_dedups() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut emitter = agent_at(0.0, &mut rng);
        let receiver = agent_at(10.0, &mut rng);
        let far = agent_at(500.0, &mut rng);
        let s = emit(&mut emitter, SignalKind::FoodShare, None, 0.0, &config.signal);

        let mut memory = SignalMemory::default();
        assert!(receive(&mut memory, &s, &receiver, 0.1, &config.signal, &mut rng));
        assert!(!receive(&mut memory, &s, &receiver, 0.2, &config.signal, &mut rng));
        assert!(!receive(&mut memory, &s, &emitter, 0.2, &config.signal, &mut rng));
        assert!(!receive(&mut SignalMemory::default(), &s, &far, 0.2, &config.signal, &mut rng));
        assert!(!receive(&mut SignalMemory::default(), &s, &receiver, 6.0, &config.signal, &mut rng));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_zero_trust_never_accepts() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut emitter = agent_at(0.0, &mut rng);
        let mut receiver = agent_at(5.0, &mut rng);
        let mut genome = (*receiver.genome).clone();
        genome.communication.trust = 0.0;
        receiver.genome = Arc::new(genome);
        let s = emit(&mut emitter, SignalKind::GroupRally, None, 0.0, &config.signal);
        for _ in 0..100 {
            let mut memory = SignalMemory::default();
            assert!(!receive(&mut memory, &s, &receiver, 0.1, &config.signal, &mut rng));
        }
    }

    #[test]
    fn test_priority_order_is_stable() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let receiver = agent_at(0.0, &mut rng);
        let mut memory = SignalMemory::default();
        let kinds = [
            SignalKind::MatingCall,
            SignalKind::DangerAlert,
            SignalKind::FoodShare,
            SignalKind::DangerAlert,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            let mut emitter = agent_at(1.0 + i as f64, &mut rng);
            let s = emit(&mut emitter, *kind, None, 0.0, &config.signal);
            assert!(receive(&mut memory, &s, &receiver, 0.0, &config.signal, &mut rng));
        }
        let order = by_priority(&memory, &receiver.genome, 0.1);
        let sorted: Vec<SignalKind> = order.iter().map(|&i| memory.entries[i].signal.kind).collect();
        assert_eq!(
            sorted,
            vec![
                SignalKind::DangerAlert,
                SignalKind::DangerAlert,
                SignalKind::FoodShare,
                SignalKind::MatingCall
            ]
        );
        assert_eq!(order[0], 1);
        assert_eq!(order[1], 3);
    }

    #[test]
    fn test_evict_drops_expired_then_oldest() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let receiver = agent_at(0.0, &mut rng);
        let mut memory = SignalMemory::default();
        for i in 0..6 {
            let mut emitter = agent_at(1.0, &mut rng);
            let s = emit(&mut emitter, SignalKind::HuntCall, None, i as f64, &config.signal);
            assert!(receive(&mut memory, &s, &receiver, i as f64, &config.signal, &mut rng));
        }
        evict(&mut memory, 5.5, 3);
        assert_eq!(memory.len(), 3);
        assert!(memory.entries.iter().all(|e| e.signal.emitted_at >= 3.0));
    }
}
