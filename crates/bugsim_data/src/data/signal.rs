use super::agent::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Type of a social broadcast. Each kind carries a fixed priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// "Predator here, run."
    DangerAlert,
    /// "Join me on this prey."
    HuntCall,
    /// "I have energy to spare."
    FoodShare,
    /// "Gather around me."
    GroupRally,
    /// "Looking for a mate."
    MatingCall,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::DangerAlert,
        SignalKind::HuntCall,
        SignalKind::FoodShare,
        SignalKind::GroupRally,
        SignalKind::MatingCall,
    ];

    /// Processing priority; higher runs first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            SignalKind::DangerAlert => 5,
            SignalKind::HuntCall => 4,
            SignalKind::FoodShare => 3,
            SignalKind::GroupRally => 2,
            SignalKind::MatingCall => 1,
        }
    }
}

/// Optional typed content of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SignalPayload {
    ThreatId(Uuid),
    FoodPosition(Vec2),
    HuntTarget(Uuid),
    EnergyAmount(f64),
    GroupSize(u32),
}

/// An immutable, strength-decaying broadcast message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub origin: Vec2,
    pub emitter: Uuid,
    /// Strength at emission, in [0, 1].
    pub strength: f32,
    /// Simulation time of emission, in seconds.
    pub emitted_at: f64,
    /// Seconds after which the signal has fully decayed.
    pub decay_window: f64,
    /// Strength below which the signal counts as inactive.
    pub activation_floor: f32,
    pub payload: Option<SignalPayload>,
}

impl Signal {
    /// Strength remaining at time `now`; linear decay to zero over the window.
    #[must_use]
    pub fn current_strength(&self, now: f64) -> f32 {
        if self.decay_window <= 0.0 {
            return 0.0;
        }
        let elapsed = (now - self.emitted_at).max(0.0);
        let factor = ((self.decay_window - elapsed) / self.decay_window).clamp(0.0, 1.0);
        self.strength * factor as f32
    }

    #[must_use]
    pub fn is_active(&self, now: f64) -> bool {
        self.current_strength(now) > self.activation_floor
    }

    /// Identity of a broadcast, used to avoid accepting the same one twice.
    #[must_use]
    pub fn key(&self) -> (Uuid, u64, SignalKind) {
        (self.emitter, self.emitted_at.to_bits(), self.kind)
    }
}

/// A signal copied into a receiver's memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceivedSignal {
    pub signal: Signal,
    pub received_at: f64,
    /// Whether the receiver already acted on it.
    pub handled: bool,
}

/// Bounded buffer of recently received signals, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMemory {
    pub entries: VecDeque<ReceivedSignal>,
}

impl SignalMemory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, signal: &Signal) -> bool {
        let key = signal.key();
        self.entries.iter().any(|e| e.signal.key() == key)
    }
}
