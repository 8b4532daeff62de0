use uuid::Uuid;

/// Cross-agent effect requested during the parallel phases.
///
/// Agents never write into each other directly: every effect that touches a
/// second agent or a shared resource is queued here and applied in the
/// sequential resolve pass against live state.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionCommand {
    /// `hunter` attacks `prey`. Commands sharing a prey form a pack.
    Hunt { hunter: Uuid, prey: Uuid },
    /// Move up to `amount` energy from `from` to `to`.
    ShareEnergy { from: Uuid, to: Uuid, amount: f64 },
    /// `agent` forages at a food site.
    EatFood { agent: Uuid, site: u64 },
    /// Mating attempt; `threshold` is the climate-adjusted energy threshold
    /// seen by the initiator.
    Reproduce { a: Uuid, b: Uuid, threshold: f64 },
}
