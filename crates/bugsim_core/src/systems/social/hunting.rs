use crate::config::HuntingConfig;
use crate::population::Population;
use crate::systems::energy;
use bugsim_data::Genome;
use rand::Rng;
use uuid::Uuid;

/// Success bonus of a coordinated pack of `pack_size` hunters.
///
/// Zero for a lone hunter, increasing and saturating towards
/// `max_pack_bonus`, plus a small social-response term.
#[must_use]
pub fn pack_bonus(pack_size: usize, social_response: f32, config: &HuntingConfig) -> f64 {
    let extra = pack_size.saturating_sub(1) as f64;
    let saturation = config.pack_saturation.max(f64::EPSILON);
    config.max_pack_bonus * (1.0 - (-extra / saturation).exp())
        + f64::from(social_response) * config.social_bonus_scale
}

/// Probability that `hunter` lands an attack on `prey`.
#[must_use]
pub fn success_chance(hunter: &Genome, prey: &Genome, bonus: f64, config: &HuntingConfig) -> f64 {
    let strength = f64::from(hunter.strength);
    let resistance = f64::from(prey.species.defense) * f64::from(prey.strength);
    let odds = config.base_success * strength / (strength + resistance + f64::EPSILON) * 2.0;
    let skill = 0.5 + f64::from(hunter.species.hunting_prowess);
    let hidden = 1.0 - f64::from(prey.camouflage) * config.camouflage_factor;
    let chance = odds * skill * hidden + bonus;
    if chance.is_finite() {
        chance.clamp(0.0, config.max_success)
    } else {
        0.0
    }
}

/// Result of one resolved attack on a prey.
#[derive(Debug, Clone, PartialEq)]
pub struct HuntOutcome {
    pub prey: Uuid,
    pub pack: Vec<Uuid>,
    pub success: bool,
    /// Energy credited to each pack member, in pack order.
    pub gains: Vec<(Uuid, f64)>,
    /// Energy the prey lost; always the sum of `gains`.
    pub prey_loss: f64,
    pub killed: bool,
}

/// Resolves every attack on `prey_id` this tick as one pack hunt.
///
/// The first live hunter leads; hunters within the coordination radius of
/// the lead join its pack. The lead's traits set the odds and the payoff,
/// which is capped by the prey's energy and split equally, each share capped
/// by the member's headroom. Returns `None` when there is nothing to resolve.
pub fn resolve_hunt<R: Rng>(
    population: &mut Population,
    prey_id: Uuid,
    hunters: &[Uuid],
    config: &HuntingConfig,
    rng: &mut R,
) -> Option<HuntOutcome> {
    let prey = population.get(&prey_id)?;
    if prey.is_dead() {
        return None;
    }
    let lead = hunters
        .iter()
        .filter_map(|id| population.get(id))
        .find(|h| !h.is_dead() && h.id() != prey_id)?;
    let lead_pos = lead.physiology.position;

    let mut pack: Vec<Uuid> = Vec::with_capacity(hunters.len());
    for id in hunters {
        if pack.contains(id) || *id == prey_id {
            continue;
        }
        if let Some(h) = population.get(id) {
            if !h.is_dead() && h.physiology.position.distance(lead_pos) <= config.coordination_radius {
                pack.push(*id);
            }
        }
    }

    let bonus = pack_bonus(pack.len(), lead.genome.communication.social_response, config);
    let chance = success_chance(&lead.genome, &prey.genome, bonus, config);
    let lead_id = lead.id();
    let payoff = f64::from(lead.genome.species.hunt_energy_gain);
    let prey_energy = prey.physiology.energy;

    if rng.gen::<f64>() >= chance {
        return Some(HuntOutcome {
            prey: prey_id,
            pack,
            success: false,
            gains: Vec::new(),
            prey_loss: 0.0,
            killed: false,
        });
    }

    let total = energy::transfer(payoff, prey_energy);
    let headrooms: Vec<f64> = pack
        .iter()
        .map(|id| population.get(id).map_or(0.0, energy::headroom))
        .collect();
    let shares = energy::split_transfer(total, &headrooms);
    let prey_loss: f64 = shares.iter().sum();

    let mut gains = Vec::with_capacity(pack.len());
    for (id, share) in pack.iter().zip(shares) {
        if let Some(h) = population.get_mut(id) {
            h.physiology.energy += share;
            gains.push((*id, share));
        }
    }
    let mut killed = false;
    if let Some(p) = population.get_mut(&prey_id) {
        p.physiology.energy = (p.physiology.energy - prey_loss).max(0.0);
        killed = p.physiology.energy <= 0.0;
    }
    if killed {
        if let Some(lead) = population.get_mut(&lead_id) {
            lead.record.kills += 1;
        }
    }

    Some(HuntOutcome {
        prey: prey_id,
        pack,
        success: true,
        gains,
        prey_loss,
        killed,
    })
}
