//! Energy economy formulas.
//!
//! Every energy change in the simulation is computed here. Two-party
//! transfers always go through [`transfer`] or [`split_transfer`], which
//! never move more than the source holds and never credit more than the
//! receivers can store.

use crate::config::{MetabolismConfig, NeuralConfig};
use crate::neural::NeuralLogic;
use bugsim_data::{Agent, EnvironmentEffects, Genome, NeuralEncoding, TerrainSample, Vec2};

/// Speed factor from current energy, in `[min_speed_fraction, 1]`.
#[must_use]
pub fn energy_multiplier(energy: f64, config: &MetabolismConfig) -> f64 {
    if config.full_speed_energy <= 0.0 {
        return 1.0;
    }
    (energy / config.full_speed_energy).clamp(config.min_speed_fraction, 1.0)
}

/// Distance an agent may cover this tick.
#[must_use]
pub fn current_speed(
    genome: &Genome,
    energy: f64,
    terrain: &TerrainSample,
    effects: &EnvironmentEffects,
    config: &MetabolismConfig,
) -> f64 {
    let speed = f64::from(genome.speed)
        * energy_multiplier(energy, config)
        * config.speed_scale
        * terrain.speed
        * effects.speed;
    if speed.is_finite() {
        speed.max(0.0)
    } else {
        0.0
    }
}

/// Per-tick upkeep of the body, including direct climate damage.
#[must_use]
pub fn metabolic_loss(
    genome: &Genome,
    terrain: &TerrainSample,
    effects: &EnvironmentEffects,
    config: &MetabolismConfig,
) -> f64 {
    let efficiency = f64::from(genome.energy_efficiency).max(f64::EPSILON);
    let body = config.base_metabolic_cost
        * f64::from(genome.species.metabolic_rate)
        * f64::from(genome.size)
        / efficiency
        * cost_factor(terrain.energy_cost)
        * cost_factor(effects.energy_drain);
    (cost_factor(body) + cost_factor(effects.damage)).min(f64::MAX)
}

/// Negative costs count as zero; NaN and overflow count as the largest cost.
fn cost_factor(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        f64::MAX
    } else {
        value.max(0.0)
    }
}

#[must_use]
pub fn movement_cost(velocity: Vec2, config: &MetabolismConfig) -> f64 {
    config.move_cost * velocity.length()
}

#[must_use]
pub fn neural_cost(brain: &NeuralEncoding, config: &NeuralConfig) -> f64 {
    brain.energetic_cost(config)
}

/// Amount that actually moves when `proposed` is requested from a source
/// holding `available`.
#[must_use]
pub fn transfer(proposed: f64, available: f64) -> f64 {
    if !proposed.is_finite() || !available.is_finite() {
        return 0.0;
    }
    proposed.min(available).max(0.0)
}

/// Splits `total` equally across receivers, each share capped by that
/// receiver's headroom. The shares sum to what the source must give up.
#[must_use]
pub fn split_transfer(total: f64, headrooms: &[f64]) -> Vec<f64> {
    if headrooms.is_empty() || total <= 0.0 || !total.is_finite() {
        return vec![0.0; headrooms.len()];
    }
    let share = total / headrooms.len() as f64;
    headrooms.iter().map(|&h| share.min(h.max(0.0))).collect()
}

/// Room left before `max_energy`.
#[must_use]
pub fn headroom(agent: &Agent) -> f64 {
    (agent.physiology.max_energy - agent.physiology.energy).max(0.0)
}

/// Clamps energy into `[0, max_energy]`, mapping non-finite values to 0.
pub fn clamp_energy(agent: &mut Agent) {
    let e = agent.physiology.energy;
    agent.physiology.energy = if e.is_finite() {
        e.clamp(0.0, agent.physiology.max_energy)
    } else {
        0.0
    };
}

/// Subtracts `amount`, never going below zero.
pub fn spend(agent: &mut Agent, amount: f64) {
    if amount.is_finite() && amount > 0.0 {
        agent.physiology.energy = (agent.physiology.energy - amount).max(0.0);
    }
}
