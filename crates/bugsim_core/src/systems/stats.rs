use bugsim_data::{Agent, PopulationStats};

pub struct StatsContext<'a> {
    pub stats: &'a mut PopulationStats,
    pub agents: &'a [Agent],
    pub births: usize,
    pub deaths: usize,
    pub active_signals: usize,
}

/// Refreshes the per-tick aggregates. Totals accumulate across calls.
pub fn update_population_stats(ctx: StatsContext) {
    let stats = ctx.stats;
    stats.population = ctx.agents.len();
    stats.births = ctx.births;
    stats.deaths = ctx.deaths;
    stats.total_births += ctx.births as u64;
    stats.total_deaths += ctx.deaths as u64;
    stats.active_signals = ctx.active_signals;
    stats.species_counts.clear();
    stats.max_generation = ctx.agents.iter().map(|a| a.generation).max().unwrap_or(0);

    if ctx.agents.is_empty() {
        stats.mean_energy = 0.0;
        stats.mean_hidden_neurons = 0.0;
        return;
    }

    let mut energy = 0.0;
    let mut hidden = 0usize;
    for a in ctx.agents {
        energy += a.physiology.energy;
        hidden += a.brain.hidden_neurons();
        *stats.species_counts.entry(a.genome.species.kind).or_insert(0) += 1;
    }
    let n = ctx.agents.len() as f64;
    stats.mean_energy = energy / n;
    stats.mean_hidden_neurons = hidden as f64 / n;
}

/// Total energy held by the population.
#[must_use]
pub fn total_energy(agents: &[Agent]) -> f64 {
    agents.iter().map(|a| a.physiology.energy).sum()
}
