//! Run counters and tick timing.
//!
//! Counters are keyed by event name ("births", "hunts", ...) and are safe to
//! bump from any thread. Every `report_every` ticks a summary line is logged.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_REPORT_EVERY: u64 = 1000;

pub struct Metrics {
    ticks: AtomicU64,
    agents: AtomicU64,
    broadcasts: AtomicU64,
    busy_nanos: AtomicU64,
    slowest_nanos: AtomicU64,
    counters: Mutex<HashMap<String, AtomicU64>>,
    report_every: u64,
    started: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::with_report_interval(DEFAULT_REPORT_EVERY)
    }

    /// Logs a summary every `ticks` ticks; zero disables the summary.
    #[must_use]
    pub fn with_report_interval(ticks: u64) -> Self {
        Self {
            ticks: AtomicU64::new(0),
            agents: AtomicU64::new(0),
            broadcasts: AtomicU64::new(0),
            busy_nanos: AtomicU64::new(0),
            slowest_nanos: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            report_every: ticks,
            started: Instant::now(),
        }
    }

    /// Records a finished tick: its wall time and the population and
    /// broadcast sizes it ended with.
    pub fn record_tick(&self, duration: Duration, agents: usize, broadcasts: usize) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        self.agents.store(agents as u64, Ordering::Relaxed);
        self.broadcasts.store(broadcasts as u64, Ordering::Relaxed);
        self.busy_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.slowest_nanos.fetch_max(nanos, Ordering::Relaxed);

        if self.report_every > 0 && tick % self.report_every == 0 {
            tracing::info!(
                tick = tick,
                agents = agents,
                broadcasts = broadcasts,
                births = self.counter("births"),
                deaths = self.counter("deaths"),
                hunts = self.counter("hunts"),
                mean_tick_us = self.mean_tick().as_micros() as u64,
                slowest_tick_us = self.slowest_tick().as_micros() as u64,
                "Simulation progress"
            );
        }
    }

    pub fn increment_counter(&self, name: &str) {
        self.add_to_counter(name, 1);
    }

    pub fn add_to_counter(&self, name: &str, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Current value of a named counter, zero when never bumped.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// All counters, sorted by name.
    #[must_use]
    pub fn counters(&self) -> BTreeMap<String, u64> {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn agent_count(&self) -> u64 {
        self.agents.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn broadcast_count(&self) -> u64 {
        self.broadcasts.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn mean_tick(&self) -> Duration {
        let ticks = self.tick_count();
        if ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.busy_nanos.load(Ordering::Relaxed) / ticks)
    }

    #[must_use]
    pub fn slowest_tick(&self) -> Duration {
        Duration::from_nanos(self.slowest_nanos.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Installs a global fmt subscriber. `RUST_LOG` overrides the default
/// `info` level. Later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tick_tracks_timing() {
        let metrics = Metrics::with_report_interval(0);
        assert_eq!(metrics.mean_tick(), Duration::ZERO);
        metrics.record_tick(Duration::from_millis(10), 100, 5);
        metrics.record_tick(Duration::from_millis(30), 90, 2);
        assert_eq!(metrics.tick_count(), 2);
        assert_eq!(metrics.agent_count(), 90);
        assert_eq!(metrics.broadcast_count(), 2);
        assert_eq!(metrics.mean_tick(), Duration::from_millis(20));
        assert_eq!(metrics.slowest_tick(), Duration::from_millis(30));
    }

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.increment_counter("births");
        metrics.add_to_counter("births", 2);
        metrics.add_to_counter("hunts", 0);
        assert_eq!(metrics.counter("births"), 3);
        assert_eq!(metrics.counter("missing"), 0);
        let all = metrics.counters();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get("births"), Some(&3));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
