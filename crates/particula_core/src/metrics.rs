//! Tick timing, command counters and logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Ticks between two `info!` progress lines.
pub const LOG_INTERVAL: u64 = 1000;

/// Counters for one simulation. Atomic so a monitoring thread can read them
/// through a shared reference.
pub struct Metrics {
    tick_count: AtomicU64,
    particle_count: AtomicU64,
    last_tick_nanos: AtomicU64,
    total_tick_nanos: AtomicU64,
    applied_commands: AtomicU64,
    rejected_commands: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            particle_count: AtomicU64::new(0),
            last_tick_nanos: AtomicU64::new(0),
            total_tick_nanos: AtomicU64::new(0),
            applied_commands: AtomicU64::new(0),
            rejected_commands: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, particles: usize) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.particle_count.store(particles as u64, Ordering::Relaxed);
        self.last_tick_nanos.store(nanos, Ordering::Relaxed);
        self.total_tick_nanos.fetch_add(nanos, Ordering::Relaxed);

        if tick.is_multiple_of(LOG_INTERVAL) {
            tracing::info!(
                tick = tick,
                particles = particles,
                duration_us = duration.as_micros() as u64,
                avg_us = self.average_tick().as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_command(&self, name: &str) {
        self.applied_commands.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(command = name, "Command applied");
    }

    pub fn record_rejected(&self, name: &str, reason: &str) {
        self.rejected_commands.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(command = name, reason = reason, "Command rejected");
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn particle_count(&self) -> u64 {
        self.particle_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn applied_commands(&self) -> u64 {
        self.applied_commands.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rejected_commands(&self) -> u64 {
        self.rejected_commands.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_tick(&self) -> Duration {
        Duration::from_nanos(self.last_tick_nanos.load(Ordering::Relaxed))
    }

    /// Mean duration of the recorded ticks.
    #[must_use]
    pub fn average_tick(&self) -> Duration {
        match self.tick_count() {
            0 => Duration::ZERO,
            n => Duration::from_nanos(self.total_tick_nanos.load(Ordering::Relaxed) / n),
        }
    }

    /// Gets elapsed wall time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`
/// (default `info`). Later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.average_tick(), Duration::ZERO);
    }

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(4), 100);
        metrics.record_tick(Duration::from_millis(2), 100);
        assert_eq!(metrics.tick_count(), 2);
        assert_eq!(metrics.particle_count(), 100);
        assert_eq!(metrics.last_tick(), Duration::from_millis(2));
        assert_eq!(metrics.average_tick(), Duration::from_millis(3));
    }

    #[test]
    fn test_command_counters() {
        let metrics = Metrics::new();
        metrics.record_command("zero_weights");
        metrics.record_rejected("set_nb_types", "out of range");
        metrics.record_rejected("set_nb_types", "out of range");
        assert_eq!(metrics.applied_commands(), 1);
        assert_eq!(metrics.rejected_commands(), 2);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
