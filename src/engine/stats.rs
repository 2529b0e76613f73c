// Tick telemetry — totals and rates for the main and worker tracking loops.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::tracker::traits::TickFn;

struct RateSample {
    at: Instant,
    ticks: u64,
}

/// A labeled tick counter with a rate estimate between snapshots.
pub struct TickCounter {
    label: &'static str,
    total: AtomicU64,
    last_sample: Mutex<RateSample>,
}

impl TickCounter {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            total: AtomicU64::new(0),
            last_sample: Mutex::new(RateSample {
                at: Instant::now(),
                ticks: 0,
            }),
        }
    }

    pub fn tick(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Ticks per second since the previous `rate` call. Returns 0 until
    /// enough wall time has passed for a meaningful estimate.
    pub fn rate(&self) -> f64 {
        let now = Instant::now();
        let current = self.total();

        let mut sample = self.last_sample.lock();
        let elapsed = now.duration_since(sample.at).as_secs_f64();

        let rate = if elapsed > 0.1 {
            (current - sample.ticks) as f64 / elapsed
        } else {
            0.0
        };

        sample.at = now;
        sample.ticks = current;
        rate
    }
}

/// Point-in-time view of both counters.
#[derive(Debug, Clone)]
pub struct PerfSnapshot {
    pub main_ticks: u64,
    pub worker_ticks: u64,
    pub main_rate: f64,
    pub worker_rate: f64,
}

/// Two independent performance counters, one for the frame-loop ("main")
/// side and one for the background tracking ("worker") side. Created only
/// when the host requested overlays.
pub struct PerfMonitor {
    main: Arc<TickCounter>,
    worker: Arc<TickCounter>,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self {
            main: Arc::new(TickCounter::new("main")),
            worker: Arc::new(TickCounter::new("worker")),
        }
    }

    /// Callback that bumps the "main" counter; handed to trackers.
    pub fn main_tick_fn(&self) -> TickFn {
        let counter = Arc::clone(&self.main);
        Arc::new(move || counter.tick())
    }

    /// Callback that bumps the "worker" counter; handed to trackers.
    pub fn worker_tick_fn(&self) -> TickFn {
        let counter = Arc::clone(&self.worker);
        Arc::new(move || counter.tick())
    }

    pub fn snapshot(&self) -> PerfSnapshot {
        PerfSnapshot {
            main_ticks: self.main.total(),
            worker_ticks: self.worker.total(),
            main_rate: self.main.rate(),
            worker_rate: self.worker.rate(),
        }
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_totals() {
        let counter = TickCounter::new("main");
        assert_eq!(counter.label(), "main");
        assert_eq!(counter.total(), 0);

        counter.tick();
        counter.tick();
        counter.tick();
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_monitor_tick_fns_are_independent() {
        let monitor = PerfMonitor::new();
        let main = monitor.main_tick_fn();
        let worker = monitor.worker_tick_fn();

        main();
        main();
        worker();

        let snap = monitor.snapshot();
        assert_eq!(snap.main_ticks, 2);
        assert_eq!(snap.worker_ticks, 1);
        assert!(snap.main_rate >= 0.0);
        assert!(snap.worker_rate >= 0.0);
    }
}
