//! Lightweight timing for log parsing and cache lookups.
//!
//! Disabled unless turned on programmatically or through the `PV_TIMING`
//! environment variable.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("PV_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed seconds, or None when timing is off.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop the timer and add the elapsed time to `acc` if enabled.
    pub fn stop_into(self, acc: &AccumulatingTimer) {
        if let Some(elapsed) = self.stop() {
            acc.record(elapsed);
        }
    }
}

/// Accumulating timer for tracking total time across multiple calls.
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a timing measurement.
    pub fn record(&self, duration_s: f64) {
        let nanos = (duration_s * 1e9) as u64;
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Total time spent (in seconds).
    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Average time per call (in seconds).
    pub fn average_seconds(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            self.total_seconds() / count as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Process-wide counters for the log pipeline.
pub mod log_timing {
    use super::AccumulatingTimer;

    /// Full log parses (read + classify + accumulate)
    pub static PARSE: AccumulatingTimer = AccumulatingTimer::new();
    /// Cache lookups that returned a live entry
    pub static CACHE_HIT: AccumulatingTimer = AccumulatingTimer::new();
    /// Residual and force series queries
    pub static QUERY: AccumulatingTimer = AccumulatingTimer::new();

    /// Render a one-line-per-counter summary, or None when timing is off.
    pub fn summary() -> Option<String> {
        if !super::is_enabled() {
            return None;
        }
        let mut out = String::from("=== Log pipeline timing ===\n");
        for (label, timer) in [("parse", &PARSE), ("cache hit", &CACHE_HIT), ("query", &QUERY)] {
            if timer.count() > 0 {
                out.push_str(&format!(
                    "{:<10} {} calls, {:.3}s total, {:.4}ms avg\n",
                    label,
                    timer.count(),
                    timer.total_seconds(),
                    timer.average_seconds() * 1000.0
                ));
            }
        }
        Some(out)
    }
}
