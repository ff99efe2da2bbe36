//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::constants::PROGRESS_REPORT_THRESHOLD;
use crate::observer::{ChainObserver, FrozenObserver};
use crate::progress::ProgressUpdate;

/// Observer that logs progress updates through `tracing` with temporal throttling.
pub struct LoggingObserver {
    last_reported: AtomicU64,
    min_interval_ms: u64,
    last_time: AtomicU64,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_reported: AtomicU64::new(0),
            min_interval_ms,
            last_time: AtomicU64::new(0),
        }
    }
}

impl ChainObserver for LoggingObserver {
    #[allow(clippy::cast_possible_truncation)]
    fn on_progress(&self, update: &ProgressUpdate) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms && !update.done {
            return;
        }

        let last = f64::from_bits(self.last_reported.load(Ordering::Relaxed));
        if update.done || (update.progress - last) >= PROGRESS_REPORT_THRESHOLD {
            if update.done {
                info!(
                    algorithm = %update.algorithm,
                    worker = update.worker,
                    "Chain evaluation complete"
                );
            } else {
                debug!(
                    algorithm = %update.algorithm,
                    worker = update.worker,
                    progress = format!("{:.1}%", update.progress * 100.0),
                    step = update.current_step,
                    total = update.total_steps,
                    "Progress update"
                );
            }
            self.last_reported
                .store(update.progress.to_bits(), Ordering::Relaxed);
            self.last_time.store(now, Ordering::Relaxed);
        }
    }
}

/// Null object pattern — does nothing with progress updates.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer that discards all progress updates.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}

    fn freeze(&self) -> FrozenObserver {
        // Never report: nobody is listening.
        FrozenObserver::new(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_observer_never_reports() {
        let observer = NoOpObserver::new();
        observer.on_progress(&ProgressUpdate::new(0, "TreeReduction", 0.5, 1, 2));
        assert!(!observer.freeze().should_report(1.0));
    }

    #[test]
    fn logging_observer_accepts_updates() {
        let observer = LoggingObserver::new(0);
        observer.on_progress(&ProgressUpdate::new(0, "SequentialFold", 0.5, 1, 2));
        observer.on_progress(&ProgressUpdate::done(0, "SequentialFold"));
        let last = f64::from_bits(observer.last_reported.load(Ordering::Relaxed));
        assert!((last - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn logging_observer_freezes_at_report_threshold() {
        let frozen = LoggingObserver::new(0).freeze();
        assert!(!frozen.should_report(PROGRESS_REPORT_THRESHOLD / 2.0));
        assert!(frozen.should_report(PROGRESS_REPORT_THRESHOLD));
    }

    #[test]
    fn logging_observer_throttles_by_interval() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&ProgressUpdate::new(0, "SequentialFold", 0.5, 1, 2));
        // Second non-final update inside the interval is dropped.
        observer.on_progress(&ProgressUpdate::new(0, "SequentialFold", 0.9, 2, 2));
        let last = f64::from_bits(observer.last_reported.load(Ordering::Relaxed));
        assert!((last - 0.5).abs() < f64::EPSILON);
    }
}
