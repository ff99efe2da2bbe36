//! Progress tracking types shared by the evaluators.

use crate::observer::{ChainObserver, FrozenObserver};

/// Progress update sent from evaluators to observers.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Worker (rank) that produced this update.
    pub worker: usize,
    /// Name of the evaluator producing this update.
    pub algorithm: &'static str,
    /// Current progress as a fraction in [0.0, 1.0].
    pub progress: f64,
    /// Multiplications completed so far.
    pub current_step: u64,
    /// Total multiplications for the chain.
    pub total_steps: u64,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    pub fn new(
        worker: usize,
        algorithm: &'static str,
        progress: f64,
        current: u64,
        total: u64,
    ) -> Self {
        Self {
            worker,
            algorithm,
            progress,
            current_step: current,
            total_steps: total,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(worker: usize, algorithm: &'static str) -> Self {
        Self {
            worker,
            algorithm,
            progress: 1.0,
            current_step: 0,
            total_steps: 0,
            done: true,
        }
    }
}

/// Number of matrix multiplications needed for a chain of `len` factors.
///
/// Both evaluators perform exactly this many; they differ only in order.
#[must_use]
pub fn chain_steps(len: usize) -> u64 {
    u64::try_from(len.saturating_sub(1)).unwrap_or(u64::MAX)
}

/// Counts multiplications and forwards throttled updates to an observer.
pub struct StepReporter<'a> {
    observer: &'a dyn ChainObserver,
    frozen: FrozenObserver,
    worker: usize,
    algorithm: &'static str,
    completed: u64,
    total: u64,
}

impl<'a> StepReporter<'a> {
    #[must_use]
    pub fn new(
        observer: &'a dyn ChainObserver,
        worker: usize,
        algorithm: &'static str,
        total: u64,
    ) -> Self {
        Self {
            frozen: observer.freeze(),
            observer,
            worker,
            algorithm,
            completed: 0,
            total,
        }
    }

    /// Record one finished multiplication.
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&mut self) {
        self.completed += 1;
        let progress = if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        };
        if self.frozen.should_report(progress) {
            self.frozen.update(progress);
            self.observer.on_progress(&ProgressUpdate::new(
                self.worker,
                self.algorithm,
                progress,
                self.completed,
                self.total,
            ));
        }
    }

    /// Multiplications recorded so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Emit the completion update.
    pub fn finish(self) {
        self.observer.on_progress(&ProgressUpdate {
            current_step: self.completed,
            total_steps: self.total,
            ..ProgressUpdate::done(self.worker, self.algorithm)
        });
    }
}
