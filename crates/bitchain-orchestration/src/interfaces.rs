//! Orchestration interfaces.

use std::time::Duration;

use bitchain_core::{ChainError, Matrix};

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present one evaluation result.
    fn present_result(&self, result: &EvaluationResult);

    /// Present a comparison of several evaluators on the same inputs.
    fn present_comparison(&self, results: &[EvaluationResult]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Result of a single chain evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    /// Worker (rank) that ran the evaluation.
    pub worker: usize,
    /// Evaluator name.
    pub algorithm: String,
    /// The product or a structured error.
    pub outcome: Result<Matrix, ChainError>,
    /// Wall-clock time of the `evaluate` call.
    pub duration: Duration,
}

impl EvaluationResult {
    /// The product, if the evaluation succeeded.
    #[must_use]
    pub fn product(&self) -> Option<&Matrix> {
        self.outcome.as_ref().ok()
    }
}

/// Everything one worker produced.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Worker index.
    pub worker: usize,
    /// Seed the worker's inputs were generated from.
    pub seed: u64,
    /// Chain length.
    pub len: usize,
    /// One result per evaluator, in selection order.
    pub results: Vec<EvaluationResult>,
}
