//! Core orchestration: independent workers, timing and result analysis.
//!
//! Workers never share data. Each one generates its own inputs from its own
//! seed and evaluates them to completion; the only synchronization is the
//! join at the end of the parallel section.

use std::sync::Arc;
use std::time::Instant;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, warn};

use bitchain_core::matrix_ops::{approx_eq, max_abs_diff};
use bitchain_core::{ChainError, ChainEvaluator, ChainInputs, ChainObserver, Matrix, Options};

use crate::interfaces::{EvaluationResult, WorkerReport};

/// Run every evaluator on the same inputs, timing each call.
pub fn execute_evaluations(
    evaluators: &[Arc<dyn ChainEvaluator>],
    inputs: &ChainInputs,
    observer: &dyn ChainObserver,
) -> Vec<EvaluationResult> {
    evaluators
        .iter()
        .map(|eval| {
            let start = Instant::now();
            let outcome = eval.evaluate(observer, inputs.worker, &inputs.bits, &inputs.pool);
            let duration = start.elapsed();

            if let Err(e) = &outcome {
                warn!(algorithm = eval.name(), worker = inputs.worker, error = %e, "Evaluation failed");
            } else {
                debug!(
                    algorithm = eval.name(),
                    worker = inputs.worker,
                    elapsed = ?duration,
                    "Evaluation finished"
                );
            }

            EvaluationResult {
                worker: inputs.worker,
                algorithm: eval.name().to_string(),
                outcome,
                duration,
            }
        })
        .collect()
}

fn run_worker(
    evaluators: &[Arc<dyn ChainEvaluator>],
    worker: usize,
    len: usize,
    opts: &Options,
    observer: &dyn ChainObserver,
) -> Result<WorkerReport, ChainError> {
    let inputs = ChainInputs::generate(worker, len, opts)?;
    observer.on_inputs(&inputs);
    let results = execute_evaluations(evaluators, &inputs, observer);
    Ok(WorkerReport {
        worker,
        seed: inputs.seed,
        len,
        results,
    })
}

/// Run `workers` independent workers, each on its own generated inputs.
///
/// Input generation failures are fatal; evaluation failures are reported
/// per result. Reports come back ordered by worker index.
pub fn execute_workers(
    evaluators: &[Arc<dyn ChainEvaluator>],
    len: usize,
    opts: &Options,
    workers: usize,
    observer: &dyn ChainObserver,
) -> Result<Vec<WorkerReport>, ChainError> {
    if workers == 0 {
        return Err(ChainError::Config("at least one worker is required".into()));
    }

    if workers == 1 {
        // Single worker: run directly
        return Ok(vec![run_worker(evaluators, 0, len, opts, observer)?]);
    }

    // Multiple workers: run in parallel using rayon
    (0..workers)
        .into_par_iter()
        .map(|worker| run_worker(evaluators, worker, len, opts, observer))
        .collect()
}

/// Check that all successful results agree within `tolerance`.
///
/// When nothing succeeded, the first error is returned.
pub fn analyze_comparison_results(
    results: &[EvaluationResult],
    tolerance: f64,
) -> Result<(), ChainError> {
    let products: Vec<(&EvaluationResult, &Matrix)> = results
        .iter()
        .filter_map(|r| r.product().map(|p| (r, p)))
        .collect();

    let Some(((first, reference), rest)) = products.split_first() else {
        return Err(results
            .iter()
            .find_map(|r| r.outcome.as_ref().err().cloned())
            .unwrap_or_else(|| ChainError::InvalidInput("no results to compare".into())));
    };

    for &(result, product) in rest {
        if !approx_eq(reference, product, tolerance)? {
            let max_diff = max_abs_diff(reference, product)?;
            warn!(
                reference = %first.algorithm,
                other = %result.algorithm,
                worker = result.worker,
                max_diff,
                "Evaluators disagree"
            );
            return Err(ChainError::Mismatch { max_diff });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use bitchain_core::observers::NoOpObserver;
    use bitchain_core::registry::DefaultFactory;
    use bitchain_core::{ProgressUpdate, DEFAULT_TOLERANCE};

    use crate::evaluator_selection::get_evaluators_to_run;

    fn small_opts() -> Options {
        Options {
            dimension: 4,
            bound: 2,
            ..Options::default()
        }
    }

    fn result(algorithm: &str, outcome: Result<Matrix, ChainError>) -> EvaluationResult {
        EvaluationResult {
            worker: 0,
            algorithm: algorithm.into(),
            outcome,
            duration: Duration::from_millis(1),
        }
    }

    fn m2(a: f64) -> Matrix {
        Matrix::from_rows(&[[a, 0.0], [0.0, a]]).unwrap()
    }

    #[test]
    fn execute_single_worker() {
        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("tree", &factory).unwrap();
        let reports = execute_workers(&evals, 8, &small_opts(), 1, &NoOpObserver::new()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].worker, 0);
        assert_eq!(reports[0].seed, 42);
        assert_eq!(reports[0].results.len(), 1);
        assert_eq!(reports[0].results[0].product().unwrap().dim(), 4);
    }

    #[test]
    fn execute_multiple_workers_in_order() {
        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("all", &factory).unwrap();
        let reports = execute_workers(&evals, 10, &small_opts(), 4, &NoOpObserver::new()).unwrap();
        assert_eq!(reports.len(), 4);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.worker, i);
            assert_eq!(report.results.len(), 2);
            assert!(report.results.iter().all(|r| r.worker == i));
            analyze_comparison_results(&report.results, DEFAULT_TOLERANCE).unwrap();
        }
        // Different seeds produce different products.
        assert_ne!(
            reports[0].results[0].product(),
            reports[1].results[0].product()
        );
    }

    #[test]
    fn workers_are_reproducible() {
        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("sequential", &factory).unwrap();
        let a = execute_workers(&evals, 6, &small_opts(), 2, &NoOpObserver::new()).unwrap();
        let b = execute_workers(&evals, 6, &small_opts(), 2, &NoOpObserver::new()).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.results[0].product(), y.results[0].product());
        }
    }

    #[test]
    fn zero_workers_rejected() {
        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("tree", &factory).unwrap();
        assert!(matches!(
            execute_workers(&evals, 4, &small_opts(), 0, &NoOpObserver::new()),
            Err(ChainError::Config(_))
        ));
    }

    #[test]
    fn generation_failure_propagates() {
        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("tree", &factory).unwrap();
        assert!(matches!(
            execute_workers(&evals, 0, &small_opts(), 2, &NoOpObserver::new()),
            Err(ChainError::InvalidInput(_))
        ));
    }

    #[test]
    fn observer_sees_every_worker() {
        struct Completions(AtomicUsize);
        impl ChainObserver for Completions {
            fn on_progress(&self, update: &ProgressUpdate) {
                if update.done {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("all", &factory).unwrap();
        let observer = Completions(AtomicUsize::new(0));
        execute_workers(&evals, 5, &small_opts(), 3, &observer).unwrap();
        assert_eq!(observer.0.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn observer_receives_generated_inputs() {
        struct Inputs(AtomicUsize);
        impl ChainObserver for Inputs {
            fn on_progress(&self, _update: &ProgressUpdate) {}
            fn on_inputs(&self, inputs: &ChainInputs) {
                assert_eq!(inputs.bits.len(), 7);
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let factory = DefaultFactory::new();
        let evals = get_evaluators_to_run("tree", &factory).unwrap();
        let observer = Inputs(AtomicUsize::new(0));
        execute_workers(&evals, 7, &small_opts(), 3, &observer).unwrap();
        assert_eq!(observer.0.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn analyze_matching_results() {
        let results = vec![result("A", Ok(m2(4.0))), result("B", Ok(m2(4.0)))];
        assert!(analyze_comparison_results(&results, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn analyze_within_tolerance() {
        let results = vec![
            result("A", Ok(m2(1e6))),
            result("B", Ok(m2(1e6 + 1e-5))),
        ];
        assert!(analyze_comparison_results(&results, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn analyze_mismatching_results() {
        let results = vec![result("A", Ok(m2(4.0))), result("B", Ok(m2(5.0)))];
        match analyze_comparison_results(&results, DEFAULT_TOLERANCE) {
            Err(ChainError::Mismatch { max_diff }) => {
                assert!((max_diff - 1.0).abs() < f64::EPSILON);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn analyze_no_valid_results_returns_first_error() {
        let results = vec![result("A", Err(ChainError::OutOfMemory { bytes: 64 }))];
        assert_eq!(
            analyze_comparison_results(&results, DEFAULT_TOLERANCE),
            Err(ChainError::OutOfMemory { bytes: 64 })
        );
    }

    #[test]
    fn analyze_empty_results() {
        assert!(matches!(
            analyze_comparison_results(&[], DEFAULT_TOLERANCE),
            Err(ChainError::InvalidInput(_))
        ));
    }

    #[test]
    fn analyze_mixed_valid_and_error_results() {
        let results = vec![
            result("A", Ok(m2(4.0))),
            result("B", Err(ChainError::OutOfMemory { bytes: 64 })),
        ];
        assert!(analyze_comparison_results(&results, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn analyze_compares_against_first_success() {
        let results = vec![
            result("A", Err(ChainError::OutOfMemory { bytes: 64 })),
            result("B", Ok(m2(4.0))),
            result("C", Ok(m2(5.0))),
        ];
        assert!(matches!(
            analyze_comparison_results(&results, DEFAULT_TOLERANCE),
            Err(ChainError::Mismatch { .. })
        ));
    }

    #[test]
    fn analyze_third_result_mismatches() {
        let results = vec![
            result("A", Ok(m2(4.0))),
            result("B", Ok(m2(4.0))),
            result("C", Ok(m2(-4.0))),
        ];
        assert!(matches!(
            analyze_comparison_results(&results, DEFAULT_TOLERANCE),
            Err(ChainError::Mismatch { .. })
        ));
    }
}
