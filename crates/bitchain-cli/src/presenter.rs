//! CLI result presenter.

use std::time::Duration;

use bitchain_orchestration::interfaces::{EvaluationResult, ResultPresenter};

use crate::output::{format_duration, format_matrix, format_seconds};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Report the persisted product and the evaluation time.
    pub fn present_output_written(&self, path: &str, duration: Duration) {
        if self.quiet {
            return;
        }
        println!("Output written to {path}");
        println!("Execution time: {} seconds", format_seconds(duration));
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_result(&self, result: &EvaluationResult) {
        if self.quiet || !self.verbose {
            return;
        }

        println!("Algorithm: {}", result.algorithm);
        println!("Worker: {}", result.worker);
        println!("Duration: {}", format_duration(result.duration));
        match &result.outcome {
            Ok(product) => {
                println!("Dimension: {0}x{0}", product.dim());
                print!("{}", format_matrix(product));
            }
            Err(e) => println!("Error: {e}"),
        }
    }

    fn present_comparison(&self, results: &[EvaluationResult]) {
        if self.quiet {
            return;
        }

        println!("\nComparison Results:");
        println!("{:-<60}", "");
        for result in results {
            let status = if result.outcome.is_err() {
                "ERROR"
            } else {
                "OK"
            };
            println!(
                "  {:<16} worker {:<4} {:>10} [{}]",
                result.algorithm,
                result.worker,
                format_duration(result.duration),
                status,
            );
        }
    }

    fn present_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }
}
