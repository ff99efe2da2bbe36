//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use bitchain_cli::output::write_to_file;
use bitchain_cli::presenter::CLIResultPresenter;
use bitchain_cli::DebugLog;
use bitchain_core::constants::exit_codes;
use bitchain_core::memory_budget::{parse_memory_limit, MemoryEstimate};
use bitchain_core::observers::LoggingObserver;
use bitchain_core::registry::DefaultFactory;
use bitchain_core::{ChainError, Options, ProgressSubject, RangePolicy};
use bitchain_orchestration::evaluator_selection::get_evaluators_to_run;
use bitchain_orchestration::interfaces::{ResultPresenter, WorkerReport};
use bitchain_orchestration::orchestrator::{analyze_comparison_results, execute_workers};

use crate::config::AppConfig;
use crate::errors::handle_error;

/// Minimum interval between progress log lines.
const LOG_INTERVAL_MS: u64 = 100;

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        bitchain_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    match run_cli(config, &presenter)? {
        Ok(()) => Ok(exit_codes::SUCCESS),
        Err(e) => {
            presenter.present_error(&e.to_string());
            Ok(handle_error(&e))
        }
    }
}

fn build_options(config: &AppConfig) -> Result<Options, ChainError> {
    let range_policy: RangePolicy = config.range_policy.parse()?;
    let memory_limit = parse_memory_limit(&config.memory_limit).map_err(ChainError::Config)?;
    Ok(Options {
        dimension: config.dimension,
        bound: config.bound,
        range_policy,
        seed: config.seed,
        tolerance: config.tolerance,
        memory_limit,
    }
    .normalize())
}

/// The outer `Result` carries I/O failures, the inner one evaluation errors.
fn run_cli(
    config: &AppConfig,
    presenter: &CLIResultPresenter,
) -> Result<Result<(), ChainError>> {
    let len = match config.n {
        Some(len) if len > 0 => len,
        _ => {
            return Ok(Err(ChainError::InvalidInput(
                "bitstring length must be at least 1".into(),
            )))
        }
    };
    let opts = match build_options(config) {
        Ok(opts) => opts,
        Err(e) => return Ok(Err(e)),
    };

    let factory = DefaultFactory::new();
    let evaluators = match get_evaluators_to_run(&config.algo, &factory) {
        Ok(evaluators) => evaluators,
        Err(e) => return Ok(Err(e)),
    };

    // Memory budget check: a worker runs its evaluators one after another.
    let estimate = evaluators
        .iter()
        .map(|e| MemoryEstimate::for_evaluator(opts.dimension, len, e.as_ref()))
        .max_by_key(|e| e.total_bytes)
        .map(|e| e.scaled(config.workers));
    if let Some(estimate) = estimate {
        if !estimate.fits_in(opts.memory_limit()) {
            return Ok(Err(ChainError::Config(format!(
                "estimated memory ({} bytes) exceeds limit ({} bytes)",
                estimate.total_bytes, opts.memory_limit
            ))));
        }
    }

    let subject = ProgressSubject::new();
    subject.register(Arc::new(LoggingObserver::new(LOG_INTERVAL_MS)));
    let debug_log = match &config.debug_log {
        Some(path) => {
            let log = Arc::new(
                DebugLog::open(path).with_context(|| format!("cannot open debug log {path}"))?,
            );
            subject.register(log.clone());
            Some(log)
        }
        None => None,
    };

    info!(
        len,
        dimension = opts.dimension,
        workers = config.workers,
        algo = %config.algo,
        "Starting evaluation"
    );
    let reports = execute_workers(&evaluators, len, &opts, config.workers, &subject);

    if let Some(log) = &debug_log {
        subject.clear();
        log.close()
            .with_context(|| format!("cannot write debug log {}", log.path().display()))?;
    }

    let reports = match reports {
        Ok(reports) => reports,
        Err(e) => return Ok(Err(e)),
    };

    if let Err(e) = check_reports(&reports, opts.tolerance) {
        present_reports(presenter, &reports);
        return Ok(Err(e));
    }
    present_reports(presenter, &reports);

    // Worker 0 persists its product.
    let written = reports
        .first()
        .and_then(|r| r.results.iter().find(|res| res.product().is_some()));
    if let Some(result) = written {
        if let Some(product) = result.product() {
            write_to_file(&config.output, product)
                .with_context(|| format!("cannot write output file {}", config.output))?;
            presenter.present_output_written(&config.output, result.duration);
        }
    }

    Ok(Ok(()))
}

/// First evaluation error, then agreement between evaluators per worker.
fn check_reports(reports: &[WorkerReport], tolerance: f64) -> Result<(), ChainError> {
    for report in reports {
        if let Some(e) = report
            .results
            .iter()
            .find_map(|r| r.outcome.as_ref().err())
        {
            return Err(e.clone());
        }
    }
    for report in reports {
        if report.results.len() > 1 {
            analyze_comparison_results(&report.results, tolerance)?;
        }
    }
    Ok(())
}

fn present_reports(presenter: &CLIResultPresenter, reports: &[WorkerReport]) {
    for result in reports.iter().flat_map(|r| &r.results) {
        presenter.present_result(result);
    }

    let all: Vec<_> = reports.iter().flat_map(|r| r.results.iter().cloned()).collect();
    if all.len() > 1 {
        presenter.present_comparison(&all);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("bitchain").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn run_writes_product() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("product.txt");
        let out_str = out.to_str().unwrap();
        let code = run(&config(&["6", "-m", "3", "-q", "-o", out_str])).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn run_all_evaluators_agree() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("product.txt");
        let out_str = out.to_str().unwrap();
        let code = run(&config(&[
            "12", "-m", "4", "--bound", "2", "--algo", "all", "-w", "2", "-q", "-o", out_str,
        ]))
        .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
    }

    #[test]
    fn run_rejects_zero_length() {
        assert_eq!(
            run(&config(&["0", "-q"])).unwrap(),
            exit_codes::ERROR_GENERIC
        );
    }

    #[test]
    fn run_rejects_unknown_algo() {
        assert_eq!(
            run(&config(&["4", "--algo", "strassen", "-q"])).unwrap(),
            exit_codes::ERROR_CONFIG
        );
    }

    #[test]
    fn run_rejects_unknown_range_policy() {
        assert_eq!(
            run(&config(&["4", "--range-policy", "gaussian", "-q"])).unwrap(),
            exit_codes::ERROR_CONFIG
        );
    }

    #[test]
    fn run_rejects_zero_dimension() {
        assert_eq!(
            run(&config(&["4", "-m", "0", "-q"])).unwrap(),
            exit_codes::ERROR_GENERIC
        );
    }

    #[test]
    fn run_enforces_memory_limit() {
        assert_eq!(
            run(&config(&["4", "-m", "512", "--memory-limit", "1K", "-q"])).unwrap(),
            exit_codes::ERROR_CONFIG
        );
    }

    #[test]
    fn run_writes_debug_log() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("product.txt");
        let log = dir.path().join("debug.log");
        let code = run(&config(&[
            "3",
            "-m",
            "2",
            "-q",
            "-o",
            out.to_str().unwrap(),
            "--debug-log",
            log.to_str().unwrap(),
        ]))
        .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        let text = std::fs::read_to_string(&log).unwrap();
        assert_eq!(text.matches("Generated matrix:").count(), 2);
        assert!(text.contains("Generated bitstring: "));
    }
}
