//! # bitchain-orchestration
//!
//! Independent worker execution, evaluator selection, and result comparison.

pub mod evaluator_selection;
pub mod interfaces;
pub mod orchestrator;

pub use interfaces::{EvaluationResult, ResultPresenter};
pub use orchestrator::{analyze_comparison_results, execute_evaluations, execute_workers};
