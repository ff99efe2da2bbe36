//! # bitchain-core
//!
//! Core library for evaluating bitstring-indexed matrix chains
//! `P = M(x0) · M(x1) · ... · M(x_{n-1})`, where `M(b)` selects one of two
//! dense square matrices. Implements a sequential left fold and a balanced
//! binary-tree reduction over the same dense matrix primitives.

pub mod bitstring;
pub mod constants;
pub mod evaluator;
pub mod generator;
pub mod matrix;
pub mod matrix_ops;
pub mod matrix_pool;
pub mod memory_budget;
pub mod observer;
pub mod observers;
pub mod options;
pub mod progress;
pub mod registry;
pub mod sequential;
pub mod tree;

// Re-exports
pub use bitstring::Bitstring;
pub use constants::{
    exit_codes, DEFAULT_BOUND, DEFAULT_DIMENSION, DEFAULT_SEED, DEFAULT_TOLERANCE,
    PROGRESS_REPORT_THRESHOLD, WORKER_SEED_STRIDE,
};
pub use evaluator::{ChainError, ChainEvaluator, CheckedEvaluator, CoreEvaluator};
pub use generator::{ChainInputs, RangePolicy};
pub use matrix::Matrix;
pub use matrix_pool::MatrixPool;
pub use observer::{ChainObserver, ProgressSubject};
pub use options::Options;
pub use progress::ProgressUpdate;
pub use registry::{DefaultFactory, EvaluatorFactory};

/// Evaluate a chain with the tree reduction.
///
/// This is a convenience function for simple use cases. For progress
/// reporting or strategy selection, use the `ChainEvaluator` trait directly.
///
/// # Example
/// ```
/// use bitchain_core::{evaluate_chain, Bitstring, Matrix, MatrixPool};
///
/// let pool = MatrixPool::new(
///     Matrix::identity(2).unwrap(),
///     Matrix::from_rows(&[[2.0, 0.0], [0.0, 2.0]]).unwrap(),
/// )
/// .unwrap();
/// let bits: Bitstring = "11".parse().unwrap();
/// let product = evaluate_chain(&bits, &pool).unwrap();
/// assert_eq!(product.as_slice(), &[4.0, 0.0, 0.0, 4.0]);
/// ```
pub fn evaluate_chain(bits: &Bitstring, pool: &MatrixPool) -> Result<Matrix, ChainError> {
    use observers::NoOpObserver;
    use std::sync::Arc;
    use tree::TreeReduction;

    let eval = CheckedEvaluator::new(Arc::new(TreeReduction::new()));
    eval.evaluate(&NoOpObserver::new(), 0, bits, pool)
}
