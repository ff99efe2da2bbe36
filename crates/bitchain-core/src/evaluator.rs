//! Evaluator traits and the `CheckedEvaluator` decorator.
//!
//! `ChainEvaluator` is the public trait consumed by orchestration.
//! `CoreEvaluator` is the internal trait implemented by the strategies.
//! `CheckedEvaluator` is a decorator that adds input validation, the
//! single-factor fast path (n == 1) and logging.

use std::sync::Arc;

use tracing::debug;

use crate::bitstring::Bitstring;
use crate::matrix::Matrix;
use crate::matrix_pool::MatrixPool;
use crate::observer::ChainObserver;
use crate::progress::ProgressUpdate;

/// Error type for chain evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// Malformed dimension, bitstring, range or bound.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An allocation could not be satisfied.
    #[error("out of memory: cannot allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Products from different evaluators disagree beyond tolerance.
    #[error("result mismatch between evaluators (max difference {max_diff:e})")]
    Mismatch { max_diff: f64 },
}

/// Public trait for chain evaluators, consumed by orchestration.
pub trait ChainEvaluator: Send + Sync {
    /// Compute the ordered product selected by `bits` from `pool`.
    fn evaluate(
        &self,
        observer: &dyn ChainObserver,
        worker: usize,
        bits: &Bitstring,
        pool: &MatrixPool,
    ) -> Result<Matrix, ChainError>;

    /// Get the name of this evaluator.
    fn name(&self) -> &str;

    /// Temporaries of size m×m alive at peak for a chain of `len` factors,
    /// not counting the returned product.
    fn peak_temporaries(&self, len: usize) -> usize;
}

/// Internal trait for strategy implementations.
/// Wrapped by `CheckedEvaluator` which adds validation and the fast path.
pub trait CoreEvaluator: Send + Sync {
    /// Evaluate a validated chain.
    fn evaluate_core(
        &self,
        observer: &dyn ChainObserver,
        worker: usize,
        bits: &Bitstring,
        pool: &MatrixPool,
    ) -> Result<Matrix, ChainError>;

    /// Get the name of this strategy.
    fn name(&self) -> &'static str;

    /// See [`ChainEvaluator::peak_temporaries`].
    fn peak_temporaries(&self, len: usize) -> usize;
}

/// Check that a chain is well formed before any allocation happens.
pub fn validate_chain(bits: &Bitstring, pool: &MatrixPool) -> Result<(), ChainError> {
    if bits.is_empty() {
        return Err(ChainError::InvalidInput(
            "chain must contain at least one factor".into(),
        ));
    }
    if pool.dim() == 0 {
        return Err(ChainError::InvalidInput(
            "matrix dimension must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Decorator that wraps a `CoreEvaluator` with validation and the fast path.
pub struct CheckedEvaluator {
    inner: Arc<dyn CoreEvaluator>,
}

impl CheckedEvaluator {
    /// Create a new `CheckedEvaluator` wrapping the given strategy.
    #[must_use]
    pub fn new(inner: Arc<dyn CoreEvaluator>) -> Self {
        Self { inner }
    }

    /// A single factor is its own product: copy it verbatim.
    fn evaluate_single(bits: &Bitstring, pool: &MatrixPool) -> Result<Matrix, ChainError> {
        pool.select(bits.as_slice()[0]).try_clone()
    }
}

impl ChainEvaluator for CheckedEvaluator {
    fn evaluate(
        &self,
        observer: &dyn ChainObserver,
        worker: usize,
        bits: &Bitstring,
        pool: &MatrixPool,
    ) -> Result<Matrix, ChainError> {
        validate_chain(bits, pool)?;
        debug!(
            algorithm = self.inner.name(),
            worker,
            len = bits.len(),
            dimension = pool.dim(),
            "Evaluating chain"
        );

        // Fast path for a single factor
        if bits.len() == 1 {
            let product = Self::evaluate_single(bits, pool)?;
            observer.on_progress(&ProgressUpdate::done(worker, self.inner.name()));
            return Ok(product);
        }

        self.inner.evaluate_core(observer, worker, bits, pool)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn peak_temporaries(&self, len: usize) -> usize {
        self.inner.peak_temporaries(len)
    }
}
