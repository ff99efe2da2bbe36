//! Sequential left-fold evaluator.
//!
//! Accumulates the chain one factor at a time in index order:
//! `acc ← acc · F_i`. The accumulator is seeded with a verbatim copy of
//! `F_0`, never with the additive zero, so the product cannot collapse.

use crate::bitstring::Bitstring;
use crate::evaluator::{ChainError, CoreEvaluator};
use crate::matrix::Matrix;
use crate::matrix_ops::multiply_accumulate;
use crate::matrix_pool::MatrixPool;
use crate::observer::ChainObserver;
use crate::progress::{chain_steps, StepReporter};

/// Sequential left-fold evaluator.
pub struct SequentialFold;

impl SequentialFold {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fold the chain, double-buffering between the accumulator and a scratch matrix.
    fn execute_fold(
        &self,
        bits: &Bitstring,
        pool: &MatrixPool,
        reporter: &mut StepReporter<'_>,
    ) -> Result<Matrix, ChainError> {
        let factors = bits.as_slice();
        let mut acc = pool.select(factors[0]).try_clone()?;
        if factors.len() == 1 {
            return Ok(acc);
        }

        let mut scratch = Matrix::alloc(pool.dim())?;
        for &bit in &factors[1..] {
            // beta = 0: each step replaces the scratch contents
            multiply_accumulate(&mut scratch, &acc, pool.select(bit), 1.0, 0.0)?;
            std::mem::swap(&mut acc, &mut scratch);
            reporter.step();
        }
        Ok(acc)
    }
}

impl Default for SequentialFold {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreEvaluator for SequentialFold {
    fn evaluate_core(
        &self,
        observer: &dyn ChainObserver,
        worker: usize,
        bits: &Bitstring,
        pool: &MatrixPool,
    ) -> Result<Matrix, ChainError> {
        let mut reporter =
            StepReporter::new(observer, worker, self.name(), chain_steps(bits.len()));
        let product = self.execute_fold(bits, pool, &mut reporter)?;
        reporter.finish();
        Ok(product)
    }

    fn name(&self) -> &'static str {
        "SequentialFold"
    }

    fn peak_temporaries(&self, len: usize) -> usize {
        usize::from(len > 1)
    }
}
