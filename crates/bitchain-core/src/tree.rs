//! Balanced binary-tree reduction evaluator.
//!
//! The inclusive index range is split at `mid = (start + end) / 2`; both
//! halves are reduced independently and combined as `left · right`. Every
//! frame owns its two sub-products and drops them once the combined product
//! exists, so at most O(log n) temporaries are alive at any time.
//!
//! Matrix multiplication is associative but not commutative: the tree
//! computes the same ordered product as the sequential fold, only the
//! rounding order of the floating-point accumulation differs.

use crate::bitstring::Bitstring;
use crate::evaluator::{validate_chain, ChainError, CoreEvaluator};
use crate::matrix::Matrix;
use crate::matrix_ops::multiply_accumulate;
use crate::matrix_pool::MatrixPool;
use crate::observer::ChainObserver;
use crate::observers::NoOpObserver;
use crate::progress::{chain_steps, StepReporter};

/// Binary-tree reduction evaluator.
pub struct TreeReduction;

impl TreeReduction {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Product of the factors selected by `bits[start..=end]`.
    pub fn evaluate_range(
        &self,
        bits: &Bitstring,
        pool: &MatrixPool,
        start: usize,
        end: usize,
    ) -> Result<Matrix, ChainError> {
        validate_chain(bits, pool)?;
        if start > end || end >= bits.len() {
            return Err(ChainError::InvalidInput(format!(
                "range [{start}, {end}] is not within a chain of length {}",
                bits.len()
            )));
        }
        let observer = NoOpObserver::new();
        let total = chain_steps(end - start + 1);
        let mut reporter = StepReporter::new(&observer, 0, self.name(), total);
        Self::reduce(bits.as_slice(), pool, start, end, &mut reporter)
    }

    fn reduce(
        bits: &[u8],
        pool: &MatrixPool,
        start: usize,
        end: usize,
        reporter: &mut StepReporter<'_>,
    ) -> Result<Matrix, ChainError> {
        if start == end {
            return pool.select(bits[start]).try_clone();
        }

        let mid = start + (end - start) / 2;
        let left = Self::reduce(bits, pool, start, mid, reporter)?;
        let right = Self::reduce(bits, pool, mid + 1, end, reporter)?;

        let mut product = Matrix::alloc(pool.dim())?;
        multiply_accumulate(&mut product, &left, &right, 1.0, 0.0)?;
        reporter.step();
        Ok(product)
    }
}

impl Default for TreeReduction {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreEvaluator for TreeReduction {
    fn evaluate_core(
        &self,
        observer: &dyn ChainObserver,
        worker: usize,
        bits: &Bitstring,
        pool: &MatrixPool,
    ) -> Result<Matrix, ChainError> {
        let mut reporter =
            StepReporter::new(observer, worker, self.name(), chain_steps(bits.len()));
        let product = Self::reduce(bits.as_slice(), pool, 0, bits.len() - 1, &mut reporter)?;
        reporter.finish();
        Ok(product)
    }

    fn name(&self) -> &'static str {
        "TreeReduction"
    }

    /// Each ancestor frame holds its left sub-product while the right half
    /// is reduced; the deepest combine holds two operands. Bounded by
    /// `2 * ceil(log2 n)`.
    fn peak_temporaries(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let depth = (usize::BITS - (len - 1).leading_zeros()) as usize;
        2 * depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_ops::multiply;

    fn bits(v: &[u8]) -> Bitstring {
        Bitstring::new(v.to_vec()).unwrap()
    }

    fn shear_pool() -> MatrixPool {
        MatrixPool::new(
            Matrix::from_rows(&[[1.0, 1.0], [0.0, 1.0]]).unwrap(),
            Matrix::from_rows(&[[1.0, 0.0], [1.0, 1.0]]).unwrap(),
        )
        .unwrap()
    }

    fn evaluate(v: &[u8], pool: &MatrixPool) -> Matrix {
        let observer = NoOpObserver::new();
        TreeReduction::new()
            .evaluate_core(&observer, 0, &bits(v), pool)
            .unwrap()
    }

    #[test]
    fn scaled_identity_chain() {
        let pool = MatrixPool::new(
            Matrix::identity(2).unwrap(),
            Matrix::from_rows(&[[2.0, 0.0], [0.0, 2.0]]).unwrap(),
        )
        .unwrap();
        assert_eq!(evaluate(&[1, 1], &pool).as_slice(), &[4.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn order_is_left_to_right() {
        let pool = shear_pool();
        assert_eq!(evaluate(&[0, 1], &pool).as_slice(), &[2.0, 1.0, 1.0, 1.0]);
        assert_eq!(evaluate(&[1, 0], &pool).as_slice(), &[1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn odd_length_chain() {
        // A0 A1 A0 = [[2,1],[1,1]] [[1,1],[0,1]] = [[2,3],[1,2]]
        let pool = shear_pool();
        assert_eq!(evaluate(&[0, 1, 0], &pool).as_slice(), &[2.0, 3.0, 1.0, 2.0]);
    }

    #[test]
    fn base_case_is_a_copy() {
        let pool = shear_pool();
        let tree = TreeReduction::new();
        let chain = bits(&[1, 0, 1]);
        assert_eq!(&tree.evaluate_range(&chain, &pool, 1, 1).unwrap(), pool.a0());
        assert_eq!(&tree.evaluate_range(&chain, &pool, 2, 2).unwrap(), pool.a1());
    }

    #[test]
    fn range_split_matches_whole() {
        let pool = shear_pool();
        let tree = TreeReduction::new();
        let chain = bits(&[0, 1, 1, 0, 1, 0, 0]);
        let whole = tree.evaluate_range(&chain, &pool, 0, 6).unwrap();
        for k in 0..6 {
            let left = tree.evaluate_range(&chain, &pool, 0, k).unwrap();
            let right = tree.evaluate_range(&chain, &pool, k + 1, 6).unwrap();
            assert_eq!(multiply(&left, &right).unwrap(), whole, "split at {k}");
        }
    }

    #[test]
    fn invalid_ranges_rejected() {
        let pool = shear_pool();
        let tree = TreeReduction::new();
        let chain = bits(&[0, 1]);
        assert!(matches!(
            tree.evaluate_range(&chain, &pool, 1, 0),
            Err(ChainError::InvalidInput(_))
        ));
        assert!(matches!(
            tree.evaluate_range(&chain, &pool, 0, 2),
            Err(ChainError::InvalidInput(_))
        ));
    }

    #[test]
    fn peak_temporaries_grow_logarithmically() {
        let tree = TreeReduction::new();
        assert_eq!(tree.peak_temporaries(1), 0);
        assert_eq!(tree.peak_temporaries(2), 2);
        assert_eq!(tree.peak_temporaries(4), 4);
        assert_eq!(tree.peak_temporaries(5), 6);
        assert_eq!(tree.peak_temporaries(1024), 20);
    }
}
