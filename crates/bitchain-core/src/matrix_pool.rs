//! The two candidate factors of a chain.

use crate::evaluator::ChainError;
use crate::matrix::Matrix;

/// Ordered pair (A0, A1) of equally sized matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPool {
    factors: [Matrix; 2],
}

impl MatrixPool {
    /// Create a pool; both matrices must share one dimension.
    pub fn new(a0: Matrix, a1: Matrix) -> Result<Self, ChainError> {
        if a0.dim() != a1.dim() {
            return Err(ChainError::InvalidInput(format!(
                "pool matrices differ in dimension: {} vs {}",
                a0.dim(),
                a1.dim()
            )));
        }
        Ok(Self { factors: [a0, a1] })
    }

    /// Shared dimension m.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.factors[0].dim()
    }

    #[must_use]
    pub fn a0(&self) -> &Matrix {
        &self.factors[0]
    }

    #[must_use]
    pub fn a1(&self) -> &Matrix {
        &self.factors[1]
    }

    /// Factor selected by `bit` (0 → A0, anything else → A1).
    ///
    /// Bits come from a validated `Bitstring`, so only 0 and 1 reach here.
    #[inline]
    #[must_use]
    pub fn select(&self, bit: u8) -> &Matrix {
        &self.factors[usize::from(bit != 0)]
    }
}
