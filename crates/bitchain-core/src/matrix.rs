//! Dense, row-major, square matrix of `f64` values.

use crate::evaluator::ChainError;

/// Dense m×m matrix stored row-major in a single buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dim: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocate an m×m matrix with every element set to 0.0.
    ///
    /// Returns `InvalidInput` for `dim == 0` and `OutOfMemory` when the
    /// buffer cannot be reserved.
    pub fn alloc(dim: usize) -> Result<Self, ChainError> {
        if dim == 0 {
            return Err(ChainError::InvalidInput(
                "matrix dimension must be at least 1".into(),
            ));
        }
        let len = dim
            .checked_mul(dim)
            .ok_or(ChainError::OutOfMemory { bytes: usize::MAX })?;
        let bytes = len
            .checked_mul(std::mem::size_of::<f64>())
            .ok_or(ChainError::OutOfMemory { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ChainError::OutOfMemory { bytes })?;
        data.resize(len, 0.0);
        Ok(Self { dim, data })
    }

    /// The multiplicative identity.
    pub fn identity(dim: usize) -> Result<Self, ChainError> {
        let mut m = Self::alloc(dim)?;
        for i in 0..dim {
            m.data[i * dim + i] = 1.0;
        }
        Ok(m)
    }

    /// Wrap a row-major buffer of length `dim * dim`.
    pub fn from_vec(dim: usize, data: Vec<f64>) -> Result<Self, ChainError> {
        if dim == 0 {
            return Err(ChainError::InvalidInput(
                "matrix dimension must be at least 1".into(),
            ));
        }
        if dim.checked_mul(dim) != Some(data.len()) {
            return Err(ChainError::InvalidInput(format!(
                "expected {dim}x{dim} elements, got {}",
                data.len()
            )));
        }
        Ok(Self { dim, data })
    }

    /// Build a matrix from rows; every row must have as many entries as there are rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ChainError> {
        let dim = rows.len();
        let mut m = Self::alloc(dim)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(ChainError::InvalidInput(format!(
                    "row {i} has {} entries, expected {dim}",
                    row.len()
                )));
            }
            m.data[i * dim..(i + 1) * dim].copy_from_slice(row);
        }
        Ok(m)
    }

    /// Fallible deep copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self, ChainError> {
        let mut m = Self::alloc(self.dim)?;
        m.data.copy_from_slice(&self.data);
        Ok(m)
    }

    /// Dimension m.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at row `i`, column `j`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Set the element at row `i`, column `j`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.dim + j] = value;
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.dim)
    }

    /// True when every element is exactly 0.0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }

    /// Size of the element buffer in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<f64>()
    }
}
