//! Memory budget estimation and validation.

use crate::evaluator::ChainEvaluator;

/// Memory estimate for one chain evaluation.
#[derive(Debug, Clone)]
pub struct MemoryEstimate {
    /// The two pool matrices (in bytes).
    pub input_bytes: usize,
    /// The product matrix (in bytes).
    pub result_bytes: usize,
    /// Peak temporaries held by the evaluator (in bytes).
    pub temp_bytes: usize,
    /// Total estimated memory (in bytes).
    pub total_bytes: usize,
}

impl MemoryEstimate {
    /// Estimate memory for an m×m chain of `len` factors with `temporaries`
    /// extra matrices alive at peak.
    #[must_use]
    pub fn estimate(dimension: usize, len: usize, temporaries: usize) -> Self {
        let matrix_bytes = dimension
            .saturating_mul(dimension)
            .saturating_mul(std::mem::size_of::<f64>());
        // The bitstring is stored one byte per bit.
        let input_bytes = matrix_bytes.saturating_mul(2).saturating_add(len);
        let result_bytes = matrix_bytes;
        let temp_bytes = matrix_bytes.saturating_mul(temporaries);

        Self {
            input_bytes,
            result_bytes,
            temp_bytes,
            total_bytes: input_bytes
                .saturating_add(result_bytes)
                .saturating_add(temp_bytes),
        }
    }

    /// Estimate for a specific evaluator.
    #[must_use]
    pub fn for_evaluator(dimension: usize, len: usize, evaluator: &dyn ChainEvaluator) -> Self {
        Self::estimate(dimension, len, evaluator.peak_temporaries(len))
    }

    /// Estimate for `workers` independent copies running at once.
    #[must_use]
    pub fn scaled(&self, workers: usize) -> Self {
        Self {
            input_bytes: self.input_bytes.saturating_mul(workers),
            result_bytes: self.result_bytes.saturating_mul(workers),
            temp_bytes: self.temp_bytes.saturating_mul(workers),
            total_bytes: self.total_bytes.saturating_mul(workers),
        }
    }

    /// Check if the computation fits within the given memory limit.
    ///
    /// `None` means unlimited (always fits).
    #[must_use]
    pub fn fits_in(&self, limit: Option<usize>) -> bool {
        match limit {
            None => true,
            Some(l) => self.total_bytes <= l,
        }
    }
}

/// Parse a memory limit string (e.g., "8G", "512M", "1024K").
///
/// # Errors
///
/// Returns an error string if the format is invalid or the number cannot be parsed.
pub fn parse_memory_limit(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        (s, 1)
    };

    let value: usize = num_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid memory limit: {e}"))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("memory limit too large: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use crate::registry::{DefaultFactory, EvaluatorFactory};

    #[test]
    fn estimate_counts_matrices() {
        let est = MemoryEstimate::estimate(128, 10, 1);
        let matrix = 128 * 128 * 8;
        assert_eq!(est.input_bytes, 2 * matrix + 10);
        assert_eq!(est.result_bytes, matrix);
        assert_eq!(est.temp_bytes, matrix);
        assert_eq!(est.total_bytes, 4 * matrix + 10);
    }

    #[test]
    fn estimate_matches_allocated_buffers() {
        for dim in [1, 3, 64] {
            let m = Matrix::alloc(dim).unwrap();
            let est = MemoryEstimate::estimate(dim, 0, 1);
            assert_eq!(est.result_bytes, m.byte_len());
            assert_eq!(est.temp_bytes, m.byte_len());
            assert_eq!(est.input_bytes, 2 * m.byte_len());
        }
    }

    #[test]
    fn tree_needs_more_than_sequential() {
        let factory = DefaultFactory::new();
        let seq = factory.get("sequential").unwrap();
        let tree = factory.get("tree").unwrap();
        let s = MemoryEstimate::for_evaluator(64, 1000, seq.as_ref());
        let t = MemoryEstimate::for_evaluator(64, 1000, tree.as_ref());
        assert!(t.total_bytes > s.total_bytes);
    }

    #[test]
    fn scaled_by_workers() {
        let est = MemoryEstimate::estimate(16, 4, 2);
        assert_eq!(est.scaled(3).total_bytes, est.total_bytes * 3);
    }

    #[test]
    fn fits_in_limits() {
        let est = MemoryEstimate::estimate(128, 100, 14);
        assert!(est.fits_in(None));
        assert!(est.fits_in(Some(est.total_bytes)));
        assert!(!est.fits_in(Some(est.total_bytes - 1)));
    }

    #[test]
    fn huge_dimension_saturates() {
        let est = MemoryEstimate::estimate(usize::MAX, 1, 1);
        assert_eq!(est.total_bytes, usize::MAX);
    }

    #[test]
    fn parse_memory_limit_values() {
        assert_eq!(parse_memory_limit("8G").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_memory_limit("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_memory_limit("1024K").unwrap(), 1024 * 1024);
        assert_eq!(parse_memory_limit("64B").unwrap(), 64);
        assert_eq!(parse_memory_limit("").unwrap(), 0);
    }

    #[test]
    fn parse_memory_limit_invalid() {
        assert!(parse_memory_limit("abc").is_err());
        assert!(parse_memory_limit("12X").is_err());
    }
}
