//! Run options and configuration.

use crate::constants::{DEFAULT_BOUND, DEFAULT_DIMENSION, DEFAULT_SEED, DEFAULT_TOLERANCE};
use crate::generator::RangePolicy;

/// Options for generating and evaluating chains.
#[derive(Debug, Clone)]
pub struct Options {
    /// Matrix dimension m.
    pub dimension: usize,
    /// Bound for random matrix entries.
    pub bound: u32,
    /// Range policy for random matrix entries.
    pub range_policy: RangePolicy,
    /// Base seed; each worker offsets it by its rank.
    pub seed: u64,
    /// Relative tolerance for cross-evaluator comparison.
    pub tolerance: f64,
    /// Memory limit in bytes (0 = unlimited).
    pub memory_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            bound: DEFAULT_BOUND,
            range_policy: RangePolicy::default(),
            seed: DEFAULT_SEED,
            tolerance: DEFAULT_TOLERANCE,
            memory_limit: 0,
        }
    }
}

impl Options {
    /// Normalize options, replacing a non-positive or non-finite tolerance with the default.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            self.tolerance = DEFAULT_TOLERANCE;
        }
        self
    }

    /// `None` when unlimited.
    #[must_use]
    pub fn memory_limit(&self) -> Option<usize> {
        (self.memory_limit > 0).then_some(self.memory_limit)
    }
}
