//! Constants for chain evaluation defaults and process exit codes.

/// Default matrix dimension (m).
pub const DEFAULT_DIMENSION: usize = 128;

/// Default bound for randomly generated matrix entries.
pub const DEFAULT_BOUND: u32 = 8;

/// Default base seed for input generation.
pub const DEFAULT_SEED: u64 = 42;

/// Seed offset between consecutive workers: worker `r` uses `seed + r * 12345`.
pub const WORKER_SEED_STRIDE: u64 = 12_345;

/// Default relative tolerance when comparing products of different evaluators.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Default path of the persisted product matrix.
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error, including invalid input.
    pub const ERROR_GENERIC: i32 = 1;
    /// Evaluator results did not agree within tolerance.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// An allocation could not be satisfied.
    pub const ERROR_OUT_OF_MEMORY: i32 = 5;
}
