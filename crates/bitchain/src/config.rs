//! Application configuration from CLI flags and environment.

use clap::Parser;

use bitchain_core::constants::{
    DEFAULT_BOUND, DEFAULT_DIMENSION, DEFAULT_OUTPUT_FILE, DEFAULT_SEED, DEFAULT_TOLERANCE,
};

/// bitchain — evaluate the product of a bitstring-indexed matrix chain.
#[derive(Parser, Debug)]
#[command(name = "bitchain", version, about)]
pub struct AppConfig {
    /// Bitstring length (number of chain factors).
    #[arg(env = "BITCHAIN_N", required_unless_present = "completion")]
    pub n: Option<usize>,

    /// Matrix dimension.
    #[arg(short = 'm', long, default_value_t = DEFAULT_DIMENSION)]
    pub dimension: usize,

    /// Bound for random matrix entries.
    #[arg(long, default_value_t = DEFAULT_BOUND)]
    pub bound: u32,

    /// Range of random entries: signed [-bound, bound] or half-open [0, bound).
    #[arg(long, default_value = "signed")]
    pub range_policy: String,

    /// Evaluator to use: tree, sequential, or all.
    #[arg(long, default_value = "tree")]
    pub algo: String,

    /// Number of independent workers.
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Base seed; worker r uses seed + r * 12345.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Product file written by worker 0.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: String,

    /// Append generated inputs and milestones to this file.
    #[arg(long)]
    pub debug_log: Option<String>,

    /// Relative tolerance when comparing evaluators.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Memory limit (e.g., "8G", "512M").
    #[arg(long, default_value = "")]
    pub memory_limit: String,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (errors only).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
