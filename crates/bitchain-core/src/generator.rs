//! Seeded generation of pool matrices and bitstrings.
//!
//! Each worker derives its own seed as `seed + worker * WORKER_SEED_STRIDE`
//! and draws, in order, A0, A1 and then the bitstring from one
//! `ChaCha8Rng` stream.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::bitstring::Bitstring;
use crate::constants::WORKER_SEED_STRIDE;
use crate::evaluator::ChainError;
use crate::matrix::Matrix;
use crate::matrix_pool::MatrixPool;
use crate::options::Options;

/// Range from which integer-valued matrix entries are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Closed range `[-bound, bound]`.
    #[default]
    Signed,
    /// Half-open range `[0, bound)`.
    HalfOpen,
}

impl RangePolicy {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Signed => "signed",
            Self::HalfOpen => "half-open",
        }
    }

    fn check_bound(self, bound: u32) -> Result<(), ChainError> {
        match self {
            Self::Signed => Ok(()),
            Self::HalfOpen if bound >= 1 => Ok(()),
            Self::HalfOpen => Err(ChainError::InvalidInput(
                "half-open range policy needs a bound of at least 1".into(),
            )),
        }
    }
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RangePolicy {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed" => Ok(Self::Signed),
            "half-open" | "halfopen" | "unsigned" => Ok(Self::HalfOpen),
            other => Err(ChainError::Config(format!("unknown range policy: {other}"))),
        }
    }
}

/// Seed used by `worker`.
#[must_use]
pub fn worker_seed(base: u64, worker: usize) -> u64 {
    base.wrapping_add((worker as u64).wrapping_mul(WORKER_SEED_STRIDE))
}

/// Fill `matrix` with integer-valued doubles drawn uniformly under `policy`.
#[allow(clippy::cast_precision_loss)]
pub fn fill_random<R: Rng + ?Sized>(
    matrix: &mut Matrix,
    bound: u32,
    policy: RangePolicy,
    rng: &mut R,
) -> Result<(), ChainError> {
    policy.check_bound(bound)?;
    let b = i64::from(bound);
    for x in matrix.as_mut_slice() {
        let v = match policy {
            RangePolicy::Signed => rng.gen_range(-b..=b),
            RangePolicy::HalfOpen => rng.gen_range(0..b),
        };
        *x = v as f64;
    }
    Ok(())
}

/// Bitstring of length `len` with each bit drawn uniformly from {0, 1}.
pub fn random_bitstring<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Result<Bitstring, ChainError> {
    Bitstring::new((0..len).map(|_| rng.gen_range(0..2u8)).collect())
}

/// Everything one worker needs to evaluate a chain.
#[derive(Debug, Clone)]
pub struct ChainInputs {
    pub worker: usize,
    pub seed: u64,
    pub pool: MatrixPool,
    pub bits: Bitstring,
}

impl ChainInputs {
    /// Generate the inputs of `worker` for a chain of length `len`.
    pub fn generate(worker: usize, len: usize, opts: &Options) -> Result<Self, ChainError> {
        let seed = worker_seed(opts.seed, worker);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut a0 = Matrix::alloc(opts.dimension)?;
        fill_random(&mut a0, opts.bound, opts.range_policy, &mut rng)?;
        let mut a1 = Matrix::alloc(opts.dimension)?;
        fill_random(&mut a1, opts.bound, opts.range_policy, &mut rng)?;
        let bits = random_bitstring(len, &mut rng)?;

        debug!(
            worker,
            seed,
            dimension = opts.dimension,
            len,
            policy = %opts.range_policy,
            bound = opts.bound,
            "Generated chain inputs"
        );

        Ok(Self {
            worker,
            seed,
            pool: MatrixPool::new(a0, a1)?,
            bits,
        })
    }
}
