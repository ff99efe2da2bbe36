//! Dense matrix primitives shared by the chain evaluators.
//!
//! The multiply kernel uses the i-k-j loop order so that the innermost loop
//! walks both `B` and `dst` with stride 1.

use crate::evaluator::ChainError;
use crate::matrix::Matrix;

fn check_same_dim(expected: usize, m: &Matrix, what: &str) -> Result<(), ChainError> {
    if m.dim() == expected {
        Ok(())
    } else {
        Err(ChainError::InvalidInput(format!(
            "{what} is {0}x{0}, expected {expected}x{expected}",
            m.dim()
        )))
    }
}

/// Compute `dst ← alpha·(a·b) + beta·dst`.
///
/// With `beta == 0.0` the previous contents of `dst` are never read.
#[allow(clippy::float_cmp)]
pub fn multiply_accumulate(
    dst: &mut Matrix,
    a: &Matrix,
    b: &Matrix,
    alpha: f64,
    beta: f64,
) -> Result<(), ChainError> {
    let m = dst.dim();
    check_same_dim(m, a, "left operand")?;
    check_same_dim(m, b, "right operand")?;

    let c = dst.as_mut_slice();
    if beta == 0.0 {
        c.fill(0.0);
    } else if beta != 1.0 {
        for x in c.iter_mut() {
            *x *= beta;
        }
    }
    if alpha == 0.0 {
        return Ok(());
    }

    let a = a.as_slice();
    let b = b.as_slice();
    for (i, c_row) in c.chunks_exact_mut(m).enumerate() {
        let a_row = &a[i * m..(i + 1) * m];
        for (p, &a_ip) in a_row.iter().enumerate() {
            let scaled = alpha * a_ip;
            let b_row = &b[p * m..(p + 1) * m];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij += scaled * b_pj;
            }
        }
    }
    Ok(())
}

/// Fresh product `a·b`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, ChainError> {
    let mut out = Matrix::alloc(a.dim())?;
    multiply_accumulate(&mut out, a, b, 1.0, 0.0)?;
    Ok(out)
}

/// Elementwise copy of `src` into `dst`.
pub fn copy(dst: &mut Matrix, src: &Matrix) -> Result<(), ChainError> {
    check_same_dim(dst.dim(), src, "source")?;
    dst.as_mut_slice().copy_from_slice(src.as_slice());
    Ok(())
}

/// Set every element to 0.0.
pub fn zero(matrix: &mut Matrix) {
    matrix.as_mut_slice().fill(0.0);
}

/// Largest absolute elementwise difference.
///
/// Pairs that are identical (including equal infinities or two NaNs) count
/// as zero; any other pair involving a non-finite value yields infinity.
#[allow(clippy::float_cmp)]
pub fn max_abs_diff(a: &Matrix, b: &Matrix) -> Result<f64, ChainError> {
    check_same_dim(a.dim(), b, "compared matrix")?;
    let mut worst = 0.0f64;
    for (&x, &y) in a.as_slice().iter().zip(b.as_slice()) {
        let d = if x == y || (x.is_nan() && y.is_nan()) {
            0.0
        } else if x.is_finite() && y.is_finite() {
            (x - y).abs()
        } else {
            f64::INFINITY
        };
        worst = worst.max(d);
    }
    Ok(worst)
}

/// Largest finite absolute entry over both matrices.
fn finite_scale(a: &Matrix, b: &Matrix) -> f64 {
    a.as_slice()
        .iter()
        .chain(b.as_slice())
        .filter(|x| x.is_finite())
        .fold(0.0f64, |s, x| s.max(x.abs()))
}

/// Elementwise comparison with tolerance `tol` relative to the matrices'
/// magnitude.
///
/// Each pair must satisfy `|x - y| <= tol * s`, where `s` is the largest
/// finite `|entry|` of either matrix. Scaling both matrices by the same
/// factor never changes the verdict. Two NaNs or two equal infinities
/// compare equal, since both evaluators overflowed the same entry.
#[allow(clippy::float_cmp)]
pub fn approx_eq(a: &Matrix, b: &Matrix, tol: f64) -> Result<bool, ChainError> {
    check_same_dim(a.dim(), b, "compared matrix")?;
    let bound = tol * finite_scale(a, b);
    let close = |x: f64, y: f64| {
        if x == y {
            return true;
        }
        if x.is_nan() || y.is_nan() {
            return x.is_nan() && y.is_nan();
        }
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        (x - y).abs() <= bound
    };
    Ok(a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .all(|(&x, &y)| close(x, y)))
}
