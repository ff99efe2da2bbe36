//! Product file format and CLI output formatting.
//!
//! A product is persisted as one matrix row per line, every value printed
//! with six fractional digits and followed by a single space.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use bitchain_core::Matrix;

/// Format one element the way the product file expects it.
#[must_use]
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Write `matrix` in the product file layout.
pub fn write_matrix<W: Write + ?Sized>(out: &mut W, matrix: &Matrix) -> io::Result<()> {
    for row in matrix.rows() {
        for &v in row {
            write!(out, "{} ", format_value(v))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render `matrix` in the product file layout.
#[must_use]
pub fn format_matrix(matrix: &Matrix) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_matrix(&mut buf, matrix);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write the product to a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: impl AsRef<Path>, matrix: &Matrix) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_matrix(&mut out, matrix)?;
    out.flush()
}

/// Seconds with six fractional digits, as printed after a run.
#[must_use]
pub fn format_seconds(d: Duration) -> String {
    format!("{:.6}", d.as_secs_f64())
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}
