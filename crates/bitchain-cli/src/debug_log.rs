//! Append-only debug log of generated inputs and evaluator milestones.
//!
//! The log is an explicitly opened and closed collaborator, shared by all
//! workers through the observer interface. Each append holds the lock for
//! its whole block, so one worker's inputs are never split by another's.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use bitchain_core::{Bitstring, ChainInputs, ChainObserver, Matrix, ProgressUpdate};

use crate::output::write_matrix;

/// Debug log file handle.
pub struct DebugLog {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl DebugLog {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the log still accepts writes.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.writer.lock().is_some()
    }

    fn with_writer<F>(&self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        match self.writer.lock().as_mut() {
            Some(w) => f(w),
            None => Err(io::Error::other("debug log is closed")),
        }
    }

    /// Append one line.
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        self.with_writer(|w| writeln!(w, "{line}"))
    }

    /// Append `label` followed by the matrix rows.
    pub fn append_matrix(&self, label: &str, matrix: &Matrix) -> io::Result<()> {
        self.with_writer(|w| {
            writeln!(w, "{label}")?;
            write_matrix(w, matrix)
        })
    }

    /// Append the bitstring, one bit per token.
    pub fn append_bitstring(&self, bits: &Bitstring) -> io::Result<()> {
        self.with_writer(|w| write_bitstring(w, bits))
    }

    /// Flush and close the log. Later writes fail; closing twice is a no-op.
    pub fn close(&self) -> io::Result<()> {
        match self.writer.lock().take() {
            Some(mut w) => w.flush(),
            None => Ok(()),
        }
    }

    fn record_inputs(&self, inputs: &ChainInputs) -> io::Result<()> {
        // One lock for the whole block so a worker's inputs stay contiguous.
        self.with_writer(|w| {
            writeln!(w, "[worker {}] seed {}", inputs.worker, inputs.seed)?;
            for matrix in [inputs.pool.a0(), inputs.pool.a1()] {
                writeln!(w, "Generated matrix:")?;
                write_matrix(w, matrix)?;
            }
            write_bitstring(w, &inputs.bits)
        })
    }
}

fn write_bitstring<W: Write + ?Sized>(w: &mut W, bits: &Bitstring) -> io::Result<()> {
    write!(w, "Generated bitstring: ")?;
    for b in bits.iter() {
        write!(w, "{b} ")?;
    }
    writeln!(w)
}

impl ChainObserver for DebugLog {
    fn on_progress(&self, update: &ProgressUpdate) {
        if !update.done {
            return;
        }
        let line = format!(
            "[worker {}] {} finished after {} multiplications",
            update.worker, update.algorithm, update.current_step
        );
        if let Err(e) = self.append_line(&line) {
            warn!(path = %self.path.display(), error = %e, "Debug log write failed");
        }
    }

    fn on_inputs(&self, inputs: &ChainInputs) {
        if let Err(e) = self.record_inputs(inputs) {
            warn!(path = %self.path.display(), error = %e, "Debug log write failed");
        }
    }
}

impl Drop for DebugLog {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
