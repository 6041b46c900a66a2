//! Incremental accumulation and CSV flush of result rows.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::error::DatasetError;

use super::row::ResultRow;

/// Shared run state: the rows collected so far and where they go.
///
/// The process entry creates one; the orchestrator appends through it and
/// the interrupt path flushes through the same reference.
#[derive(Debug)]
pub struct RunContext {
    rows: Mutex<Vec<ResultRow>>,
    output_path: PathBuf,
}

impl RunContext {
    /// Create an empty context writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            output_path: output_path.into(),
        }
    }

    /// Destination of the flush.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Append a collected row.
    pub fn push(&self, row: ResultRow) {
        self.guard().push(row);
    }

    /// Number of rows collected so far.
    pub fn row_count(&self) -> usize {
        self.guard().len()
    }

    /// Copy of the rows collected so far.
    pub fn rows(&self) -> Vec<ResultRow> {
        self.guard().clone()
    }

    /// Write every collected row to the destination, truncating any
    /// previous file. Returns the number of rows written.
    pub fn flush(&self) -> Result<usize, DatasetError> {
        let rows = self.rows();
        let mut writer = csv::Writer::from_path(&self.output_path)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(
            rows = rows.len(),
            path = %self.output_path.display(),
            "dataset flushed"
        );
        Ok(rows.len())
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ResultRow>> {
        // A poisoning panic elsewhere must not cost the collected rows.
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
