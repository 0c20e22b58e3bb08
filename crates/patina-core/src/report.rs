//! The per-run timing report, `timming_<workers>.txt`.
//!
//! One line for the aggregate, then one line per worker in worker order:
//!
//! ```text
//! total        12  3.41
//! Thread_0    6       3.38
//! Thread_1    6       3.40
//! ```
//!
//! A report is written at most once per worker count; an existing file is
//! never touched.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PatinaError, Result};
use crate::pipeline::WorkerResult;

/// Aggregated counts and timings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Sum of items stored by all workers
    pub total_processed: usize,
    /// Wall-clock span from the first spawn to the last join
    pub total_elapsed: Duration,
    /// Per-worker results, ordered by worker id
    pub workers: Vec<WorkerResult>,
}

/// Outcome of [`Report::write_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Written,
    AlreadyExists,
}

impl Report {
    /// Build a report from worker results collected in worker order.
    pub fn new(workers: Vec<WorkerResult>, total_elapsed: Duration) -> Self {
        let total_processed = workers.iter().map(|w| w.processed).sum();
        Self {
            total_processed,
            total_elapsed,
            workers,
        }
    }

    /// Items that failed across all workers.
    pub fn total_failed(&self) -> usize {
        self.workers.iter().map(|w| w.failed).sum()
    }

    /// Write the report text to any writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(
            writer,
            "total        {}  {}",
            self.total_processed,
            format_elapsed(self.total_elapsed)
        )?;
        for worker in &self.workers {
            writeln!(
                writer,
                "Thread_{}    {}       {}",
                worker.worker_id,
                worker.processed,
                format_elapsed(worker.elapsed)
            )?;
        }
        writer.flush()
    }

    /// Render the report as a string.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Create `path` and write the report, unless the file already exists.
    pub fn write_if_absent(&self, path: &Path) -> Result<ReportStatus> {
        let report_err = |source| PatinaError::Report {
            path: path.to_path_buf(),
            source,
        };

        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(ReportStatus::AlreadyExists);
            }
            Err(e) => return Err(report_err(e)),
        };
        self.write_to(io::BufWriter::new(file)).map_err(report_err)?;
        Ok(ReportStatus::Written)
    }
}

/// Path of the report for a run over `dir` with `worker_count` workers.
pub fn report_path(dir: &Path, worker_count: usize) -> PathBuf {
    dir.join(format!("timming_{}.txt", worker_count))
}

/// Format as `<seconds>.<centiseconds>`, centiseconds zero-padded.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!(
        "{}.{:02}",
        elapsed.as_secs(),
        elapsed.subsec_millis() / 10
    )
}
