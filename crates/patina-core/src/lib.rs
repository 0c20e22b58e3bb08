//! Patina Core - parallel batch engine for aging photographs.
//!
//! A photo directory carries an `image-list.txt` manifest. Every listed JPEG
//! that has not been aged yet goes through a fixed chain on one of N worker
//! threads, and the run's timings land in `timming_<N>.txt`:
//!
//! ```text
//! manifest → work list → worker i (items i, i+N, ...) → report
//!                         decode → contrast → smooth → texture → sepia → encode
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use patina_core::{BatchRunner, Config};
//!
//! fn main() -> patina_core::Result<()> {
//!     let runner = BatchRunner::new(Config::load()?);
//!     let outcome = runner.run(std::path::Path::new("./photos"), 4)?;
//!     println!("{}", outcome.report.render());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

// Re-exports for convenient access
pub use batch::{BatchOutcome, BatchRunner};
pub use config::Config;
pub use error::{ConfigError, PatinaError, PipelineError, PipelineResult, Result};
pub use pipeline::{ImageOps, RasterOps, SkipReason, Stage, WorkerResult};
pub use report::{Report, ReportStatus};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
