//! Batch orchestration: setup, fixed worker threads, join, report.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use crate::config::Config;
use crate::error::{PatinaError, Result};
use crate::pipeline::{
    run_worker, ImageOps, ManifestLoader, Partitioner, RasterOps, SkippedEntry, WorkerContext,
    WorkerResult,
};
use crate::report::{report_path, Report, ReportStatus};

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub report: Report,
    pub report_path: PathBuf,
    pub report_status: ReportStatus,
    /// Manifest entries filtered out before the workers started
    pub skipped: Vec<SkippedEntry>,
}

/// Runs the aging batch over a photo directory.
pub struct BatchRunner<O: ImageOps = RasterOps> {
    config: Config,
    ops: O,
}

impl BatchRunner<RasterOps> {
    /// Create a runner backed by [`RasterOps`].
    pub fn new(config: Config) -> Self {
        let ops = RasterOps::from_config(&config);
        Self { config, ops }
    }
}

impl<O: ImageOps> BatchRunner<O> {
    /// Create a runner backed by any image capability.
    pub fn with_ops(config: Config, ops: O) -> Self {
        Self { config, ops }
    }

    /// Age every eligible photograph listed in `dir`'s manifest using
    /// exactly `worker_count` threads, then write the timing report.
    ///
    /// All setup failures are returned before any worker starts. Per-item
    /// failures only show up in the worker counts.
    pub fn run(&self, dir: &Path, worker_count: usize) -> Result<BatchOutcome> {
        if !dir.is_dir() {
            return Err(PatinaError::InputDirMissing(dir.to_path_buf()));
        }
        let partitioner = Partitioner::new(worker_count, self.config.processing.max_workers)?;

        let loader = ManifestLoader::new(self.config.processing.clone());
        let manifest = loader.load(dir)?;
        if manifest.items.len() < worker_count {
            tracing::warn!(
                "{} workers for {} item(s): some workers will be idle",
                worker_count,
                manifest.items.len()
            );
        }

        let output_dir = loader.output_dir(dir);
        ensure_output_dir(&output_dir)?;

        let texture_path = self.config.texture_path();
        let watermark = self
            .ops
            .decode(&texture_path)
            .map_err(|source| PatinaError::Watermark {
                path: texture_path.clone(),
                source,
            })?;

        let ctx = WorkerContext {
            ops: &self.ops,
            items: &manifest.items,
            watermark: &watermark,
            output_dir: &output_dir,
            partitioner,
        };

        tracing::info!(
            "Aging {} photo(s) with {} worker(s)",
            manifest.items.len(),
            worker_count
        );
        let start = Instant::now();
        let results = spawn_and_join(&ctx)?;
        let report = Report::new(results, start.elapsed());
        tracing::info!(
            "Batch finished: {} processed, {} failed in {:?}",
            report.total_processed,
            report.total_failed(),
            report.total_elapsed
        );

        let report_path = report_path(dir, worker_count);
        let report_status = report.write_if_absent(&report_path)?;
        match report_status {
            ReportStatus::Written => tracing::info!("Report written to {:?}", report_path),
            ReportStatus::AlreadyExists => {
                tracing::info!("Report {:?} already exists, not rewriting", report_path)
            }
        }

        Ok(BatchOutcome {
            report,
            report_path,
            report_status,
            skipped: manifest.skipped,
        })
    }
}

/// Start one named thread per worker and join them all, in worker order.
fn spawn_and_join<O: ImageOps>(ctx: &WorkerContext<'_, O>) -> Result<Vec<WorkerResult>> {
    let worker_count = ctx.partitioner.worker_count();

    thread::scope(|scope| -> Result<Vec<WorkerResult>> {
        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let handle = thread::Builder::new()
                .name(format!("patina-worker-{}", worker_id))
                .spawn_scoped(scope, move || run_worker(ctx, worker_id))
                .map_err(|source| PatinaError::WorkerSpawn {
                    worker: worker_id,
                    source,
                })?;
            handles.push(handle);
        }

        // Join every handle before inspecting any result
        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        joined
            .into_iter()
            .enumerate()
            .map(|(worker_id, result)| result.map_err(|_| PatinaError::WorkerPanicked(worker_id)))
            .collect()
    })
}

/// Create the output directory, and any missing parents, unless it is
/// already there.
fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        tracing::debug!("Output directory {:?} already exists", path);
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| PatinaError::OutputDir {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Created output directory {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ops::recording::RecordingOps;
    use crate::pipeline::SkipReason;

    struct PhotoDir {
        dir: tempfile::TempDir,
        config: Config,
    }

    impl PhotoDir {
        fn new(manifest: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("image-list.txt"), manifest).unwrap();
            std::fs::write(dir.path().join("paper-texture.png"), "texture").unwrap();
            let mut config = Config::default();
            config.texture.path = dir.path().join("paper-texture.png");
            Self { dir, config }
        }

        fn photo(&self, name: &str, content: &str) -> &Self {
            std::fs::write(self.dir.path().join(name), content).unwrap();
            self
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn out(&self) -> PathBuf {
            self.path().join("Old-image-dir")
        }

        fn outputs(&self) -> Vec<String> {
            let mut names: Vec<String> = std::fs::read_dir(self.out())
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }

        fn run(&self, ops: RecordingOps, workers: usize) -> (Result<BatchOutcome>, RecordingOps) {
            let runner = BatchRunner::with_ops(self.config.clone(), ops);
            let outcome = runner.run(self.path(), workers);
            (outcome, runner.ops)
        }
    }

    fn counts(outcome: &BatchOutcome) -> Vec<usize> {
        outcome.report.workers.iter().map(|w| w.processed).collect()
    }

    #[test]
    fn test_filtered_manifest_with_two_workers() {
        let photos = PhotoDir::new("a.jpg\nb.png\nc.jpg\n");
        photos.photo("a.jpg", "pixels").photo("b.png", "pixels");

        let (outcome, ops) = photos.run(RecordingOps::new(), 2);
        let outcome = outcome.unwrap();

        assert_eq!(counts(&outcome), [1, 0]);
        assert_eq!(outcome.report.total_processed, 1);
        assert_eq!(photos.outputs(), ["a.jpg"]);
        assert!(ops.ops_for("b.png").is_empty());
        assert!(ops.ops_for("c.jpg").is_empty());

        let a_thread = ops.calls().into_iter().find(|c| c.item == "a.jpg").unwrap().thread;
        assert_eq!(a_thread.as_deref(), Some("patina-worker-0"));
    }

    #[test]
    fn test_already_processed_item_is_never_touched() {
        let photos = PhotoDir::new("a.jpg\nd.jpg\n");
        photos.photo("a.jpg", "pixels").photo("d.jpg", "pixels");
        std::fs::create_dir(photos.out()).unwrap();
        std::fs::write(photos.out().join("d.jpg"), "old result").unwrap();

        let (outcome, ops) = photos.run(RecordingOps::new(), 2);
        let outcome = outcome.unwrap();

        assert!(ops.ops_for("d.jpg").is_empty());
        assert_eq!(
            std::fs::read_to_string(photos.out().join("d.jpg")).unwrap(),
            "old result"
        );
        assert_eq!(outcome.skipped[0].reason, SkipReason::AlreadyProcessed);
        assert_eq!(counts(&outcome), [1, 0]);
    }

    #[test]
    fn test_empty_work_list_still_reports() {
        let photos = PhotoDir::new("");

        let (outcome, ops) = photos.run(RecordingOps::new(), 3);
        let outcome = outcome.unwrap();

        assert_eq!(counts(&outcome), [0, 0, 0]);
        assert_eq!(outcome.report_status, ReportStatus::Written);
        let text = std::fs::read_to_string(photos.path().join("timming_3.txt")).unwrap();
        assert!(text.starts_with("total        0  "));
        assert_eq!(text.lines().count(), 4);
        // Only the watermark was decoded
        assert_eq!(ops.calls().len(), 1);
    }

    #[test]
    fn test_worker_counts_sum_to_total() {
        let names: Vec<String> = (0..17).map(|i| format!("p{i:02}.jpg")).collect();
        let photos = PhotoDir::new(&names.join("\n"));
        for (i, name) in names.iter().enumerate() {
            photos.photo(name, if i % 5 == 0 { "corrupt" } else { "pixels" });
        }

        let (outcome, ops) = photos.run(RecordingOps::new(), 4);
        let outcome = outcome.unwrap();

        let sum: usize = counts(&outcome).iter().sum();
        assert_eq!(sum, outcome.report.total_processed);
        assert_eq!(outcome.report.total_processed, 13);
        assert_eq!(outcome.report.total_failed(), 4);
        assert_eq!(photos.outputs().len(), 13);

        // Every item was decoded exactly once, by the worker that owns it
        for (index, name) in names.iter().enumerate() {
            let decodes: Vec<_> = ops
                .calls()
                .into_iter()
                .filter(|c| c.op == "decode" && &c.item == name)
                .collect();
            assert_eq!(decodes.len(), 1, "{name}");
            let expected = format!("patina-worker-{}", index % 4);
            assert_eq!(decodes[0].thread.as_deref(), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let photos = PhotoDir::new("a.jpg\nb.jpg\nc.jpg\n");
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            photos.photo(name, "pixels");
        }

        let (first, _) = photos.run(RecordingOps::new(), 2);
        let first = first.unwrap();
        let outputs = photos.outputs();
        let report = std::fs::read_to_string(&first.report_path).unwrap();

        let (second, ops) = photos.run(RecordingOps::new(), 2);
        let second = second.unwrap();

        assert_eq!(second.report.total_processed, 0);
        assert_eq!(second.skipped.len(), 3);
        assert!(second
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::AlreadyProcessed));
        assert_eq!(second.report_status, ReportStatus::AlreadyExists);
        assert_eq!(photos.outputs(), outputs);
        assert_eq!(std::fs::read_to_string(&second.report_path).unwrap(), report);
        assert!(ops.calls().iter().all(|c| c.item == "paper-texture.png"));
    }

    #[test]
    fn test_different_worker_count_gets_own_report() {
        let photos = PhotoDir::new("");
        photos.run(RecordingOps::new(), 1).0.unwrap();
        let outcome = photos.run(RecordingOps::new(), 2).0.unwrap();
        assert_eq!(outcome.report_status, ReportStatus::Written);
        assert!(photos.path().join("timming_1.txt").exists());
        assert!(photos.path().join("timming_2.txt").exists());
    }

    #[test]
    fn test_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = BatchRunner::with_ops(Config::default(), RecordingOps::new());
        let err = runner.run(&dir.path().join("nope"), 2).unwrap_err();
        assert!(matches!(err, PatinaError::InputDirMissing(_)));
    }

    #[test]
    fn test_zero_workers_rejected_before_setup() {
        let photos = PhotoDir::new("a.jpg\n");
        photos.photo("a.jpg", "pixels");

        let (outcome, ops) = photos.run(RecordingOps::new(), 0);
        assert!(matches!(
            outcome.unwrap_err(),
            PatinaError::InvalidWorkerCount { .. }
        ));
        assert!(ops.calls().is_empty());
        assert!(!photos.out().exists());
    }

    #[test]
    fn test_missing_manifest() {
        let photos = PhotoDir::new("");
        std::fs::remove_file(photos.path().join("image-list.txt")).unwrap();
        let err = photos.run(RecordingOps::new(), 1).0.unwrap_err();
        assert!(matches!(err, PatinaError::Manifest { .. }));
    }

    #[test]
    fn test_output_dir_blocked_by_file() {
        let photos = PhotoDir::new("");
        std::fs::write(photos.out(), "not a directory").unwrap();
        let err = photos.run(RecordingOps::new(), 1).0.unwrap_err();
        assert!(matches!(err, PatinaError::OutputDir { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_nested_output_dir_is_created() {
        let mut photos = PhotoDir::new("a.jpg\n");
        photos.photo("a.jpg", "pixels");
        photos.config.processing.output_dir = "aged/2024".to_string();

        let outcome = photos.run(RecordingOps::new(), 1).0.unwrap();
        assert_eq!(outcome.report.total_processed, 1);
        assert!(photos.path().join("aged").join("2024").join("a.jpg").is_file());
    }

    #[test]
    fn test_unreadable_watermark_stops_before_workers() {
        let photos = PhotoDir::new("a.jpg\n");
        photos.photo("a.jpg", "pixels");
        std::fs::write(photos.path().join("paper-texture.png"), "corrupt").unwrap();

        let (outcome, ops) = photos.run(RecordingOps::new(), 1);
        assert!(matches!(
            outcome.unwrap_err(),
            PatinaError::Watermark { .. }
        ));
        assert!(ops.ops_for("a.jpg").is_empty());
        assert!(!photos.path().join("timming_1.txt").exists());
    }
}
