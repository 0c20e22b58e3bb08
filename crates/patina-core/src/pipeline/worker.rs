//! Workers: each runs the aging chain over its own partition.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PipelineError, PipelineResult, TransformError};

use super::manifest::WorkItem;
use super::ops::{ImageOps, Stage};
use super::partition::Partitioner;

/// Shared, read-only state every worker borrows for the whole run.
pub struct WorkerContext<'a, O: ImageOps> {
    pub ops: &'a O,
    pub items: &'a [WorkItem],
    pub watermark: &'a O::Image,
    pub output_dir: &'a Path,
    pub partitioner: Partitioner,
}

/// What one worker reports back after its partition is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResult {
    pub worker_id: usize,
    /// Items decoded, aged and stored
    pub processed: usize,
    /// Items that failed at any step
    pub failed: usize,
    /// Wall-clock time spent on the partition
    pub elapsed: Duration,
}

/// Run the aging chain over every item owned by `worker_id`.
///
/// Per-item failures are logged and skipped; the worker always returns.
pub fn run_worker<O: ImageOps>(ctx: &WorkerContext<'_, O>, worker_id: usize) -> WorkerResult {
    let start = Instant::now();
    let mut processed = 0;
    let mut failed = 0;

    for index in ctx.partitioner.indices(worker_id, ctx.items.len()) {
        let item = &ctx.items[index];
        match age_item(ctx.ops, item, ctx.watermark, ctx.output_dir) {
            Ok(output) => {
                processed += 1;
                tracing::debug!(worker = worker_id, "Aged {:?} -> {:?}", item.path(), output);
            }
            Err(e) => {
                failed += 1;
                tracing::error!(worker = worker_id, "Failed: {}", e);
            }
        }
    }

    let elapsed = start.elapsed();
    tracing::debug!(
        worker = worker_id,
        "Worker finished: {} processed, {} failed in {:?}",
        processed,
        failed,
        elapsed
    );

    WorkerResult {
        worker_id,
        processed,
        failed,
        elapsed,
    }
}

/// Decode, age and store one photograph. Returns the output path.
///
/// Nothing is written unless every stage succeeds. Each intermediate image
/// is moved into the next stage and dropped there.
pub fn age_item<O: ImageOps>(
    ops: &O,
    item: &WorkItem,
    watermark: &O::Image,
    output_dir: &Path,
) -> PipelineResult<PathBuf> {
    let path = item.path();
    let stage_err = move |stage: Stage| {
        move |e: TransformError| PipelineError::Transform {
            path: path.to_path_buf(),
            stage,
            message: e.to_string(),
        }
    };

    let image = ops.decode(path)?;
    let image = ops.contrast(image).map_err(stage_err(Stage::Contrast))?;
    let image = ops.smooth(image).map_err(stage_err(Stage::Smooth))?;
    let image = ops
        .texture(image, watermark)
        .map_err(stage_err(Stage::Texture))?;
    let image = ops.sepia(image).map_err(stage_err(Stage::Sepia))?;

    let output = item.output_path(output_dir);
    ops.encode(&image, &output)?;
    Ok(output)
}
