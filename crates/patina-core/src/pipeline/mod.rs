//! The aging pipeline and the pieces the batch runner wires together:
//! - **ops**: the image capability (`ImageOps`) and the `Stage` chain
//! - **raster**: `ImageOps` on top of the `image` crate
//! - **manifest**: reads and filters `image-list.txt`
//! - **partition**: static item-to-worker assignment
//! - **worker**: runs the chain over one partition

pub mod manifest;
pub mod ops;
pub mod partition;
pub mod raster;
pub mod worker;

// Re-exports for convenient access
pub use manifest::{Manifest, ManifestLoader, SkipReason, SkippedEntry, WorkItem};
pub use ops::{ImageOps, Stage};
pub use partition::Partitioner;
pub use raster::RasterOps;
pub use worker::{age_item, run_worker, WorkerContext, WorkerResult};
