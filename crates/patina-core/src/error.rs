//! Error types for the Patina batch engine.
//!
//! Fatal errors stop a batch before (or after) the workers run and carry the
//! path that caused them. Per-item errors live in [`PipelineError`]; they are
//! logged by the worker that hit them and never abort the batch.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

/// Top-level error type for a batch run.
#[derive(Error, Debug)]
pub enum PatinaError {
    /// Configuration file problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The directory holding the photographs does not exist
    #[error("Input directory does not exist: {0}")]
    InputDirMissing(PathBuf),

    /// Worker count outside `1..=max`
    #[error("Invalid worker count {requested}: must be between 1 and {max}")]
    InvalidWorkerCount { requested: i64, max: usize },

    /// The manifest could not be opened or read
    #[error("Cannot read manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The shared watermark could not be decoded
    #[error("Cannot load texture {path}: {source}")]
    Watermark {
        path: PathBuf,
        source: PipelineError,
    },

    /// The timing report could not be written
    #[error("Cannot write report {path}: {source}")]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The OS refused to start a worker thread
    #[error("Failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        source: std::io::Error,
    },

    /// A worker thread panicked before returning its result
    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),
}

impl PatinaError {
    /// Process exit code for this error.
    ///
    /// Configuration errors share clap's usage code (2). A missing input
    /// directory and an unusable output directory get their own codes.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::InvalidWorkerCount { .. } => 2,
            Self::InputDirMissing(_) => 3,
            Self::OutputDir { .. } => 4,
            Self::Manifest { .. } | Self::Watermark { .. } => 5,
            Self::Report { .. } | Self::WorkerSpawn { .. } | Self::WorkerPanicked(_) => 1,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-item pipeline errors. Recoverable: the item is skipped.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// One of the aging transforms failed
    #[error("{stage} failed for {path}: {message}")]
    Transform {
        path: PathBuf,
        stage: Stage,
        message: String,
    },

    /// Image encoding or writing failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },
}

/// Failure inside a single transform, before it is tied to an item path.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransformError(pub String);

/// Convenience type alias for batch results.
pub type Result<T> = std::result::Result<T, PatinaError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
