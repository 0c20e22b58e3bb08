//! Manifest loading: turns `image-list.txt` into the ordered work list.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ProcessingConfig;
use crate::error::{PatinaError, Result};

/// One photograph eligible for processing. Identity is the source path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem {
    path: PathBuf,
}

impl WorkItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Source path of the photograph.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the aged copy of this item lands: flat, keyed by basename.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        match self.path.file_name() {
            Some(name) => output_dir.join(name),
            None => output_dir.join(&self.path),
        }
    }
}

/// Why a manifest entry did not become a [`WorkItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The aged copy already exists
    AlreadyProcessed,
    /// The source file is not on disk
    NotFound,
    /// The extension is not an accepted format
    UnsupportedFormat,
    /// The entry was already listed earlier in the manifest
    Duplicate,
    /// The line is not valid UTF-8
    InvalidEncoding,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::AlreadyProcessed => "already processed",
            SkipReason::NotFound => "not found",
            SkipReason::UnsupportedFormat => "unsupported format",
            SkipReason::Duplicate => "duplicate entry",
            SkipReason::InvalidEncoding => "not valid UTF-8",
        })
    }
}

/// A manifest line that was filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: String,
    pub reason: SkipReason,
}

/// Result of loading a manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Items to process, in manifest order
    pub items: Vec<WorkItem>,
    /// Entries that were filtered out, in manifest order
    pub skipped: Vec<SkippedEntry>,
}

impl Manifest {
    /// Number of entries skipped for the given reason.
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

/// Reads and filters the manifest of a photo directory.
pub struct ManifestLoader {
    config: ProcessingConfig,
}

impl ManifestLoader {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Path of the manifest file inside `dir`.
    pub fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.config.manifest_name)
    }

    /// Output directory for aged copies of photos in `dir`.
    pub fn output_dir(&self, dir: &Path) -> PathBuf {
        dir.join(&self.config.output_dir)
    }

    /// Load the manifest of `dir` and filter it into a work list.
    ///
    /// Each entry is checked in order: an existing output skips it as
    /// already processed, then a missing source, then an unaccepted
    /// extension. Only a manifest that cannot be read is an error; a line
    /// that is not UTF-8 is skipped on its own.
    pub fn load(&self, dir: &Path) -> Result<Manifest> {
        let manifest_path = self.manifest_path(dir);
        let content = std::fs::read(&manifest_path).map_err(|source| PatinaError::Manifest {
            path: manifest_path.clone(),
            source,
        })?;

        let output_dir = self.output_dir(dir);
        let mut manifest = Manifest::default();
        let mut seen = HashSet::new();

        for raw in content.split(|&b| b == b'\n') {
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(_) => {
                    let entry = String::from_utf8_lossy(raw).trim().to_string();
                    let reason = SkipReason::InvalidEncoding;
                    tracing::warn!("{entry}: {reason}");
                    manifest.skipped.push(SkippedEntry { entry, reason });
                    continue;
                }
            };
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }

            let item = WorkItem::new(dir.join(entry));
            let reason = if !seen.insert(item.path.clone()) {
                Some(SkipReason::Duplicate)
            } else {
                self.check(&item, &output_dir)
            };

            match reason {
                None => {
                    tracing::debug!("Queued {:?}", item.path());
                    manifest.items.push(item);
                }
                Some(reason) => {
                    match reason {
                        SkipReason::NotFound => tracing::warn!("{entry}: {reason}"),
                        _ => tracing::info!("{entry}: {reason}, skipping"),
                    }
                    manifest.skipped.push(SkippedEntry {
                        entry: entry.to_string(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            "Manifest {:?}: {} queued, {} skipped",
            manifest_path,
            manifest.items.len(),
            manifest.skipped.len()
        );
        Ok(manifest)
    }

    fn check(&self, item: &WorkItem, output_dir: &Path) -> Option<SkipReason> {
        if item.output_path(output_dir).exists() {
            Some(SkipReason::AlreadyProcessed)
        } else if !item.path().is_file() {
            Some(SkipReason::NotFound)
        } else if !self.is_accepted(item.path()) {
            Some(SkipReason::UnsupportedFormat)
        } else {
            None
        }
    }

    /// Case-sensitive extension check: `a.JPG` is not accepted by default.
    fn is_accepted(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.config.accepted_extensions.iter().any(|a| a == ext))
            .unwrap_or(false)
    }
}
