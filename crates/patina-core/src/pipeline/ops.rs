//! The image capability the workers drive.
//!
//! Every transform takes its input by value and hands back a new owned
//! image, so each intermediate is dropped as soon as the next stage has
//! consumed it, on success and on every early return alike.

use std::fmt;
use std::path::Path;

use crate::error::{PipelineResult, TransformError};

/// The four aging transforms, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Contrast,
    Smooth,
    Texture,
    Sepia,
}

impl Stage {
    /// All stages in the order they are applied.
    pub const CHAIN: [Stage; 4] = [Stage::Contrast, Stage::Smooth, Stage::Texture, Stage::Sepia];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Contrast => "contrast",
            Stage::Smooth => "smooth",
            Stage::Texture => "texture",
            Stage::Sepia => "sepia",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode, encode and the named pixel transforms.
///
/// Implementations are shared by reference across worker threads, hence
/// `Sync`. The watermark is decoded once through [`ImageOps::decode`] and
/// borrowed by every worker, so `Image` must be `Sync` as well.
pub trait ImageOps: Sync {
    type Image: Send + Sync;

    /// Decode the image stored at `path`.
    fn decode(&self, path: &Path) -> PipelineResult<Self::Image>;

    /// Encode `image` and write it to `path`.
    fn encode(&self, image: &Self::Image, path: &Path) -> PipelineResult<()>;

    /// Reduce contrast by a fixed delta.
    fn contrast(&self, image: Self::Image) -> Result<Self::Image, TransformError>;

    /// Apply a fixed-strength smoothing filter.
    fn smooth(&self, image: Self::Image) -> Result<Self::Image, TransformError>;

    /// Stretch `watermark` over the full frame and composite it onto `image`.
    fn texture(
        &self,
        image: Self::Image,
        watermark: &Self::Image,
    ) -> Result<Self::Image, TransformError>;

    /// Apply the fixed sepia tone.
    fn sepia(&self, image: Self::Image) -> Result<Self::Image, TransformError>;
}
