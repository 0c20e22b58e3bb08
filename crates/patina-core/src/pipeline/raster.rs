//! Raster implementation of [`ImageOps`] on top of the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, Rgba, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;

use crate::config::{Config, EncodeConfig, LimitsConfig};
use crate::error::{PipelineError, PipelineResult, TransformError};

use super::ops::ImageOps;

/// Contrast delta in percent; negative flattens the tonal range.
pub const CONTRAST_DELTA: f32 = -20.0;

/// 3x3 smoothing kernel in row order: centre weight 20, neighbours 1,
/// normalised by its sum.
pub const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 20.0, 1.0, 1.0, 1.0, 1.0];

/// Per-channel offsets (R, G, B) added by the sepia tone, saturating at 255.
pub const SEPIA_OFFSET: [u8; 3] = [100, 60, 0];

/// Decodes any format `image` can sniff, writes JPEG.
#[derive(Debug, Clone)]
pub struct RasterOps {
    jpeg_quality: u8,
    max_dimension: u32,
}

impl RasterOps {
    /// Create raster ops with explicit encode settings and limits.
    pub fn new(encode: &EncodeConfig, limits: &LimitsConfig) -> Self {
        Self {
            jpeg_quality: encode.jpeg_quality,
            max_dimension: limits.max_image_dimension,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.encode, &config.limits)
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
        // JPEG has no alpha channel
        image.to_rgb8().write_with_encoder(encoder)?;
        Ok(buffer.into_inner())
    }
}

impl ImageOps for RasterOps {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> PipelineResult<DynamicImage> {
        let decode_err = |message: String| PipelineError::Decode {
            path: path.to_path_buf(),
            message,
        };

        let reader = ImageReader::open(path)
            .map_err(|e| decode_err(format!("Cannot open file: {}", e)))?
            .with_guessed_format()
            .map_err(|e| decode_err(format!("Cannot detect image format: {}", e)))?;
        let image = reader.decode().map_err(|e| decode_err(e.to_string()))?;

        let (width, height) = image.dimensions();
        if width > self.max_dimension || height > self.max_dimension {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.max_dimension,
            });
        }
        Ok(image)
    }

    /// Encodes in memory, then writes through a uniquely named temporary
    /// file next to `path` and persists it over the target. A failed write
    /// never leaves a truncated output, and two items with the same
    /// basename never share a scratch file.
    fn encode(&self, image: &DynamicImage, path: &Path) -> PipelineResult<()> {
        let encode_err = |message: String| PipelineError::Encode {
            path: path.to_path_buf(),
            message,
        };

        let bytes = self.encode_jpeg(image).map_err(|e| encode_err(e.to_string()))?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Dropped (and removed) on every early return
        let mut staging = tempfile::Builder::new()
            .prefix(".patina-")
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(|e| encode_err(format!("Cannot create staging file: {}", e)))?;
        staging
            .write_all(&bytes)
            .map_err(|e| encode_err(e.to_string()))?;
        staging
            .persist(path)
            .map_err(|e| encode_err(e.error.to_string()))?;
        Ok(())
    }

    fn contrast(&self, image: DynamicImage) -> Result<DynamicImage, TransformError> {
        Ok(image.adjust_contrast(CONTRAST_DELTA))
    }

    fn smooth(&self, image: DynamicImage) -> Result<DynamicImage, TransformError> {
        Ok(DynamicImage::ImageRgba8(smooth_clamped(&image.into_rgba8())))
    }

    fn texture(
        &self,
        image: DynamicImage,
        watermark: &DynamicImage,
    ) -> Result<DynamicImage, TransformError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TransformError(format!(
                "cannot texture an empty {}x{} image",
                width, height
            )));
        }

        let scaled = watermark.resize_exact(width, height, FilterType::Triangle);
        let mut canvas = image.into_rgba8();
        imageops::overlay(&mut canvas, &scaled.to_rgba8(), 0, 0);
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn sepia(&self, image: DynamicImage) -> Result<DynamicImage, TransformError> {
        let mut canvas = image.into_rgba8();
        for pixel in canvas.pixels_mut() {
            for (channel, offset) in pixel.0.iter_mut().zip(SEPIA_OFFSET) {
                *channel = channel.saturating_add(offset);
            }
        }
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}

/// Convolve with [`SMOOTH_KERNEL`], clamping reads at the image edges so
/// border pixels are weighted exactly like interior ones.
fn smooth_clamped(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let total: f32 = SMOOTH_KERNEL.iter().sum();

    RgbaImage::from_fn(width, height, |x, y| {
        let mut acc = [0f32; 4];
        for (k, weight) in SMOOTH_KERNEL.iter().enumerate() {
            let sx = (x + k as u32 % 3).saturating_sub(1).min(width - 1);
            let sy = (y + k as u32 / 3).saturating_sub(1).min(height - 1);
            let pixel = image.get_pixel(sx, sy);
            for (sum, channel) in acc.iter_mut().zip(pixel.0) {
                *sum += f32::from(channel) * weight;
            }
        }
        Rgba(acc.map(|sum| (sum / total).round().clamp(0.0, 255.0) as u8))
    })
}
