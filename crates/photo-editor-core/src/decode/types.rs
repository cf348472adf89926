//! Core types for image decoding.

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use crate::render::Dimensions;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image decoded to zero width or height.
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// A decoded source image.
///
/// The handle is immutable: edits never touch its pixels, and uploading a
/// new file replaces the handle instead of mutating it. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    /// Wrap an RGBA image.
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(img),
        }
    }

    /// Build from raw RGBA bytes (4 bytes per pixel, row-major order).
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::from_rgba_image)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    /// RGBA pixel data in row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Borrow as an `image` buffer for sampling.
    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
