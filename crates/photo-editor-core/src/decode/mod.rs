//! Image decoding for uploads.
//!
//! Turns the raw bytes from the file picker into a [`SourceImage`]. Any
//! format the `image` crate is built with (PNG, JPEG, GIF, WebP) is
//! accepted; the format is sniffed from the bytes, not the file name.
//!
//! # Examples
//!
//! ```ignore
//! use photo_editor_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes, true).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod orientation;
mod types;

use std::io::Cursor;

use image::ImageReader;

pub use orientation::{read_orientation, Orientation};
pub use types::{DecodeError, SourceImage};

/// Decode an uploaded image.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes
/// * `apply_exif_orientation` - Rotate/mirror according to the EXIF tag
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized,
/// `DecodeError::CorruptedFile` if decoding fails, and
/// `DecodeError::EmptyImage` for zero-sized images.
pub fn decode_image(bytes: &[u8], apply_exif_orientation: bool) -> Result<SourceImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if apply_exif_orientation {
        read_orientation(bytes).apply(img)
    } else {
        img
    };

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    Ok(SourceImage::from_rgba_image(rgba))
}
