//! Image encoding for export.
//!
//! Exports are always lossless PNG, with the alpha channel preserved so
//! reduced opacity and the transparent padding around scaled-down content
//! survive in the downloaded file.
//!
//! # Examples
//!
//! ```ignore
//! use photo_editor_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Gray, half transparent
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_png, EncodeError, PNG_SIGNATURE};
