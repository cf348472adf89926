//! EXIF orientation handling.
//!
//! Browsers display uploaded photos upright, so decoding applies the EXIF
//! orientation tag before the image reaches the editor. Every one of the
//! eight tag values is an optional horizontal mirror followed by a number of
//! clockwise quarter turns, which is how [`Orientation`] stores it.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

/// Transform that brings a stored image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    /// Mirror left-right before rotating.
    pub mirrored: bool,
    /// Clockwise quarter turns, 0 to 3.
    pub quarter_turns: u8,
}

impl Orientation {
    /// Decode an EXIF orientation value. Unknown values are treated as upright.
    pub fn from_exif(value: u32) -> Self {
        let (mirrored, quarter_turns) = match value {
            2 => (true, 0),
            3 => (false, 2),
            4 => (true, 2),
            5 => (true, 3),
            6 => (false, 1),
            7 => (true, 1),
            8 => (false, 3),
            _ => (false, 0),
        };
        Self {
            mirrored,
            quarter_turns,
        }
    }

    /// True when the image is already upright.
    pub fn is_upright(&self) -> bool {
        *self == Self::default()
    }

    /// Mirror, then rotate `img`.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        let img = if self.mirrored { img.fliph() } else { img };
        match self.quarter_turns % 4 {
            1 => img.rotate90(),
            2 => img.rotate180(),
            3 => img.rotate270(),
            _ => img,
        }
    }
}

/// Read the EXIF orientation tag. Files without an EXIF block (PNG, GIF,
/// stripped JPEGs) are upright.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from_exif)
        .unwrap_or_default()
}
