//! Edit parameter model.
//!
//! [`EditParameters`] is the flat record every renderer reads from. Values
//! are kept inside their declared ranges by clamping on write, so a
//! renderer never has to validate what it receives.
//!
//! ## Field Ranges
//! | field | unit | range | default |
//! |---|---|---|---|
//! | brightness | % | 0..=200 | 100 |
//! | contrast | % | 0..=200 | 100 |
//! | saturation | % | 0..=200 | 100 |
//! | grayscale | % | 0..=100 | 0 |
//! | blur | px | 0..=10 | 0 |
//! | sepia | % | 0..=100 | 0 |
//! | opacity | % | 0..=100 | 100 |
//! | scale | % | 50..=200 | 100 |
//! | rotation | degrees | multiples of 90, mod 360 | 0 |
//! | flipX / flipY | sign | -1 or 1 | 1 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a host-side name does not match any known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not one of the eleven parameter names.
    #[error("Unknown parameter field: {0}")]
    UnknownField(String),

    /// Not `left` or `right`.
    #[error("Unknown rotation direction: {0}")]
    UnknownDirection(String),

    /// Not `x` or `y`.
    #[error("Unknown flip axis: {0}")]
    UnknownAxis(String),
}

/// The complete set of edit parameters for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditParameters {
    /// Brightness percentage (0 to 200)
    pub brightness: f32,
    /// Contrast percentage (0 to 200)
    pub contrast: f32,
    /// Saturation percentage (0 to 200)
    pub saturation: f32,
    /// Grayscale percentage (0 to 100)
    pub grayscale: f32,
    /// Blur radius in pixels (0 to 10)
    pub blur: f32,
    /// Sepia percentage (0 to 100)
    pub sepia: f32,
    /// Opacity percentage (0 to 100)
    pub opacity: f32,
    /// Scale percentage (50 to 200)
    pub scale: f32,
    /// Rotation in degrees, a multiple of 90 in `[0, 360)`
    pub rotation: i32,
    /// Horizontal mirror sign (-1 or 1)
    pub flip_x: i8,
    /// Vertical mirror sign (-1 or 1)
    pub flip_y: i8,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            grayscale: 0.0,
            blur: 0.0,
            sepia: 0.0,
            opacity: 100.0,
            scale: 100.0,
            rotation: 0,
            flip_x: 1,
            flip_y: 1,
        }
    }
}

impl EditParameters {
    /// Create a new parameter set with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Read a single field as a number.
    pub fn get(&self, field: ParameterField) -> f32 {
        match field {
            ParameterField::Brightness => self.brightness,
            ParameterField::Contrast => self.contrast,
            ParameterField::Saturation => self.saturation,
            ParameterField::Grayscale => self.grayscale,
            ParameterField::Blur => self.blur,
            ParameterField::Sepia => self.sepia,
            ParameterField::Opacity => self.opacity,
            ParameterField::Scale => self.scale,
            ParameterField::Rotation => self.rotation as f32,
            ParameterField::FlipX => f32::from(self.flip_x),
            ParameterField::FlipY => f32::from(self.flip_y),
        }
    }

    /// Write a single field, clamping the value into the field's range.
    ///
    /// Rotation is snapped to the nearest quarter turn and wrapped into
    /// `[0, 360)`. Sign fields become -1 for negative input and 1 otherwise.
    /// NaN is ignored and leaves the field unchanged.
    pub fn set(&mut self, field: ParameterField, value: f32) {
        if value.is_nan() {
            return;
        }
        let (min, max) = field.range();
        let clamped = value.clamp(min, max);
        match field {
            ParameterField::Brightness => self.brightness = clamped,
            ParameterField::Contrast => self.contrast = clamped,
            ParameterField::Saturation => self.saturation = clamped,
            ParameterField::Grayscale => self.grayscale = clamped,
            ParameterField::Blur => self.blur = clamped,
            ParameterField::Sepia => self.sepia = clamped,
            ParameterField::Opacity => self.opacity = clamped,
            ParameterField::Scale => self.scale = clamped,
            ParameterField::Rotation => self.rotation = normalize_rotation(f64::from(value)),
            ParameterField::FlipX => self.flip_x = sign_of(value),
            ParameterField::FlipY => self.flip_y = sign_of(value),
        }
    }

    /// Return a copy with every field forced back into its declared range.
    ///
    /// Used when a whole record arrives from outside (deserialized JSON),
    /// where nothing guarantees the ranges were respected.
    pub fn normalized(&self) -> Self {
        let mut out = Self::default();
        for field in ParameterField::ALL {
            out.set(field, self.get(field));
        }
        out
    }
}

/// Wrap a rotation in degrees to a quarter turn in `[0, 360)`.
pub(crate) fn normalize_rotation(degrees: f64) -> i32 {
    let quarter_turns = (degrees / 90.0).round().rem_euclid(4.0);
    quarter_turns as i32 * 90
}

#[inline]
fn sign_of(value: f32) -> i8 {
    if value < 0.0 {
        -1
    } else {
        1
    }
}

/// Names one field of [`EditParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Brightness,
    Contrast,
    Saturation,
    Grayscale,
    Blur,
    Sepia,
    Opacity,
    Scale,
    Rotation,
    FlipX,
    FlipY,
}

impl ParameterField {
    /// Every field, in declaration order.
    pub const ALL: [ParameterField; 11] = [
        ParameterField::Brightness,
        ParameterField::Contrast,
        ParameterField::Saturation,
        ParameterField::Grayscale,
        ParameterField::Blur,
        ParameterField::Sepia,
        ParameterField::Opacity,
        ParameterField::Scale,
        ParameterField::Rotation,
        ParameterField::FlipX,
        ParameterField::FlipY,
    ];

    /// The name the host page uses for this field.
    pub fn name(self) -> &'static str {
        match self {
            ParameterField::Brightness => "brightness",
            ParameterField::Contrast => "contrast",
            ParameterField::Saturation => "saturation",
            ParameterField::Grayscale => "grayscale",
            ParameterField::Blur => "blur",
            ParameterField::Sepia => "sepia",
            ParameterField::Opacity => "opacity",
            ParameterField::Scale => "scale",
            ParameterField::Rotation => "rotation",
            ParameterField::FlipX => "flipX",
            ParameterField::FlipY => "flipY",
        }
    }

    /// Inclusive `(min, max)` range of the field.
    ///
    /// Rotation has no bound (it wraps), reported as the full `f32` range.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParameterField::Brightness
            | ParameterField::Contrast
            | ParameterField::Saturation => (0.0, 200.0),
            ParameterField::Grayscale | ParameterField::Sepia | ParameterField::Opacity => {
                (0.0, 100.0)
            }
            ParameterField::Blur => (0.0, 10.0),
            ParameterField::Scale => (50.0, 200.0),
            ParameterField::Rotation => (f32::MIN, f32::MAX),
            ParameterField::FlipX | ParameterField::FlipY => (-1.0, 1.0),
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ParseError::UnknownField(s.to_string()))
    }
}

/// Quarter-turn rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    /// Counter-clockwise, -90 degrees
    Left,
    /// Clockwise, +90 degrees
    Right,
}

impl RotateDirection {
    /// Signed rotation step in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            RotateDirection::Left => -90,
            RotateDirection::Right => 90,
        }
    }
}

impl FromStr for RotateDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(RotateDirection::Left),
            "right" => Ok(RotateDirection::Right),
            _ => Err(ParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// Mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal mirror (negates `flip_x`)
    X,
    /// Vertical mirror (negates `flip_y`)
    Y,
}

impl Axis {
    /// The sign field this axis controls.
    pub fn field(self) -> ParameterField {
        match self {
            Axis::X => ParameterField::FlipX,
            Axis::Y => ParameterField::FlipY,
        }
    }
}

impl FromStr for Axis {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "flipX" => Ok(Axis::X),
            "y" | "flipY" => Ok(Axis::Y),
            _ => Err(ParseError::UnknownAxis(s.to_string())),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for picking a bounded (non-rotation, non-sign) field.
    fn bounded_field_strategy() -> impl Strategy<Value = ParameterField> {
        prop::sample::select(ParameterField::ALL[..8].to_vec())
    }

    proptest! {
        /// Property: Whatever is written, the stored value lies in range.
        #[test]
        fn prop_set_stays_in_range(field in bounded_field_strategy(), value in -1000.0f32..1000.0) {
            let mut params = EditParameters::new();
            params.set(field, value);
            let (min, max) = field.range();
            let stored = params.get(field);
            prop_assert!(stored >= min && stored <= max);
        }

        /// Property: In-range writes read back unchanged.
        #[test]
        fn prop_in_range_round_trip(field in bounded_field_strategy(), t in 0.0f32..=1.0) {
            let (min, max) = field.range();
            let value = min + (max - min) * t;
            let mut params = EditParameters::new();
            params.set(field, value);
            prop_assert_eq!(params.get(field), value.clamp(min, max));
        }

        /// Property: Rotation is always a quarter turn in [0, 360).
        #[test]
        fn prop_rotation_is_quarter_turn(value in -100_000.0f32..100_000.0) {
            let mut params = EditParameters::new();
            params.set(ParameterField::Rotation, value);
            prop_assert_eq!(params.rotation % 90, 0);
            prop_assert!((0..360).contains(&params.rotation));
        }
    }
}
