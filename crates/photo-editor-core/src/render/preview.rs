//! Live-preview descriptor.

use serde::Serialize;

use super::effects::{effect_chain, EffectChain};
use crate::params::EditParameters;

/// Rotation followed by a signed, possibly non-uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometricTransform {
    /// Clockwise rotation in degrees.
    pub rotation_degrees: i32,
    /// Horizontal scale factor; negative mirrors horizontally.
    pub scale_x: f32,
    /// Vertical scale factor; negative mirrors vertically.
    pub scale_y: f32,
}

impl Default for GeometricTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GeometricTransform {
    /// No rotation, unit scale.
    pub fn identity() -> Self {
        Self {
            rotation_degrees: 0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Combine rotation, scale and flips from a parameter snapshot.
    pub fn from_params(params: &EditParameters) -> Self {
        let factor = params.scale / 100.0;
        Self {
            rotation_degrees: params.rotation,
            scale_x: f32::from(params.flip_x) * factor,
            scale_y: f32::from(params.flip_y) * factor,
        }
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        f64::from(self.rotation_degrees).to_radians()
    }

    /// True when the transform leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Render as a CSS `transform` value, e.g. `rotate(90deg) scale(-1.5, 1.5)`.
    pub fn to_css(&self) -> String {
        format!(
            "rotate({}deg) scale({}, {})",
            self.rotation_degrees, self.scale_x, self.scale_y
        )
    }
}

/// Everything the live preview needs to display the edited image.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDescriptor {
    /// Visual-effect chain applied to the displayed image.
    pub effects: EffectChain,
    /// Geometric transform applied to the displayed image.
    pub transform: GeometricTransform,
}

impl PreviewDescriptor {
    /// Descriptor that displays the unmodified source.
    pub fn identity() -> Self {
        Self {
            effects: EffectChain::identity(),
            transform: GeometricTransform::identity(),
        }
    }

    /// CSS `filter` value.
    pub fn css_filter(&self) -> String {
        self.effects.to_css()
    }

    /// CSS `transform` value.
    pub fn css_transform(&self) -> String {
        self.transform.to_css()
    }
}

/// Map a parameter snapshot to its live-preview descriptor.
pub fn preview_descriptor(params: &EditParameters) -> PreviewDescriptor {
    PreviewDescriptor {
        effects: effect_chain(params),
        transform: GeometricTransform::from_params(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform_is_identity() {
        let descriptor = preview_descriptor(&EditParameters::default());
        assert!(descriptor.transform.is_identity());
        assert_eq!(descriptor.css_transform(), "rotate(0deg) scale(1, 1)");
    }

    #[test]
    fn test_flip_x_mirrors_horizontally() {
        let params = EditParameters {
            flip_x: -1,
            ..Default::default()
        };
        let transform = preview_descriptor(&params).transform;
        assert_eq!((transform.scale_x, transform.scale_y), (-1.0, 1.0));
    }

    #[test]
    fn test_scale_and_flip_combine() {
        let params = EditParameters {
            scale: 150.0,
            flip_y: -1,
            rotation: 90,
            ..Default::default()
        };
        let descriptor = preview_descriptor(&params);
        assert_eq!(descriptor.transform.scale_x, 1.5);
        assert_eq!(descriptor.transform.scale_y, -1.5);
        assert_eq!(descriptor.css_transform(), "rotate(90deg) scale(1.5, -1.5)");
    }

    #[test]
    fn test_rotation_radians() {
        let params = EditParameters {
            rotation: 180,
            ..Default::default()
        };
        let transform = GeometricTransform::from_params(&params);
        assert!((transform.rotation_radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_identity_descriptor() {
        let descriptor = PreviewDescriptor::identity();
        assert_eq!(descriptor.css_filter(), "none");
        assert!(descriptor.transform.is_identity());
    }

    #[test]
    fn test_css_filter_matches_chain() {
        let params = EditParameters {
            saturation: 0.0,
            ..Default::default()
        };
        let descriptor = preview_descriptor(&params);
        assert!(descriptor.css_filter().contains("saturate(0%)"));
    }
}
