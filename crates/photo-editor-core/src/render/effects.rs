//! Visual-effect chain shared by preview and export.

use std::fmt;

use serde::Serialize;

use crate::params::EditParameters;

/// One stage of a visual-effect chain, in its native unit.
///
/// Percentages are stored as given (100 = unchanged for brightness,
/// contrast, saturate and opacity; 0 = unchanged for grayscale and sepia).
/// Blur is a radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "camelCase")]
pub enum Effect {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Grayscale(f32),
    Blur(f32),
    Sepia(f32),
    Opacity(f32),
}

impl Effect {
    /// CSS filter function name.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Brightness(_) => "brightness",
            Effect::Contrast(_) => "contrast",
            Effect::Saturate(_) => "saturate",
            Effect::Grayscale(_) => "grayscale",
            Effect::Blur(_) => "blur",
            Effect::Sepia(_) => "sepia",
            Effect::Opacity(_) => "opacity",
        }
    }

    /// Stage intensity in its native unit.
    pub fn amount(&self) -> f32 {
        match *self {
            Effect::Brightness(v)
            | Effect::Contrast(v)
            | Effect::Saturate(v)
            | Effect::Grayscale(v)
            | Effect::Blur(v)
            | Effect::Sepia(v)
            | Effect::Opacity(v) => v,
        }
    }

    /// Unit suffix used when rendering the stage as CSS.
    pub fn unit(&self) -> &'static str {
        match self {
            Effect::Blur(_) => "px",
            _ => "%",
        }
    }

    /// True when the stage leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        match *self {
            Effect::Brightness(v) | Effect::Contrast(v) | Effect::Saturate(v) | Effect::Opacity(v) => {
                v == 100.0
            }
            Effect::Grayscale(v) | Effect::Blur(v) | Effect::Sepia(v) => v == 0.0,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}{})", self.name(), self.amount(), self.unit())
    }
}

/// Ordered list of effect stages, composited in list order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct EffectChain {
    stages: Vec<Effect>,
}

impl EffectChain {
    /// A chain with no stages (displays the source unmodified).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Stages in compositing order.
    pub fn stages(&self) -> &[Effect] {
        &self.stages
    }

    /// Iterate over the stages in compositing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.stages.iter()
    }

    /// True when no stage changes any pixel.
    pub fn is_identity(&self) -> bool {
        self.stages.iter().all(Effect::is_identity)
    }

    /// Render as a CSS `filter` value, e.g. `brightness(100%) blur(0px)`.
    ///
    /// An empty chain renders as `none`.
    pub fn to_css(&self) -> String {
        if self.stages.is_empty() {
            return "none".to_string();
        }
        self.stages
            .iter()
            .map(Effect::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a EffectChain {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build the seven-stage effect chain for a parameter snapshot.
///
/// This is the only place the chain is constructed; both the preview and
/// the export plan call it.
pub fn effect_chain(params: &EditParameters) -> EffectChain {
    EffectChain {
        stages: vec![
            Effect::Brightness(params.brightness),
            Effect::Contrast(params.contrast),
            Effect::Saturate(params.saturation),
            Effect::Grayscale(params.grayscale),
            Effect::Blur(params.blur),
            Effect::Sepia(params.sepia),
            Effect::Opacity(params.opacity),
        ],
    }
}
