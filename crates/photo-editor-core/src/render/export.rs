//! Export rasterization plan.
//!
//! The plan is a flat list of drawing-surface operations. It is replayed
//! by any [`DrawingSurface`](crate::raster::DrawingSurface): the software
//! rasterizer in this crate or a browser canvas.

use serde::Serialize;

use super::effects::{effect_chain, EffectChain};
use super::preview::GeometricTransform;
use crate::params::EditParameters;

/// Pixel dimensions of an image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width and height exchanged.
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// One drawing-surface operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    /// Move the origin.
    Translate { x: f64, y: f64 },
    /// Rotate the coordinate system clockwise.
    Rotate { radians: f64 },
    /// Scale the coordinate system; negative factors mirror.
    Scale { x: f64, y: f64 },
    /// Set the effect chain applied to subsequent draws.
    SetFilter { effects: EffectChain },
    /// Draw the source image into the given rectangle.
    DrawImage {
        dx: f64,
        dy: f64,
        width: f64,
        height: f64,
    },
}

/// Final file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OutputFormat {
    /// Lossless PNG.
    #[default]
    Png,
}

impl OutputFormat {
    /// MIME type of the encoded file.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
        }
    }
}

/// A complete recipe for producing the exported image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterizationPlan {
    /// Size of the canvas to allocate.
    pub canvas: Dimensions,
    /// Operations to replay, in order.
    pub ops: Vec<DrawOp>,
    /// Encoding of the final file.
    pub format: OutputFormat,
}

impl RasterizationPlan {
    /// The effect chain the plan applies, if any.
    pub fn effects(&self) -> Option<&EffectChain> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::SetFilter { effects } => Some(effects),
            _ => None,
        })
    }

    /// The scale factors the plan applies, if any.
    pub fn scale_factors(&self) -> Option<(f64, f64)> {
        self.ops.iter().find_map(|op| match *op {
            DrawOp::Scale { x, y } => Some((x, y)),
            _ => None,
        })
    }
}

/// Compute the export canvas size.
///
/// Quarter and three-quarter turns transpose the bounding box; every other
/// rotation keeps the source size. `scale` does not affect the canvas, so
/// scaled-up content is clipped and scaled-down content is padded.
pub fn output_canvas_size(params: &EditParameters, source: Dimensions) -> Dimensions {
    if params.rotation.rem_euclid(180) == 90 {
        source.transposed()
    } else {
        source
    }
}

/// Map a parameter snapshot and the source size to a rasterization plan.
///
/// The image is drawn centered on the origin at its original size; scaling
/// and mirroring come from the preceding transform, not from the draw call.
pub fn export_plan(params: &EditParameters, source: Dimensions) -> RasterizationPlan {
    let canvas = output_canvas_size(params, source);
    let transform = GeometricTransform::from_params(params);
    let (width, height) = (f64::from(source.width), f64::from(source.height));

    let ops = vec![
        DrawOp::Translate {
            x: f64::from(canvas.width) / 2.0,
            y: f64::from(canvas.height) / 2.0,
        },
        DrawOp::Rotate {
            radians: transform.rotation_radians(),
        },
        DrawOp::Scale {
            x: f64::from(transform.scale_x),
            y: f64::from(transform.scale_y),
        },
        DrawOp::SetFilter {
            effects: effect_chain(params),
        },
        DrawOp::DrawImage {
            dx: -width / 2.0,
            dy: -height / 2.0,
            width,
            height,
        },
    ];

    RasterizationPlan {
        canvas,
        ops,
        format: OutputFormat::Png,
    }
}
