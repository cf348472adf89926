//! Rasterization: replaying an export plan on a drawing surface.
//!
//! [`DrawingSurface`] is the contract a 2D drawing backend implements. The
//! operations mirror a canvas API: allocate, affine transforms, a filter
//! state, one draw-image command and PNG output. Two backends exist:
//!
//! - [`SoftwareSurface`]: pure Rust, used for export outside the browser
//!   and in tests
//! - the browser canvas, implemented in the WASM bindings
//!
//! # Algorithm
//!
//! The software surface draws by inverse mapping: for each canvas pixel,
//! the inverse of the current transform gives the source position, which
//! is sampled bilinearly. The drawn content is rendered into a transparent
//! layer, the filter chain runs over that layer, and the layer is
//! composited onto the canvas with source-over blending.

mod affine;
mod filters;
mod software;

use std::fmt;

use crate::decode::SourceImage;
use crate::render::{DrawOp, EffectChain, OutputFormat, RasterizationPlan};

pub use affine::Affine;
pub use filters::apply_effect_chain;
pub use software::{SoftwareSurface, SurfaceError};

/// A 2D drawing backend that can execute a [`RasterizationPlan`].
pub trait DrawingSurface {
    /// Backend failure.
    type Error: fmt::Display;

    /// Resize to `width` x `height`, clear to transparent and reset the
    /// transform and filter state.
    fn allocate(&mut self, width: u32, height: u32) -> Result<(), Self::Error>;

    /// Move the origin by `(x, y)` in the current coordinate system.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;

    /// Rotate the coordinate system clockwise by `radians`.
    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error>;

    /// Scale the coordinate system; negative factors mirror.
    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;

    /// Effect chain applied to subsequent draws.
    fn set_filter(&mut self, effects: &EffectChain) -> Result<(), Self::Error>;

    /// Draw `image` into the rectangle at `(dx, dy)` of size `width` x `height`,
    /// in the current coordinate system.
    fn draw_image(
        &mut self,
        image: &SourceImage,
        dx: f64,
        dy: f64,
        width: f64,
        height: f64,
    ) -> Result<(), Self::Error>;

    /// Encode the current canvas as PNG.
    fn encode_png(&mut self) -> Result<Vec<u8>, Self::Error>;
}

/// Replay `plan` on `surface`, drawing `image` where the plan says so.
pub fn execute_plan<S: DrawingSurface>(
    plan: &RasterizationPlan,
    image: &SourceImage,
    surface: &mut S,
) -> Result<(), S::Error> {
    surface.allocate(plan.canvas.width, plan.canvas.height)?;
    for op in &plan.ops {
        match op {
            DrawOp::Translate { x, y } => surface.translate(*x, *y)?,
            DrawOp::Rotate { radians } => surface.rotate(*radians)?,
            DrawOp::Scale { x, y } => surface.scale(*x, *y)?,
            DrawOp::SetFilter { effects } => surface.set_filter(effects)?,
            DrawOp::DrawImage {
                dx,
                dy,
                width,
                height,
            } => surface.draw_image(image, *dx, *dy, *width, *height)?,
        }
    }
    Ok(())
}

/// Execute `plan` and encode the result in the plan's output format.
pub fn render_plan<S: DrawingSurface>(
    plan: &RasterizationPlan,
    image: &SourceImage,
    surface: &mut S,
) -> Result<Vec<u8>, S::Error> {
    execute_plan(plan, image, surface)?;
    match plan.format {
        OutputFormat::Png => surface.encode_png(),
    }
}
