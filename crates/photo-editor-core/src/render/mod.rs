//! Renderers: edit parameters to preview descriptors and export plans.
//!
//! Both renderers are pure functions over an [`EditParameters`] snapshot and
//! share one effect-chain constructor, so what the user sees in the live
//! preview is exactly what gets rasterized on export.
//!
//! # Effect Order
//!
//! 1. Brightness
//! 2. Contrast
//! 3. Saturate
//! 4. Grayscale
//! 5. Blur
//! 6. Sepia
//! 7. Opacity
//!
//! # Geometry
//!
//! Rotation is applied first, then a single non-uniform scale
//! `(flip_x * scale / 100, flip_y * scale / 100)` whose sign encodes
//! mirroring. Positive angles turn clockwise on screen.
//!
//! [`EditParameters`]: crate::EditParameters

mod effects;
mod export;
mod preview;

pub use effects::{effect_chain, Effect, EffectChain};
pub use export::{
    export_plan, output_canvas_size, Dimensions, DrawOp, OutputFormat, RasterizationPlan,
};
pub use preview::{preview_descriptor, GeometricTransform, PreviewDescriptor};
