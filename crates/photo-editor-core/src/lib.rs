//! Photo Editor Core - parameter model and rendering pipeline
//!
//! This crate holds everything of the photo editor that does not touch the
//! browser: the edit parameters and their store, the effect chain shared by
//! the live preview and the export, the export rasterizer and image
//! decoding/encoding.
//!
//! # Module Structure
//!
//! - `params` - Edit parameters, their ranges and defaults
//! - `store` - Observable single source of truth for the parameters
//! - `render` - Preview descriptor and export plan derived from parameters
//! - `compare` - "Show original" comparison mode
//! - `raster` - Drawing surface abstraction and software rasterizer
//! - `decode` / `encode` - Upload decoding and PNG encoding
//! - `session` - One editing session tying the pieces together
//! - `config` - Host-supplied editor configuration

pub mod compare;
pub mod config;
pub mod decode;
pub mod encode;
pub mod params;
pub mod raster;
pub mod render;
pub mod session;
pub mod store;

pub use compare::{ComparisonMode, OriginalView};
pub use config::EditorConfig;
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{encode_png, EncodeError};
pub use params::{Axis, EditParameters, ParameterField, ParseError, RotateDirection};
pub use raster::{render_plan, DrawingSurface, SoftwareSurface};
pub use render::{
    effect_chain, export_plan, preview_descriptor, Dimensions, EffectChain, PreviewDescriptor,
    RasterizationPlan,
};
pub use session::{EditorSession, ExportError, ExportedImage};
pub use store::{ParameterStore, SubscriptionId};
