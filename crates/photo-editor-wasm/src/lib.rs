//! Photo Editor WASM - WebAssembly bindings for the photo editor
//!
//! This crate exposes photo-editor-core to the host page and adds the
//! browser-only pieces: a canvas-backed drawing surface, the file download
//! and console logging through `console_log`.
//!
//! # Module Structure
//!
//! - `editor` - The `PhotoEditor` class used by the widget
//! - `canvas` - `DrawingSurface` implementation over a 2D canvas context
//! - `download` - Save encoded bytes as a file download
//!
//! # Usage
//!
//! ```typescript
//! import init, { PhotoEditor } from '@photo-editor/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new PhotoEditor();
//! editor.load_image(new Uint8Array(await file.arrayBuffer()));
//! editor.set('contrast', 120);
//! img.style.filter = editor.css_filter();
//! ```

use std::str::FromStr;

use log::{Level, LevelFilter};
use wasm_bindgen::prelude::*;

mod canvas;
mod download;
mod editor;

// Re-export public types
pub use canvas::{CanvasError, CanvasSurface};
pub use download::save_bytes;
pub use editor::{PhotoEditor, PreviewUpdate};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    let level = if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    };
    if let Err(e) = console_log::init_with_level(level) {
        log::warn!("console logger not installed: {e}");
    }
}

/// Change console verbosity: `"off"`, `"error"`, `"warn"`, `"info"`,
/// `"debug"` or `"trace"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = LevelFilter::from_str(level).map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
