//! The `PhotoEditor` class exposed to JavaScript.
//!
//! One instance backs one editing widget. Slider input handlers call `set`,
//! the preview element follows `on_change` updates, and the export button
//! calls `download()`.
//!
//! Listeners run synchronously inside the call that changed the view, while
//! the editor is still borrowed, so they must not call back into it. Each
//! update therefore carries everything the preview needs: the CSS filter
//! and transform strings, the parameters and the comparison flag.
//!
//! # Example
//!
//! ```typescript
//! import init, { PhotoEditor } from '@photo-editor/wasm';
//!
//! await init();
//! const editor = new PhotoEditor({ exportFileName: 'holiday.png' });
//!
//! input.onchange = async () => {
//!   const file = input.files[0];
//!   if (file) editor.load_image(new Uint8Array(await file.arrayBuffer()));
//! };
//!
//! editor.on_change(({ filter, transform }) => {
//!   img.style.filter = filter;
//!   img.style.transform = transform;
//! });
//!
//! brightness.oninput = () => editor.set('brightness', brightness.valueAsNumber);
//! exportButton.onclick = () => editor.download();
//! ```

use photo_editor_core::params::{Axis, EditParameters, ParameterField, RotateDirection};
use photo_editor_core::{EditorConfig, EditorSession};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::canvas::CanvasSurface;
use crate::download::save_bytes;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Payload passed to `on_change` listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewUpdate {
    /// CSS `filter` for the displayed image.
    pub filter: String,
    /// CSS `transform` for the displayed image.
    pub transform: String,
    /// Current parameters (unchanged while comparing).
    pub parameters: EditParameters,
    /// Whether the original is being shown.
    pub comparing: bool,
}

/// Editing session handle for JavaScript.
#[wasm_bindgen]
pub struct PhotoEditor {
    session: EditorSession,
    listeners: Vec<(u32, js_sys::Function)>,
    next_handle: u32,
}

#[wasm_bindgen]
impl PhotoEditor {
    /// Create an editor. `config` may be omitted, `null`, or a partial
    /// `{ exportFileName, applyExifOrientation }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PhotoEditor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        Ok(Self::with_config(config))
    }

    // ===== Image =====

    /// Decode and display an uploaded file.
    ///
    /// Returns `false` when `bytes` is empty (no file selected). Throws if
    /// the file cannot be decoded; the previous image then stays loaded.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<bool, JsValue> {
        self.session.load_image(bytes).map_err(to_js_error)
    }

    pub fn has_image(&self) -> bool {
        self.session.image().is_some()
    }

    /// Width of the loaded image in pixels.
    pub fn image_width(&self) -> Option<u32> {
        self.session.image().map(|image| image.width())
    }

    /// Height of the loaded image in pixels.
    pub fn image_height(&self) -> Option<u32> {
        self.session.image().map(|image| image.height())
    }

    // ===== Parameters =====

    /// Set a parameter by name (`"brightness"`, `"blur"`, `"flipX"`, ...).
    /// Out-of-range values are clamped.
    pub fn set(&mut self, field: &str, value: f32) -> Result<(), JsValue> {
        let field: ParameterField = field.parse().map_err(to_js_error)?;
        self.session.store_mut().set(field, value);
        self.notify();
        Ok(())
    }

    /// Read a parameter by name.
    pub fn get(&self, field: &str) -> Result<f32, JsValue> {
        let field: ParameterField = field.parse().map_err(to_js_error)?;
        Ok(self.session.parameters().get(field))
    }

    /// Rotate a quarter turn, `"left"` or `"right"`.
    pub fn rotate(&mut self, direction: &str) -> Result<(), JsValue> {
        let direction: RotateDirection = direction.parse().map_err(to_js_error)?;
        self.session.store_mut().rotate(direction);
        self.notify();
        Ok(())
    }

    /// Mirror along `"x"` (horizontal) or `"y"` (vertical).
    pub fn flip(&mut self, axis: &str) -> Result<(), JsValue> {
        let axis: Axis = axis.parse().map_err(to_js_error)?;
        self.session.store_mut().flip(axis);
        self.notify();
        Ok(())
    }

    /// Restore every parameter to its default.
    pub fn reset(&mut self) {
        self.session.store_mut().reset();
        self.notify();
    }

    /// All parameters as a plain object.
    pub fn parameters(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.parameters()).map_err(to_js_error)
    }

    /// Replace all parameters at once; missing keys take their defaults.
    pub fn set_parameters(&mut self, value: JsValue) -> Result<(), JsValue> {
        let params: EditParameters = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        self.session.store_mut().replace(params);
        self.notify();
        Ok(())
    }

    /// Call `callback(update)` after every parameter or comparison change,
    /// where `update` is `{ filter, transform, parameters, comparing }`.
    /// Returns a handle for `off_change`.
    pub fn on_change(&mut self, callback: js_sys::Function) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.listeners.push((handle, callback));
        handle
    }

    /// Remove a listener added with `on_change`.
    pub fn off_change(&mut self, handle: u32) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != handle);
        self.listeners.len() != before
    }

    // ===== Preview =====

    /// CSS `filter` for the displayed image.
    pub fn css_filter(&self) -> String {
        self.session.preview().css_filter()
    }

    /// CSS `transform` for the displayed image.
    pub fn css_transform(&self) -> String {
        self.session.preview().css_transform()
    }

    /// Full preview descriptor (effect stages and transform) as an object.
    pub fn preview(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.preview()).map_err(to_js_error)
    }

    /// Start showing the original (e.g. on pointer down).
    pub fn begin_compare(&mut self) {
        self.session.comparison_mut().enter();
        self.notify();
    }

    /// Back to the edited view (pointer up / leave).
    pub fn end_compare(&mut self) {
        self.session.comparison_mut().exit();
        self.notify();
    }

    pub fn is_comparing(&self) -> bool {
        self.session.comparison().is_active()
    }

    // ===== Export =====

    /// Whether the export button should be enabled.
    pub fn can_export(&self) -> bool {
        self.session.can_export()
    }

    /// Suggested download file name.
    pub fn export_file_name(&self) -> String {
        self.session
            .config()
            .export_file_name_for(photo_editor_core::render::OutputFormat::Png)
    }

    /// Render the export in wasm and return PNG bytes.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.session
            .export()
            .map(|exported| exported.bytes)
            .map_err(to_js_error)
    }

    /// Render the export onto `canvas` with the browser's 2D context and
    /// return PNG bytes.
    pub fn export_to_canvas(&self, canvas: HtmlCanvasElement) -> Result<Vec<u8>, JsValue> {
        let mut surface = CanvasSurface::new(canvas)?;
        self.session.export_with(&mut surface).map_err(to_js_error)
    }

    /// Render the export and offer it as a file download.
    pub fn download(&self) -> Result<(), JsValue> {
        let plan = self.session.export_plan().map_err(to_js_error)?;
        let mut surface = CanvasSurface::detached()?;
        let bytes = self.session.export_with(&mut surface).map_err(to_js_error)?;
        save_bytes(&bytes, &self.export_file_name(), plan.format.mime_type())
    }
}

impl PhotoEditor {
    /// Create an editor from an already parsed configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            session: EditorSession::new(config),
            listeners: Vec::new(),
            next_handle: 0,
        }
    }

    /// What the preview should display right now.
    pub fn preview_update(&self) -> PreviewUpdate {
        let preview = self.session.preview();
        PreviewUpdate {
            filter: preview.css_filter(),
            transform: preview.css_transform(),
            parameters: self.session.parameters(),
            comparing: self.session.comparison().is_active(),
        }
    }

    fn notify(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let update = match serde_wasm_bindgen::to_value(&self.preview_update()) {
            Ok(update) => update,
            Err(e) => {
                log::error!("failed to serialize preview update: {e}");
                return;
            }
        };
        for (handle, callback) in &self.listeners {
            if let Err(e) = callback.call1(&JsValue::NULL, &update) {
                log::warn!("change listener {handle} threw: {e:?}");
            }
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &EditorSession {
        &self.session
    }
}

impl Default for PhotoEditor {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}
