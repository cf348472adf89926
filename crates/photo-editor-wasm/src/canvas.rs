//! Browser canvas drawing surface.
//!
//! Executes an export plan on a real `<canvas>` 2D context, so the browser's
//! own `ctx.filter` implementation renders the effect chain and the export
//! is pixel-identical to the CSS-filtered preview.

use photo_editor_core::decode::SourceImage;
use photo_editor_core::encode::encode_png;
use photo_editor_core::raster::DrawingSurface;
use photo_editor_core::render::EffectChain;
use thiserror::Error;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

/// Failure reported by the browser canvas API.
#[derive(Debug, Error)]
#[error("canvas error: {0}")]
pub struct CanvasError(String);

impl From<JsValue> for CanvasError {
    fn from(value: JsValue) -> Self {
        CanvasError(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<CanvasError> for JsValue {
    fn from(err: CanvasError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// [`DrawingSurface`] backed by an `HtmlCanvasElement`.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Draw onto an existing canvas element (e.g. one shown on the page).
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }

    /// Draw onto an off-page canvas.
    pub fn detached() -> Result<Self, CanvasError> {
        Self::new(create_canvas()?)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

fn document() -> Result<Document, CanvasError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| CanvasError("no document available".to_string()))
}

fn create_canvas() -> Result<HtmlCanvasElement, CanvasError> {
    document()?
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| CanvasError("created element is not a canvas".to_string()))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| CanvasError("2d context unavailable".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CanvasError("context is not a 2d context".to_string()))
}

impl DrawingSurface for CanvasSurface {
    type Error = CanvasError;

    fn allocate(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        // Resizing also resets the context state.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.ctx.set_filter("none");
        self.ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), CanvasError> {
        Ok(self.ctx.translate(x, y)?)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), CanvasError> {
        Ok(self.ctx.rotate(radians)?)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), CanvasError> {
        Ok(self.ctx.scale(x, y)?)
    }

    fn set_filter(&mut self, effects: &EffectChain) -> Result<(), CanvasError> {
        self.ctx.set_filter(&effects.to_css());
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &SourceImage,
        dx: f64,
        dy: f64,
        width: f64,
        height: f64,
    ) -> Result<(), CanvasError> {
        // Source pixels live in wasm memory; stage them on a scratch canvas
        // so the transformed draw goes through the context's filter.
        let scratch = create_canvas()?;
        scratch.set_width(image.width());
        scratch.set_height(image.height());
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(image.pixels()),
            image.width(),
            image.height(),
        )?;
        context_2d(&scratch)?.put_image_data(&data, 0.0, 0.0)?;

        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(&scratch, dx, dy, width, height)?;
        Ok(())
    }

    fn encode_png(&mut self) -> Result<Vec<u8>, CanvasError> {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;
        encode_png(&data.data().0, width, height).map_err(|e| CanvasError(e.to_string()))
    }
}

/// WASM-specific tests that need a DOM.
///
/// Run with `wasm-pack test --headless --chrome`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use photo_editor_core::params::{EditParameters, ParameterField};
    use photo_editor_core::raster::render_plan;
    use photo_editor_core::render::export_plan;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn source(width: u32, height: u32) -> SourceImage {
        SourceImage::from_raw(width, height, vec![200u8; (width * height * 4) as usize]).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_allocate_resizes_canvas() {
        let mut surface = CanvasSurface::detached().unwrap();
        surface.allocate(30, 20).unwrap();
        assert_eq!(surface.canvas().width(), 30);
        assert_eq!(surface.canvas().height(), 20);
    }

    #[wasm_bindgen_test]
    fn test_render_rotated_plan() {
        let image = source(8, 4);
        let mut params = EditParameters::default();
        params.set(ParameterField::Rotation, 90.0);
        let plan = export_plan(&params, image.dimensions());

        let mut surface = CanvasSurface::detached().unwrap();
        let png = render_plan(&plan, &image, &mut surface).unwrap();

        assert_eq!((surface.canvas().width(), surface.canvas().height()), (4, 8));
        assert_eq!(&png[1..4], b"PNG");
    }
}
