//! Software drawing surface with bilinear resampling.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::affine::Affine;
use super::filters::apply_effect_chain;
use super::DrawingSurface;
use crate::decode::SourceImage;
use crate::encode::{encode_png, EncodeError};
use crate::render::EffectChain;

/// Errors raised by [`SoftwareSurface`].
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The current transform collapses the plane (a zero scale factor).
    #[error("Transform is not invertible")]
    SingularTransform,

    /// Encoding the canvas failed (including an unallocated canvas).
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// In-memory RGBA canvas implementing [`DrawingSurface`].
#[derive(Debug, Clone, Default)]
pub struct SoftwareSurface {
    canvas: RgbaImage,
    transform: Affine,
    filter: EffectChain,
}

impl SoftwareSurface {
    /// Create an empty 0x0 surface. Call `allocate` before drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current canvas pixels.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Consume the surface and return its canvas.
    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }
}

impl DrawingSurface for SoftwareSurface {
    type Error = SurfaceError;

    fn allocate(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.canvas = RgbaImage::new(width, height);
        self.transform = Affine::IDENTITY;
        self.filter = EffectChain::identity();
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.transform = self.transform.translate(x, y);
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), SurfaceError> {
        self.transform = self.transform.rotate(radians);
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.transform = self.transform.scale(x, y);
        Ok(())
    }

    fn set_filter(&mut self, effects: &EffectChain) -> Result<(), SurfaceError> {
        self.filter = effects.clone();
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &SourceImage,
        dx: f64,
        dy: f64,
        width: f64,
        height: f64,
    ) -> Result<(), SurfaceError> {
        if image.is_empty() || width == 0.0 || height == 0.0 {
            return Ok(());
        }

        // Destination rectangle to source pixels, then through the transform.
        let placement = self.transform.translate(dx, dy).scale(
            width / f64::from(image.width()),
            height / f64::from(image.height()),
        );
        let inverse = placement.invert().ok_or(SurfaceError::SingularTransform)?;

        let (canvas_w, canvas_h) = self.canvas.dimensions();
        let src = image.as_rgba_image();
        let (src_w, src_h) = (f64::from(src.width()), f64::from(src.height()));

        let mut layer = RgbaImage::new(canvas_w, canvas_h);
        for (x, y, out) in layer.enumerate_pixels_mut() {
            // Sample at pixel centers
            let (sx, sy) = inverse.apply(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
                continue;
            }
            *out = sample_bilinear(src, sx - 0.5, sy - 0.5);
        }

        apply_effect_chain(&mut layer, &self.filter);
        composite_over(&mut self.canvas, &layer);
        Ok(())
    }

    fn encode_png(&mut self) -> Result<Vec<u8>, SurfaceError> {
        let (width, height) = self.canvas.dimensions();
        Ok(encode_png(self.canvas.as_raw(), width, height)?)
    }
}

/// Get a pixel as premultiplied `[f64; 4]`, clamping coordinates to the edge.
#[inline]
fn get_premultiplied(image: &RgbaImage, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, i64::from(image.width()) - 1) as u32;
    let y = py.clamp(0, i64::from(image.height()) - 1) as u32;
    let p = image.get_pixel(x, y);
    let alpha = f64::from(p[3]) / 255.0;
    [
        f64::from(p[0]) * alpha,
        f64::from(p[1]) * alpha,
        f64::from(p[2]) * alpha,
        f64::from(p[3]),
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance. Interpolation runs on
/// premultiplied color so transparent neighbors do not darken edges.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_premultiplied(image, x0, y0);
    let p10 = get_premultiplied(image, x0 + 1, y0);
    let p01 = get_premultiplied(image, x0, y0 + 1);
    let p11 = get_premultiplied(image, x0 + 1, y0 + 1);

    let mut mixed = [0.0f64; 4];
    for i in 0..4 {
        mixed[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = mixed[3].clamp(0.0, 255.0);
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let unpremultiply = |c: f64| (c * 255.0 / alpha).clamp(0.0, 255.0).round() as u8;
    Rgba([
        unpremultiply(mixed[0]),
        unpremultiply(mixed[1]),
        unpremultiply(mixed[2]),
        alpha.round() as u8,
    ])
}

/// Source-over compositing of `layer` onto `canvas` (same size).
fn composite_over(canvas: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        let src_a = f64::from(src[3]) / 255.0;
        if src_a == 0.0 {
            continue;
        }
        let dst_a = f64::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let mut out = [0u8; 4];
        for i in 0..3 {
            let c = (f64::from(src[i]) * src_a + f64::from(dst[i]) * dst_a * (1.0 - src_a)) / out_a;
            out[i] = c.clamp(0.0, 255.0).round() as u8;
        }
        out[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
        *dst = Rgba(out);
    }
}
