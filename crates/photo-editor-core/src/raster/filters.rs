//! Pixel implementation of the visual-effect chain.
//!
//! Each stage follows the Filter Effects shorthand definitions that browsers
//! use for CSS `filter` and canvas `ctx.filter`, so an export rendered here
//! matches the live preview:
//!
//! - brightness, contrast, opacity: linear transfer functions
//! - saturate, grayscale, sepia: 3x3 color matrices
//! - blur: Gaussian with standard deviation equal to the radius
//!
//! Colors are clamped to `[0, 1]` after every stage.

use image::{Rgba, RgbaImage};

use crate::render::{Effect, EffectChain};

type Matrix = [[f32; 3]; 3];

/// Apply every stage of `chain` to `layer`, in order.
///
/// Consecutive per-pixel stages are fused into one pass; blur splits the
/// chain because it needs the whole neighborhood.
pub fn apply_effect_chain(layer: &mut RgbaImage, chain: &EffectChain) {
    let mut pending: Vec<Effect> = Vec::new();
    for effect in chain {
        if effect.is_identity() {
            continue;
        }
        match *effect {
            Effect::Blur(radius) => {
                apply_color_stages(layer, &pending);
                pending.clear();
                apply_blur(layer, radius);
            }
            other => pending.push(other),
        }
    }
    apply_color_stages(layer, &pending);
}

fn apply_color_stages(layer: &mut RgbaImage, stages: &[Effect]) {
    if stages.is_empty() {
        return;
    }

    for pixel in layer.pixels_mut() {
        // Fully transparent pixels stay transparent under every color stage.
        if pixel[3] == 0 {
            continue;
        }
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];
        let mut alpha = pixel[3] as f32 / 255.0;

        for stage in stages {
            match *stage {
                Effect::Brightness(amount) => rgb = linear(rgb, amount / 100.0, 0.0),
                Effect::Contrast(amount) => {
                    let slope = amount / 100.0;
                    rgb = linear(rgb, slope, 0.5 - 0.5 * slope);
                }
                Effect::Saturate(amount) => rgb = multiply(&saturate_matrix(amount / 100.0), rgb),
                Effect::Grayscale(amount) => {
                    rgb = multiply(&grayscale_matrix(amount / 100.0), rgb)
                }
                Effect::Sepia(amount) => rgb = multiply(&sepia_matrix(amount / 100.0), rgb),
                Effect::Opacity(amount) => alpha = (alpha * (amount / 100.0)).clamp(0.0, 1.0),
                Effect::Blur(_) => {}
            }
        }

        *pixel = Rgba([
            to_byte(rgb[0]),
            to_byte(rgb[1]),
            to_byte(rgb[2]),
            to_byte(alpha),
        ]);
    }
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `c * slope + intercept` per channel.
#[inline]
fn linear(rgb: [f32; 3], slope: f32, intercept: f32) -> [f32; 3] {
    rgb.map(|c| (c * slope + intercept).clamp(0.0, 1.0))
}

#[inline]
fn multiply(m: &Matrix, rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        (m[0][0] * r + m[0][1] * g + m[0][2] * b).clamp(0.0, 1.0),
        (m[1][0] * r + m[1][1] * g + m[1][2] * b).clamp(0.0, 1.0),
        (m[2][0] * r + m[2][1] * g + m[2][2] * b).clamp(0.0, 1.0),
    ]
}

/// Saturation matrix; `s` = 1 is unchanged, may exceed 1.
fn saturate_matrix(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

/// Grayscale matrix; `amount` in `[0, 1]`, 1 is fully gray.
fn grayscale_matrix(amount: f32) -> Matrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

/// Sepia matrix; `amount` in `[0, 1]`, 1 is full sepia.
fn sepia_matrix(amount: f32) -> Matrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

/// Gaussian blur over premultiplied color, so transparent surroundings do
/// not bleed dark fringes into the image.
///
/// Everything outside the layer counts as transparent black, the way a
/// browser filter region does: the layer is padded by three standard
/// deviations of transparency before blurring and cropped back afterwards,
/// so opaque edges fade out instead of repeating the border pixels.
fn apply_blur(layer: &mut RgbaImage, radius: f32) {
    if radius <= 0.0 {
        return;
    }

    let (width, height) = layer.dimensions();
    let pad = (radius * 3.0).ceil() as u32;
    let mut padded = RgbaImage::new(width + 2 * pad, height + 2 * pad);
    for (x, y, pixel) in layer.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0;
        let premultiplied = Rgba([
            (pixel[0] as f32 * alpha).round() as u8,
            (pixel[1] as f32 * alpha).round() as u8,
            (pixel[2] as f32 * alpha).round() as u8,
            pixel[3],
        ]);
        padded.put_pixel(x + pad, y + pad, premultiplied);
    }

    let blurred = image::imageops::blur(&padded, radius);
    let mut cropped = image::imageops::crop_imm(&blurred, pad, pad, width, height).to_image();

    for pixel in cropped.pixels_mut() {
        let alpha = pixel[3] as f32 / 255.0;
        if alpha == 0.0 {
            *pixel = Rgba([0, 0, 0, 0]);
            continue;
        }
        for channel in 0..3 {
            pixel[channel] = (pixel[channel] as f32 / alpha).round().min(255.0) as u8;
        }
    }

    *layer = cropped;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EditParameters;
    use crate::render::effect_chain;

    /// Helper to create a single-pixel layer.
    fn pixel(r: u8, g: u8, b: u8, a: u8) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, Rgba([r, g, b, a]))
    }

    /// Helper to run a parameter set over a layer and return the first pixel.
    fn apply(layer: &RgbaImage, params: &EditParameters) -> [u8; 4] {
        let mut out = layer.clone();
        apply_effect_chain(&mut out, &effect_chain(params));
        out.get_pixel(0, 0).0
    }

    // ===== Identity Tests =====

    #[test]
    fn test_identity_default_chain() {
        let layer = pixel(128, 64, 192, 255);
        assert_eq!(apply(&layer, &EditParameters::default()), [128, 64, 192, 255]);
    }

    #[test]
    fn test_identity_matrices() {
        let rgb = [0.2, 0.5, 0.9];
        for m in [saturate_matrix(1.0), grayscale_matrix(0.0), sepia_matrix(0.0)] {
            let out = multiply(&m, rgb);
            for i in 0..3 {
                assert!((out[i] - rgb[i]).abs() < 1e-3, "{out:?}");
            }
        }
    }

    // ===== Linear Stages =====

    #[test]
    fn test_brightness_doubles() {
        let params = EditParameters {
            brightness: 200.0,
            ..Default::default()
        };
        assert_eq!(apply(&pixel(60, 60, 60, 255), &params), [120, 120, 120, 255]);
    }

    #[test]
    fn test_brightness_zero_is_black() {
        let params = EditParameters {
            brightness: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&pixel(200, 100, 50, 255), &params), [0, 0, 0, 255]);
    }

    #[test]
    fn test_contrast_zero_is_mid_gray() {
        let params = EditParameters {
            contrast: 0.0,
            ..Default::default()
        };
        let out = apply(&pixel(10, 128, 250, 255), &params);
        assert_eq!(&out[..3], &[128, 128, 128]);
    }

    #[test]
    fn test_contrast_increase_spreads() {
        let params = EditParameters {
            contrast: 200.0,
            ..Default::default()
        };
        let out = apply(&pixel(64, 128, 192, 255), &params);
        assert!(out[0] < 64, "Dark pixel should get darker");
        assert!(out[2] > 192, "Bright pixel should get brighter");
    }

    #[test]
    fn test_opacity_scales_alpha_only() {
        let params = EditParameters {
            opacity: 50.0,
            ..Default::default()
        };
        assert_eq!(apply(&pixel(10, 20, 30, 255), &params), [10, 20, 30, 128]);
    }

    // ===== Matrix Stages =====

    #[test]
    fn test_full_grayscale_equalizes_channels() {
        let params = EditParameters {
            grayscale: 100.0,
            ..Default::default()
        };
        let out = apply(&pixel(200, 50, 10, 255), &params);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn test_zero_saturation_equalizes_channels() {
        let params = EditParameters {
            saturation: 0.0,
            ..Default::default()
        };
        let out = apply(&pixel(255, 0, 0, 255), &params);
        assert!((out[0] as i32 - out[1] as i32).abs() <= 1);
        assert!((out[1] as i32 - out[2] as i32).abs() <= 1);
    }

    #[test]
    fn test_saturation_increase() {
        let params = EditParameters {
            saturation: 150.0,
            ..Default::default()
        };
        let out = apply(&pixel(200, 128, 100, 255), &params);
        assert!(out[0] as i32 - out[2] as i32 > 100, "Color difference should increase");
    }

    #[test]
    fn test_full_sepia_white() {
        let params = EditParameters {
            sepia: 100.0,
            ..Default::default()
        };
        // Row sums: 1.351, 1.203, 0.937
        assert_eq!(apply(&pixel(255, 255, 255, 255), &params), [255, 255, 239, 255]);
    }

    // ===== Order =====

    #[test]
    fn test_stage_order_matters() {
        // brightness(0%) runs before contrast, so contrast(0%) lifts black to gray
        let params = EditParameters {
            brightness: 0.0,
            contrast: 0.0,
            ..Default::default()
        };
        let out = apply(&pixel(255, 255, 255, 255), &params);
        assert_eq!(&out[..3], &[128, 128, 128]);
    }

    // ===== Blur =====

    #[test]
    fn test_blur_spreads_a_dot() {
        let mut layer = RgbaImage::from_pixel(9, 9, Rgba([0, 0, 0, 255]));
        layer.put_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let params = EditParameters {
            blur: 1.0,
            ..Default::default()
        };
        apply_effect_chain(&mut layer, &effect_chain(&params));

        assert!(layer.get_pixel(4, 4)[0] < 255, "Center should dim");
        assert!(layer.get_pixel(5, 4)[0] > 0, "Neighbor should brighten");
    }

    #[test]
    fn test_blur_keeps_uniform_interior() {
        let mut layer = RgbaImage::from_pixel(40, 40, Rgba([90, 90, 90, 255]));
        let params = EditParameters {
            blur: 2.0,
            ..Default::default()
        };
        apply_effect_chain(&mut layer, &effect_chain(&params));

        let center = layer.get_pixel(20, 20);
        assert!((center[0] as i32 - 90).abs() <= 1);
        assert!(center[3] >= 254, "Interior should stay opaque");
    }

    #[test]
    fn test_blur_fades_edges_to_transparent() {
        // Outside the layer is transparent black, so a corner keeps roughly
        // a quarter of its coverage and an edge midpoint roughly half.
        let mut layer = RgbaImage::from_pixel(40, 40, Rgba([90, 90, 90, 255]));
        let params = EditParameters {
            blur: 5.0,
            ..Default::default()
        };
        apply_effect_chain(&mut layer, &effect_chain(&params));

        let corner = layer.get_pixel(0, 0);
        let edge = layer.get_pixel(0, 20);
        assert!(corner[3] > 30 && corner[3] < 110, "corner alpha {}", corner[3]);
        assert!(edge[3] > corner[3] && edge[3] < 200, "edge alpha {}", edge[3]);
        // Color is unpremultiplied back to the original gray
        assert!((corner[0] as i32 - 90).abs() <= 3, "corner {corner:?}");
    }

    #[test]
    fn test_transparent_pixels_untouched_by_color_stages() {
        let params = EditParameters {
            brightness: 200.0,
            sepia: 100.0,
            ..Default::default()
        };
        assert_eq!(apply(&pixel(0, 0, 0, 0), &params), [0, 0, 0, 0]);
    }
}
