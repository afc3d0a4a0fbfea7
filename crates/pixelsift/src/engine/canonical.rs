use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use super::error::CompareError;
use crate::config::CompareConfig;

/// Scale factor derived from the expected image alone.
///
/// Non-square frames get twice the uniform fit, so narrow or tall
/// canvases keep more usable pixels after background padding. This is
/// deliberate domain tuning, not a general scaling rule; the formula
/// must stay as-is for result compatibility.
fn scale_factor(width: u32, height: u32, max_side: u32) -> f64 {
    let fit_w = f64::from(max_side) / f64::from(width);
    let fit_h = f64::from(max_side) / f64::from(height);
    let mut scale = fit_w.min(fit_h);
    if width != height {
        scale *= 2.0;
    }
    scale
}

fn scaled_dims(img: &RgbaImage, scale: f64) -> (u32, u32) {
    let w = (f64::from(img.width()) * scale).round().max(1.0) as u32;
    let h = (f64::from(img.height()) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Project both images onto a shared canonical canvas.
///
/// The canvas takes its size from the resized expected image. Both
/// images are resized by the single scale factor computed from the
/// expected image, then composited at the origin over the configured
/// background, clipping anything that overhangs. The two returned
/// buffers always share exact dimensions.
pub fn canonicalize(
    expected: &RgbaImage,
    actual: &RgbaImage,
    config: &CompareConfig,
) -> Result<(RgbaImage, RgbaImage), CompareError> {
    for img in [expected, actual] {
        if img.width() == 0 || img.height() == 0 {
            return Err(CompareError::EmptyImage {
                width: img.width(),
                height: img.height(),
            });
        }
    }

    let scale = scale_factor(expected.width(), expected.height(), config.max_canvas_side);
    let (canvas_w, canvas_h) = scaled_dims(expected, scale);
    debug!(scale, canvas_w, canvas_h, "canonical canvas");

    let left = project(expected, scale, canvas_w, canvas_h, config.background_color);
    let right = project(actual, scale, canvas_w, canvas_h, config.background_color);
    Ok((left, right))
}

/// Resize by `scale` and composite onto a background-filled canvas.
fn project(
    img: &RgbaImage,
    scale: f64,
    canvas_w: u32,
    canvas_h: u32,
    background: [u8; 4],
) -> RgbaImage {
    let (w, h) = scaled_dims(img, scale);
    // Bilinear keeps resampling deterministic for identical inputs.
    let resized = imageops::resize(img, w, h, imageops::FilterType::Triangle);
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba(background));
    imageops::overlay(&mut canvas, &resized, 0, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn solid(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, BLUE)
    }

    fn config(max_side: u32) -> CompareConfig {
        CompareConfig {
            max_canvas_side: max_side,
            ..Default::default()
        }
    }

    #[test]
    fn portrait_aspect_doubles_scale() {
        // 100x200, max side 800: uniform fit is min(8, 4) = 4, doubled
        // to 8 for the non-square aspect, so the canvas is 800x1600.
        let expected = solid(100, 200);
        let actual = solid(37, 91);
        let (left, right) = canonicalize(&expected, &actual, &config(800)).unwrap();
        assert_eq!(left.dimensions(), (800, 1600));
        assert_eq!(right.dimensions(), (800, 1600));
    }

    #[test]
    fn square_uses_uniform_fit() {
        let expected = solid(100, 100);
        let actual = solid(100, 100);
        let (left, right) = canonicalize(&expected, &actual, &config(400)).unwrap();
        assert_eq!(left.dimensions(), (400, 400));
        assert_eq!(right.dimensions(), (400, 400));
        assert_eq!(left.get_pixel(399, 399).0, BLUE.0);
    }

    #[test]
    fn background_fills_uncovered_area() {
        // Actual is half as wide as expected; its resized copy covers
        // only the left half of the canvas, the rest is background.
        let expected = solid(100, 200);
        let actual = solid(50, 200);
        let (_, right) = canonicalize(&expected, &actual, &config(800)).unwrap();
        assert_eq!(right.dimensions(), (800, 1600));
        assert_eq!(right.get_pixel(10, 10).0, BLUE.0);
        let background = CompareConfig::default().background_color;
        assert_eq!(right.get_pixel(790, 10).0, background);
    }

    #[test]
    fn oversized_actual_is_clipped() {
        let expected = solid(100, 100);
        let actual = solid(200, 100);
        let (left, right) = canonicalize(&expected, &actual, &config(400)).unwrap();
        assert_eq!(left.dimensions(), (400, 400));
        assert_eq!(right.dimensions(), (400, 400));
        // Clipped, not squeezed: the visible area is still solid blue.
        assert_eq!(right.get_pixel(399, 0).0, BLUE.0);
    }

    #[test]
    fn identical_inputs_stay_identical() {
        let expected = solid(123, 77);
        let actual = expected.clone();
        let (left, right) = canonicalize(&expected, &actual, &config(400)).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn zero_area_input_is_rejected() {
        let err = canonicalize(&RgbaImage::new(0, 10), &solid(10, 10), &config(400)).unwrap_err();
        assert!(matches!(err, CompareError::EmptyImage { .. }), "{err}");
    }
}
