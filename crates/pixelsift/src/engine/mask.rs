use image::RgbaImage;
use tracing::debug;

use crate::config::CompareConfig;

/// Marker the diff provider writes at every differing pixel.
/// The cluster analyzer keys off this exact tuple.
pub const DIFF_MARKER: [u8; 4] = [255, 0, 0, 255];

/// Maximum possible delta in YIQ color space (used by dify internally).
const MAX_YIQ_POSSIBLE_DELTA: f32 = 35215.0;

pub struct MaskResult {
    /// Differing pixels above threshold, pre-clustering.
    pub diff_pixels: u64,
    /// Diff visualization: the expected image dimmed to
    /// `alpha_threshold`, with differing pixels painted `DIFF_MARKER`.
    /// `None` when no pixel crossed the threshold.
    pub diff_image: Option<RgbaImage>,
}

/// Run the external per-pixel diff over two equal-sized canonical buffers.
pub fn diff_mask(left: RgbaImage, right: RgbaImage, config: &CompareConfig) -> MaskResult {
    debug_assert_eq!(left.dimensions(), right.dimensions());

    // get_results expects a pre-computed threshold:
    // raw_threshold^2 * MAX_YIQ_POSSIBLE_DELTA
    let computed_threshold =
        MAX_YIQ_POSSIBLE_DELTA * config.threshold as f32 * config.threshold as f32;

    let output_base = Some(dify::cli::OutputImageBase::LeftImage);
    let block_out: Option<std::collections::HashSet<(u32, u32)>> = None;

    match dify::diff::get_results(
        left,
        right,
        computed_threshold,
        !config.include_anti_aliasing,
        Some(config.alpha_threshold as f32),
        &output_base,
        &block_out,
    ) {
        Some((diff_count, diff_image)) => {
            let diff_pixels = diff_count.max(0) as u64;
            debug!(diff_pixels, "diff mask produced");
            MaskResult {
                diff_pixels,
                diff_image: Some(diff_image),
            }
        }
        // None means the buffers are identical under the tolerance rules.
        None => MaskResult {
            diff_pixels: 0,
            diff_image: None,
        },
    }
}

/// Differs-test matching the provider's marker convention.
pub fn is_diff_pixel(mask: &RgbaImage, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y).0 == DIFF_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn config_counting_aa() -> CompareConfig {
        // Count anti-aliased pixels so small test fixtures aren't
        // swallowed by the provider's AA filter.
        CompareConfig {
            include_anti_aliasing: true,
            ..Default::default()
        }
    }

    #[test]
    fn identical_buffers_yield_no_mask() {
        let img = RgbaImage::from_pixel(20, 20, Rgba([128, 128, 128, 255]));
        let result = diff_mask(img.clone(), img, &config_counting_aa());
        assert_eq!(result.diff_pixels, 0);
        assert!(result.diff_image.is_none());
    }

    #[test]
    fn changed_pixel_carries_the_marker() {
        let left = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        let mut right = left.clone();
        right.put_pixel(5, 5, Rgba([0, 0, 0, 255]));

        let result = diff_mask(left, right, &config_counting_aa());
        assert!(result.diff_pixels >= 1);
        let mask = result.diff_image.expect("mask for a real difference");
        assert!(is_diff_pixel(&mask, 5, 5));
        assert!(!is_diff_pixel(&mask, 0, 0));
    }

    #[test]
    fn sub_threshold_nudge_is_ignored() {
        let left = RgbaImage::from_pixel(10, 10, Rgba([128, 128, 128, 255]));
        let mut right = left.clone();
        right.put_pixel(3, 3, Rgba([129, 128, 128, 255]));

        let result = diff_mask(left, right, &config_counting_aa());
        assert_eq!(result.diff_pixels, 0);
    }
}
