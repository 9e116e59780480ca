use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use crate::config::DetectionConfig;
use crate::models::HsvColor;

pub const ON: u8 = 255;
pub const OFF: u8 = 0;

/// Mark pixels within `margin` of `color` on every channel.
///
/// Bounds are clamped to 0..=255, so hue does not wrap around.
pub fn range_mask(hsv: &RgbImage, color: HsvColor, margin: u8) -> GrayImage {
    let low = color.channels().map(|c| c.saturating_sub(margin));
    let high = color.channels().map(|c| c.saturating_add(margin));

    GrayImage::from_fn(hsv.width(), hsv.height(), |x, y| {
        let pixel = hsv.get_pixel(x, y);
        let inside = (0..3).all(|c| low[c] <= pixel[c] && pixel[c] <= high[c]);
        Luma([if inside { ON } else { OFF }])
    })
}

/// Opening then closing with a square structuring element of radius `k`
pub fn suppress_noise(mask: &GrayImage, k: u8) -> GrayImage {
    if k == 0 {
        return mask.clone();
    }
    let opened = open(mask, Norm::LInf, k);
    close(&opened, Norm::LInf, k)
}

pub fn range_threshold(hsv: &RgbImage, color: HsvColor, config: &DetectionConfig) -> GrayImage {
    let mask = range_mask(hsv, color, config.margin);
    suppress_noise(&mask, config.kernel_radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn mask_uses_box_distance() {
        let reference = HsvColor::new(100, 100, 100);
        let hsv = RgbImage::from_vec(
            5,
            1,
            vec![
                100, 100, 100, // exact
                150, 50, 150, // on the edge of every channel
                151, 100, 100, // hue just outside
                100, 49, 100, // saturation just outside
                100, 100, 151, // value just outside
            ],
        )
        .unwrap();

        let mask = range_mask(&hsv, reference, 50);
        let values: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![ON, ON, OFF, OFF, OFF]);
    }

    #[test]
    fn bounds_saturate_at_channel_limits() {
        let hsv = RgbImage::from_vec(2, 1, vec![0, 255, 255, 61, 255, 255]).unwrap();
        let mask = range_mask(&hsv, HsvColor::new(10, 230, 240), 50);
        assert_eq!(mask.get_pixel(0, 0)[0], ON);
        assert_eq!(mask.get_pixel(1, 0)[0], OFF);
    }

    #[test]
    fn clean_mask_survives_open_close() {
        let mut mask = GrayImage::new(40, 40);
        for y in 10..30 {
            for x in 8..28 {
                mask.put_pixel(x, y, Luma([ON]));
            }
        }
        assert_eq!(suppress_noise(&mask, 2), mask);
    }

    #[test]
    fn speckles_and_pinholes_are_removed() {
        let mut mask = GrayImage::new(40, 40);
        for y in 10..30 {
            for x in 10..30 {
                mask.put_pixel(x, y, Luma([ON]));
            }
        }
        let clean = mask.clone();
        mask.put_pixel(2, 2, Luma([ON]));
        mask.put_pixel(20, 20, Luma([OFF]));

        assert_eq!(suppress_noise(&mask, 2), clean);
    }

    #[test]
    fn threshold_applies_config() {
        let hsv = RgbImage::from_pixel(12, 12, Rgb([30, 200, 200]));
        let config = DetectionConfig::default();
        let mask = range_threshold(&hsv, HsvColor::new(0, 200, 200), &config);
        assert!(mask.pixels().all(|p| p[0] == ON));
    }
}
