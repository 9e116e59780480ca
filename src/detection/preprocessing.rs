use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageReader, Luma, Rgb, RgbImage};
use imageproc::stats::cumulative_histogram;

use crate::error::{DetectError, Result};

/// Decode an image and rescale it to `target_width` columns
pub fn load_and_scale(path: &Path, target_width: u32) -> Result<RgbImage> {
    let not_found = || DetectError::ImageNotFound {
        path: path.to_path_buf(),
    };

    let img = ImageReader::open(path)
        .map_err(|_| not_found())?
        .with_guessed_format()
        .map_err(|_| not_found())?
        .decode()
        .map_err(|e| {
            tracing::debug!("decode of {} failed: {}", path.display(), e);
            not_found()
        })?;

    tracing::debug!("Image loaded: {}x{}", img.width(), img.height());
    scale_to_width(&img.to_rgb8(), target_width)
}

/// Height matching `target_width` at the original aspect ratio.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let h = (target_width as f64 / width as f64 * height as f64).round();
    (h as u32).max(1)
}

/// Resize so the width equals `target_width`, keeping the aspect ratio
pub fn scale_to_width(img: &RgbImage, target_width: u32) -> Result<RgbImage> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::EmptyImage { width, height });
    }
    let new_height = scaled_height(width, height, target_width);
    if (width, height) == (target_width, new_height) {
        return Ok(img.clone());
    }
    Ok(imageops::resize(img, target_width, new_height, FilterType::Triangle))
}

/// Convert one RGB pixel to 8-bit HSV (hue in half degrees)
pub fn rgb_pixel_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h = (h / 2.0).round() as u32 % 180;
    [h as u8, s.round() as u8, v as u8]
}

pub fn rgb_to_hsv(img: &RgbImage) -> RgbImage {
    let mut hsv = RgbImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        hsv.put_pixel(x, y, Rgb(rgb_pixel_to_hsv(pixel.0)));
    }
    hsv
}

/// Histogram equalization that sends the darkest present level to 0 and the
/// brightest to 255. A single-level image is returned unchanged.
pub fn equalize_levels(gray: &GrayImage) -> GrayImage {
    let Some(cdf) = cumulative_histogram(gray).channels.into_iter().next() else {
        return gray.clone();
    };
    let total = cdf[255];
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    if total == cdf_min {
        return gray.clone();
    }

    let scale = 255.0 / f64::from(total - cdf_min);
    let lut: [u8; 256] = std::array::from_fn(|level| {
        let rank = cdf[level].saturating_sub(cdf_min);
        (f64::from(rank) * scale).round().min(255.0) as u8
    });

    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel[0] = lut[pixel[0] as usize];
    }
    out
}

/// HSV conversion followed by histogram equalization of the value channel only
pub fn hsv_equalize(img: &RgbImage) -> RgbImage {
    let mut hsv = rgb_to_hsv(img);

    let value = GrayImage::from_fn(hsv.width(), hsv.height(), |x, y| {
        Luma([hsv.get_pixel(x, y)[2]])
    });
    let equalized = equalize_levels(&value);

    for (x, y, pixel) in hsv.enumerate_pixels_mut() {
        pixel[2] = equalized.get_pixel(x, y)[0];
    }
    hsv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_height_rounds() {
        assert_eq!(scaled_height(2000, 1000, 1000), 500);
        assert_eq!(scaled_height(3000, 2001, 1000), 667);
        assert_eq!(scaled_height(3000, 2000, 1000), 667);
        assert_eq!(scaled_height(4000, 1, 1000), 1);
    }

    #[test]
    fn scale_preserves_aspect_ratio() {
        let img = RgbImage::new(300, 170);
        let scaled = scale_to_width(&img, 1000).unwrap();
        assert_eq!(scaled.dimensions(), (1000, 567));
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbImage::new(0, 10);
        assert!(matches!(
            scale_to_width(&img, 1000),
            Err(DetectError::EmptyImage { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_and_scale(Path::new("definitely/not/here.jpg"), 1000).unwrap_err();
        assert!(matches!(err, DetectError::ImageNotFound { .. }));
        assert_eq!(err.to_string(), "can not find: definitely/not/here.jpg");
    }

    #[test]
    fn undecodable_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("garbage.JPG");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            load_and_scale(&path, 1000),
            Err(DetectError::ImageNotFound { .. })
        ));
    }

    #[test]
    fn primary_colors_to_hsv() {
        assert_eq!(rgb_pixel_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_pixel_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_pixel_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_pixel_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_pixel_to_hsv([128, 128, 128]), [0, 0, 128]);
    }

    #[test]
    fn equalization_only_touches_value() {
        let img = RgbImage::from_fn(4, 1, |x, _| Rgb([(x * 60) as u8, 0, 0]));
        let plain = rgb_to_hsv(&img);
        let equalized = hsv_equalize(&img);
        for (a, b) in plain.pixels().zip(equalized.pixels()) {
            assert_eq!(a[0], b[0]);
            assert_eq!(a[1], b[1]);
        }
        // brightest pixel maps to the top of the range
        assert_eq!(equalized.get_pixel(3, 0)[2], 255);
    }

    #[test]
    fn dominant_dark_level_maps_to_zero() {
        // 90% dark gray, a 10-column light block on the right
        let img = RgbImage::from_fn(100, 50, |x, _| {
            if x >= 90 { Rgb([200, 200, 200]) } else { Rgb([20, 20, 20]) }
        });
        let equalized = hsv_equalize(&img);
        assert_eq!(equalized.get_pixel(10, 25)[2], 0);
        assert_eq!(equalized.get_pixel(95, 25)[2], 255);
    }

    #[test]
    fn middle_levels_spread_between_extremes() {
        let gray = GrayImage::from_vec(4, 1, vec![10, 20, 30, 40]).unwrap();
        let equalized = equalize_levels(&gray);
        assert_eq!(equalized.into_raw(), vec![0, 85, 170, 255]);
    }

    #[test]
    fn single_level_is_unchanged() {
        let gray = GrayImage::from_pixel(3, 3, Luma([200]));
        assert_eq!(equalize_levels(&gray), gray);
    }
}
