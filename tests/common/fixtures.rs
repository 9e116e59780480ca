use image::{Rgb, RgbImage};
use tempfile::NamedTempFile;

pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// A `width` x `height` blue photo with one red disk.
pub fn disk_on_background(
    width: u32,
    height: u32,
    center: (u32, u32),
    radius: u32,
) -> RgbImage {
    let r2 = (radius * radius) as i64;
    RgbImage::from_fn(width, height, |x, y| {
        let dx = x as i64 - center.0 as i64;
        let dy = y as i64 - center.1 as i64;
        if dx * dx + dy * dy <= r2 { RED } else { BLUE }
    })
}

/// Saves `img` as a temporary PNG file.
/// The file will be automatically cleaned up when dropped.
pub fn save_temp_png(img: &RgbImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
