use std::collections::VecDeque;

use image::RgbImage;

use crate::error::{DetectError, Result};
use crate::models::{ColorSamples, HsvColor, PixelPoint};

pub const BACKGROUND_TITLE: &str = "catch background color";
pub const TARGET_TITLE: &str = "catch target color";

/// Something that can show an image and hand back the pixel the operator picked
pub trait ClickSource {
    /// Block until a point is chosen on `image`.
    fn wait_for_click(&mut self, title: &str, image: &RgbImage) -> Result<PixelPoint>;
}

/// Click source that replays coordinates chosen up front
#[derive(Debug, Clone, Default)]
pub struct FixedClicks {
    points: VecDeque<PixelPoint>,
}

impl FixedClicks {
    pub fn new(points: impl IntoIterator<Item = PixelPoint>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Background click first, then target
    pub fn background_then_target(background: PixelPoint, target: PixelPoint) -> Self {
        Self::new([background, target])
    }
}

impl ClickSource for FixedClicks {
    fn wait_for_click(&mut self, title: &str, _image: &RgbImage) -> Result<PixelPoint> {
        self.points.pop_front().ok_or_else(|| DetectError::NoClick {
            title: title.to_string(),
        })
    }
}

/// Look up one pixel of an HSV image
pub fn sample_at(hsv: &RgbImage, point: PixelPoint) -> Result<HsvColor> {
    let (width, height) = hsv.dimensions();
    if point.x >= width || point.y >= height {
        return Err(DetectError::SampleOutOfBounds {
            x: point.x,
            y: point.y,
            width,
            height,
        });
    }
    let [h, s, v] = hsv.get_pixel(point.x, point.y).0;
    Ok(HsvColor::new(h, s, v))
}

/// Ask for the background point, then the target point, on `image` and
/// sample both in `hsv`, its equalized HSV version
pub fn catch_colors(
    image: &RgbImage,
    hsv: &RgbImage,
    source: &mut dyn ClickSource,
) -> Result<ColorSamples> {
    let background_point = source.wait_for_click(BACKGROUND_TITLE, image)?;
    tracing::info!("catch color at: ({}, {})", background_point.x, background_point.y);

    let target_point = source.wait_for_click(TARGET_TITLE, image)?;
    tracing::info!("catch color at: ({}, {})", target_point.x, target_point.y);

    let samples = ColorSamples {
        background: sample_at(hsv, background_point)?,
        target: sample_at(hsv, target_point)?,
    };

    tracing::info!("background color: {}", samples.background);
    tracing::info!("target color: {}", samples.target);
    Ok(samples)
}
