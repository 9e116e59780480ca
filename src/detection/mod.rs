pub mod preprocessing;
pub mod threshold;
pub mod contours;
pub mod circles;

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::config::DetectionConfig;
use crate::error::Result;
use crate::models::{BackgroundFit, Circle, HsvColor, Measurement, TargetFit};
use crate::pipeline::{DebugConfig, PipelineContext};
use crate::sampling::{self, ClickSource};

/// Target mask plus the circle fitted to its largest contour
#[derive(Debug, Clone)]
pub struct TargetStage {
    pub mask: GrayImage,
    pub fit: TargetFit,
    /// Mask-sized black image with the fitted circle drawn in white
    pub preview: GrayImage,
}

#[derive(Debug, Clone)]
pub struct BackgroundStage {
    pub mask: GrayImage,
    pub fit: BackgroundFit,
}

/// Main detection pipeline orchestrator
#[derive(Debug, Clone, Default)]
pub struct DetectionPipeline {
    pub config: DetectionConfig,
    context: PipelineContext,
}

impl DetectionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Save stage previews to `output_dir`, which must be empty or absent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.context.debug = Some(DebugConfig::new(output_dir)?);
        Ok(self)
    }

    /// Load an image and normalize it to the configured width
    pub fn load(&self, path: &Path) -> Result<RgbImage> {
        let img = preprocessing::load_and_scale(path, self.config.target_width)?;
        if self.context.verbose {
            tracing::info!(
                "scaled {} to {}x{}",
                path.display(),
                img.width(),
                img.height()
            );
        }
        self.context.save_rgb("input", &img)?;
        Ok(img)
    }

    /// Threshold around `color` and clean the mask up
    pub fn threshold(&self, hsv: &RgbImage, color: HsvColor, stage: &str) -> Result<GrayImage> {
        let mask = threshold::range_threshold(hsv, color, &self.config);
        self.context.save_gray(stage, &mask)?;
        Ok(mask)
    }

    /// Largest external contour of the target mask, as a circle
    pub fn contour_target(&self, hsv: &RgbImage, color: HsvColor) -> Result<TargetStage> {
        let mask = self.threshold(hsv, color, "target threshold")?;

        let contours = contours::external_contours(&mask);
        tracing::info!("find {} contours", contours.len());

        let fit = circles::fit_target(&contours)?;
        let preview = draw_circle_preview(mask.width(), mask.height(), &fit.circle);
        self.context.save_gray("target contours", &preview)?;

        Ok(TargetStage { mask, fit, preview })
    }

    /// Circles around every external contour of the background mask
    pub fn contour_background(&self, hsv: &RgbImage, color: HsvColor) -> Result<BackgroundStage> {
        let mask = self.threshold(hsv, color, "background threshold")?;

        let contours = contours::external_contours(&mask);
        tracing::info!("find {} contours", contours.len());

        let fit = circles::fit_all(&contours);
        if self.context.verbose {
            for (i, circle) in fit.circles().enumerate() {
                tracing::info!(
                    "  background circle {}: center=({:.1}, {:.1}) radius={:.1}",
                    i,
                    circle.center.0,
                    circle.center.1,
                    circle.radius
                );
            }
        }

        Ok(BackgroundStage { mask, fit })
    }

    /// Run the full pipeline on a normalized image
    pub fn measure(&self, image: &RgbImage, source: &mut dyn ClickSource) -> Result<Measurement> {
        let hsv = preprocessing::hsv_equalize(image);
        self.context.save_rgb("hsv equalized", &hsv)?;

        let colors = sampling::catch_colors(image, &hsv, source)?;

        let target = self.contour_target(&hsv, colors.target)?;
        let background = self.contour_background(&hsv, colors.background)?;

        Ok(Measurement {
            colors,
            target: target.fit,
            background: background.fit,
        })
    }

    /// Load, normalize and measure one file
    pub fn measure_file(&self, path: &Path, source: &mut dyn ClickSource) -> Result<Measurement> {
        let image = self.load(path)?;
        self.measure(&image, source)
    }
}

/// Black canvas with a 2 px white outline of `circle`
pub fn draw_circle_preview(width: u32, height: u32, circle: &Circle) -> GrayImage {
    let mut canvas = GrayImage::new(width, height);
    let center = circle.pixel_center();
    let radius = circle.radius as i32;
    draw_hollow_circle_mut(&mut canvas, center, radius, Luma([255]));
    draw_hollow_circle_mut(&mut canvas, center, radius + 1, Luma([255]));
    canvas
}
