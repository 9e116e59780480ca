use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{DetectError, Result};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Number of stage images written so far, shared between clones
    saved: Arc<AtomicUsize>,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(DetectError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("Debug directory is not empty: {}", output_dir.display()),
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self {
            output_dir,
            saved: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// File name for a stage, e.g. "02_target_threshold.png"
    fn stage_filename(&self, index: usize, stage: &str) -> String {
        format!("{:02}_{}.png", index, stage.to_lowercase().replace(' ', "_"))
    }

    fn save(&self, stage: &str, image: DynamicImage) -> Result<PathBuf> {
        let index = self.saved.fetch_add(1, Ordering::Relaxed);
        let path = self.output_dir.join(self.stage_filename(index, stage));
        image.save(&path).map_err(|source| DetectError::Debug {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Context available to all pipeline stages
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    /// Save a mask preview if debug mode is enabled
    pub fn save_gray(&self, stage: &str, image: &GrayImage) -> Result<()> {
        if let Some(debug) = &self.debug {
            let path = debug.save(stage, DynamicImage::ImageLuma8(image.clone()))?;
            tracing::debug!("saved {}", path.display());
        }
        Ok(())
    }

    /// Save a color preview if debug mode is enabled
    pub fn save_rgb(&self, stage: &str, image: &RgbImage) -> Result<()> {
        if let Some(debug) = &self.debug {
            let path = debug.save(stage, DynamicImage::ImageRgb8(image.clone()))?;
            tracing::debug!("saved {}", path.display());
        }
        Ok(())
    }
}
