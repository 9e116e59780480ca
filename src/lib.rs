pub mod config;
pub mod detection;
pub mod error;
pub mod listing;
pub mod models;
pub mod pipeline;
pub mod sampling;

pub use config::DetectionConfig;
pub use detection::DetectionPipeline;
pub use error::DetectError;
pub use models::{BackgroundFit, Circle, ColorSamples, Contour, HsvColor, Measurement, PixelPoint, TargetFit};
pub use pipeline::{DebugConfig, PipelineContext};
pub use sampling::{ClickSource, FixedClicks};

#[cfg(feature = "gui")]
pub mod gui;
