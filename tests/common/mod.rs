mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from shotmark for tests
pub use shotmark::{
    DetectError, DetectionConfig, DetectionPipeline, FixedClicks, Measurement, PixelPoint,
};
