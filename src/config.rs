/// Default half-width of the color box, per HSV channel.
pub const DEFAULT_MARGIN: u8 = 50;

/// Default width every photo is rescaled to before processing.
pub const DEFAULT_TARGET_WIDTH: u32 = 1000;

/// Default side of the square structuring element used for noise removal.
pub const DEFAULT_KERNEL_SIZE: u8 = 5;

/// Tunable parameters of the segmentation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Threshold half-width in each HSV channel
    pub margin: u8,
    /// Normalization width in pixels
    pub target_width: u32,
    /// Structuring element side (odd, 5 means 5x5)
    pub kernel_size: u8,
}

impl DetectionConfig {
    pub fn new() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            target_width: DEFAULT_TARGET_WIDTH,
            kernel_size: DEFAULT_KERNEL_SIZE,
        }
    }

    pub fn with_margin(mut self, margin: u8) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_target_width(mut self, target_width: u32) -> Self {
        self.target_width = target_width.max(1);
        self
    }

    pub fn with_kernel_size(mut self, kernel_size: u8) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Radius handed to the morphology operators (5x5 square -> 2).
    pub fn kernel_radius(&self) -> u8 {
        self.kernel_size / 2
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = DetectionConfig::default();
        assert_eq!(config.margin, 50);
        assert_eq!(config.target_width, 1000);
        assert_eq!(config.kernel_radius(), 2);
    }

    #[test]
    fn zero_width_is_clamped() {
        assert_eq!(DetectionConfig::new().with_target_width(0).target_width, 1);
    }
}
