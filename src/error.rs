use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while measuring a target in a photograph.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The image could not be opened or decoded.
    #[error("can not find: {}", path.display())]
    ImageNotFound { path: PathBuf },

    /// The image has a zero dimension and cannot be scaled.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Thresholding left no external contour to fit.
    #[error("no contour found for {what} color")]
    NoContour { what: &'static str },

    /// The directory to list is missing or unreadable.
    #[error("can not open directory: {}", path.display())]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sample coordinate lies outside the image.
    #[error("sample point ({x}, {y}) is outside the {width}x{height} image")]
    SampleOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// The click source ended before a point was chosen.
    #[error("no point selected for \"{title}\"")]
    NoClick { title: String },

    /// Writing a debug preview failed.
    #[error("failed to save debug image {}: {source}", path.display())]
    Debug {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DetectError>;
