//! Error types for solar map handling.

use thiserror::Error;

/// Result type alias using SolarError.
pub type SolarResult<T> = Result<T, SolarError>;

/// Primary error type for map construction and display configuration.
#[derive(Debug, Error)]
pub enum SolarError {
    // === Shape Errors ===
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("Shape mismatch: expected {expected_height}x{expected_width}, got {actual_height}x{actual_width}")]
    ShapeMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("Data length {actual} does not match {width}x{height}")]
    DataLength {
        width: usize,
        height: usize,
        actual: usize,
    },

    // === Display Errors ===
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid colormap '{name}': {message}")]
    InvalidColormap { name: String, message: String },
}
