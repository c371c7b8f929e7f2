//! Error types for the masking pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MaskError.
pub type MaskResult<T> = Result<T, MaskError>;

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("Image too large ({width}x{height})")]
    ImageTooLarge { width: usize, height: usize },

    #[error("Reference radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Mask threshold must be finite, got {0}")]
    InvalidThreshold(f64),

    #[error("Array of {actual} values does not match {width}x{height}")]
    LengthMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Unknown sample image: {0}")]
    UnknownSample(String),

    #[error("Sample file '{file}' not found (searched {searched:?})")]
    SampleNotFound { file: String, searched: Vec<PathBuf> },

    #[error("Failed to load image: {0}")]
    Fits(#[from] fits_parser::FitsError),

    #[error("Coordinate transform failed: {0}")]
    Projection(#[from] projection::ProjectionError),

    #[error("Map construction failed: {0}")]
    Map(#[from] solar_common::SolarError),
}
