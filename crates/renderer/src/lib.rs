//! Image rendering for solar maps.
//!
//! - Colormapped images, with masked and non-finite pixels in the bad color
//! - Solar limb overlay
//! - PNG encoding (indexed or RGBA)

pub mod gradient;
pub mod limb;
pub mod png;
pub mod style;

use projection::ProjectionError;
use solar_common::SolarError;
use thiserror::Error;

pub use gradient::{display_limits, render_map};
pub use limb::{draw_limb, limb_points, LimbStyle};
pub use png::{encode_png, write_png};
pub use style::{ColormapDefinition, StyleConfig};

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot render an empty image")]
    EmptyImage,

    #[error("Image dimensions too large: {width}x{height}")]
    ImageTooLarge { width: usize, height: usize },

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("PNG compression failed: {0}")]
    Compression(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid style file: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Map(#[from] SolarError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::InvalidStyle(err.to_string())
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> Self {
        RenderError::InvalidStyle(err.to_string())
    }
}
