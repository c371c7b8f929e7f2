//! Coordinate transformations for solar images.
//!
//! Implements the FITS WCS pixel <-> helioprojective transform from scratch:
//! a linear pixel transform (`CRPIX`, `CDELT`, `PCi_j`) followed by the
//! gnomonic (TAN) sky projection.

pub mod helioprojective;
pub mod wcs;

use thiserror::Error;

pub use helioprojective::SphericalRotation;
pub use wcs::{ProjectionKind, Wcs};

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors raised while building or applying a WCS transform.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Unsupported CTYPE pair: {0}")]
    UnsupportedCtype(String),

    #[error("Unsupported CUNIT: {0}")]
    UnsupportedUnit(String),

    #[error("Invalid plate scale (CDELT): {0:?}")]
    InvalidScale([f64; 2]),

    #[error("Pixel transformation matrix is singular")]
    SingularMatrix,

    #[error("Coordinate arrays differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },
}
