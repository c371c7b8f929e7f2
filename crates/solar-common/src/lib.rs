//! Common types shared across the solar disk masking workspace.

pub mod error;
pub mod map;
pub mod meta;
pub mod style;

pub use error::{SolarError, SolarResult};
pub use map::{Mask, SolarMap};
pub use meta::{ObservationMeta, WcsParams};
pub use style::{Color, ColorStop, Colormap, DisplayConfig, Scaling};
