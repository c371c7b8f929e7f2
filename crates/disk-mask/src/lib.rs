//! Masking of the solar disk.
//!
//! Pipeline:
//! 1. Build a grid of every pixel position (`grid`)
//! 2. Transform the grid to helioprojective coordinates (`sky`)
//! 3. Normalize the distance from disk center by the solar radius (`radial`)
//! 4. Mask every pixel with `r <= threshold` and attach the mask to a new map (`pipeline`)

pub mod error;
pub mod grid;
pub mod pipeline;
pub mod radial;
pub mod sample;
pub mod sky;

pub use error::{MaskError, MaskResult};
pub use grid::PixelGrid;
pub use pipeline::{build_disk_mask, mask_disk, MaskOptions};
pub use radial::{normalized_radius, radial_mask, DISK_THRESHOLD};
pub use sky::SkyCoords;
