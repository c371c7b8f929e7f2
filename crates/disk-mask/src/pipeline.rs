//! End-to-end disk masking of a solar map.

use projection::Wcs;
use solar_common::{Mask, SolarMap};
use tracing::{debug, info};

use crate::grid::PixelGrid;
use crate::radial::{normalized_radius, radial_mask, DISK_THRESHOLD};
use crate::sky::SkyCoords;
use crate::MaskResult;

/// Parameters of the disk mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskOptions {
    /// Pixels with normalized radius `<= threshold` are masked.
    pub threshold: f64,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            threshold: DISK_THRESHOLD,
        }
    }
}

/// Compute the disk mask for `map`.
///
/// The reference radius is the map's apparent solar radius (`rsun_obs`).
pub fn build_disk_mask(map: &SolarMap, options: &MaskOptions) -> MaskResult<Mask> {
    let meta = map.meta();
    let wcs = Wcs::new(&meta.wcs)?;

    let grid = PixelGrid::new(map.width(), map.height())?;
    let sky = SkyCoords::from_grid(&grid, &wcs)?;
    let radius = normalized_radius(&sky, meta.rsun_obs)?;
    let mask = radial_mask(&radius, grid.width(), grid.height(), options.threshold)?;

    debug!(
        rsun_obs = meta.rsun_obs,
        threshold = options.threshold,
        masked = mask.count_masked(),
        total = grid.len(),
        "Built disk mask"
    );
    Ok(mask)
}

/// New map sharing `map`'s data and metadata with the disk masked out.
///
/// `map` itself is left untouched.
pub fn mask_disk(map: &SolarMap, options: &MaskOptions) -> MaskResult<SolarMap> {
    let mask = build_disk_mask(map, options)?;
    let masked = map.with_mask(mask)?;

    info!(
        map = %map.meta().name(),
        width = map.width(),
        height = map.height(),
        "Masked solar disk"
    );
    Ok(masked)
}
