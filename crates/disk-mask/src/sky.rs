//! Helioprojective coordinates of a pixel grid.

use projection::Wcs;
use tracing::debug;

use crate::grid::PixelGrid;
use crate::MaskResult;

/// Helioprojective (Tx, Ty) of every grid pixel, in arcsec.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyCoords {
    width: usize,
    height: usize,
    tx: Vec<f64>,
    ty: Vec<f64>,
}

impl SkyCoords {
    /// Transform every pixel of `grid` through `wcs`.
    pub fn from_grid(grid: &PixelGrid, wcs: &Wcs) -> MaskResult<Self> {
        let (tx, ty) = wcs.pixels_to_world(grid.columns(), grid.rows())?;
        debug!(pixels = tx.len(), "Transformed pixel grid to helioprojective");
        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            tx,
            ty,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tx(&self) -> &[f64] {
        &self.tx
    }

    pub fn ty(&self) -> &[f64] {
        &self.ty
    }

    /// (Tx, Ty) of the pixel at (col, row).
    pub fn get(&self, col: usize, row: usize) -> Option<(f64, f64)> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let idx = row * self.width + col;
        Some((self.tx[idx], self.ty[idx]))
    }
}
