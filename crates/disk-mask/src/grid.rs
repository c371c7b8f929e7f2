//! Pixel coordinate grid.

use crate::{MaskError, MaskResult};

/// Column and row index of every pixel, in row-major order.
///
/// Element `k = row * width + col` holds `(col, row)`, matching the layout of
/// the map data the grid is built for.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    columns: Vec<f64>,
    rows: Vec<f64>,
}

impl PixelGrid {
    /// Enumerate every pixel of a `width` x `height` image.
    pub fn new(width: usize, height: usize) -> MaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(MaskError::EmptyImage { width, height });
        }

        let len = width
            .checked_mul(height)
            .ok_or(MaskError::ImageTooLarge { width, height })?;
        let mut columns = Vec::with_capacity(len);
        let mut rows = Vec::with_capacity(len);
        for row in 0..height {
            for col in 0..width {
                columns.push(col as f64);
                rows.push(row as f64);
            }
        }

        Ok(Self {
            width,
            height,
            columns,
            rows,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as (height, width).
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column index of every pixel.
    pub fn columns(&self) -> &[f64] {
        &self.columns
    }

    /// Row index of every pixel.
    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    /// Iterate over (col, row) pairs in storage order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.columns.iter().copied().zip(self.rows.iter().copied())
    }
}
