//! Solar maps: pixel data + observation metadata + optional mask.

use crate::error::{SolarError, SolarResult};
use crate::meta::ObservationMeta;
use crate::style::DisplayConfig;
use std::sync::Arc;

/// Per-pixel boolean mask. `true` marks a pixel as excluded ("no data").
///
/// Stored row-major with the same layout as the map data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    values: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize, values: Vec<bool>) -> SolarResult<Self> {
        if width.checked_mul(height) != Some(values.len()) {
            return Err(SolarError::DataLength {
                width,
                height,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Build a mask by evaluating `f(col, row)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut values = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                values.push(f(col, row));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as (height, width), matching row-major array convention.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_masked(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.values[row * self.width + col]
    }

    pub fn count_masked(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.values
    }
}

/// A solar image with its metadata.
///
/// Data and metadata are reference counted and never mutated, so derived
/// maps (e.g. with a mask attached) share them with the original.
#[derive(Debug, Clone)]
pub struct SolarMap {
    data: Arc<Vec<f64>>,
    meta: Arc<ObservationMeta>,
    mask: Option<Mask>,
    display: DisplayConfig,
}

impl SolarMap {
    /// Create a map from row-major pixel data.
    pub fn new(data: Vec<f64>, meta: ObservationMeta) -> SolarResult<Self> {
        Self::from_parts(Arc::new(data), Arc::new(meta), None)
    }

    /// Create a map from shared data and metadata with an optional mask.
    pub fn from_parts(
        data: Arc<Vec<f64>>,
        meta: Arc<ObservationMeta>,
        mask: Option<Mask>,
    ) -> SolarResult<Self> {
        let (width, height) = meta.dimensions();
        if width == 0 || height == 0 {
            return Err(SolarError::EmptyImage { width, height });
        }
        if width.checked_mul(height) != Some(data.len()) {
            return Err(SolarError::DataLength {
                width,
                height,
                actual: data.len(),
            });
        }
        if let Some(mask) = &mask {
            check_mask_shape(mask, width, height)?;
        }

        let display = DisplayConfig::for_observation(&meta);
        Ok(Self {
            data,
            meta,
            mask,
            display,
        })
    }

    /// New map sharing this map's data and metadata, carrying `mask`.
    pub fn with_mask(&self, mask: Mask) -> SolarResult<Self> {
        check_mask_shape(&mask, self.width(), self.height())?;
        Ok(Self {
            mask: Some(mask),
            ..self.clone()
        })
    }

    /// New map with a different display configuration.
    pub fn with_display(&self, display: DisplayConfig) -> Self {
        Self {
            display,
            ..self.clone()
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn meta(&self) -> &ObservationMeta {
        &self.meta
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn width(&self) -> usize {
        self.meta.width
    }

    pub fn height(&self) -> usize {
        self.meta.height
    }

    /// Shape as (height, width).
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width() || row >= self.height() {
            return None;
        }
        self.data.get(row * self.width() + col).copied()
    }

    pub fn is_masked(&self, col: usize, row: usize) -> bool {
        self.mask
            .as_ref()
            .map(|m| m.is_masked(col, row))
            .unwrap_or(false)
    }

    /// True if `other` is backed by the same pixel buffer.
    pub fn shares_data_with(&self, other: &SolarMap) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Min and max over unmasked, finite pixels.
    pub fn unmasked_range(&self) -> Option<(f64, f64)> {
        let mask = self.mask.as_ref().map(|m| m.as_slice());
        self.data
            .iter()
            .enumerate()
            .filter(|(idx, v)| v.is_finite() && !mask.map(|m| m[*idx]).unwrap_or(false))
            .fold(None, |acc, (_, &v)| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn check_mask_shape(mask: &Mask, width: usize, height: usize) -> SolarResult<()> {
    if mask.width() != width || mask.height() != height {
        return Err(SolarError::ShapeMismatch {
            expected_width: width,
            expected_height: height,
            actual_width: mask.width(),
            actual_height: mask.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::WcsParams;

    fn map_2x3() -> SolarMap {
        let meta = ObservationMeta::new(2, 3, 960.0, WcsParams::default());
        SolarMap::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], meta).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let meta = ObservationMeta::new(2, 3, 960.0, WcsParams::default());
        assert!(matches!(
            SolarMap::new(vec![0.0; 5], meta),
            Err(SolarError::DataLength { actual: 5, .. })
        ));
    }

    #[test]
    fn test_new_rejects_empty() {
        let meta = ObservationMeta::new(0, 3, 960.0, WcsParams::default());
        assert!(matches!(
            SolarMap::new(vec![], meta),
            Err(SolarError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_with_mask_shares_data() {
        let map = map_2x3();
        let mask = Mask::from_fn(2, 3, |col, row| col == 0 && row == 1);
        let masked = map.with_mask(mask).unwrap();

        assert!(masked.shares_data_with(&map));
        assert!(map.mask().is_none());
        assert!(masked.is_masked(0, 1));
        assert!(!masked.is_masked(1, 1));
        assert_eq!(masked.value(1, 2), Some(6.0));
    }

    #[test]
    fn test_with_mask_rejects_wrong_shape() {
        let map = map_2x3();
        let mask = Mask::from_fn(3, 2, |_, _| true);
        assert!(matches!(
            map.with_mask(mask),
            Err(SolarError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_unmasked_range_skips_masked_and_nan() {
        let meta = ObservationMeta::new(2, 2, 960.0, WcsParams::default());
        let map = SolarMap::new(vec![f64::NAN, 10.0, -5.0, 3.0], meta).unwrap();
        assert_eq!(map.unmasked_range(), Some((-5.0, 10.0)));

        let masked = map.with_mask(Mask::from_fn(2, 2, |col, _| col == 1)).unwrap();
        assert_eq!(masked.unmasked_range(), Some((-5.0, -5.0)));
    }
}
