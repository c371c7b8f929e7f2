//! Radial normalization and the disk mask.

use solar_common::Mask;

use crate::sky::SkyCoords;
use crate::{MaskError, MaskResult};

/// Normalized radius at the solar limb.
pub const DISK_THRESHOLD: f64 = 1.0;

/// Distance of every pixel from disk center in units of `reference_radius`.
///
/// `r = sqrt(Tx² + Ty²) / reference_radius`, with `reference_radius` in the
/// same angular unit as the sky coordinates (arcsec).
pub fn normalized_radius(sky: &SkyCoords, reference_radius: f64) -> MaskResult<Vec<f64>> {
    if !(reference_radius > 0.0 && reference_radius.is_finite()) {
        return Err(MaskError::InvalidRadius(reference_radius));
    }

    Ok(sky
        .tx()
        .iter()
        .zip(sky.ty())
        .map(|(tx, ty)| (tx * tx + ty * ty).sqrt() / reference_radius)
        .collect())
}

/// Mask every pixel whose normalized radius is `<= threshold`.
///
/// The comparison is inclusive: a pixel exactly on the threshold is masked.
/// NaN radii are never masked.
pub fn radial_mask(radius: &[f64], width: usize, height: usize, threshold: f64) -> MaskResult<Mask> {
    if !threshold.is_finite() {
        return Err(MaskError::InvalidThreshold(threshold));
    }
    if radius.len() != width * height {
        return Err(MaskError::LengthMismatch {
            width,
            height,
            actual: radius.len(),
        });
    }

    let values = radius.iter().map(|&r| r <= threshold).collect();
    Ok(Mask::new(width, height, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_mask_is_inclusive() {
        let radius = [0.0, 0.5, 1.0, 1.0 + 1e-12, 2.0, f64::NAN];
        let mask = radial_mask(&radius, 3, 2, DISK_THRESHOLD).unwrap();
        assert_eq!(
            mask.as_slice(),
            &[true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_radial_mask_length_mismatch() {
        assert!(matches!(
            radial_mask(&[0.0; 5], 3, 2, 1.0),
            Err(MaskError::LengthMismatch { actual: 5, .. })
        ));
    }

    #[test]
    fn test_radial_mask_rejects_nan_threshold() {
        assert!(matches!(
            radial_mask(&[0.0; 6], 3, 2, f64::NAN),
            Err(MaskError::InvalidThreshold(_))
        ));
    }
}
