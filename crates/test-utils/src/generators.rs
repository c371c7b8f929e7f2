//! Synthetic solar images with predictable geometry.

use solar_common::{ObservationMeta, SolarMap, WcsParams};

/// Metadata for a synthetic helioprojective TAN image.
///
/// `center` is the 0-based pixel position of disk center, `plate_scale` the
/// size of a pixel in arcsec and `rsun_obs` the solar radius in arcsec.
pub fn synthetic_meta(
    width: usize,
    height: usize,
    center: (f64, f64),
    plate_scale: f64,
    rsun_obs: f64,
) -> ObservationMeta {
    let wcs = WcsParams {
        crpix: [center.0 + 1.0, center.1 + 1.0],
        cdelt: [plate_scale, plate_scale],
        ..WcsParams::default()
    };
    let mut meta = ObservationMeta::new(width, height, rsun_obs, wcs);
    meta.detector = Some("SYNTH".to_string());
    meta
}

/// Image of a bright disk surrounded by a fainter, decaying corona.
///
/// Disk pixels are ~1000 with mild limb darkening; outside the disk the
/// intensity falls off as `100 * exp(-(r - 1) * 4)` in solar radii.
pub fn create_disk_image(width: usize, height: usize, center: (f64, f64), radius_px: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f64 - center.0;
            let dy = row as f64 - center.1;
            let r = (dx * dx + dy * dy).sqrt() / radius_px;
            let value = if r <= 1.0 {
                let mu = (1.0 - r * r).sqrt();
                1000.0 * (0.4 + 0.6 * mu)
            } else {
                100.0 * (-(r - 1.0) * 4.0).exp()
            };
            data.push(value);
        }
    }
    data
}

/// Creates a test grid where each value encodes its position: `col * 1000 + row`.
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// A square synthetic map with the disk centered in the image.
pub fn synthetic_map(size: usize, plate_scale: f64, rsun_obs: f64) -> SolarMap {
    let center = ((size as f64 - 1.0) / 2.0, (size as f64 - 1.0) / 2.0);
    let meta = synthetic_meta(size, size, center, plate_scale, rsun_obs);
    let data = create_disk_image(size, size, center, rsun_obs / plate_scale);
    SolarMap::new(data, meta).expect("synthetic map dimensions are consistent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(10, 5);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[1], 1000.0);
        assert_eq!(grid[10], 1.0);
    }

    #[test]
    fn test_disk_image_brighter_inside() {
        let data = create_disk_image(21, 21, (10.0, 10.0), 5.0);
        let center = data[10 * 21 + 10];
        let corner = data[0];
        assert_eq!(center, 1000.0);
        assert!(corner < 10.0);
    }

    #[test]
    fn test_synthetic_meta_reference_pixel() {
        let meta = synthetic_meta(4, 4, (1.5, 1.5), 1.0, 1.5);
        assert_eq!(meta.wcs.crpix, [2.5, 2.5]);
        assert_eq!(meta.plate_scale(), Some((1.0, 1.0)));
    }
}
