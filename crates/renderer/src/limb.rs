//! Solar limb overlay.

use std::f64::consts::TAU;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use projection::helioprojective::point_on_circle;
use projection::Wcs;
use solar_common::meta::ARCSEC_PER_DEG;
use solar_common::{Color, SolarMap};
use tracing::{debug, warn};

use crate::RenderResult;

/// Default number of vertices of the limb polyline.
pub const DEFAULT_LIMB_POINTS: usize = 360;

/// How the limb is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbStyle {
    pub color: Color,
    pub points: usize,
}

impl Default for LimbStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            points: DEFAULT_LIMB_POINTS,
        }
    }
}

/// Pixel positions (0-based, data row order) of `count` points on the circle
/// of angular radius `rsun_obs` arcsec around disk center.
///
/// Points that do not project into the image plane are skipped.
pub fn limb_points(wcs: &Wcs, rsun_obs: f64, count: usize) -> Vec<(f64, f64)> {
    let rho = rsun_obs / ARCSEC_PER_DEG;
    (0..count)
        .filter_map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let (tx, ty) = point_on_circle(rho, angle);
            wcs.world_to_pixel(tx * ARCSEC_PER_DEG, ty * ARCSEC_PER_DEG)
        })
        .collect()
}

/// Draw the limb of `map` onto `image` as a closed polyline.
///
/// `image` must be the flipped rendering of `map` produced by
/// [`render_map`](crate::render_map). Returns the number of vertices drawn.
pub fn draw_limb(image: &mut RgbaImage, map: &SolarMap, style: &LimbStyle) -> RenderResult<usize> {
    let wcs = Wcs::new(&map.meta().wcs)?;
    let points = limb_points(&wcs, map.meta().rsun_obs, style.points);
    if points.len() < 2 {
        warn!(points = points.len(), "Too few limb points to draw");
        return Ok(0);
    }

    let top = image.height() as f32 - 1.0;
    let to_image = |(x, y): (f64, f64)| (x as f32, top - y as f32);
    let color = Rgba(style.color.to_rgba());

    for (i, &start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        draw_line_segment_mut(image, to_image(start), to_image(end), color);
    }

    debug!(points = points.len(), rsun_obs = map.meta().rsun_obs, "Drew solar limb");
    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_common::WcsParams;

    #[test]
    fn test_limb_points_lie_on_radius() {
        let params = WcsParams {
            crpix: [50.5, 50.5],
            ..WcsParams::default()
        };
        let wcs = Wcs::new(&params).unwrap();
        let points = limb_points(&wcs, 20.0, 36);
        assert_eq!(points.len(), 36);
        for (x, y) in points {
            let r = ((x - 49.5).powi(2) + (y - 49.5).powi(2)).sqrt();
            assert!((r - 20.0).abs() < 1e-3, "radius {}", r);
        }
    }

    #[test]
    fn test_zero_points() {
        let wcs = Wcs::new(&WcsParams::default()).unwrap();
        assert!(limb_points(&wcs, 10.0, 0).is_empty());
    }
}
