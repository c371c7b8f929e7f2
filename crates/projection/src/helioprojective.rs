//! Helioprojective sky projection.
//!
//! Solar images are gnomonic (TAN) projections of the sky as seen by the
//! observer. Helioprojective longitude/latitude (Tx, Ty) play the role of
//! celestial coordinates, with the Sun's center at (0, 0).
//!
//! Reference: Calabretta & Greisen (2002), "Representations of celestial
//! coordinates in FITS" (WCS Paper II), sections 2.3 and 5.1.3.

use std::f64::consts::PI;

/// Degrees per radian, `180/π` in WCS Paper II notation.
const R0: f64 = 180.0 / PI;

/// Native coordinates of the fiducial point for zenithal projections.
const THETA_0: f64 = 90.0;

/// Default native longitude of the celestial pole for zenithal projections.
pub const DEFAULT_LONPOLE: f64 = 180.0;

/// Spherical rotation between native and helioprojective coordinates.
///
/// All angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalRotation {
    /// Helioprojective longitude of the fiducial point (`CRVAL1`)
    pub lon_p: f64,
    /// Helioprojective latitude of the fiducial point (`CRVAL2`)
    pub lat_p: f64,
    /// Native longitude of the celestial pole (`LONPOLE`)
    pub phi_p: f64,
}

impl SphericalRotation {
    /// Rotation for a zenithal projection with reference point `crval`.
    pub fn zenithal(crval_deg: [f64; 2], lonpole: Option<f64>) -> Self {
        let phi_p = lonpole.unwrap_or(if crval_deg[1] < THETA_0 {
            DEFAULT_LONPOLE
        } else {
            0.0
        });
        Self {
            lon_p: crval_deg[0],
            lat_p: crval_deg[1],
            phi_p,
        }
    }

    /// Native (phi, theta) to helioprojective (lon, lat), degrees.
    pub fn native_to_world(&self, phi: f64, theta: f64) -> (f64, f64) {
        let (sin_t, cos_t) = theta.to_radians().sin_cos();
        let (sin_dp, cos_dp) = self.lat_p.to_radians().sin_cos();
        let dphi = (phi - self.phi_p).to_radians();

        let lon = self.lon_p
            + (-cos_t * dphi.sin())
                .atan2(sin_t * cos_dp - cos_t * sin_dp * dphi.cos())
                .to_degrees();
        let lat = (sin_t * sin_dp + cos_t * cos_dp * dphi.cos())
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees();

        (wrap_longitude(lon), lat)
    }

    /// Helioprojective (lon, lat) to native (phi, theta), degrees.
    pub fn world_to_native(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sin_d, cos_d) = lat.to_radians().sin_cos();
        let (sin_dp, cos_dp) = self.lat_p.to_radians().sin_cos();
        let dlon = (lon - self.lon_p).to_radians();

        let phi = self.phi_p
            + (-cos_d * dlon.sin())
                .atan2(sin_d * cos_dp - cos_d * sin_dp * dlon.cos())
                .to_degrees();
        let theta = (sin_d * sin_dp + cos_d * cos_dp * dlon.cos())
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees();

        (phi, theta)
    }
}

/// Gnomonic deprojection: intermediate world coordinates (x, y) in degrees
/// to native spherical (phi, theta) in degrees.
#[inline]
pub fn tan_deproject(x: f64, y: f64) -> (f64, f64) {
    let r_theta = x.hypot(y);
    let phi = if r_theta == 0.0 {
        0.0
    } else {
        x.atan2(-y).to_degrees()
    };
    let theta = R0.atan2(r_theta).to_degrees();
    (phi, theta)
}

/// Gnomonic projection: native (phi, theta) to intermediate (x, y), degrees.
///
/// Returns None for points on or behind the plane of the sky (theta <= 0),
/// which the TAN projection cannot represent.
#[inline]
pub fn tan_project(phi: f64, theta: f64) -> Option<(f64, f64)> {
    if theta <= 0.0 {
        return None;
    }
    let (sin_t, cos_t) = theta.to_radians().sin_cos();
    let r_theta = R0 * cos_t / sin_t;
    let (sin_p, cos_p) = phi.to_radians().sin_cos();
    Some((r_theta * sin_p, -r_theta * cos_p))
}

/// Wrap a longitude into (-180, 180] degrees.
#[inline]
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = lon.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Point at angular distance `rho` (degrees) from the disk center, at
/// position angle `angle` (radians, counter-clockwise from +Tx).
///
/// Returns helioprojective (Tx, Ty) in degrees.
pub fn point_on_circle(rho: f64, angle: f64) -> (f64, f64) {
    let (sin_r, cos_r) = rho.to_radians().sin_cos();
    let (sin_a, cos_a) = angle.sin_cos();
    let tx = (sin_r * cos_a).atan2(cos_r).to_degrees();
    let ty = (sin_r * sin_a).clamp(-1.0, 1.0).asin().to_degrees();
    (tx, ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tan_origin_is_pole() {
        let (_, theta) = tan_deproject(0.0, 0.0);
        assert!((theta - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_tan_roundtrip() {
        for (x, y) in [(0.1, 0.0), (0.0, -0.2), (0.25, 0.25), (-0.01, 0.003)] {
            let (phi, theta) = tan_deproject(x, y);
            let (x2, y2) = tan_project(phi, theta).unwrap();
            assert!((x - x2).abs() < 1e-12, "x roundtrip: {} vs {}", x, x2);
            assert!((y - y2).abs() < 1e-12, "y roundtrip: {} vs {}", y, y2);
        }
    }

    #[test]
    fn test_rotation_at_disk_center_axes() {
        let rot = SphericalRotation::zenithal([0.0, 0.0], None);

        // Small offset along +x lands on +Tx.
        let (phi, theta) = tan_deproject(0.01, 0.0);
        let (lon, lat) = rot.native_to_world(phi, theta);
        assert!((lon - 0.01).abs() < 1e-9, "lon {}", lon);
        assert!(lat.abs() < 1e-12, "lat {}", lat);

        // Small offset along +y lands on +Ty.
        let (phi, theta) = tan_deproject(0.0, 0.01);
        let (lon, lat) = rot.native_to_world(phi, theta);
        assert!(lon.abs() < 1e-12, "lon {}", lon);
        assert!((lat - 0.01).abs() < 1e-9, "lat {}", lat);
    }

    #[test]
    fn test_rotation_roundtrip_off_center() {
        let rot = SphericalRotation::zenithal([0.05, -0.1], None);
        let (phi, theta) = tan_deproject(0.2, -0.15);
        let (lon, lat) = rot.native_to_world(phi, theta);
        let (phi2, theta2) = rot.world_to_native(lon, lat);
        assert!((wrap_longitude(phi - phi2)).abs() < 1e-9);
        assert!((theta - theta2).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(-180.0), 180.0);
        assert_eq!(wrap_longitude(359.5), -0.5);
    }

    #[test]
    fn test_point_on_circle_radius() {
        let rho = 0.27;
        for i in 0..8 {
            let angle = i as f64 * PI / 4.0;
            let (tx, ty) = point_on_circle(rho, angle);
            // Small-angle: Tx^2 + Ty^2 ~ rho^2
            let r = tx.hypot(ty);
            assert!((r - rho).abs() < 1e-5, "r {} at angle {}", r, angle);
        }
    }
}
