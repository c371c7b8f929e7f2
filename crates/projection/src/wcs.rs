//! Pixel <-> helioprojective transforms driven by FITS WCS keywords.

use nalgebra::{Matrix2, Vector2};
use solar_common::meta::{arcsec_per_unit, ARCSEC_PER_DEG};
use solar_common::WcsParams;
use tracing::debug;

use crate::helioprojective::{self, SphericalRotation};
use crate::{ProjectionError, ProjectionResult};

/// How intermediate world coordinates map onto the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Gnomonic projection (`HPLN-TAN` / `HPLT-TAN`)
    Gnomonic,
    /// Plain offset from the reference value (legacy `solar-x` / `solar-y`)
    Linear,
}

impl ProjectionKind {
    /// Determine the projection from the `CTYPE1`/`CTYPE2` pair.
    pub fn from_ctype(ctype: &[String; 2]) -> ProjectionResult<Self> {
        let x = ctype[0].trim().to_uppercase();
        let y = ctype[1].trim().to_uppercase();
        match (x.as_str(), y.as_str()) {
            ("HPLN-TAN", "HPLT-TAN") => Ok(ProjectionKind::Gnomonic),
            ("SOLAR-X", "SOLAR-Y") | ("SOLAR_X", "SOLAR_Y") | ("SOLARX", "SOLARY") => {
                Ok(ProjectionKind::Linear)
            }
            _ => Err(ProjectionError::UnsupportedCtype(format!("{} / {}", x, y))),
        }
    }
}

/// World coordinate system of a solar image.
///
/// Pixel coordinates are 0-based (column, row); world coordinates are
/// helioprojective (Tx, Ty) in arcsec.
#[derive(Debug, Clone)]
pub struct Wcs {
    kind: ProjectionKind,
    /// 0-based reference pixel
    crpix: Vector2<f64>,
    /// Pixel offset -> intermediate world coordinates (degrees)
    forward: Matrix2<f64>,
    inverse: Matrix2<f64>,
    /// Reference value (degrees)
    crval: [f64; 2],
    rotation: SphericalRotation,
}

impl Wcs {
    /// Build a transform from header parameters.
    pub fn new(params: &WcsParams) -> ProjectionResult<Self> {
        let kind = ProjectionKind::from_ctype(&params.ctype)?;

        let mut deg_per_unit = [0.0; 2];
        for axis in 0..2 {
            let arcsec = arcsec_per_unit(&params.cunit[axis])
                .ok_or_else(|| ProjectionError::UnsupportedUnit(params.cunit[axis].clone()))?;
            deg_per_unit[axis] = arcsec / ARCSEC_PER_DEG;
        }

        if params.cdelt.iter().any(|d| *d == 0.0 || !d.is_finite()) {
            return Err(ProjectionError::InvalidScale(params.cdelt));
        }

        let pc = Matrix2::new(
            params.pc[0][0],
            params.pc[0][1],
            params.pc[1][0],
            params.pc[1][1],
        );
        let scale = Matrix2::new(
            params.cdelt[0] * deg_per_unit[0],
            0.0,
            0.0,
            params.cdelt[1] * deg_per_unit[1],
        );
        let forward = scale * pc;
        let inverse = forward
            .try_inverse()
            .ok_or(ProjectionError::SingularMatrix)?;

        let crval = [
            params.crval[0] * deg_per_unit[0],
            params.crval[1] * deg_per_unit[1],
        ];

        debug!(
            ?kind,
            crpix1 = params.crpix[0],
            crpix2 = params.crpix[1],
            cdelt1 = params.cdelt[0],
            cdelt2 = params.cdelt[1],
            "Built WCS transform"
        );

        Ok(Self {
            kind,
            crpix: Vector2::new(params.crpix[0] - 1.0, params.crpix[1] - 1.0),
            forward,
            inverse,
            crval,
            rotation: SphericalRotation::zenithal(crval, params.lonpole),
        })
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// 0-based pixel coordinates of the reference point.
    pub fn reference_pixel(&self) -> (f64, f64) {
        (self.crpix.x, self.crpix.y)
    }

    /// Transform a 0-based pixel position to helioprojective (Tx, Ty) arcsec.
    pub fn pixel_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let offset = Vector2::new(x, y) - self.crpix;
        let intermediate = self.forward * offset;

        let (lon, lat) = match self.kind {
            ProjectionKind::Gnomonic => {
                let (phi, theta) = helioprojective::tan_deproject(intermediate.x, intermediate.y);
                self.rotation.native_to_world(phi, theta)
            }
            ProjectionKind::Linear => (
                self.crval[0] + intermediate.x,
                self.crval[1] + intermediate.y,
            ),
        };

        (lon * ARCSEC_PER_DEG, lat * ARCSEC_PER_DEG)
    }

    /// Transform helioprojective (Tx, Ty) arcsec to a 0-based pixel position.
    ///
    /// Returns None when the point cannot be represented in the projection.
    pub fn world_to_pixel(&self, tx: f64, ty: f64) -> Option<(f64, f64)> {
        let lon = tx / ARCSEC_PER_DEG;
        let lat = ty / ARCSEC_PER_DEG;

        let (ix, iy) = match self.kind {
            ProjectionKind::Gnomonic => {
                let (phi, theta) = self.rotation.world_to_native(lon, lat);
                helioprojective::tan_project(phi, theta)?
            }
            ProjectionKind::Linear => (lon - self.crval[0], lat - self.crval[1]),
        };

        let pixel = self.inverse * Vector2::new(ix, iy) + self.crpix;
        Some((pixel.x, pixel.y))
    }

    /// Transform parallel arrays of pixel positions.
    ///
    /// Returns the Tx and Ty arrays (arcsec) in the same order.
    pub fn pixels_to_world(&self, xs: &[f64], ys: &[f64]) -> ProjectionResult<(Vec<f64>, Vec<f64>)> {
        if xs.len() != ys.len() {
            return Err(ProjectionError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }

        let mut tx = Vec::with_capacity(xs.len());
        let mut ty = Vec::with_capacity(ys.len());
        for (&x, &y) in xs.iter().zip(ys) {
            let (lon, lat) = self.pixel_to_world(x, y);
            tx.push(lon);
            ty.push(lat);
        }
        Ok((tx, ty))
    }
}
