//! Observation metadata for solar images.
//!
//! Holds the subset of FITS header information the masking pipeline needs:
//! when and how the image was taken, the apparent size of the Sun, and the
//! world coordinate system (WCS) parameters that map pixels to the sky.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mean solar radius (meters), IAU 2015 nominal value.
pub const RSUN_METERS: f64 = 695_700_000.0;

/// Astronomical unit (meters).
pub const AU_METERS: f64 = 149_597_870_700.0;

/// Arcseconds per degree.
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Apparent angular radius of the Sun (arcsec) seen from `distance_m` meters.
pub fn angular_radius_arcsec(distance_m: f64) -> f64 {
    (RSUN_METERS / distance_m).asin().to_degrees() * ARCSEC_PER_DEG
}

/// Number of arcseconds in one unit of the given FITS `CUNIT` string.
pub fn arcsec_per_unit(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "arcsec" | "asec" | "\"" => Some(1.0),
        "arcmin" | "amin" => Some(60.0),
        "deg" | "degree" | "degrees" => Some(ARCSEC_PER_DEG),
        "rad" | "radian" | "radians" => Some(180.0 / std::f64::consts::PI * ARCSEC_PER_DEG),
        "mas" => Some(1.0e-3),
        _ => None,
    }
}

/// World coordinate system parameters, as written in the FITS header.
///
/// Axis 0 is the image column (`NAXIS1`), axis 1 the image row (`NAXIS2`).
/// `crpix` is 1-based, following the FITS convention. `crval` and `cdelt`
/// are expressed in the corresponding `cunit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcsParams {
    pub ctype: [String; 2],
    pub cunit: [String; 2],
    pub crpix: [f64; 2],
    pub crval: [f64; 2],
    pub cdelt: [f64; 2],
    /// Linear transformation matrix `PCi_j`, row-major.
    pub pc: [[f64; 2]; 2],
    /// Native longitude of the celestial pole (degrees), if given.
    pub lonpole: Option<f64>,
}

impl Default for WcsParams {
    fn default() -> Self {
        Self {
            ctype: ["HPLN-TAN".to_string(), "HPLT-TAN".to_string()],
            cunit: ["arcsec".to_string(), "arcsec".to_string()],
            crpix: [1.0, 1.0],
            crval: [0.0, 0.0],
            cdelt: [1.0, 1.0],
            pc: [[1.0, 0.0], [0.0, 1.0]],
            lonpole: None,
        }
    }
}

impl WcsParams {
    /// Build a `PCi_j` matrix from the legacy `CROTA2` rotation angle (degrees).
    pub fn pc_from_crota(crota_deg: f64, cdelt: [f64; 2]) -> [[f64; 2]; 2] {
        let (sin, cos) = crota_deg.to_radians().sin_cos();
        let lambda = cdelt[1] / cdelt[0];
        [[cos, -lambda * sin], [sin / lambda, cos]]
    }

    /// Replace the rotation with one derived from a `CROTA2` angle.
    pub fn with_rotation(mut self, crota_deg: f64) -> Self {
        self.pc = Self::pc_from_crota(crota_deg, self.cdelt);
        self
    }
}

/// Metadata describing a single solar observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMeta {
    /// Observation start time
    pub date_obs: Option<DateTime<Utc>>,
    /// Instrument name (e.g. "AIA_3")
    pub instrument: Option<String>,
    /// Telescope/observatory name (e.g. "SDO/AIA")
    pub telescope: Option<String>,
    /// Detector name (e.g. "AIA")
    pub detector: Option<String>,
    /// Observed wavelength
    pub wavelength: Option<f64>,
    /// Unit of `wavelength` (e.g. "angstrom")
    pub wavelength_unit: Option<String>,
    /// Exposure time (seconds)
    pub exposure_time: Option<f64>,
    /// Apparent solar radius (arcsec)
    pub rsun_obs: f64,
    /// Observer distance to Sun center (meters)
    pub dsun_obs: Option<f64>,
    /// Image width in pixels (`NAXIS1`)
    pub width: usize,
    /// Image height in pixels (`NAXIS2`)
    pub height: usize,
    /// World coordinate system
    pub wcs: WcsParams,
}

impl ObservationMeta {
    /// Minimal metadata for an image of the given size.
    pub fn new(width: usize, height: usize, rsun_obs: f64, wcs: WcsParams) -> Self {
        Self {
            date_obs: None,
            instrument: None,
            telescope: None,
            detector: None,
            wavelength: None,
            wavelength_unit: None,
            exposure_time: None,
            rsun_obs,
            dsun_obs: None,
            width,
            height,
            wcs,
        }
    }

    /// Pixel dimensions as (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Plate scale (arcsec per pixel) along each axis, if the units are known.
    pub fn plate_scale(&self) -> Option<(f64, f64)> {
        let x = arcsec_per_unit(&self.wcs.cunit[0])? * self.wcs.cdelt[0];
        let y = arcsec_per_unit(&self.wcs.cunit[1])? * self.wcs.cdelt[1];
        Some((x, y))
    }

    /// Short human-readable name, e.g. "AIA 171 angstrom 2011-06-07 06:33:02".
    pub fn name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(detector) = self.detector.as_ref().or(self.instrument.as_ref()) {
            parts.push(detector.clone());
        }
        if let Some(wavelength) = self.wavelength {
            match &self.wavelength_unit {
                Some(unit) => parts.push(format!("{} {}", wavelength, unit)),
                None => parts.push(format!("{}", wavelength)),
            }
        }
        if let Some(date) = self.date_obs {
            parts.push(date.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        if parts.is_empty() {
            "unnamed".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// True when the detector/instrument identifies SDO/AIA.
    pub fn is_aia(&self) -> bool {
        [&self.detector, &self.instrument, &self.telescope]
            .iter()
            .filter_map(|v| v.as_deref())
            .any(|v| v.to_uppercase().contains("AIA"))
    }
}
