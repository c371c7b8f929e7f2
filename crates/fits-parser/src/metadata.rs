//! Extraction of observation metadata and WCS parameters from a header.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use solar_common::meta::{angular_radius_arcsec, AU_METERS};
use solar_common::{ObservationMeta, WcsParams};
use tracing::{debug, warn};

use crate::header::Header;
use crate::{FitsError, FitsResult};

/// Build observation metadata for an image of `width` x `height` pixels.
pub fn observation_meta(header: &Header, width: usize, height: usize) -> FitsResult<ObservationMeta> {
    let wcs = wcs_params(header)?;
    let dsun_obs = header.get_f64("DSUN_OBS").filter(|d| *d > 0.0);
    let rsun_obs = solar_radius(header, dsun_obs)?;

    let text = |key: &str| {
        header
            .get_str(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let meta = ObservationMeta {
        date_obs: observation_time(header),
        instrument: text("INSTRUME"),
        telescope: text("TELESCOP"),
        detector: text("DETECTOR"),
        wavelength: header.get_f64("WAVELNTH"),
        wavelength_unit: text("WAVEUNIT"),
        exposure_time: header.get_f64("EXPTIME"),
        rsun_obs,
        dsun_obs,
        width,
        height,
        wcs,
    };

    debug!(name = %meta.name(), rsun_obs, width, height, "Extracted observation metadata");
    Ok(meta)
}

/// Read the WCS keywords for the two image axes.
///
/// Rotation is taken from `CDi_j` if present, else `PCi_j`, else `CROTA2`.
pub fn wcs_params(header: &Header) -> FitsResult<WcsParams> {
    let defaults = WcsParams::default();

    let ctype = [axis_str(header, "CTYPE", 1), axis_str(header, "CTYPE", 2)];
    let ctype = match ctype {
        [Some(x), Some(y)] => [x, y],
        _ => {
            debug!("CTYPE missing, assuming helioprojective TAN");
            defaults.ctype.clone()
        }
    };

    let cunit = [
        axis_str(header, "CUNIT", 1).unwrap_or_else(|| defaults.cunit[0].clone()),
        axis_str(header, "CUNIT", 2).unwrap_or_else(|| defaults.cunit[1].clone()),
    ];

    let crpix = [require_f64(header, "CRPIX1")?, require_f64(header, "CRPIX2")?];
    let crval = [
        header.get_f64("CRVAL1").unwrap_or(0.0),
        header.get_f64("CRVAL2").unwrap_or(0.0),
    ];

    let has_cd = ["CD1_1", "CD1_2", "CD2_1", "CD2_2"]
        .iter()
        .any(|k| header.contains(k));

    let (cdelt, pc) = if has_cd {
        let cd = matrix(header, "CD", 0.0);
        ([1.0, 1.0], cd)
    } else {
        let cdelt = [
            header.get_f64("CDELT1").unwrap_or(1.0),
            header.get_f64("CDELT2").unwrap_or(1.0),
        ];
        let has_pc = ["PC1_1", "PC1_2", "PC2_1", "PC2_2"]
            .iter()
            .any(|k| header.contains(k));
        let pc = if has_pc {
            matrix(header, "PC", 1.0)
        } else if let Some(crota) = header.get_f64("CROTA2").or_else(|| header.get_f64("CROTA")) {
            WcsParams::pc_from_crota(crota, cdelt)
        } else {
            defaults.pc
        };
        (cdelt, pc)
    };

    if cdelt.iter().any(|d| *d == 0.0 || !d.is_finite()) {
        return Err(FitsError::InvalidMetadata(format!(
            "CDELT must be finite and non-zero, got {:?}",
            cdelt
        )));
    }

    Ok(WcsParams {
        ctype,
        cunit,
        crpix,
        crval,
        cdelt,
        pc,
        lonpole: header.get_f64("LONPOLE"),
    })
}

/// Apparent solar radius in arcsec.
///
/// Order of preference: `RSUN_OBS`, `RSUN_ARC`, derived from `DSUN_OBS`,
/// derived from one astronomical unit.
fn solar_radius(header: &Header, dsun_obs: Option<f64>) -> FitsResult<f64> {
    if let Some(rsun) = header.get_f64("RSUN_OBS").or_else(|| header.get_f64("RSUN_ARC")) {
        if rsun > 0.0 && rsun.is_finite() {
            return Ok(rsun);
        }
        return Err(FitsError::InvalidMetadata(format!(
            "solar radius must be positive, got {}",
            rsun
        )));
    }

    match dsun_obs {
        Some(dsun) => Ok(angular_radius_arcsec(dsun)),
        None => {
            warn!("Missing RSUN_OBS and DSUN_OBS, assuming observer at 1 AU");
            Ok(angular_radius_arcsec(AU_METERS))
        }
    }
}

fn observation_time(header: &Header) -> Option<DateTime<Utc>> {
    let raw = header.get_str("DATE-OBS").or_else(|| header.get_str("DATE_OBS"))?;
    match parse_fits_date(raw) {
        Some(date) => Some(date),
        None => {
            warn!(value = %raw, "Could not parse DATE-OBS");
            None
        }
    }
}

/// Parse FITS date strings such as `2011-06-07T06:33:02.88` or `2011-06-07`.
pub fn parse_fits_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim().trim_end_matches('Z');
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn axis_str(header: &Header, prefix: &str, axis: usize) -> Option<String> {
    header
        .get_str(&format!("{}{}", prefix, axis))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn require_f64(header: &Header, keyword: &str) -> FitsResult<f64> {
    header
        .get_f64(keyword)
        .ok_or_else(|| FitsError::MissingKeyword(keyword.to_string()))
}

/// Read a 2x2 matrix `{prefix}i_j`, using `diagonal` for missing diagonal terms.
fn matrix(header: &Header, prefix: &str, diagonal: f64) -> [[f64; 2]; 2] {
    let get = |i: usize, j: usize| {
        let default = if i == j { diagonal } else { 0.0 };
        header
            .get_f64(&format!("{}{}_{}", prefix, i, j))
            .unwrap_or(default)
    };
    [[get(1, 1), get(1, 2)], [get(2, 1), get(2, 2)]]
}
