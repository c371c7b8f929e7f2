//! Locating and loading bundled sample images.
//!
//! Sample files are looked up by short name in the following locations:
//! 1. `$SOLAR_SAMPLE_DIR` (if set)
//! 2. `$HOME/sunpy/data`

use std::env;
use std::path::{Path, PathBuf};

use solar_common::SolarMap;
use tracing::info;

use crate::{MaskError, MaskResult};

/// SDO/AIA 171 Å full-disk image, 2011-06-07 06:33 UTC, reduced resolution.
pub const AIA_171_IMAGE: &str = "AIA20110607_063302_0171_lowres.fits";

/// Environment variable naming an extra sample directory.
pub const SAMPLE_DIR_ENV: &str = "SOLAR_SAMPLE_DIR";

const SAMPLES: &[(&str, &str)] = &[("aia171", AIA_171_IMAGE), ("aia_171_image", AIA_171_IMAGE)];

/// File name of the sample called `name`.
pub fn sample_file_name(name: &str) -> MaskResult<&'static str> {
    let key = name.trim().to_lowercase();
    SAMPLES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, file)| *file)
        .ok_or_else(|| MaskError::UnknownSample(name.to_string()))
}

/// Directories searched for sample files, in order.
pub fn sample_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(dir) = env::var(SAMPLE_DIR_ENV) {
        dirs.push(PathBuf::from(dir));
    }
    if let Ok(home) = env::var("HOME") {
        dirs.push(PathBuf::from(home).join("sunpy").join("data"));
    }
    dirs
}

/// Find a sample file in `dirs`.
pub fn find_sample_in(name: &str, dirs: &[PathBuf]) -> MaskResult<PathBuf> {
    let file = sample_file_name(name)?;
    dirs.iter()
        .map(|dir| dir.join(file))
        .find(|path| path.is_file())
        .ok_or_else(|| MaskError::SampleNotFound {
            file: file.to_string(),
            searched: dirs.to_vec(),
        })
}

/// Find a sample file in the default locations.
pub fn find_sample(name: &str) -> MaskResult<PathBuf> {
    find_sample_in(name, &sample_dirs())
}

/// Load a FITS image from `path` as a map.
pub fn load_map(path: &Path) -> MaskResult<SolarMap> {
    let map = fits_parser::read_map(path)?;
    info!(
        path = %path.display(),
        map = %map.meta().name(),
        width = map.width(),
        height = map.height(),
        rsun_obs = map.meta().rsun_obs,
        "Loaded solar map"
    );
    Ok(map)
}

/// Load the sample called `name`.
pub fn load_sample(name: &str) -> MaskResult<SolarMap> {
    load_map(&find_sample(name)?)
}
