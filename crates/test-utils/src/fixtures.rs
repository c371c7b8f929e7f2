//! Reference observation parameters used across the test suite.

/// SDO/AIA 171 Å sample image (2011-06-07 06:33:02 UTC, 1024x1024 lowres).
pub mod aia171 {
    pub const WIDTH: usize = 1024;
    pub const HEIGHT: usize = 1024;
    /// Plate scale (arcsec/pixel)
    pub const CDELT: f64 = 2.402_792;
    /// 1-based reference pixel
    pub const CRPIX1: f64 = 512.5;
    pub const CRPIX2: f64 = 512.5;
    /// Apparent solar radius (arcsec)
    pub const RSUN_OBS: f64 = 945.436_1;
    /// Observer distance (meters)
    pub const DSUN_OBS: f64 = 151_779_935_999.0;
    pub const DATE_OBS: &str = "2011-06-07T06:33:02.88";
    pub const WAVELNTH: i64 = 171;
}

/// The 4x4 scenario: unit plate scale, disk center at the image center,
/// solar radius of 1.5 arcsec.
pub mod tiny_sun {
    pub const WIDTH: usize = 4;
    pub const HEIGHT: usize = 4;
    pub const PLATE_SCALE: f64 = 1.0;
    pub const RSUN_OBS: f64 = 1.5;
    /// 0-based disk center
    pub const CENTER: (f64, f64) = (1.5, 1.5);
}
