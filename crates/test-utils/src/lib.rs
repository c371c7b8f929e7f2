//! Shared test utilities for the solar disk masking workspace.
//!
//! - Synthetic solar images and metadata (`generators`)
//! - In-memory FITS files for parser and pipeline tests (`fits`)
//! - Reference observation parameters (`fixtures`)
//! - Test data path helpers and skip macros (`paths`)
//!
//! Add to a crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fits;
pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fits::*;
pub use generators::*;
pub use paths::*;

/// Skip the current test if the named file cannot be found.
///
/// Used for tests that need the real sample image, which is not checked in.
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_real_aia_image() {
///     let path = require_test_file!("AIA20110607_063302_0171_lowres.fits");
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Set TEST_DATA_DIR or SOLAR_SAMPLE_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Approximate floating-point equality.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(959.63_f64, 959.6_f64, 0.1_f64);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }
}
