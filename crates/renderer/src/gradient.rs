//! Colormapped rendering of solar maps.
//!
//! Data rows are stored bottom-up (FITS order). The rendered image is flipped
//! so that row 0 of the data ends up as the bottom row of the image.

use image::{Rgba, RgbaImage};
use solar_common::{DisplayConfig, SolarMap};
use tracing::debug;

use crate::{RenderError, RenderResult};

/// Value range mapped onto the colormap.
///
/// Explicit `vmin`/`vmax` take precedence over the range of unmasked finite
/// pixels. Returns None when neither is available.
pub fn display_limits(map: &SolarMap, display: &DisplayConfig) -> Option<(f64, f64)> {
    let (vmin, vmax) = display.limits();
    let data_range = map.unmasked_range();
    let lo = vmin.or(data_range.map(|(lo, _)| lo))?;
    let hi = vmax.or(data_range.map(|(_, hi)| hi))?;
    Some((lo, hi))
}

/// Render `map` through `display` into an RGBA image of the same size.
///
/// Masked and non-finite pixels are drawn in the bad color.
pub fn render_map(map: &SolarMap, display: &DisplayConfig) -> RenderResult<RgbaImage> {
    let (width, height) = (map.width(), map.height());
    let too_large = || RenderError::ImageTooLarge { width, height };
    let img_width = u32::try_from(width).map_err(|_| too_large())?;
    let img_height = u32::try_from(height).map_err(|_| too_large())?;

    let bad = Rgba(display.bad_color().to_rgba());
    let mut image = RgbaImage::from_pixel(img_width, img_height, bad);

    let Some((lo, hi)) = display_limits(map, display) else {
        debug!("No unmasked finite pixels; image is entirely bad color");
        return Ok(image);
    };

    let colormap = display.colormap();
    let scaling = display.scaling();
    let data = map.data();
    let mut drawn = 0usize;

    for row in 0..height {
        let y = (height - 1 - row) as u32;
        for col in 0..width {
            let value = data[row * width + col];
            if !value.is_finite() || map.is_masked(col, row) {
                continue;
            }
            let color = colormap.sample(scaling.normalize(value, lo, hi));
            image.put_pixel(col as u32, y, Rgba(color.to_rgba()));
            drawn += 1;
        }
    }

    debug!(
        width,
        height,
        drawn,
        vmin = lo,
        vmax = hi,
        colormap = %colormap.name,
        scaling = ?scaling,
        "Rendered map"
    );
    Ok(image)
}
