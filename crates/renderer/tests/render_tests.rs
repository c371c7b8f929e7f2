//! Tests for rendering masked solar maps.
//!
//! Covers:
//! - Bad-color fill of masked pixels
//! - Copy-on-write display configurations
//! - Limb overlay placement
//! - PNG output format selection

use image::RgbaImage;
use renderer::png::{encode_rgba, Palette};
use renderer::{draw_limb, encode_png, render_map, write_png, LimbStyle};
use solar_common::{Color, DisplayConfig, Mask, Scaling};
use test_utils::{synthetic_map, temp_test_dir};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

// ============================================================================
// Helper functions
// ============================================================================

/// Mask of pixels within `radius_px` of the image center.
fn center_mask(size: usize, radius_px: f64) -> Mask {
    let center = (size as f64 - 1.0) / 2.0;
    Mask::from_fn(size, size, |col, row| {
        let (dx, dy) = (col as f64 - center, row as f64 - center);
        (dx * dx + dy * dy).sqrt() <= radius_px
    })
}

/// Color type byte from the IHDR chunk.
fn png_color_type(png: &[u8]) -> u8 {
    png[25]
}

// ============================================================================
// Map rendering
// ============================================================================

#[test]
fn test_masked_pixels_use_bad_color() {
    let size = 16;
    let map = synthetic_map(size, 1.0, 5.0);
    let masked = map.with_mask(center_mask(size, 5.0)).unwrap();
    let display = masked.display().with_bad_color(Color::BLACK);

    let image = render_map(&masked, &display).unwrap();
    assert_eq!(image.dimensions(), (16, 16));

    for row in 0..size {
        for col in 0..size {
            let pixel = image.get_pixel(col as u32, (size - 1 - row) as u32);
            if masked.is_masked(col, row) {
                assert_eq!(pixel.0, [0, 0, 0, 255], "masked pixel ({}, {})", col, row);
            }
        }
    }
}

#[test]
fn test_nan_pixels_use_bad_color() {
    let map = synthetic_map(4, 1.0, 1.5);
    let mut data = map.data().to_vec();
    data[5] = f64::NAN;
    let with_nan = solar_common::SolarMap::new(data, map.meta().clone()).unwrap();
    let display = DisplayConfig::default().with_bad_color(Color::rgb(255, 0, 0));

    let image = render_map(&with_nan, &display).unwrap();
    // Pixel index 5 is (col 1, row 1), image row 2.
    assert_eq!(image.get_pixel(1, 2).0, [255, 0, 0, 255]);
}

#[test]
fn test_bad_color_change_does_not_leak() {
    let map = synthetic_map(8, 1.0, 3.0);
    let masked = map.with_mask(center_mask(8, 3.0)).unwrap();
    let original = masked.display().clone();
    let black = original.with_bad_color(Color::BLACK);

    assert_eq!(original.bad_color(), Color::transparent());
    assert_eq!(black.bad_color(), Color::BLACK);
    assert!(black.shares_colormap(&original));

    let transparent = render_map(&masked, &original).unwrap();
    let opaque = render_map(&masked, &black).unwrap();
    assert_eq!(transparent.get_pixel(4, 4).0[3], 0);
    assert_eq!(opaque.get_pixel(4, 4).0, [0, 0, 0, 255]);
}

#[test]
fn test_linear_scaling_spans_colormap() {
    let map = synthetic_map(8, 1.0, 3.0);
    let display = DisplayConfig::default().with_scaling(Scaling::Linear);
    let (lo, hi) = map.unmasked_range().unwrap();

    let image = render_map(&map, &display).unwrap();
    let lo_idx = map.data().iter().position(|&v| v == lo).unwrap();
    let hi_idx = map.data().iter().position(|&v| v == hi).unwrap();
    let at = |idx: usize| image.get_pixel((idx % 8) as u32, (7 - idx / 8) as u32).0;

    assert_eq!(at(lo_idx), [0, 0, 0, 255]);
    assert_eq!(at(hi_idx), [255, 255, 255, 255]);
}

// ============================================================================
// Limb overlay
// ============================================================================

#[test]
fn test_limb_is_drawn_at_solar_radius() {
    let size = 64;
    let rsun = 20.0;
    let map = synthetic_map(size, 1.0, rsun);
    let display = DisplayConfig::default().with_bad_color(Color::BLACK);
    let masked = map.with_mask(Mask::from_fn(size, size, |_, _| true)).unwrap();
    let mut image = render_map(&masked, &display).unwrap();

    let limb = LimbStyle {
        color: Color::rgb(0, 255, 0),
        points: 180,
    };
    let drawn = draw_limb(&mut image, &masked, &limb).unwrap();
    assert_eq!(drawn, 180);

    let center = (size as f64 - 1.0) / 2.0;
    let mut green = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == [0, 255, 0, 255] {
            green += 1;
            let r = ((x as f64 - center).powi(2) + (y as f64 - center).powi(2)).sqrt();
            assert!((r - rsun).abs() < 1.5, "limb pixel at radius {}", r);
        }
    }
    assert!(green > 80);
}

// ============================================================================
// PNG encoding
// ============================================================================

#[test]
fn test_masked_render_encodes_as_indexed() {
    let map = synthetic_map(8, 1.0, 2.0);
    let masked = map.with_mask(center_mask(8, 2.0)).unwrap();
    let image = render_map(&masked, &masked.display().with_bad_color(Color::BLACK)).unwrap();

    let png = encode_png(&image).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(png_color_type(&png), 3);
}

#[test]
fn test_many_colors_encode_as_rgba() {
    let image = RgbaImage::from_fn(32, 32, |x, y| image::Rgba([x as u8 * 8, y as u8 * 8, 0, 255]));
    assert!(Palette::extract(image.as_raw()).is_none());

    let png = encode_png(&image).unwrap();
    assert_eq!(png_color_type(&png), 6);
    assert_eq!(png, encode_rgba(image.as_raw(), 32, 32).unwrap());
}

#[test]
fn test_png_decodes_to_rendered_pixels() {
    let map = synthetic_map(12, 1.0, 4.0);
    let masked = map.with_mask(center_mask(12, 4.0)).unwrap();
    let image = render_map(&masked, &masked.display().with_bad_color(Color::BLACK)).unwrap();

    let png = encode_png(&image).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded, image);
}

#[test]
fn test_write_png() {
    let dir = temp_test_dir();
    let path = dir.path().join("masked_disk.png");
    let image = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));

    let written = write_png(&path, &image).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), written);
    assert_eq!(&bytes[0..8], &PNG_SIGNATURE);
}
