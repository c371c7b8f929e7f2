//! In-memory FITS file construction for tests.

use solar_common::ObservationMeta;
use std::path::{Path, PathBuf};

const BLOCK_SIZE: usize = 2880;

/// Pixel encoding written by [`FitsBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    I16,
    F32,
    F64,
}

impl PixelFormat {
    fn bitpix(self) -> i64 {
        match self {
            PixelFormat::I16 => 16,
            PixelFormat::F32 => -32,
            PixelFormat::F64 => -64,
        }
    }
}

/// Builds a single-HDU FITS file holding a 2-D image.
#[derive(Debug, Clone, Default)]
pub struct FitsBuilder {
    cards: Vec<String>,
}

impl FitsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header cards describing `meta` (WCS, radius, observer).
    pub fn from_meta(meta: &ObservationMeta) -> Self {
        let wcs = &meta.wcs;
        let mut builder = Self::new()
            .string("CTYPE1", &wcs.ctype[0])
            .string("CTYPE2", &wcs.ctype[1])
            .string("CUNIT1", &wcs.cunit[0])
            .string("CUNIT2", &wcs.cunit[1])
            .float("CRPIX1", wcs.crpix[0])
            .float("CRPIX2", wcs.crpix[1])
            .float("CRVAL1", wcs.crval[0])
            .float("CRVAL2", wcs.crval[1])
            .float("CDELT1", wcs.cdelt[0])
            .float("CDELT2", wcs.cdelt[1])
            .float("PC1_1", wcs.pc[0][0])
            .float("PC1_2", wcs.pc[0][1])
            .float("PC2_1", wcs.pc[1][0])
            .float("PC2_2", wcs.pc[1][1])
            .float("RSUN_OBS", meta.rsun_obs);
        if let Some(dsun) = meta.dsun_obs {
            builder = builder.float("DSUN_OBS", dsun);
        }
        if let Some(detector) = &meta.detector {
            builder = builder.string("DETECTOR", detector);
        }
        if let Some(wavelength) = meta.wavelength {
            builder = builder.float("WAVELNTH", wavelength);
        }
        builder
    }

    pub fn string(mut self, key: &str, value: &str) -> Self {
        let quoted = format!("'{:<8}'", value.replace('\'', "''"));
        self.cards.push(format!("{:<8}= {:<20}", key, quoted));
        self
    }

    pub fn float(mut self, key: &str, value: f64) -> Self {
        self.cards.push(format!("{:<8}= {:>20}", key, format!("{:E}", value)));
        self
    }

    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.cards.push(format!("{:<8}= {:>20}", key, value));
        self
    }

    pub fn logical(mut self, key: &str, value: bool) -> Self {
        let v = if value { "T" } else { "F" };
        self.cards.push(format!("{:<8}= {:>20}", key, v));
        self
    }

    /// Raw card text, e.g. `HISTORY ...`.
    pub fn raw(mut self, card: &str) -> Self {
        self.cards.push(card.to_string());
        self
    }

    /// Encode `data` (row-major, `width` x `height`) as a complete FITS file.
    ///
    /// For `PixelFormat::I16` values are rounded and clamped.
    pub fn build(&self, width: usize, height: usize, data: &[f64], format: PixelFormat) -> Vec<u8> {
        assert_eq!(data.len(), width * height, "data does not match dimensions");

        let mut out = self.header_unit(format.bitpix(), &[width as u64, height as u64]);
        for &value in data {
            match format {
                PixelFormat::I16 => {
                    let v = value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16;
                    out.extend_from_slice(&v.to_be_bytes());
                }
                PixelFormat::F32 => out.extend_from_slice(&(value as f32).to_be_bytes()),
                PixelFormat::F64 => out.extend_from_slice(&value.to_be_bytes()),
            }
        }
        pad(&mut out, 0);
        out
    }

    /// Padded header unit alone, with arbitrary `BITPIX` and axis lengths.
    ///
    /// No data unit follows, which lets tests describe images that could
    /// never be stored.
    pub fn header_unit(&self, bitpix: i64, axes: &[u64]) -> Vec<u8> {
        let mut header = vec![
            format!("{:<8}= {:>20}", "SIMPLE", "T"),
            format!("{:<8}= {:>20}", "BITPIX", bitpix),
            format!("{:<8}= {:>20}", "NAXIS", axes.len()),
        ];
        for (i, len) in axes.iter().enumerate() {
            header.push(format!("{:<8}= {:>20}", format!("NAXIS{}", i + 1), len));
        }
        header.extend(self.cards.iter().cloned());
        header.push("END".to_string());

        let mut out = Vec::new();
        for card in header {
            let mut text = format!("{:<80}", card);
            text.truncate(80);
            out.extend_from_slice(text.as_bytes());
        }
        pad(&mut out, b' ');
        out
    }
}

fn pad(out: &mut Vec<u8>, fill: u8) {
    let rem = out.len() % BLOCK_SIZE;
    if rem != 0 {
        out.resize(out.len() + BLOCK_SIZE - rem, fill);
    }
}

/// FITS bytes for a map's data and metadata, stored as 64-bit floats.
pub fn fits_bytes_for(meta: &ObservationMeta, data: &[f64]) -> Vec<u8> {
    FitsBuilder::from_meta(meta).build(meta.width, meta.height, data, PixelFormat::F64)
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fits_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write FITS test file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_block_aligned() {
        let bytes = FitsBuilder::new()
            .float("CRPIX1", 1.0)
            .build(3, 2, &[0.0; 6], PixelFormat::F32);
        assert_eq!(bytes.len() % BLOCK_SIZE, 0);
        assert_eq!(bytes.len(), 2 * BLOCK_SIZE);
        assert!(bytes.starts_with(b"SIMPLE  = "));
        assert_eq!(bytes[29], b'T');
    }

    #[test]
    fn test_cards_are_80_chars() {
        let builder = FitsBuilder::new().string("TELESCOP", "SDO/AIA").int("EXPTIME", 2);
        for card in &builder.cards {
            assert!(card.len() <= 80, "card too long: {}", card);
        }
    }
}
