//! FITS parser for solar images.
//!
//! This crate provides a pure Rust reader for the FITS (Flexible Image
//! Transport System) format, covering what solar imagers such as SDO/AIA
//! write to disk: a sequence of HDUs (header + data units) made of 2880-byte
//! blocks, with 2-D images stored big-endian.
//!
//! # Scope
//!
//! - Primary HDU images and `IMAGE` extensions
//! - `BITPIX` 8, 16, 32, 64, -32, -64 with `BSCALE`/`BZERO`/`BLANK`
//! - Tile-compressed images (`ZIMAGE = T` binary tables) are rejected
//!
//! Pixel rows are returned in file order: row 0 is the first row stored,
//! which FITS defines as the bottom of the image.

pub mod data;
pub mod header;
pub mod metadata;

use bytes::Bytes;
use solar_common::{SolarError, SolarMap};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub use data::Bitpix;
pub use header::{Card, Header, HeaderValue};
pub use metadata::{observation_meta, wcs_params};

/// Size of a FITS logical record.
pub const BLOCK_SIZE: usize = 2880;

/// Size of a header card.
pub const CARD_SIZE: usize = 80;

/// Result type for FITS parser operations.
pub type FitsResult<T> = Result<T, FitsError>;

/// Error types for FITS parsing.
#[derive(Error, Debug)]
pub enum FitsError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File ended before a header or data unit was complete
    #[error("Truncated file: needed {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Malformed header card
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Missing required keyword
    #[error("Missing required keyword: {0}")]
    MissingKeyword(String),

    #[error("Unsupported BITPIX: {0}")]
    UnsupportedBitpix(i64),

    #[error("Unsupported image layout: {0}")]
    UnsupportedLayout(String),

    #[error("No 2-D image found in file")]
    NoImage,

    /// Metadata present but unusable
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Map construction failed: {0}")]
    Map(#[from] SolarError),
}

/// Location of one header + data unit in the file.
#[derive(Debug, Clone)]
pub struct Hdu {
    pub index: usize,
    pub header: Header,
    /// Byte offset of the data unit
    pub data_offset: usize,
    /// Length of the data unit without block padding
    pub data_len: usize,
}

impl Hdu {
    /// Axis lengths `NAXIS1..NAXISn`.
    pub fn axes(&self) -> FitsResult<Vec<usize>> {
        axes(&self.header)
    }

    fn is_compressed_image(&self) -> bool {
        self.header.get_bool("ZIMAGE").unwrap_or(false)
    }
}

/// A decoded 2-D image and its header.
#[derive(Debug, Clone)]
pub struct FitsImage {
    pub header: Header,
    pub width: usize,
    pub height: usize,
    /// Physical values in row-major order
    pub data: Vec<f64>,
}

/// Reader over an in-memory FITS file.
pub struct FitsReader {
    data: Bytes,
}

impl FitsReader {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    pub fn open(path: impl AsRef<Path>) -> FitsResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), size = bytes.len(), "Read FITS file");
        Ok(Self::new(Bytes::from(bytes)))
    }

    /// Walk all HDUs in the file.
    pub fn hdus(&self) -> FitsResult<Vec<Hdu>> {
        let mut hdus = Vec::new();
        let mut offset = 0;

        while offset < self.data.len() {
            // Some writers pad the file past the last HDU.
            if !hdus.is_empty() && self.data[offset..].iter().all(|&b| b == 0 || b == b' ') {
                break;
            }

            let (header, header_len) = header::Header::parse(&self.data[offset..])?;
            if hdus.is_empty() && header.get_bool("SIMPLE") != Some(true) {
                return Err(FitsError::InvalidHeader(
                    "primary header must start with SIMPLE = T".to_string(),
                ));
            }

            let data_len = data_unit_len(&header)?;
            let data_offset = offset + header_len;
            let data_end = data_offset
                .checked_add(data_len)
                .ok_or_else(|| size_overflow("data unit end"))?;
            if data_end > self.data.len() {
                return Err(FitsError::Truncated {
                    needed: data_end,
                    available: self.data.len(),
                });
            }

            hdus.push(Hdu {
                index: hdus.len(),
                header,
                data_offset,
                data_len,
            });

            offset = data_offset + data_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        }

        if hdus.is_empty() {
            return Err(FitsError::Truncated {
                needed: BLOCK_SIZE,
                available: self.data.len(),
            });
        }

        Ok(hdus)
    }

    /// Decode the first HDU holding a 2-D image.
    pub fn first_image(&self) -> FitsResult<FitsImage> {
        for hdu in self.hdus()? {
            if hdu.is_compressed_image() {
                return Err(FitsError::UnsupportedLayout(format!(
                    "HDU {} is a tile-compressed image",
                    hdu.index
                )));
            }

            let is_image = hdu.index == 0
                || hdu.header.get_str("XTENSION").map(str::trim) == Some("IMAGE");
            let axes = hdu.axes()?;
            if !is_image || axes.is_empty() {
                continue;
            }
            return self.read_image(&hdu);
        }
        Err(FitsError::NoImage)
    }

    /// Decode the image stored in `hdu`.
    pub fn read_image(&self, hdu: &Hdu) -> FitsResult<FitsImage> {
        let axes = hdu.axes()?;
        let (width, height) = match axes.as_slice() {
            [w, h] => (*w, *h),
            // Degenerate trailing axes (e.g. NAXIS3 = 1) are accepted.
            [w, h, rest @ ..] if rest.iter().all(|&n| n == 1) => (*w, *h),
            other => {
                return Err(FitsError::UnsupportedLayout(format!(
                    "expected a 2-D image, got axes {:?}",
                    other
                )))
            }
        };

        let bitpix = Bitpix::from_header_value(hdu.header.require_i64("BITPIX")?)?;
        let raw = &self.data[hdu.data_offset..hdu.data_offset + hdu.data_len];
        let count = width
            .checked_mul(height)
            .ok_or_else(|| size_overflow("image size"))?;
        let data = data::decode_pixels(raw, bitpix, count, &hdu.header)?;

        debug!(hdu = hdu.index, width, height, ?bitpix, "Decoded FITS image");

        Ok(FitsImage {
            header: hdu.header.clone(),
            width,
            height,
            data,
        })
    }
}

/// Parse a FITS file held in memory into a solar map.
pub fn parse_map(data: Bytes) -> FitsResult<SolarMap> {
    let image = FitsReader::new(data).first_image()?;
    let meta = metadata::observation_meta(&image.header, image.width, image.height)?;
    Ok(SolarMap::new(image.data, meta)?)
}

/// Read a FITS file from disk into a solar map.
pub fn read_map(path: impl AsRef<Path>) -> FitsResult<SolarMap> {
    let image = FitsReader::open(path)?.first_image()?;
    let meta = metadata::observation_meta(&image.header, image.width, image.height)?;
    Ok(SolarMap::new(image.data, meta)?)
}

fn axes(header: &Header) -> FitsResult<Vec<usize>> {
    let naxis = header.require_i64("NAXIS")?;
    if !(0..=999).contains(&naxis) {
        return Err(FitsError::InvalidHeader(format!("NAXIS = {}", naxis)));
    }
    (1..=naxis)
        .map(|n| {
            let key = format!("NAXIS{}", n);
            let len = header.require_i64(&key)?;
            usize::try_from(len)
                .map_err(|_| FitsError::InvalidHeader(format!("{} = {}", key, len)))
        })
        .collect()
}

/// Unpadded size of the data unit described by `header`.
fn data_unit_len(header: &Header) -> FitsResult<usize> {
    let axes = axes(header)?;
    if axes.is_empty() {
        return Ok(0);
    }
    let bitpix = header.require_i64("BITPIX")?;
    let bytes_per_value = (bitpix.unsigned_abs() / 8) as usize;
    let pcount = header.get_i64("PCOUNT").unwrap_or(0).max(0) as usize;
    let gcount = header.get_i64("GCOUNT").unwrap_or(1).max(1) as usize;

    // Random-groups files set NAXIS1 = 0 and skip it in the product.
    let counted = if axes[0] == 0 { &axes[1..] } else { &axes[..] };
    let values = counted
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| size_overflow("NAXISn product"))?;

    pcount
        .checked_add(values)
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(bytes_per_value))
        .ok_or_else(|| size_overflow("data unit length"))
}

pub(crate) fn size_overflow(what: &str) -> FitsError {
    FitsError::InvalidHeader(format!("{} overflows the address space", what))
}
