//! Decoding of FITS image arrays into physical values.

use crate::header::Header;
use crate::{size_overflow, FitsError, FitsResult};

/// Pixel storage type given by `BITPIX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitpix {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Bitpix {
    pub fn from_header_value(value: i64) -> FitsResult<Self> {
        match value {
            8 => Ok(Bitpix::U8),
            16 => Ok(Bitpix::I16),
            32 => Ok(Bitpix::I32),
            64 => Ok(Bitpix::I64),
            -32 => Ok(Bitpix::F32),
            -64 => Ok(Bitpix::F64),
            other => Err(FitsError::UnsupportedBitpix(other)),
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Bitpix::U8 => 1,
            Bitpix::I16 => 2,
            Bitpix::I32 | Bitpix::F32 => 4,
            Bitpix::I64 | Bitpix::F64 => 8,
        }
    }

    fn is_integer(self) -> bool {
        matches!(self, Bitpix::U8 | Bitpix::I16 | Bitpix::I32 | Bitpix::I64)
    }
}

/// Decode `count` big-endian pixels and apply `BSCALE`/`BZERO`.
///
/// Integer pixels equal to `BLANK` become NaN.
pub fn decode_pixels(raw: &[u8], bitpix: Bitpix, count: usize, header: &Header) -> FitsResult<Vec<f64>> {
    let needed = count
        .checked_mul(bitpix.bytes_per_pixel())
        .ok_or_else(|| size_overflow("pixel data length"))?;
    if raw.len() < needed {
        return Err(FitsError::Truncated {
            needed,
            available: raw.len(),
        });
    }

    let bscale = header.get_f64("BSCALE").unwrap_or(1.0);
    let bzero = header.get_f64("BZERO").unwrap_or(0.0);
    let blank = if bitpix.is_integer() {
        header.get_i64("BLANK")
    } else {
        None
    };

    let raw = &raw[..needed];
    let values: Vec<f64> = match bitpix {
        Bitpix::U8 => raw.iter().map(|&b| scale_int(b as i64, blank, bscale, bzero)).collect(),
        Bitpix::I16 => raw
            .chunks_exact(2)
            .map(|c| scale_int(i16::from_be_bytes([c[0], c[1]]) as i64, blank, bscale, bzero))
            .collect(),
        Bitpix::I32 => raw
            .chunks_exact(4)
            .map(|c| {
                let v = i32::from_be_bytes([c[0], c[1], c[2], c[3]]);
                scale_int(v as i64, blank, bscale, bzero)
            })
            .collect(),
        Bitpix::I64 => raw
            .chunks_exact(8)
            .map(|c| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(c);
                scale_int(i64::from_be_bytes(buf), blank, bscale, bzero)
            })
            .collect(),
        Bitpix::F32 => raw
            .chunks_exact(4)
            .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64 * bscale + bzero)
            .collect(),
        Bitpix::F64 => raw
            .chunks_exact(8)
            .map(|c| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(c);
                f64::from_be_bytes(buf) * bscale + bzero
            })
            .collect(),
    };

    Ok(values)
}

#[inline]
fn scale_int(value: i64, blank: Option<i64>, bscale: f64, bzero: f64) -> f64 {
    if blank == Some(value) {
        f64::NAN
    } else {
        value as f64 * bscale + bzero
    }
}
