//! PNG encoding for rendered images.
//!
//! Two color types are produced:
//! - **Indexed (color type 3)** when the image holds at most 256 distinct
//!   colors. Masked renderings with a flat bad color usually qualify.
//! - **RGBA (color type 6)** otherwise.
//!
//! [`encode_png`] picks the type automatically.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crc32fast::Hasher;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use tracing::debug;

use crate::{RenderError, RenderResult};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum palette length of an indexed PNG.
pub const MAX_PALETTE_SIZE: usize = 256;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Distinct colors of an image plus one palette index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u8>,
}

impl Palette {
    /// Build a palette from RGBA bytes, or None if there are too many colors.
    pub fn extract(pixels: &[u8]) -> Option<Self> {
        let mut lookup: HashMap<[u8; 4], u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
        let mut colors = Vec::new();
        let mut indices = Vec::with_capacity(pixels.len() / 4);

        for px in pixels.chunks_exact(4) {
            let color = [px[0], px[1], px[2], px[3]];
            let index = match lookup.get(&color) {
                Some(&index) => index,
                None => {
                    if colors.len() == MAX_PALETTE_SIZE {
                        return None;
                    }
                    let index = colors.len() as u8;
                    colors.push(color);
                    lookup.insert(color, index);
                    index
                }
            };
            indices.push(index);
        }

        Some(Self { colors, indices })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    fn has_transparency(&self) -> bool {
        self.colors.iter().any(|c| c[3] < 255)
    }
}

/// Encode `image` as PNG, indexed when the palette fits.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let pixels = image.as_raw();

    match Palette::extract(pixels) {
        Some(palette) => {
            debug!(colors = palette.len(), "Encoding indexed PNG");
            encode_indexed(width, height, &palette)
        }
        None => {
            debug!("Encoding RGBA PNG");
            encode_rgba(pixels, width, height)
        }
    }
}

/// Encode row-major RGBA bytes (top row first) as an RGBA PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_buffer(pixels.len(), width, height, 4)?;
    let mut png = start_png(width, height, COLOR_TYPE_RGBA)?;
    write_chunk(&mut png, b"IDAT", &compress_scanlines(pixels, width * 4)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode a palette image as an indexed PNG.
pub fn encode_indexed(width: usize, height: usize, palette: &Palette) -> RenderResult<Vec<u8>> {
    check_buffer(palette.indices.len(), width, height, 1)?;
    let mut png = start_png(width, height, COLOR_TYPE_INDEXED)?;

    let plte: Vec<u8> = palette.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.has_transparency() {
        let trns: Vec<u8> = palette.colors.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &compress_scanlines(&palette.indices, width)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode `image` and write it to `path`. Returns the number of bytes written.
pub fn write_png(path: &Path, image: &RgbaImage) -> RenderResult<usize> {
    let png = encode_png(image)?;
    std::fs::write(path, &png)?;
    debug!(path = %path.display(), bytes = png.len(), "Wrote PNG");
    Ok(png.len())
}

fn check_buffer(len: usize, width: usize, height: usize, bytes_per_pixel: usize) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage);
    }
    let expected = width * height * bytes_per_pixel;
    if len != expected {
        return Err(RenderError::BufferSize { expected, actual: len });
    }
    Ok(())
}

/// Signature and IHDR chunk.
fn start_png(width: usize, height: usize, color_type: u8) -> RenderResult<Vec<u8>> {
    let too_large = || RenderError::ImageTooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&w.to_be_bytes());
    ihdr.extend_from_slice(&h.to_be_bytes());
    // bit depth, color type, compression, filter, interlace
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);

    let mut png = SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &ihdr);
    Ok(png)
}

/// Zlib-compress scanlines of `stride` bytes, each prefixed with filter type 0.
fn compress_scanlines(data: &[u8], stride: usize) -> RenderResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for line in data.chunks_exact(stride) {
        encoder.write_all(&[0]).map_err(RenderError::Compression)?;
        encoder.write_all(line).map_err(RenderError::Compression)?;
    }
    encoder.finish().map_err(RenderError::Compression)
}

fn write_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(kind);
    png.extend_from_slice(data);

    let mut crc = Hasher::new();
    crc.update(kind);
    crc.update(data);
    png.extend_from_slice(&crc.finalize().to_be_bytes());
}
