//! Reference image-decode collaborator for softblit.
//!
//! [`FileDecoder`] reads a file, sniffs the format from its magic bytes and
//! decodes PNG (via the `png` crate) or uncompressed 24/32-bit BMP into raw
//! RGBA pixels. The compositing core only ever sees the
//! [`ImageDecoder`] contract, so games with exotic formats can swap in their
//! own decoder without touching the engine.

use std::fs;
use std::path::Path;

use softblit_types::{DecodedImage, ImageDecoder, Result, SoftblitError};

/// Image format detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Bmp,
    Unknown,
}

/// Detect the image format from the first few bytes.
pub fn detect_format(data: &[u8]) -> ImageFormat {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        ImageFormat::Png
    } else if data.starts_with(b"BM") {
        ImageFormat::Bmp
    } else {
        ImageFormat::Unknown
    }
}

/// File-based decoder with magic-byte dispatch.
#[derive(Debug, Default)]
pub struct FileDecoder;

impl FileDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let data = fs::read(path)
            .map_err(|e| SoftblitError::Load(format!("{}: {e}", path.display())))?;
        let format = detect_format(&data);
        let image = match format {
            ImageFormat::Png => decode_png(&data)?,
            ImageFormat::Bmp => decode_bmp(&data)?,
            ImageFormat::Unknown => {
                return Err(SoftblitError::Load(format!(
                    "{}: unrecognized image format",
                    path.display()
                )));
            },
        };
        log::debug!(
            "decoded {} as {format:?} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(image)
    }
}

/// Decode a PNG into RGBA8, expanding palette, grayscale and 16-bit input.
pub fn decode_png(data: &[u8]) -> Result<DecodedImage> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(
        png::Transformations::EXPAND | png::Transformations::STRIP_16,
    );
    let mut reader = decoder
        .read_info()
        .map_err(|e| SoftblitError::Load(format!("png: {e}")))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| SoftblitError::Load(format!("png: {e}")))?;
    buf.truncate(info.buffer_size());

    let pixels = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => {
            let mut out = Vec::with_capacity(buf.len() / 3 * 4);
            for px in buf.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            out
        },
        png::ColorType::GrayscaleAlpha => {
            let mut out = Vec::with_capacity(buf.len() * 2);
            for px in buf.chunks_exact(2) {
                out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
            out
        },
        png::ColorType::Grayscale => {
            let mut out = Vec::with_capacity(buf.len() * 4);
            for &g in &buf {
                out.extend_from_slice(&[g, g, g, 255]);
            }
            out
        },
        other => {
            return Err(SoftblitError::Load(format!(
                "png: unsupported color type {other:?}"
            )));
        },
    };

    Ok(DecodedImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}

/// Decode an uncompressed 24-bit or 32-bit BMP.
///
/// BMP rows are stored bottom-up (usually), padded to 4-byte boundaries,
/// with BGR(A) channel order; all three quirks are undone here.
pub fn decode_bmp(data: &[u8]) -> Result<DecodedImage> {
    let header = BmpHeader::parse(data)?;
    let w = header.width;
    let bytes_per_pixel = (header.bpp / 8) as usize;
    let row_size = (w as usize * bytes_per_pixel).div_ceil(4) * 4;

    // Check the declared extent against the file before allocating; a
    // huge header on a short file must fail cheaply, not reserve gigabytes.
    let avail_rows = data.len().saturating_sub(header.pixel_offset) / row_size;
    if header.height as usize > avail_rows {
        return Err(SoftblitError::Load("bmp: truncated pixel data".into()));
    }

    let mut pixels = vec![0u8; w as usize * header.height as usize * 4];
    for row in 0..header.height {
        let src_row = if header.bottom_up {
            header.height - 1 - row
        } else {
            row
        };
        let src_offset = header.pixel_offset + src_row as usize * row_size;
        for col in 0..w {
            let src = src_offset + col as usize * bytes_per_pixel;
            let dst = (row as usize * w as usize + col as usize) * 4;
            pixels[dst] = data[src + 2];
            pixels[dst + 1] = data[src + 1];
            pixels[dst + 2] = data[src];
            pixels[dst + 3] = if header.bpp == 32 { data[src + 3] } else { 255 };
        }
    }

    Ok(DecodedImage {
        width: w,
        height: header.height,
        pixels,
    })
}

struct BmpHeader {
    pixel_offset: usize,
    width: u32,
    height: u32,
    bpp: u16,
    bottom_up: bool,
}

impl BmpHeader {
    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 54 || &data[0..2] != b"BM" {
            return Err(SoftblitError::Load("bmp: not a BMP file".into()));
        }
        let le32 = |o: usize| u32::from_le_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]]);
        let pixel_offset = le32(10) as usize;
        let width = le32(18) as i32;
        let height = le32(22) as i32;
        let bpp = u16::from_le_bytes([data[28], data[29]]);
        let compression = le32(30);

        if width <= 0 || height == 0 {
            return Err(SoftblitError::Load(format!(
                "bmp: bad dimensions {width}x{height}"
            )));
        }
        if compression != 0 {
            return Err(SoftblitError::Load("bmp: compressed BMP not supported".into()));
        }
        if bpp != 24 && bpp != 32 {
            return Err(SoftblitError::Load(format!("bmp: unsupported bit depth {bpp}")));
        }

        Ok(Self {
            pixel_offset,
            width: width as u32,
            height: height.unsigned_abs(),
            bpp,
            bottom_up: height > 0,
        })
    }
}
