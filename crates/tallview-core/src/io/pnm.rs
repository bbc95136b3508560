use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};
use rayon::prelude::*;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, PNM_MAX_SAMPLE_VALUE};
use crate::decode::{checked_region, PixelBuffer, PixelFormat, RegionDecoder};
use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::io::probe::{ImageMeta, SourceFormat};
use crate::io::source::ImageBytes;

/// Binary netpbm variants with a random-access raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PnmKind {
    /// `P5`, one sample per pixel.
    Graymap,
    /// `P6`, three samples per pixel.
    Pixmap,
}

impl std::fmt::Display for PnmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PnmKind::Graymap => write!(f, "PGM (P5)"),
            PnmKind::Pixmap => write!(f, "PPM (P6)"),
        }
    }
}

/// Parsed netpbm header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PnmHeader {
    pub kind: PnmKind,
    pub width: u32,
    pub height: u32,
    pub maxval: u32,
    /// Offset of the first raster byte.
    pub data_offset: usize,
}

impl PnmHeader {
    /// Samples per pixel (1 for gray, 3 for RGB).
    pub fn channels(&self) -> usize {
        match self.kind {
            PnmKind::Graymap => 1,
            PnmKind::Pixmap => 3,
        }
    }

    /// Bytes per sample (2 when maxval needs 16 bits).
    pub fn bytes_per_sample(&self) -> usize {
        if self.maxval < 256 { 1 } else { 2 }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.channels() * self.bytes_per_sample()
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Total raster size in bytes.
    pub fn raster_bytes(&self) -> usize {
        self.row_bytes()
            .checked_mul(self.height as usize)
            .unwrap_or(usize::MAX)
    }
}

/// Whether `bytes` starts with a netpbm magic number.
pub fn is_pnm(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == b'P' && (b'1'..=b'7').contains(&bytes[1])
}

/// Parse a `P5`/`P6` header. Other netpbm variants are rejected.
pub fn parse_header(bytes: &[u8]) -> Result<PnmHeader> {
    if !is_pnm(bytes) {
        return Err(ViewerError::Decode("Missing netpbm magic".into()));
    }
    let kind = match bytes[1] {
        b'5' => PnmKind::Graymap,
        b'6' => PnmKind::Pixmap,
        other => {
            return Err(ViewerError::UnsupportedFormat(format!(
                "netpbm P{} (only binary P5/P6 support region decoding)",
                other as char
            )))
        }
    };

    let mut cursor = HeaderCursor { buf: bytes, pos: 2 };
    let width = cursor.next_number("width")?;
    let height = cursor.next_number("height")?;
    let maxval = cursor.next_number("maxval")?;

    if maxval == 0 || maxval > PNM_MAX_SAMPLE_VALUE {
        return Err(ViewerError::Decode(format!("Invalid PNM maxval {maxval}")));
    }

    // Exactly one whitespace byte separates the header from the raster.
    match bytes.get(cursor.pos) {
        Some(b) if b.is_ascii_whitespace() => cursor.pos += 1,
        _ => return Err(ViewerError::Decode("Truncated PNM header".into())),
    }

    Ok(PnmHeader {
        kind,
        width,
        height,
        maxval,
        data_offset: cursor.pos,
    })
}

struct HeaderCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl HeaderCursor<'_> {
    fn skip_separators(&mut self) {
        while let Some(&b) = self.buf.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.buf.get(self.pos) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_number(&mut self, field: &str) -> Result<u32> {
        self.skip_separators();
        let start = self.pos;
        while self.buf.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(ViewerError::Decode(format!(
                "Truncated PNM header: missing {field}"
            )));
        }
        // Digits only, so this is valid UTF-8.
        let text = std::str::from_utf8(&self.buf[start..self.pos]).unwrap_or_default();
        text.parse::<u32>()
            .map_err(|e| ViewerError::Decode(format!("Invalid PNM {field} '{text}': {e}")))
    }
}

/// Region decoder over a binary PGM/PPM raster.
///
/// Only the rows covered by a request are read, so with a memory-mapped
/// source the cost of a decode is proportional to the region, not the image.
pub struct PnmRegionDecoder {
    bytes: Arc<ImageBytes>,
    header: PnmHeader,
    meta: ImageMeta,
}

impl PnmRegionDecoder {
    /// Parse the header and check that the full raster is present.
    pub fn new(bytes: Arc<ImageBytes>) -> Result<Self> {
        let header = parse_header(&bytes)?;
        if header.width == 0 || header.height == 0 {
            return Err(ViewerError::InvalidGeometry {
                width: header.width,
                height: header.height,
            });
        }

        let expected = header.data_offset.saturating_add(header.raster_bytes());
        if bytes.len() < expected {
            return Err(ViewerError::Decode(format!(
                "PNM raster truncated: expected at least {} bytes, got {}",
                expected,
                bytes.len()
            )));
        }

        let meta = ImageMeta {
            width: header.width,
            height: header.height,
            format: SourceFormat::Pnm(header.kind),
        };
        Ok(Self {
            bytes,
            header,
            meta,
        })
    }

    /// Raw raster bytes for `width` pixels of row `y` starting at column `x`.
    fn row_slice(&self, y: usize, x: usize, width: usize) -> &[u8] {
        let bpp = self.header.bytes_per_pixel();
        let start = self.header.data_offset + y * self.header.row_bytes() + x * bpp;
        &self.bytes[start..start + width * bpp]
    }
}

impl RegionDecoder for PnmRegionDecoder {
    fn meta(&self) -> &ImageMeta {
        &self.meta
    }

    fn decode_region(
        &mut self,
        rect: PixelRect,
        format: PixelFormat,
        target: &mut PixelBuffer,
    ) -> Result<()> {
        checked_region(&rect, &self.meta)?;

        let x = rect.left as usize;
        let y0 = rect.top as usize;
        let w = rect.width() as usize;
        let h = rect.height() as usize;

        target.reshape(w as u32, h as u32, format);
        let stride = target.stride();
        let sampler = Sampler::new(&self.header);

        let convert = |(row, dst): (usize, &mut [u8])| {
            let src = self.row_slice(y0 + row, x, w);
            sampler.convert_row(src, dst, format);
        };

        if w * h >= PARALLEL_PIXEL_THRESHOLD {
            target
                .data_mut()
                .par_chunks_mut(stride)
                .enumerate()
                .for_each(convert);
        } else {
            target
                .data_mut()
                .chunks_mut(stride)
                .enumerate()
                .for_each(convert);
        }

        Ok(())
    }
}

/// Converts raster samples to 8-bit channels.
#[derive(Clone, Copy)]
struct Sampler {
    channels: usize,
    bytes_per_sample: usize,
    maxval: u32,
}

impl Sampler {
    fn new(header: &PnmHeader) -> Self {
        Self {
            channels: header.channels(),
            bytes_per_sample: header.bytes_per_sample(),
            maxval: header.maxval,
        }
    }

    #[inline]
    fn sample(&self, src: &[u8], index: usize) -> u8 {
        let raw = if self.bytes_per_sample == 1 {
            u32::from(src[index])
        } else {
            // Netpbm stores 16-bit samples most significant byte first.
            u32::from(BigEndian::read_u16(&src[index * 2..index * 2 + 2]))
        };
        if self.maxval == 255 {
            raw.min(255) as u8
        } else {
            ((raw.min(self.maxval) * 255 + self.maxval / 2) / self.maxval) as u8
        }
    }

    fn convert_row(&self, src: &[u8], dst: &mut [u8], format: PixelFormat) {
        let out_bpp = format.bytes_per_pixel();
        for (i, px) in dst.chunks_exact_mut(out_bpp).enumerate() {
            let base = i * self.channels;
            let (r, g, b) = if self.channels == 1 {
                let v = self.sample(src, base);
                (v, v, v)
            } else {
                (
                    self.sample(src, base),
                    self.sample(src, base + 1),
                    self.sample(src, base + 2),
                )
            };
            format.write_rgb(px, r, g, b);
        }
    }
}
