use std::io::Cursor;
use std::sync::Arc;

use png::{BitDepth, ColorType, Transformations};
use tracing::debug;

use crate::decode::{checked_region, PixelBuffer, PixelFormat, RegionDecoder};
use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::io::probe::ImageMeta;
use crate::io::source::ImageBytes;

type RowReader = png::Reader<Cursor<SharedBytes>>;

/// Shared encoded stream handed to the PNG reader by value.
#[derive(Clone)]
struct SharedBytes(Arc<ImageBytes>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn decode_err(e: png::DecodingError) -> ViewerError {
    ViewerError::Decode(format!("PNG: {e}"))
}

/// Region decoder that streams PNG rows and keeps only the requested ones.
///
/// Rows are inflated in order, so the reader is kept between requests and
/// only restarted when a region begins above the current stream position.
/// Memory stays proportional to the region; interlaced files are not
/// supported here (see [`PngRegionDecoder::supports`]).
pub struct PngRegionDecoder {
    bytes: SharedBytes,
    meta: ImageMeta,
    reader: Option<RowReader>,
    /// Index of the next row the reader yields; `u32::MAX` after a failed
    /// read forces a restart.
    next_row: u32,
    channels: usize,
    row_bytes: usize,
    staging: Vec<u8>,
}

impl PngRegionDecoder {
    /// Whether `bytes` is a PNG this decoder can stream (not interlaced).
    pub fn supports(bytes: &Arc<ImageBytes>) -> Result<bool> {
        let reader = png::Decoder::new(Cursor::new(SharedBytes(Arc::clone(bytes))))
            .read_info()
            .map_err(decode_err)?;
        Ok(!reader.info().interlaced)
    }

    pub fn new(bytes: Arc<ImageBytes>, meta: ImageMeta) -> Result<Self> {
        let mut decoder = Self {
            bytes: SharedBytes(bytes),
            meta,
            reader: None,
            next_row: 0,
            channels: 0,
            row_bytes: 0,
            staging: Vec::new(),
        };
        decoder.restart()?;
        Ok(decoder)
    }

    fn restart(&mut self) -> Result<()> {
        let mut decoder = png::Decoder::new(Cursor::new(self.bytes.clone()));
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let reader = decoder.read_info().map_err(decode_err)?;

        let info = reader.info();
        if (info.width, info.height) != (self.meta.width, self.meta.height) {
            return Err(ViewerError::Decode(format!(
                "PNG header {}x{} differs from probed {}x{}",
                info.width, info.height, self.meta.width, self.meta.height
            )));
        }
        if info.interlaced {
            return Err(ViewerError::UnsupportedFormat(
                "interlaced PNG cannot be streamed by row".into(),
            ));
        }

        let (color, depth) = reader.output_color_type();
        if depth != BitDepth::Eight {
            return Err(ViewerError::UnsupportedFormat(format!(
                "PNG output depth {depth:?}"
            )));
        }
        self.channels = match color {
            ColorType::Grayscale => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
            ColorType::Indexed => {
                return Err(ViewerError::UnsupportedFormat(
                    "indexed PNG was not expanded".into(),
                ))
            }
        };
        self.row_bytes = self.meta.width as usize * self.channels;
        self.reader = Some(reader);
        self.next_row = 0;
        Ok(())
    }

    /// Copy rows `top..bottom` into `staging`, advancing the stream.
    fn stage_rows(&mut self, top: u32, bottom: u32) -> Result<()> {
        if self.reader.is_none() || self.next_row > top {
            debug!(from = self.next_row, to = top, "restarting PNG row stream");
            self.restart()?;
        }
        let row_bytes = self.row_bytes;
        self.staging.clear();

        while self.next_row < bottom {
            let reader = self
                .reader
                .as_mut()
                .ok_or_else(|| ViewerError::Decode("PNG reader not open".into()))?;
            let row = match reader.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => {
                    let ended_at = self.next_row;
                    self.next_row = u32::MAX;
                    return Err(ViewerError::Decode(format!(
                        "PNG ended at row {ended_at} of {}",
                        self.meta.height
                    )));
                }
                Err(e) => {
                    self.next_row = u32::MAX;
                    return Err(decode_err(e));
                }
            };
            if self.next_row >= top {
                let data = row.data();
                self.staging.extend_from_slice(&data[..row_bytes.min(data.len())]);
            }
            self.next_row += 1;
        }
        Ok(())
    }
}

impl RegionDecoder for PngRegionDecoder {
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
        self.stage_rows(rect.top as u32, rect.bottom as u32)?;

        target.reshape(rect.width() as u32, rect.height() as u32, format);
        let stride = target.stride();
        let channels = self.channels;
        let bpp = format.bytes_per_pixel();
        let x0 = rect.left as usize;

        for (src, dst) in self
            .staging
            .chunks_exact(self.row_bytes)
            .zip(target.data_mut().chunks_mut(stride))
        {
            for (col, px) in dst.chunks_exact_mut(bpp).enumerate() {
                let base = (x0 + col) * channels;
                let (r, g, b) = if channels < 3 {
                    (src[base], src[base], src[base])
                } else {
                    (src[base], src[base + 1], src[base + 2])
                };
                format.write_rgb(px, r, g, b);
            }
        }
        Ok(())
    }
}
