use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use tracing::debug;

use crate::decode::PixelFormat;
use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::io::pnm::{self, PnmKind};

/// Container format detected by [`probe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Pnm(PnmKind),
    Encoded(ImageFormat),
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pnm(kind) => write!(f, "{kind}"),
            SourceFormat::Encoded(format) => write!(f, "{format:?}"),
        }
    }
}

/// Dimensions of a source image, read without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
    pub format: SourceFormat,
}

impl ImageMeta {
    /// The full image as a rectangle.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Bytes needed to hold the entire image decoded in `format`.
    pub fn decoded_size(&self, format: PixelFormat) -> u64 {
        u64::from(self.width) * u64::from(self.height) * format.bytes_per_pixel() as u64
    }
}

/// Read image dimensions from the header of an encoded stream.
pub fn probe(bytes: &[u8]) -> Result<ImageMeta> {
    let meta = if pnm::is_pnm(bytes) {
        let header = pnm::parse_header(bytes)?;
        ImageMeta {
            width: header.width,
            height: header.height,
            format: SourceFormat::Pnm(header.kind),
        }
    } else {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| ViewerError::Decode("Unrecognized image format".into()))?;
        let (width, height) = reader.into_dimensions()?;
        ImageMeta {
            width,
            height,
            format: SourceFormat::Encoded(format),
        }
    };

    if meta.width == 0 || meta.height == 0 {
        return Err(ViewerError::InvalidGeometry {
            width: meta.width,
            height: meta.height,
        });
    }

    debug!(
        width = meta.width,
        height = meta.height,
        format = %meta.format,
        "probed image bounds"
    );
    Ok(meta)
}
