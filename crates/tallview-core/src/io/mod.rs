pub mod buffered;
pub mod image_io;
pub mod png_rows;
pub mod pnm;
pub mod probe;
pub mod source;

use std::sync::Arc;

use image::ImageFormat;

use crate::decode::RegionDecoder;
use crate::error::Result;

pub use buffered::BufferedRegionDecoder;
pub use png_rows::PngRegionDecoder;
pub use pnm::PnmRegionDecoder;
pub use probe::{probe, ImageMeta, SourceFormat};
pub use source::ImageBytes;

/// Pick the region decoder for a probed image.
///
/// PNM rasters are read row-windowed straight from `bytes` and non-interlaced
/// PNGs are streamed row by row; every other format goes through the `image`
/// crate and is decoded once on first use.
pub fn open_decoder(bytes: Arc<ImageBytes>, meta: &ImageMeta) -> Result<Box<dyn RegionDecoder>> {
    match meta.format {
        SourceFormat::Pnm(_) => Ok(Box::new(PnmRegionDecoder::new(bytes)?)),
        SourceFormat::Encoded(ImageFormat::Png) => {
            if PngRegionDecoder::supports(&bytes)? {
                Ok(Box::new(PngRegionDecoder::new(bytes, *meta)?))
            } else {
                Ok(Box::new(BufferedRegionDecoder::new(bytes, *meta)))
            }
        }
        SourceFormat::Encoded(_) => Ok(Box::new(BufferedRegionDecoder::new(bytes, *meta))),
    }
}
