use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("Region rows {top}..{bottom} outside image height {image_height}")]
    OutOfBoundsRequest {
        top: i32,
        bottom: i32,
        image_height: u32,
    },
}

impl ViewerError {
    /// True for failures caused by the encoded stream itself.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ViewerError::Decode(_) | ViewerError::Image(_) | ViewerError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
