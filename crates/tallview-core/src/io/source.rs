use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Result;

/// Encoded image bytes, owned or memory-mapped.
///
/// Mapped files are paged in lazily, so region decoders that only touch the
/// rows they need never pull the whole file into memory.
pub enum ImageBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl ImageBytes {
    /// Memory-map a file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // The map is read-only; callers must not truncate the file while it is open.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(ImageBytes::Mapped(mmap))
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, ImageBytes::Mapped(_))
    }
}

impl Deref for ImageBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ImageBytes::Owned(v) => v,
            ImageBytes::Mapped(m) => m,
        }
    }
}

impl From<Vec<u8>> for ImageBytes {
    fn from(v: Vec<u8>) -> Self {
        ImageBytes::Owned(v)
    }
}

impl std::fmt::Debug for ImageBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_mapped() { "Mapped" } else { "Owned" };
        write!(f, "ImageBytes::{kind}({} bytes)", self.len())
    }
}
