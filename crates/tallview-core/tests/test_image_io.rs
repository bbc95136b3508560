use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use tallview_core::decode::{PixelBuffer, PixelFormat};
use tallview_core::io::image_io::{buffer_to_rgba_image, save_frame};

fn gradient_frame() -> RgbaImage {
    RgbaImage::from_fn(16, 8, |x, y| Rgba([(x * 16) as u8, (y * 32) as u8, 77, 255]))
}

#[test]
fn test_buffer_to_rgba_image_expands_rgb565() {
    let mut buf = PixelBuffer::new(3, 2, PixelFormat::Rgb565);
    let bpp = PixelFormat::Rgb565.bytes_per_pixel();
    for px in buf.data_mut().chunks_exact_mut(bpp) {
        PixelFormat::Rgb565.write_rgb(px, 255, 255, 255);
    }

    let image = buffer_to_rgba_image(&buf).unwrap();

    assert_eq!(image.dimensions(), (3, 2));
    assert_eq!(*image.get_pixel(2, 1), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_save_frame_png_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frame_0000.png");
    let frame = gradient_frame();

    save_frame(&frame, &path).unwrap();
    let loaded = image::open(&path).unwrap().to_rgba8();

    assert_eq!(loaded, frame);
}

#[test]
fn test_save_frame_picks_tiff_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frame.tif");

    save_frame(&gradient_frame(), &path).unwrap();

    let format = image::ImageFormat::from_path(&path).unwrap();
    assert_eq!(format, image::ImageFormat::Tiff);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*"));
}

#[test]
fn test_save_frame_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("frame.png");
    assert!(save_frame(&gradient_frame(), &path).is_err());
}
