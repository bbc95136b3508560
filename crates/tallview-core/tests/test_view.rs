#[allow(dead_code)]
mod common;

use std::io::Write;

use tempfile::NamedTempFile;

use tallview_core::config::ViewerConfig;
use tallview_core::decode::PixelFormat;
use tallview_core::error::ViewerError;
use tallview_core::geometry::PixelRect;
use tallview_core::gesture::GestureEvent;
use tallview_core::inertia::InertiaTick;
use tallview_core::io::ImageBytes;
use tallview_core::render::{FrameOutcome, ImageCanvas};
use tallview_core::view::LongImageView;

use common::{RecordingCanvas, SyntheticDecoder};

const MAX_FRAMES: usize = 10_000;

fn rgba_config() -> ViewerConfig {
    ViewerConfig {
        pixel_format: PixelFormat::Rgba8888,
        ..ViewerConfig::default()
    }
}

/// 1080x5000 synthetic image on a 1080x1920 viewport.
fn phone_view() -> (LongImageView, SyntheticDecoder) {
    let mut view = common::stepped_view(rgba_config());
    let decoder = SyntheticDecoder::new(1080, 5000);
    let handle = decoder.clone();
    view.configure(1080, 1920);
    view.set_decoder(Box::new(decoder)).unwrap();
    (view, handle)
}

// ---------------------------------------------------------------------------
// Open, scroll, fling
// ---------------------------------------------------------------------------

#[test]
fn test_open_scroll_fling_sequence() {
    let (mut view, handle) = phone_view();
    let mut canvas = RecordingCanvas::default();

    assert_eq!(view.scale(), Some(1.0));
    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 0, 1080, 1920)));

    let report = view.frame(&mut canvas).unwrap();
    assert_eq!(
        report.outcome,
        FrameOutcome::Composited {
            region: PixelRect::new(0, 0, 1080, 1920)
        }
    );
    assert!(!report.animating);

    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 300.0 });
    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 300, 1080, 2220)));
    view.frame(&mut canvas).unwrap();
    assert_eq!(canvas.draws[1].first_pixel[0], common::row_value(300));

    // Finger moving up fast: content keeps scrolling down the image.
    view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy: -2000.0 });
    assert!(view.is_animating());

    let mut last_top = 300;
    let mut settled = false;
    for _ in 0..MAX_FRAMES {
        let report = view.frame(&mut canvas).unwrap();
        let rect = view.visible_rect().unwrap();
        assert!(rect.top >= last_top, "fling reversed: {} -> {}", last_top, rect.top);
        assert!(rect.top <= 5000 - 1920);
        assert_eq!(rect.height(), 1920);
        last_top = rect.top;
        if matches!(report.inertia, InertiaTick::Settled(_)) {
            assert!(!report.animating);
            settled = true;
            break;
        }
    }

    assert!(settled, "fling never settled");
    assert!(last_top > 300);
    assert!(!view.is_animating());
    for rect in handle.requests.lock().unwrap().iter() {
        assert!(rect.bottom <= 5000);
    }
}

#[test]
fn test_fling_towards_top_stops_at_zero() {
    let (mut view, _) = phone_view();
    let mut canvas = RecordingCanvas::default();
    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 100.0 });

    view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy: 6000.0 });
    for _ in 0..MAX_FRAMES {
        if !view.frame(&mut canvas).unwrap().animating {
            break;
        }
    }

    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 0, 1080, 1920)));
}

#[test]
fn test_down_cancels_fling() {
    let (mut view, _) = phone_view();
    let mut canvas = RecordingCanvas::default();

    view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy: -4000.0 });
    view.frame(&mut canvas).unwrap();
    view.frame(&mut canvas).unwrap();
    let frozen = view.visible_rect();

    view.handle_gesture(GestureEvent::Down);
    assert!(!view.is_animating());
    let report = view.frame(&mut canvas).unwrap();

    assert_eq!(report.inertia, InertiaTick::Idle);
    assert_eq!(view.visible_rect(), frozen);
}

#[test]
fn test_relayout_during_fling_keeps_window_inside_image() {
    let (mut view, handle) = phone_view();
    let mut canvas = RecordingCanvas::default();

    view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy: -8000.0 });
    for _ in 0..5 {
        view.frame(&mut canvas).unwrap();
    }
    assert!(view.is_animating());

    // Taller viewport: the window grows to 4500 rows, so max_top drops to 500.
    view.configure(1080, 4500);
    assert!(!view.is_animating());

    for _ in 0..MAX_FRAMES {
        let report = view.frame(&mut canvas).unwrap();
        let rect = view.visible_rect().unwrap();
        assert!(rect.bottom <= 5000, "bottom {} past image height", rect.bottom);
        assert!(rect.top <= 500);
        assert_eq!(rect.height(), 4500);
        if !report.animating {
            break;
        }
    }

    let last = canvas.draws.last().unwrap();
    assert_eq!((last.width, last.height), (1080, 4500));
    for rect in handle.requests.lock().unwrap().iter() {
        assert!(rect.bottom <= 5000);
    }
}

#[test]
fn test_relayout_with_same_window_height_keeps_fling() {
    let (mut view, _) = phone_view();
    let mut canvas = RecordingCanvas::default();

    view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy: -3000.0 });
    view.frame(&mut canvas).unwrap();
    view.configure(1080, 1920);

    assert!(view.is_animating());
}

#[test]
fn test_taps_do_not_move_window() {
    let (mut view, _) = phone_view();
    view.take_redraw_request();

    for event in [
        GestureEvent::ShowPress,
        GestureEvent::SingleTap,
        GestureEvent::LongPress,
        GestureEvent::Scroll { dx: 250.0, dy: 0.0 },
    ] {
        view.handle_gesture(event);
    }

    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 0, 1080, 1920)));
    assert!(!view.take_redraw_request());
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_image_before_layout() {
    let mut view = common::default_stepped_view();
    view.set_decoder(Box::new(SyntheticDecoder::new(540, 3000)))
        .unwrap();
    assert_eq!(view.visible_rect(), None);

    view.configure(1080, 1920);

    assert_eq!(view.scale(), Some(2.0));
    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 0, 540, 960)));
}

#[test]
fn test_relayout_keeps_top() {
    let (mut view, _) = phone_view();
    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 1000.0 });

    view.configure(1080, 1000);
    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 1000, 1080, 2000)));

    // Growing past the bottom pulls the window back inside.
    view.configure(1080, 4500);
    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 500, 1080, 5000)));
}

#[test]
fn test_frame_without_image() {
    let mut view = common::default_stepped_view();
    view.configure(1080, 1920);
    let mut canvas = RecordingCanvas::default();

    let report = view.frame(&mut canvas).unwrap();

    assert_eq!(report.outcome, FrameOutcome::NoDecoder);
    assert!(canvas.draws.is_empty());
}

#[test]
fn test_zero_viewport_is_invalid_geometry() {
    let mut view = common::default_stepped_view();
    let decoder = SyntheticDecoder::new(1080, 5000);
    let handle = decoder.clone();
    view.set_decoder(Box::new(decoder)).unwrap();
    view.configure(0, 0);
    let mut canvas = RecordingCanvas::default();

    let err = view.frame(&mut canvas).unwrap_err();

    assert!(matches!(
        err,
        ViewerError::InvalidGeometry { width: 0, height: 0 }
    ));
    assert!(handle.requests.lock().unwrap().is_empty());
    assert!(canvas.draws.is_empty());
}

#[test]
fn test_garbage_load_keeps_current_image() {
    let (mut view, _) = phone_view();
    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 700.0 });
    let before = view.visible_rect();

    let err = view
        .load_image(ImageBytes::from(b"not an image at all".to_vec()))
        .unwrap_err();

    assert!(err.is_decode());
    assert_eq!(view.visible_rect(), before);
    assert_eq!(view.meta().map(|m| m.height), Some(5000));
    assert!(view.render_loop().has_decoder());
}

#[test]
fn test_decode_failure_surfaces_and_keeps_last_frame() {
    let (mut view, handle) = phone_view();
    let mut canvas = RecordingCanvas::default();
    view.frame(&mut canvas).unwrap();

    handle.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 50.0 });
    assert!(view.frame(&mut canvas).is_err());

    assert_eq!(canvas.draws.len(), 1);
    assert_eq!(view.render_stats().decode_failures, 1);
    let last = view.render_loop().last_buffer().unwrap();
    assert_eq!(last.rgba_at(0, 0)[0], common::row_value(0));
}

#[test]
fn test_unload_returns_to_empty() {
    let (mut view, _) = phone_view();
    view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy: -3000.0 });

    view.unload();

    assert!(view.meta().is_none());
    assert!(view.visible_rect().is_none());
    assert!(view.scale().is_none());
    assert!(!view.is_animating());
    let mut canvas = RecordingCanvas::default();
    assert_eq!(
        view.frame(&mut canvas).unwrap().outcome,
        FrameOutcome::NoDecoder
    );
}

#[test]
fn test_redraw_request_flag() {
    let (mut view, _) = phone_view();
    assert!(view.take_redraw_request());
    assert!(!view.take_redraw_request());

    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 10.0 });
    assert!(view.take_redraw_request());

    // Pinned at the top: scrolling further up changes nothing.
    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: -500.0 });
    view.take_redraw_request();
    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: -500.0 });
    assert!(!view.take_redraw_request());
}

#[test]
fn test_open_pgm_from_disk_renders_full_viewport() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&common::build_row_pgm(360, 4000)).unwrap();
    file.flush().unwrap();

    let mut view = common::stepped_view(rgba_config());
    view.configure(720, 1280);
    let meta = view.open(file.path()).unwrap();
    assert_eq!((meta.width, meta.height), (360, 4000));
    assert_eq!(view.visible_rect(), Some(PixelRect::new(0, 0, 360, 640)));

    view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy: 20.0 });
    let mut canvas = ImageCanvas::new(720, 1280);
    view.frame(&mut canvas).unwrap();

    assert_eq!(canvas.covered_pixels(), 720 * 1280);
    let v = common::row_value(20);
    assert_eq!(canvas.frame().get_pixel(719, 0).0, [v, v, v, 255]);
}
