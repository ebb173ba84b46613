//! End-to-end compression scenarios over real encodes.
//!
//! These exercise the public API the way the CLI does: real PNG
//! encoding, real Lanczos3 downscaling, synthetic images generated
//! in-process.

use image::{DynamicImage, RgbaImage};
use picpress::compress::{CompressOptions, compress_to_target};
use picpress::imaging::{decode_image, load_image, shrink_dimensions};

/// Deterministic noise: PNG barely compresses it, so encoded size
/// tracks pixel count and the downscale loop has real work to do.
fn noise_image(width: u32, height: u32) -> DynamicImage {
    let mut state = 0x9E3779B9u32;
    let img = RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let b = state.to_le_bytes();
        image::Rgba([b[0], b[1], b[2], 255])
    });
    DynamicImage::ImageRgba8(img)
}

fn flat_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([30, 60, 90, 255]),
    ))
}

#[test]
fn large_image_meets_generous_target_by_downscaling() {
    // ~800x600 of noise encodes well over 400 KB; the loop needs a few
    // steps to get under, comfortably within the attempt limit.
    let img = noise_image(800, 600);
    let opts = CompressOptions::with_target_kb(400);
    let out = compress_to_target(&img, &opts).unwrap();

    assert!(out.report.met_target);
    // Small tolerance on the reported size vs the budget.
    assert!(out.report.size_kb <= 400.0 + 10.0);
    assert!(out.report.attempts >= 1);
    assert!(out.report.width < 800 && out.report.height < 600);
}

#[test]
fn small_image_under_target_is_untouched() {
    let img = flat_image(100, 100);
    let out = compress_to_target(&img, &CompressOptions::with_target_kb(500)).unwrap();

    assert!(out.report.met_target);
    assert_eq!(out.report.attempts, 0);
    assert_eq!((out.report.width, out.report.height), (100, 100));

    // The returned bytes are the original-dimension encoding.
    let decoded = decode_image(&out.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 100));
}

#[test]
fn unreachable_target_runs_to_a_bound_and_keeps_best_effort() {
    let img = noise_image(400, 300);
    let opts = CompressOptions::with_target_kb(1);
    let out = compress_to_target(&img, &opts).unwrap();

    assert!(!out.report.met_target);
    assert!(!out.bytes.is_empty());
    assert!(out.report.width >= opts.min_dimension);
    assert!(out.report.height >= opts.min_dimension);

    // Either the attempt limit was exhausted or the next step would
    // have crossed the floor.
    let next = shrink_dimensions((out.report.width, out.report.height), opts.shrink_factor);
    assert!(
        out.report.attempts == opts.max_attempts
            || next.0 < opts.min_dimension
            || next.1 < opts.min_dimension
    );
}

#[test]
fn final_dimensions_follow_the_shrink_sequence() {
    let img = noise_image(500, 400);
    let opts = CompressOptions {
        target_kb: 1,
        max_attempts: 4,
        ..CompressOptions::default()
    };
    let out = compress_to_target(&img, &opts).unwrap();
    assert_eq!(out.report.attempts, 4);

    // Replay the pure dimension math: each attempt shrinks the
    // previous attempt's dimensions, strictly.
    let mut dims = (500, 400);
    for _ in 0..out.report.attempts {
        let next = shrink_dimensions(dims, opts.shrink_factor);
        assert!(next.0 < dims.0 && next.1 < dims.1);
        dims = next;
    }
    assert_eq!((out.report.width, out.report.height), dims);
}

#[test]
fn roundtrip_dimensions_match_report_after_downscaling() {
    let img = noise_image(300, 220);
    let out = compress_to_target(&img, &CompressOptions::with_target_kb(30)).unwrap();

    let decoded = decode_image(&out.bytes).unwrap();
    assert_eq!(decoded.width(), out.report.width);
    assert_eq!(decoded.height(), out.report.height);
}

#[test]
fn transparency_survives_compression() {
    let mut state = 0xC0FFEEu32;
    let img = RgbaImage::from_fn(200, 200, |x, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let b = state.to_le_bytes();
        image::Rgba([b[0], b[1], b[2], if x < 100 { 0 } else { 255 }])
    });
    let out = compress_to_target(
        &DynamicImage::ImageRgba8(img),
        &CompressOptions::with_target_kb(20),
    )
    .unwrap();

    let decoded = decode_image(&out.bytes).unwrap().to_rgba8();
    // Left edge transparent, right edge opaque, at whatever final size.
    assert_eq!(decoded.get_pixel(0, decoded.height() / 2)[3], 0);
    assert_eq!(
        decoded.get_pixel(decoded.width() - 1, decoded.height() / 2)[3],
        255
    );
}

#[test]
fn malformed_bytes_fail_decode_before_any_compression() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("broken.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\ntruncated garbage").unwrap();

    let result = load_image(&path);
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Decode failed"), "got: {message}");
}
