//! Decode, encode, and resize operations over the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression + adaptive filtering |
//! | Resize | `image::imageops` via `DynamicImage::resize_exact` with `Lanczos3` |
//!
//! PNG is the only output format: the toolkit exists to preserve matted
//! alpha channels, and PNG at `CompressionType::Best` with adaptive
//! filtering is the crate's equivalent of a reference encoder's
//! "optimize" flag (filter selection per scanline, maximum deflate
//! effort). Everything is encoded as RGBA8 so transparency survives
//! regardless of the input color mode.

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Decode an image from an in-memory byte buffer, guessing the format
/// from its magic bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, CodecError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(CodecError::Io)?
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Load and decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, CodecError> {
    ImageReader::open(path)
        .map_err(CodecError::Io)?
        .decode()
        .map_err(|e| CodecError::Decode(format!("{}: {}", path.display(), e)))
}

/// Encode an image as RGBA8 PNG at maximum lossless compression.
pub fn encode_png_best(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let rgba = img.to_rgba8();
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut buf),
        CompressionType::Best,
        PngFilterType::Adaptive,
    );
    encoder
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Resize to exact target dimensions with Lanczos3 resampling.
///
/// `resize_exact` ignores aspect ratio on purpose: the compression loop
/// scales both dimensions by the same factor itself, and the cutout
/// resize honors whatever dimensions the caller asked for.
pub fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_exact(width, height, FilterType::Lanczos3)
}
