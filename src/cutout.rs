//! Background removal via external alpha mattes.
//!
//! Matting models (the neural networks that separate subject from
//! background) are external collaborators, not something this crate
//! reimplements. The [`AlphaMatte`] trait is the seam: an
//! implementation produces a per-pixel grayscale matte, and
//! [`apply_matte`] merges it into the image's alpha channel. The
//! shipped implementation, [`MaskFile`], reads a matte image that an
//! external tool already produced.
//!
//! The optional exact resize mirrors the interactive tool this replaces:
//! cut out the subject, then scale to the dimensions the user asked for.

use crate::imaging::{CodecError, load_image, resize_exact};
use image::{DynamicImage, GrayImage, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("image codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("matte generation failed: {0}")]
    Matte(String),
    #[error("matte is {matte_width}x{matte_height} but image is {width}x{height}")]
    DimensionMismatch {
        matte_width: u32,
        matte_height: u32,
        width: u32,
        height: u32,
    },
}

/// Produces a per-pixel alpha matte for an image.
///
/// White (255) keeps a pixel fully opaque, black (0) removes it, and
/// intermediate values feather the edge. Implementations must return a
/// matte matching the input dimensions.
pub trait AlphaMatte: Sync {
    fn matte(&self, image: &DynamicImage) -> Result<GrayImage, CutoutError>;
}

/// Matte loaded from a grayscale image file produced by an external
/// matting tool.
pub struct MaskFile {
    path: PathBuf,
}

impl MaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlphaMatte for MaskFile {
    fn matte(&self, _image: &DynamicImage) -> Result<GrayImage, CutoutError> {
        let mask = load_image(&self.path)?;
        Ok(mask.to_luma8())
    }
}

/// Merge a matte into the image's alpha channel.
///
/// Existing transparency is respected: the output alpha is the minimum
/// of the source alpha and the matte value, so a matte can only remove
/// pixels, never resurrect ones the source already hid.
pub fn apply_matte(image: &DynamicImage, matte: &GrayImage) -> Result<RgbaImage, CutoutError> {
    if matte.dimensions() != (image.width(), image.height()) {
        return Err(CutoutError::DimensionMismatch {
            matte_width: matte.width(),
            matte_height: matte.height(),
            width: image.width(),
            height: image.height(),
        });
    }

    let mut rgba = image.to_rgba8();
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        let alpha = matte.get_pixel(x, y)[0];
        pixel[3] = pixel[3].min(alpha);
    }
    Ok(rgba)
}

/// Options for a cutout operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutoutOptions {
    /// Exact output dimensions; `None` keeps the source size.
    pub resize_to: Option<(u32, u32)>,
}

/// Run the full cutout: matte, merge, optional exact resize.
pub fn cutout(
    image: &DynamicImage,
    matting: &impl AlphaMatte,
    opts: &CutoutOptions,
) -> Result<DynamicImage, CutoutError> {
    let matte = matting.matte(image)?;
    let cut = DynamicImage::ImageRgba8(apply_matte(image, &matte)?);

    Ok(match opts.resize_to {
        Some((width, height)) => resize_exact(&cut, width, height),
        None => cut,
    })
}
