//! Target-size image compression.
//!
//! The core of the toolkit: encode an image as compactly as possible
//! while attempting to stay under a caller-specified byte budget.
//!
//! ## Algorithm
//!
//! ```text
//! 1. Encode as-is at maximum lossless PNG compression.
//!    Under budget? Return immediately — the common case, zero quality loss.
//! 2. Otherwise shrink both dimensions by the configured factor
//!    (default ×0.9, Lanczos3 resampling), re-encode, re-check.
//! 3. Repeat up to the attempt limit, or until the next step would push
//!    a dimension below the floor (default 50px).
//! 4. On exhaustion or floor, return the last successful encoding with
//!    `met_target = false`. The loop never fails on an unreachable
//!    target and never discards a produced encoding.
//! ```
//!
//! The loop is bounded, synchronous, and stateless across invocations:
//! safe to run many in parallel (batch mode does exactly that).

use crate::imaging::{
    CodecError, below_floor, bytes_to_kb, encode_png_best, resize_exact, shrink_dimensions,
};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("invalid compression options: {0}")]
    InvalidOptions(String),
    #[error("image codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Tuning knobs for the compression loop.
///
/// Sparse by design: callers usually set `target_kb` and keep the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressOptions {
    /// Byte budget in kilobytes (1 KB = 1024 bytes). Must be positive.
    pub target_kb: u32,
    /// Maximum number of downscale-and-re-encode cycles after the
    /// initial as-is encode.
    pub max_attempts: u32,
    /// Minimum width/height the loop will shrink to (inclusive).
    pub min_dimension: u32,
    /// Per-step scale factor, strictly between 0 and 1.
    pub shrink_factor: f64,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            target_kb: 500,
            max_attempts: 10,
            min_dimension: 50,
            shrink_factor: 0.9,
        }
    }
}

impl CompressOptions {
    /// Build options with the given target and defaults for the rest.
    pub fn with_target_kb(target_kb: u32) -> Self {
        Self {
            target_kb,
            ..Self::default()
        }
    }

    /// Validate option ranges.
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.target_kb == 0 {
            return Err(CompressError::InvalidOptions(
                "target_kb must be positive".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(CompressError::InvalidOptions(
                "max_attempts must be positive".into(),
            ));
        }
        if self.min_dimension == 0 {
            return Err(CompressError::InvalidOptions(
                "min_dimension must be positive".into(),
            ));
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(CompressError::InvalidOptions(
                "shrink_factor must be strictly between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

/// Metadata describing one compression outcome.
///
/// Serialized into batch manifests and `--json` output; the encoded
/// bytes themselves live in [`Compressed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressReport {
    /// The requested budget, echoed back for manifest readers.
    pub target_kb: u32,
    /// Achieved encoded size in kilobytes.
    pub size_kb: f64,
    /// Final pixel dimensions of the returned encoding.
    pub width: u32,
    pub height: u32,
    /// Whether the encoding fits the budget. `false` is informational,
    /// not a failure: the bytes are still the best effort produced.
    pub met_target: bool,
    /// Downscale cycles performed (0 = original dimensions kept).
    pub attempts: u32,
}

/// An encoded image plus the report describing how it was produced.
#[derive(Debug, Clone)]
pub struct Compressed {
    /// RGBA PNG bytes. Decoding them yields exactly
    /// `report.width × report.height` pixels.
    pub bytes: Vec<u8>,
    pub report: CompressReport,
}

/// Compress `image` toward the byte budget in `opts`.
///
/// Returns the smallest encoding the bounded loop produced. Only codec
/// failures are errors; an unreachable target reports
/// `met_target = false` with the last successful encoding.
pub fn compress_to_target(
    image: &DynamicImage,
    opts: &CompressOptions,
) -> Result<Compressed, CompressError> {
    opts.validate()?;
    let target_bytes = opts.target_kb as usize * 1024;

    // Loop-local accumulators: the current raster and its encoding.
    // Every exit path below returns whatever these last held, so the
    // floor break and attempt exhaustion behave identically.
    let mut current = image.clone();
    let mut encoded = encode_png_best(&current)?;
    let mut attempts = 0u32;
    let mut met = encoded.len() <= target_bytes;

    while !met && attempts < opts.max_attempts {
        let next = shrink_dimensions((current.width(), current.height()), opts.shrink_factor);
        if below_floor(next, opts.min_dimension) {
            break;
        }
        current = resize_exact(&current, next.0, next.1);
        encoded = encode_png_best(&current)?;
        attempts += 1;
        met = encoded.len() <= target_bytes;
    }

    let report = CompressReport {
        target_kb: opts.target_kb,
        size_kb: bytes_to_kb(encoded.len()),
        width: current.width(),
        height: current.height(),
        met_target: met,
        attempts,
    };
    Ok(Compressed {
        bytes: encoded,
        report,
    })
}
