//! # picpress
//!
//! A small image toolkit: compress images toward a byte budget, apply
//! externally produced alpha mattes, resize, and batch-process whole
//! directories.
//!
//! # The Compression Loop
//!
//! The core operation encodes an image at maximum lossless PNG
//! compression and, only if the result exceeds the caller's budget,
//! progressively downscales and re-encodes:
//!
//! ```text
//! encode → under budget? done (common case, zero quality loss)
//!        → over budget?  shrink ×0.9 (Lanczos3) → re-encode → re-check
//! ```
//!
//! The loop is bounded three ways: a configurable attempt limit
//! (default 10), a dimension floor it refuses to cross (default 50px),
//! and a strict-monotonic-shrink guarantee in the dimension math. An
//! unreachable budget is not an error — the last successful encoding
//! always comes back, flagged `met_target = false`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compress`] | The target-size compression loop: options, report, bounded retry |
//! | [`imaging`] | Codec seam over the `image` crate (decode, PNG encode, Lanczos3 resize) and pure dimension math |
//! | [`cutout`] | Background removal: [`cutout::AlphaMatte`] trait seam + matte application |
//! | [`pipeline`] | Parallel batch compression with a JSON manifest per run |
//! | [`config`] | `picpress.toml` loading, validation, stock config generation |
//! | [`output`] | CLI output formatting — pure `format_*` functions, `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## PNG-Only Output
//!
//! Every output is RGBA PNG at `CompressionType::Best` with adaptive
//! filtering. The toolkit exists to carry matted transparency through
//! compression, which rules out lossy alpha-less formats, and a single
//! lossless format keeps the size/dimension contract exact: decoding
//! any returned buffer yields precisely the reported dimensions.
//!
//! ## External Matting
//!
//! Subject/background separation models are consumed, never
//! reimplemented. [`cutout::AlphaMatte`] is the seam; the shipped
//! [`cutout::MaskFile`] implementation reads a matte image produced by
//! an external tool, and tests substitute mocks.
//!
//! ## Stateless Parallelism
//!
//! One compression invocation holds no shared state, so batch mode is
//! a plain rayon `par_iter` over independent files with a thread pool
//! clamped to the core count. Per-file failures land in the manifest
//! instead of aborting the batch.

pub mod compress;
pub mod config;
pub mod cutout;
pub mod imaging;
pub mod output;
pub mod pipeline;
