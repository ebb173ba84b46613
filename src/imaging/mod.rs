//! Image codec operations and the pure math behind the compression loop.
//!
//! [`codec`] wraps the `image` crate: decode from bytes or disk, encode
//! RGBA PNG at maximum compression, Lanczos3 resize. [`calculations`]
//! is the I/O-free dimension math the compressor plans its steps with.

pub mod calculations;
pub mod codec;

pub use calculations::{below_floor, bytes_to_kb, shrink_dimensions};
pub use codec::{CodecError, decode_image, encode_png_best, load_image, resize_exact};
