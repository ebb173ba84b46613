//! Pure calculation functions for the compression loop.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the next downscale step from the current dimensions.
///
/// Both dimensions are multiplied by `factor` and rounded to the nearest
/// pixel. The result is clamped to at most `dim - 1` so the step always
/// strictly shrinks, even for factors close to 1.0 where rounding alone
/// would stall the loop. Never returns a zero dimension.
///
/// # Examples
/// ```
/// # use picpress::imaging::shrink_dimensions;
/// // 1000x800 at the default 0.9 factor → 900x720
/// assert_eq!(shrink_dimensions((1000, 800), 0.9), (900, 720));
/// ```
pub fn shrink_dimensions(current: (u32, u32), factor: f64) -> (u32, u32) {
    let (w, h) = current;
    let shrink = |dim: u32| -> u32 {
        let scaled = (dim as f64 * factor).round() as u32;
        scaled.min(dim.saturating_sub(1)).max(1)
    };
    (shrink(w), shrink(h))
}

/// Whether a downscale step would push either dimension below the floor.
///
/// The floor is inclusive: a step landing exactly on the floor is still
/// acceptable.
pub fn below_floor(step: (u32, u32), floor: u32) -> bool {
    step.0 < floor || step.1 < floor
}

/// Convert a byte count to kilobytes (1 KB = 1024 bytes).
pub fn bytes_to_kb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}
