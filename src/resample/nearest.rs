//! Nearest-neighbor sampler.

use ndarray::ArrayView2;
use num_traits::Float;

/// Sample a 2D array at a fractional (line, pixel) index position.
///
/// Positions are centre-based: sample `(i, j)` sits exactly at `(i.0, j.0)`,
/// so the nearest sample is found by rounding. Returns `None` when the rounded
/// position falls outside the array or the sample is NaN.
pub fn sample<T: Float>(src: &ArrayView2<'_, T>, line: f64, pixel: f64) -> Option<T> {
    let row = line.round();
    let col = pixel.round();

    let (rows, cols) = src.dim();
    if row < 0.0 || col < 0.0 || row >= rows as f64 || col >= cols as f64 {
        return None;
    }

    let val = src[(row as usize, col as usize)];
    if val.is_nan() {
        return None;
    }
    Some(val)
}
