//! Bilinear sampler.

use ndarray::ArrayView2;
use num_traits::Float;

/// Sample a 2D array at a fractional (line, pixel) index position using
/// bilinear interpolation.
///
/// Positions are centre-based and must lie within `[0, rows - 1] x [0, cols - 1]`.
/// On the last line or pixel the upper neighbour is clamped to the edge, so
/// samples on the array border are reproduced exactly. Returns `None` outside
/// that range or when any contributing neighbour is NaN.
pub fn sample<T: Float>(src: &ArrayView2<'_, T>, line: f64, pixel: f64) -> Option<T> {
    let (rows, cols) = src.dim();
    if rows == 0 || cols == 0 {
        return None;
    }
    if line < 0.0 || pixel < 0.0 || line > (rows - 1) as f64 || pixel > (cols - 1) as f64 {
        return None;
    }

    let y0 = line.floor() as usize;
    let x0 = pixel.floor() as usize;
    let y1 = (y0 + 1).min(rows - 1);
    let x1 = (x0 + 1).min(cols - 1);

    let dy = line - y0 as f64;
    let dx = pixel - x0 as f64;

    let f00 = src[(y0, x0)].to_f64()?;
    let f01 = src[(y0, x1)].to_f64()?;
    let f10 = src[(y1, x0)].to_f64()?;
    let f11 = src[(y1, x1)].to_f64()?;

    if f00.is_nan() || f01.is_nan() || f10.is_nan() || f11.is_nan() {
        return None;
    }

    let result = f00 * (1.0 - dx) * (1.0 - dy)
        + f01 * dx * (1.0 - dy)
        + f10 * (1.0 - dx) * dy
        + f11 * dx * dy;

    T::from(result)
}
