use ndarray::ArrayView2;

use crate::error::WarpError;

/// Paired x/y coordinate arrays, one value per pixel, in a common map frame.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateGrid<'a> {
    pub x: ArrayView2<'a, f64>,
    pub y: ArrayView2<'a, f64>,
}

impl<'a> CoordinateGrid<'a> {
    pub fn new(x: ArrayView2<'a, f64>, y: ArrayView2<'a, f64>) -> Result<Self, WarpError> {
        if x.dim() != y.dim() {
            return Err(WarpError::Shape(format!(
                "x and y coordinates must have the same shape, got {:?} and {:?}",
                x.dim(),
                y.dim()
            )));
        }
        Ok(Self { x, y })
    }

    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }
}
