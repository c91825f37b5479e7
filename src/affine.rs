use ndarray::Array2;

use crate::error::WarpError;

/// A 2D affine geotransform.
///
/// Maps pixel coordinates (col, row) to projected coordinates (x, y):
///   x = a * col + b * row + c
///   y = d * col + e * row + f
///
/// Stored in rasterio order [a, b, c, d, e, f].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Apply the transform: (col, row) -> (x, y).
    pub fn forward(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Coordinates of every pixel centre of a `(rows, cols)` grid.
    ///
    /// Returns `(x, y)` arrays shaped like the grid. Fails for a singular
    /// transform, since every pixel would collapse onto one line.
    pub fn pixel_centers(&self, shape: (usize, usize)) -> Result<(Array2<f64>, Array2<f64>), WarpError> {
        if (self.a * self.e - self.b * self.d).abs() < f64::EPSILON {
            return Err(WarpError::Affine(
                "Singular affine transform (determinant is zero)".into(),
            ));
        }
        let x = Array2::from_shape_fn(shape, |(row, col)| {
            self.forward(col as f64 + 0.5, row as f64 + 0.5).0
        });
        let y = Array2::from_shape_fn(shape, |(row, col)| {
            self.forward(col as f64 + 0.5, row as f64 + 0.5).1
        });
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_with_offset_and_scale() {
        // 10m resolution, top-left at (500000, 6000000), north-up
        let aff = Affine::new(10.0, 0.0, 500000.0, 0.0, -10.0, 6000000.0);
        let (x, y) = aff.forward(100.0, 100.0);
        assert_relative_eq!(x, 501000.0);
        assert_relative_eq!(y, 5999000.0);
    }

    #[test]
    fn test_pixel_centers() {
        let aff = Affine::new(10.0, 0.0, 0.0, 0.0, -10.0, 100.0);
        let (x, y) = aff.pixel_centers((2, 3)).unwrap();
        assert_eq!(x.dim(), (2, 3));
        assert_relative_eq!(x[(0, 0)], 5.0);
        assert_relative_eq!(x[(1, 2)], 25.0);
        assert_relative_eq!(y[(0, 0)], 95.0);
        assert_relative_eq!(y[(1, 2)], 85.0);
    }

    #[test]
    fn test_singular_affine() {
        let aff = Affine::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(aff.pixel_centers((2, 2)).is_err());
    }
}
