//! Finite-difference gradients of source coordinate fields.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};

use crate::coords::CoordinateGrid;
use crate::error::WarpError;

/// Partial derivatives of the source x/y coordinates with respect to the
/// line (row) and pixel (column) axes.
#[derive(Clone, Debug)]
pub struct CoordinateGradients {
    pub x_line: Array2<f64>,
    pub x_pixel: Array2<f64>,
    pub y_line: Array2<f64>,
    pub y_pixel: Array2<f64>,
}

/// Discrete gradient of `field` along `axis` with unit spacing.
///
/// Central differences in the interior, first-order one-sided differences on
/// both edges. The axis must hold at least two samples.
pub fn gradient(field: &ArrayView2<'_, f64>, axis: Axis) -> Result<Array2<f64>, WarpError> {
    if axis.index() > 1 {
        return Err(WarpError::Shape(format!(
            "Axis {} out of range for a 2-d field",
            axis.index()
        )));
    }
    let len = field.len_of(axis);
    if len < 2 {
        return Err(WarpError::Shape(format!(
            "Gradient needs at least 2 samples along axis {}, got {len}",
            axis.index()
        )));
    }

    let mut out = Array2::zeros(field.raw_dim());
    Zip::from(out.lanes_mut(axis))
        .and(field.lanes(axis))
        .for_each(|o, f| diff_lane(f, o));
    Ok(out)
}

fn diff_lane(f: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, f64>) {
    let n = f.len();
    out[0] = f[1] - f[0];
    out[n - 1] = f[n - 1] - f[n - 2];
    for i in 1..n - 1 {
        out[i] = (f[i + 1] - f[i - 1]) / 2.0;
    }
}

/// All four coordinate gradients of a source grid.
pub fn coordinate_gradients(source: &CoordinateGrid<'_>) -> Result<CoordinateGradients, WarpError> {
    Ok(CoordinateGradients {
        x_line: gradient(&source.x, Axis(0))?,
        x_pixel: gradient(&source.x, Axis(1))?,
        y_line: gradient(&source.y, Axis(0))?,
        y_pixel: gradient(&source.y, Axis(1))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_central_and_edge_differences() {
        let f = array![[1.0, 2.0, 4.0, 7.0, 11.0]];
        let g = gradient(&f.view(), Axis(1)).unwrap();
        assert_eq!(g, array![[1.0, 1.5, 2.5, 3.5, 4.0]]);
    }

    #[test]
    fn test_line_axis() {
        let f = array![[0.0, 0.0], [10.0, 20.0], [30.0, 60.0]];
        let g = gradient(&f.view(), Axis(0)).unwrap();
        assert_eq!(g, array![[10.0, 20.0], [15.0, 30.0], [20.0, 40.0]]);
    }

    #[test]
    fn test_linear_grid_has_constant_gradients() {
        // x grows 1000 per pixel, y shrinks 500 per line
        let x = Array2::from_shape_fn((6, 7), |(_, c)| 1000.0 * c as f64);
        let y = Array2::from_shape_fn((6, 7), |(r, _)| -500.0 * r as f64);
        let grid = CoordinateGrid::new(x.view(), y.view()).unwrap();

        let grads = coordinate_gradients(&grid).unwrap();
        for v in grads.x_pixel.iter() {
            assert_relative_eq!(*v, 1000.0);
        }
        for v in grads.y_line.iter() {
            assert_relative_eq!(*v, -500.0);
        }
        assert!(grads.x_line.iter().all(|v| *v == 0.0));
        assert!(grads.y_pixel.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_too_short_axis() {
        let f = array![[1.0, 2.0, 3.0]];
        assert!(gradient(&f.view(), Axis(0)).is_err());
        assert!(gradient(&f.view(), Axis(1)).is_ok());
    }
}
