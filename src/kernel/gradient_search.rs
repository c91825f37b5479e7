//! Gradient-search kernel.
//!
//! Each destination pixel is located in the source tile by Newton steps on
//! the source coordinate fields: at an integer anchor `(l, p)` the mapping
//! from index space to map coordinates is linearised with the precomputed
//! gradients and inverted to get the next position. The search stops once the
//! rounded position no longer moves. Consecutive pixels on a destination row
//! start from the previous solution, which usually converges in one step.

use ndarray::{Array3, ArrayView2, Axis};

use crate::chunk::tiles::TileView;
use crate::coords::CoordinateGrid;
use crate::error::WarpError;
use crate::kernel::TileKernel;
use crate::resample::{bilinear, nearest, ResamplingMethod};

#[derive(Clone, Copy, Debug)]
pub struct GradientSearchKernel {
    /// Maximum Newton steps per destination pixel.
    pub max_iterations: usize,
}

impl Default for GradientSearchKernel {
    fn default() -> Self {
        Self { max_iterations: 20 }
    }
}

impl GradientSearchKernel {
    /// Fractional (line, pixel) position of map point `(tx, ty)` in `tile`.
    ///
    /// The returned position may lie outside the tile; `None` means the
    /// search hit invalid coordinates or a singular Jacobian.
    fn locate(&self, tile: &TileView<'_>, tx: f64, ty: f64, start: (f64, f64)) -> Option<(f64, f64)> {
        let (rows, cols) = tile.x.dim();
        let max_line = (rows - 1) as f64;
        let max_pixel = (cols - 1) as f64;
        let snap = |line: f64, pixel: f64| {
            (
                line.round().clamp(0.0, max_line) as usize,
                pixel.round().clamp(0.0, max_pixel) as usize,
            )
        };

        let mut anchor = snap(start.0, start.1);
        let mut estimate = None;
        for _ in 0..self.max_iterations {
            let (sx, sy) = (tile.x[anchor], tile.y[anchor]);
            let (xl, xp) = (tile.x_line[anchor], tile.x_pixel[anchor]);
            let (yl, yp) = (tile.y_line[anchor], tile.y_pixel[anchor]);

            let det = xl * yp - xp * yl;
            if !det.is_finite() || det == 0.0 || !sx.is_finite() || !sy.is_finite() {
                return None;
            }

            let (dx, dy) = (tx - sx, ty - sy);
            let line = anchor.0 as f64 + (yp * dx - xp * dy) / det;
            let pixel = anchor.1 as f64 + (xl * dy - yl * dx) / det;
            if !line.is_finite() || !pixel.is_finite() {
                return None;
            }

            estimate = Some((line, pixel));
            let next = snap(line, pixel);
            if next == anchor {
                break;
            }
            anchor = next;
        }
        estimate
    }
}

impl TileKernel for GradientSearchKernel {
    fn resample_tile(
        &self,
        tile: &TileView<'_>,
        destination: &CoordinateGrid<'_>,
        method: ResamplingMethod,
    ) -> Result<Array3<f64>, WarpError> {
        let (bands, rows, cols) = tile.data.dim();
        if tile.x.dim() != (rows, cols) {
            return Err(WarpError::Shape(format!(
                "Tile data {:?} and coordinates {:?} disagree",
                (rows, cols),
                tile.x.dim()
            )));
        }
        let (dst_rows, dst_cols) = destination.dim();
        let mut out = Array3::from_elem((bands, dst_rows, dst_cols), f64::NAN);
        if rows == 0 || cols == 0 {
            return Ok(out);
        }

        let band_views: Vec<ArrayView2<'_, f64>> = tile.data.axis_iter(Axis(0)).collect();
        let centre = ((rows - 1) as f64 / 2.0, (cols - 1) as f64 / 2.0);
        let max_line = (rows - 1) as f64;
        let max_pixel = (cols - 1) as f64;

        for i in 0..dst_rows {
            let mut guess = centre;
            for j in 0..dst_cols {
                let (tx, ty) = (destination.x[(i, j)], destination.y[(i, j)]);
                if !tx.is_finite() || !ty.is_finite() {
                    continue;
                }
                let Some((line, pixel)) = self.locate(tile, tx, ty, guess) else {
                    continue;
                };
                let clamped = (line.clamp(0.0, max_line), pixel.clamp(0.0, max_pixel));
                guess = clamped;

                // Pixel footprint of the tile: half a sample beyond the outer centres
                let inside = line >= -0.5
                    && line < rows as f64 - 0.5
                    && pixel >= -0.5
                    && pixel < cols as f64 - 0.5;
                if !inside {
                    continue;
                }

                for (b, band) in band_views.iter().enumerate() {
                    let value = match method {
                        ResamplingMethod::Nearest => nearest::sample(band, clamped.0, clamped.1),
                        ResamplingMethod::Bilinear => {
                            bilinear::sample(band, clamped.0, clamped.1)
                        }
                    };
                    if let Some(v) = value {
                        out[(b, i, j)] = v;
                    }
                }
            }
        }

        Ok(out)
    }
}
