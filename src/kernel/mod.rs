//! Single-tile interpolation kernels.

pub mod gradient_search;

use ndarray::Array3;

use crate::chunk::tiles::TileView;
use crate::coords::CoordinateGrid;
use crate::error::WarpError;
use crate::resample::ResamplingMethod;

pub use gradient_search::GradientSearchKernel;

/// Resamples one source tile onto the full destination grid.
///
/// Implementations must return a `[bands, dst_rows, dst_cols]` array that is
/// NaN wherever the tile does not contribute. Tiles are resampled concurrently,
/// so a kernel only ever sees read-only views and must not rely on call order.
pub trait TileKernel: Send + Sync {
    fn resample_tile(
        &self,
        tile: &TileView<'_>,
        destination: &CoordinateGrid<'_>,
        method: ResamplingMethod,
    ) -> Result<Array3<f64>, WarpError>;
}
