//! Tile-parallel gradient-search resampling.
//!
//! Resampling runs in two stages. The plan stage is synchronous and cheap: it
//! validates shapes, computes the coordinate gradients, stacks every chunk on
//! a tile axis and culls the tiles whose corner footprint cannot reach the
//! destination. The execute stage hands each surviving tile to the kernel on
//! the rayon pool and folds every result into a per-worker reduction as soon
//! as it is produced; the partial reductions are merged once all tiles have
//! finished.

use ndarray::{Array3, ArrayD, ArrayViewD, Axis, Ix3};
use rayon::prelude::*;

use crate::chunk::grid::ChunkGrid;
use crate::chunk::planner::{cull_tiles, TilePlan};
use crate::chunk::tiles::StackedTiles;
use crate::coords::CoordinateGrid;
use crate::error::WarpError;
use crate::gradient::coordinate_gradients;
use crate::kernel::{GradientSearchKernel, TileKernel};
use crate::resample::ResamplingMethod;
use crate::warp::reduce::OverlapReducer;

/// Options of one resampling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResampleOptions {
    pub method: ResamplingMethod,
    /// Size of a dedicated worker pool; `None` runs on the global rayon pool.
    pub num_threads: Option<usize>,
}

impl ResampleOptions {
    pub fn with_method(method: ResamplingMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// Output of the plan stage: the tiles left to resample.
#[derive(Debug)]
pub struct ResamplePlan {
    pub tiles: StackedTiles,
    /// Culling decision of every chunk, including the dropped ones.
    pub plans: Vec<TilePlan>,
    bands: usize,
    /// Input was 2D, so the band axis is dropped from the output.
    squeeze_bands: bool,
}

impl ResamplePlan {
    /// Validate the inputs, stack the source into tiles and cull them.
    pub fn build(
        data: &ArrayViewD<'_, f64>,
        source: &CoordinateGrid<'_>,
        destination: &CoordinateGrid<'_>,
        grid: &ChunkGrid,
    ) -> Result<Self, WarpError> {
        let squeeze_bands = match data.ndim() {
            2 => true,
            3 => false,
            other => return Err(WarpError::UnsupportedRank(other)),
        };
        let data = if squeeze_bands {
            data.view().insert_axis(Axis(0))
        } else {
            data.view()
        }
        .into_dimensionality::<Ix3>()?;
        let bands = data.len_of(Axis(0));

        let chunk_shape = grid.chunk_shape(source.dim())?;
        let gradients = coordinate_gradients(source)?;
        let mut tiles = StackedTiles::build(&data, source, &gradients, grid)?;
        log::debug!(
            "Stacked {} bands into {} tiles of {:?}",
            bands,
            tiles.num_tiles(),
            chunk_shape
        );

        let plans = cull_tiles(&mut tiles, destination);
        if tiles.num_tiles() == 0 {
            log::warn!("No source tile covers the destination area");
        }

        Ok(Self {
            tiles,
            plans,
            bands,
            squeeze_bands,
        })
    }

    /// Resample every remaining tile and merge the results.
    ///
    /// The first kernel failure aborts the whole run; no partial output is
    /// ever returned.
    pub fn execute<K: TileKernel + ?Sized>(
        &self,
        destination: &CoordinateGrid<'_>,
        options: &ResampleOptions,
        kernel: &K,
    ) -> Result<ArrayD<f64>, WarpError> {
        let (dst_rows, dst_cols) = destination.dim();
        let shape = (self.bands, dst_rows, dst_cols);

        let run = || -> Result<ArrayD<f64>, WarpError> {
            let out = dispatch(&self.tiles, destination, options.method, kernel, shape)?;
            if self.squeeze_bands {
                Ok(out.index_axis_move(Axis(0), 0).into_dyn())
            } else {
                Ok(out.into_dyn())
            }
        };
        match options.num_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| WarpError::Resampling(format!("Cannot build worker pool: {e}")))?;
                log::debug!("Resampling on a dedicated pool of {} threads", pool.current_num_threads());
                pool.install(run)
            }
            None => run(),
        }
    }
}

/// Run the kernel on every tile in parallel and fold each result into the
/// destination as soon as it is produced.
///
/// Every worker keeps one partial reduction; results are dropped right after
/// they are folded, and the partial reductions are merged once all tiles are
/// done.
fn dispatch<K: TileKernel + ?Sized>(
    tiles: &StackedTiles,
    destination: &CoordinateGrid<'_>,
    method: ResamplingMethod,
    kernel: &K,
    shape: (usize, usize, usize),
) -> Result<Array3<f64>, WarpError> {
    log::debug!(
        "Dispatching {} tiles ({})",
        tiles.num_tiles(),
        method.name()
    );
    let reducer = (0..tiles.num_tiles())
        .into_par_iter()
        .map(|k| {
            let tile = tiles.tile(k);
            let result = kernel
                .resample_tile(&tile, destination, method)
                .map_err(|e| WarpError::TileKernel {
                    chunk: tile.chunk,
                    reason: e.to_string(),
                })?;
            if result.dim() != shape {
                return Err(WarpError::TileKernel {
                    chunk: tile.chunk,
                    reason: format!("expected result shape {shape:?}, got {:?}", result.dim()),
                });
            }
            Ok(result)
        })
        .try_fold(
            || OverlapReducer::new(shape),
            |mut acc, result: Result<Array3<f64>, WarpError>| {
                acc.fold(&result?.view())?;
                Ok::<_, WarpError>(acc)
            },
        )
        .try_reduce(|| OverlapReducer::new(shape), OverlapReducer::merge)?;
    Ok(reducer.finish())
}

/// Resample 2D `[rows, cols]` or 3D `[bands, rows, cols]` data from the
/// `source` grid onto the `destination` grid.
///
/// Both coordinate grids must be in the same map frame. The source is
/// processed in the chunks described by `grid`. The output has the
/// destination's spatial shape and keeps the band axis of 3D input; pixels no
/// tile contributes to are NaN.
pub fn resample<K: TileKernel + ?Sized>(
    data: &ArrayViewD<'_, f64>,
    source: &CoordinateGrid<'_>,
    destination: &CoordinateGrid<'_>,
    grid: &ChunkGrid,
    options: &ResampleOptions,
    kernel: &K,
) -> Result<ArrayD<f64>, WarpError> {
    let plan = ResamplePlan::build(data, source, destination, grid)?;
    plan.execute(destination, options, kernel)
}

/// [`resample`] with the default [`GradientSearchKernel`].
pub fn resample_default(
    data: &ArrayViewD<'_, f64>,
    source: &CoordinateGrid<'_>,
    destination: &CoordinateGrid<'_>,
    grid: &ChunkGrid,
    options: &ResampleOptions,
) -> Result<ArrayD<f64>, WarpError> {
    resample(data, source, destination, grid, options, &GradientSearchKernel::default())
}
