//! PyO3 binding for the tile-parallel gradient-search resampler.

use ndarray::{Array2, ArrayD};
use numpy::{PyArrayDyn, PyReadonlyArray2, PyReadonlyArrayDyn};
use pyo3::exceptions::{PyNotImplementedError, PyValueError};
use pyo3::prelude::*;

use crate::chunk::grid::ChunkGrid;
use crate::coords::CoordinateGrid;
use crate::error::WarpError;
use crate::resample::ResamplingMethod;
use crate::warp::engine::{self, ResampleOptions};

fn to_py_err(e: WarpError) -> PyErr {
    match e {
        WarpError::UnsupportedRank(_) | WarpError::UnsupportedProjectionPair => {
            PyNotImplementedError::new_err(e.to_string())
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Resample data with gradient search, one task per source chunk.
///
/// Args:
///     data: 2D (y, x) or 3D (bands, y, x) f64 array.
///     src_x, src_y: Source pixel coordinates, shaped like the spatial axes of `data`.
///     dst_x, dst_y: Destination pixel coordinates in the same map frame.
///     chunks: Number of (row, col) chunks the source is split into. Each
///         axis must divide evenly.
///     chunk_shape: Optional (rows, cols) size of one chunk, e.g. the dask
///         chunk size of the source. Overrides `chunks` when given.
///     method: "bilinear" (default) or "nearest".
///     num_threads: Optional size of a dedicated worker pool.
///
/// Returns:
///     Resampled array with the destination's spatial shape; NaN where no
///     source data contributes.
#[pyfunction]
#[pyo3(signature = (data, src_x, src_y, dst_x, dst_y, chunks=(1, 1), chunk_shape=None, method="bilinear", num_threads=None))]
#[allow(clippy::too_many_arguments)]
pub fn gradient_search<'py>(
    py: Python<'py>,
    data: PyReadonlyArrayDyn<'py, f64>,
    src_x: PyReadonlyArray2<'py, f64>,
    src_y: PyReadonlyArray2<'py, f64>,
    dst_x: PyReadonlyArray2<'py, f64>,
    dst_y: PyReadonlyArray2<'py, f64>,
    chunks: (usize, usize),
    chunk_shape: Option<(usize, usize)>,
    method: &str,
    num_threads: Option<usize>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let method = ResamplingMethod::from_name(method)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown resampling method: '{method}'")))?;
    let grid = match chunk_shape {
        Some(chunk_shape) => {
            let view = data.as_array();
            let shape = view.shape();
            if shape.len() < 2 {
                return Err(to_py_err(WarpError::UnsupportedRank(shape.len())));
            }
            let spatial = (shape[shape.len() - 2], shape[shape.len() - 1]);
            ChunkGrid::from_chunk_shape(spatial, chunk_shape)
        }
        None => ChunkGrid::new(chunks.0, chunks.1),
    }
    .map_err(to_py_err)?;
    let options = ResampleOptions {
        method,
        num_threads,
    };

    // Copy to owned arrays before releasing the GIL
    let data: ArrayD<f64> = data.as_array().to_owned();
    let src_x: Array2<f64> = src_x.as_array().to_owned();
    let src_y: Array2<f64> = src_y.as_array().to_owned();
    let dst_x: Array2<f64> = dst_x.as_array().to_owned();
    let dst_y: Array2<f64> = dst_y.as_array().to_owned();

    let result = py
        .allow_threads(move || {
            let source = CoordinateGrid::new(src_x.view(), src_y.view())?;
            let destination = CoordinateGrid::new(dst_x.view(), dst_y.view())?;
            engine::resample_default(&data.view(), &source, &destination, &grid, &options)
        })
        .map_err(to_py_err)?;

    Ok(PyArrayDyn::from_owned_array(py, result))
}
