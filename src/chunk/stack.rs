//! Chunk stacking: turn a chunk grid into a trailing tile axis.

use ndarray::{concatenate, stack, ArrayD, ArrayViewD, Axis};

use crate::chunk::grid::ChunkGrid;
use crate::chunk::split::split_axis;
use crate::error::WarpError;

/// Stack every chunk of `view` along a new trailing axis.
///
/// The last two axes are the spatial (row, col) axes divided by `grid`; any
/// leading axes (bands) are carried along. The result has shape
/// `[..leading, chunk_rows, chunk_cols, grid.num_tiles()]` and slice `k` of the
/// trailing axis is the chunk with [`ChunkGrid::tile_index`] `k`.
pub fn stack_chunks<A: Clone>(
    view: ArrayViewD<'_, A>,
    grid: &ChunkGrid,
) -> Result<ArrayD<A>, WarpError> {
    let ndim = view.ndim();
    if ndim < 2 {
        return Err(WarpError::Shape(format!(
            "Cannot stack chunks of a {ndim}-d array"
        )));
    }
    let row_axis = Axis(ndim - 2);
    let col_axis = Axis(ndim - 1);

    let mut layers = Vec::with_capacity(grid.num_tiles());
    for column in split_axis(view, grid.col_chunks(), col_axis)? {
        layers.extend(split_axis(column, grid.row_chunks(), row_axis)?);
    }

    Ok(stack(Axis(ndim), &layers)?)
}

/// Undo [`stack_chunks`]: reassemble the trailing tile axis into the chunk grid.
pub fn unstack_chunks<A: Clone>(
    stacked: ArrayViewD<'_, A>,
    grid: &ChunkGrid,
) -> Result<ArrayD<A>, WarpError> {
    let ndim = stacked.ndim();
    if ndim < 3 {
        return Err(WarpError::Shape(format!(
            "Stacked array needs at least 3 axes, got {ndim}"
        )));
    }
    let tile_axis = Axis(ndim - 1);
    if stacked.len_of(tile_axis) != grid.num_tiles() {
        return Err(WarpError::Shape(format!(
            "Expected {} tiles, found {}",
            grid.num_tiles(),
            stacked.len_of(tile_axis)
        )));
    }

    let row_axis = Axis(ndim - 3);
    let col_axis = Axis(ndim - 2);

    let mut columns = Vec::with_capacity(grid.col_chunks());
    for col in 0..grid.col_chunks() {
        let tiles: Vec<_> = (0..grid.row_chunks())
            .map(|row| stacked.index_axis(tile_axis, grid.tile_index(row, col)))
            .collect();
        columns.push(concatenate(row_axis, &tiles)?);
    }
    let views: Vec<_> = columns.iter().map(|c| c.view()).collect();

    Ok(concatenate(col_axis, &views)?)
}
