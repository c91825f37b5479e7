//! Source arrays stacked into tiles.

use ndarray::{Array3, Array4, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix3, Ix4};

use crate::chunk::grid::ChunkGrid;
use crate::chunk::stack::stack_chunks;
use crate::coords::CoordinateGrid;
use crate::error::WarpError;
use crate::gradient::CoordinateGradients;

/// Borrowed slices of one tile, handed to the kernel.
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    /// Position of the tile in the original chunk grid.
    pub chunk: usize,
    /// `[bands, rows, cols]`
    pub data: ArrayView3<'a, f64>,
    pub x: ArrayView2<'a, f64>,
    pub y: ArrayView2<'a, f64>,
    pub x_line: ArrayView2<'a, f64>,
    pub x_pixel: ArrayView2<'a, f64>,
    pub y_line: ArrayView2<'a, f64>,
    pub y_pixel: ArrayView2<'a, f64>,
}

/// Data, coordinates and gradients with every chunk on a trailing tile axis.
///
/// All arrays share the tile axis: slice `k` of each one describes the same
/// spatial region, recorded in `chunks[k]`.
#[derive(Clone, Debug)]
pub struct StackedTiles {
    /// `[bands, rows, cols, tiles]`
    pub data: Array4<f64>,
    /// `[rows, cols, tiles]`
    pub x: Array3<f64>,
    pub y: Array3<f64>,
    pub x_line: Array3<f64>,
    pub x_pixel: Array3<f64>,
    pub y_line: Array3<f64>,
    pub y_pixel: Array3<f64>,
    chunks: Vec<usize>,
}

impl StackedTiles {
    /// Stack `[bands, rows, cols]` data with its source coordinates and gradients.
    pub fn build(
        data: &ArrayView3<'_, f64>,
        source: &CoordinateGrid<'_>,
        gradients: &CoordinateGradients,
        grid: &ChunkGrid,
    ) -> Result<Self, WarpError> {
        let (_, rows, cols) = data.dim();
        if source.dim() != (rows, cols) {
            return Err(WarpError::Shape(format!(
                "Data spatial shape {:?} does not match source coordinates {:?}",
                (rows, cols),
                source.dim()
            )));
        }
        grid.chunk_shape((rows, cols))?;

        let stack2 = |arr: ArrayViewD<'_, f64>| -> Result<Array3<f64>, WarpError> {
            Ok(stack_chunks(arr, grid)?.into_dimensionality::<Ix3>()?)
        };

        Ok(Self {
            data: stack_chunks(data.view().into_dyn(), grid)?.into_dimensionality::<Ix4>()?,
            x: stack2(source.x.into_dyn())?,
            y: stack2(source.y.into_dyn())?,
            x_line: stack2(gradients.x_line.view().into_dyn())?,
            x_pixel: stack2(gradients.x_pixel.view().into_dyn())?,
            y_line: stack2(gradients.y_line.view().into_dyn())?,
            y_pixel: stack2(gradients.y_pixel.view().into_dyn())?,
            chunks: (0..grid.num_tiles()).collect(),
        })
    }

    pub fn num_tiles(&self) -> usize {
        self.chunks.len()
    }

    /// Original chunk index of every remaining tile, in tile-axis order.
    pub fn chunks(&self) -> &[usize] {
        &self.chunks
    }

    pub fn tile(&self, k: usize) -> TileView<'_> {
        TileView {
            chunk: self.chunks[k],
            data: self.data.index_axis(Axis(3), k),
            x: self.x.index_axis(Axis(2), k),
            y: self.y.index_axis(Axis(2), k),
            x_line: self.x_line.index_axis(Axis(2), k),
            x_pixel: self.x_pixel.index_axis(Axis(2), k),
            y_line: self.y_line.index_axis(Axis(2), k),
            y_pixel: self.y_pixel.index_axis(Axis(2), k),
        }
    }

    /// Keep only the tiles at positions `keep` along the tile axis, in that order.
    pub fn retain(&mut self, keep: &[usize]) {
        self.data = self.data.select(Axis(3), keep);
        for arr in [
            &mut self.x,
            &mut self.y,
            &mut self.x_line,
            &mut self.x_pixel,
            &mut self.y_line,
            &mut self.y_pixel,
        ] {
            *arr = arr.select(Axis(2), keep);
        }
        self.chunks = keep.iter().map(|&k| self.chunks[k]).collect();
    }
}
