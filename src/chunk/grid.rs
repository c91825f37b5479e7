//! Chunk layout shared by every array of one resampling operation.

use crate::error::WarpError;

/// A regular partition of the two spatial axes into `row_chunks x col_chunks`
/// equally sized chunks.
///
/// Tiles are numbered columns-outer, rows-inner: chunk `(r, c)` is tile
/// `c * row_chunks + r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    row_chunks: usize,
    col_chunks: usize,
}

impl ChunkGrid {
    pub fn new(row_chunks: usize, col_chunks: usize) -> Result<Self, WarpError> {
        if row_chunks == 0 || col_chunks == 0 {
            return Err(WarpError::Shape(format!(
                "Chunk counts must be > 0, got {row_chunks}x{col_chunks}"
            )));
        }
        Ok(Self {
            row_chunks,
            col_chunks,
        })
    }

    /// A grid with a single chunk covering the whole array.
    pub fn single() -> Self {
        Self {
            row_chunks: 1,
            col_chunks: 1,
        }
    }

    /// Build the grid for an array of `shape` stored in chunks of `chunk_shape`.
    pub fn from_chunk_shape(
        shape: (usize, usize),
        chunk_shape: (usize, usize),
    ) -> Result<Self, WarpError> {
        let (rows, cols) = shape;
        let (chunk_rows, chunk_cols) = chunk_shape;
        if chunk_rows == 0 || chunk_cols == 0 {
            return Err(WarpError::Shape("Chunk size must be > 0".into()));
        }
        if rows % chunk_rows != 0 || cols % chunk_cols != 0 {
            return Err(WarpError::Shape(format!(
                "Array shape {rows}x{cols} is not a multiple of chunk shape {chunk_rows}x{chunk_cols}"
            )));
        }
        Self::new(rows / chunk_rows, cols / chunk_cols)
    }

    pub fn row_chunks(&self) -> usize {
        self.row_chunks
    }

    pub fn col_chunks(&self) -> usize {
        self.col_chunks
    }

    pub fn num_tiles(&self) -> usize {
        self.row_chunks * self.col_chunks
    }

    /// Shape of one chunk for an array whose spatial extent is `shape`.
    pub fn chunk_shape(&self, shape: (usize, usize)) -> Result<(usize, usize), WarpError> {
        let (rows, cols) = shape;
        if rows == 0 || cols == 0 || rows % self.row_chunks != 0 || cols % self.col_chunks != 0 {
            return Err(WarpError::Shape(format!(
                "Array shape {rows}x{cols} does not divide into {}x{} chunks",
                self.row_chunks, self.col_chunks
            )));
        }
        Ok((rows / self.row_chunks, cols / self.col_chunks))
    }

    pub fn tile_index(&self, row: usize, col: usize) -> usize {
        col * self.row_chunks + row
    }

    /// Inverse of [`ChunkGrid::tile_index`].
    pub fn tile_position(&self, tile: usize) -> (usize, usize) {
        (tile % self.row_chunks, tile / self.row_chunks)
    }
}
