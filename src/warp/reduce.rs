//! Merging of per-tile results into one destination grid.
//!
//! Tiles are not expected to overlap in valid data, so the NaN-ignoring
//! maximum selects the single finite contribution of each pixel. Where two
//! tiles do produce finite values the larger one wins.

use ndarray::{Array3, ArrayView3, Zip};

use crate::error::WarpError;

#[inline]
fn nan_max(acc: f64, value: f64) -> f64 {
    if value.is_nan() || (!acc.is_nan() && acc >= value) {
        acc
    } else {
        value
    }
}

/// Streaming NaN-aware maximum over tile results of a fixed shape.
#[derive(Clone, Debug)]
pub struct OverlapReducer {
    acc: Array3<f64>,
}

impl OverlapReducer {
    /// Start with an all-NaN `[bands, rows, cols]` grid.
    pub fn new(shape: (usize, usize, usize)) -> Self {
        Self {
            acc: Array3::from_elem(shape, f64::NAN),
        }
    }

    pub fn fold(&mut self, tile: &ArrayView3<'_, f64>) -> Result<(), WarpError> {
        if tile.dim() != self.acc.dim() {
            return Err(WarpError::Shape(format!(
                "Tile result {:?} does not match destination {:?}",
                tile.dim(),
                self.acc.dim()
            )));
        }
        Zip::from(&mut self.acc)
            .and(tile)
            .par_for_each(|acc, &value| *acc = nan_max(*acc, value));
        Ok(())
    }

    /// Combine two partial reductions over disjoint sets of tiles.
    pub fn merge(mut self, other: Self) -> Result<Self, WarpError> {
        self.fold(&other.acc.view())?;
        Ok(self)
    }

    pub fn finish(self) -> Array3<f64> {
        self.acc
    }
}
