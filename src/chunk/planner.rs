//! Tile culling: decide which source tiles can contribute to the destination.

use crate::chunk::footprint::{Coverage, Footprint};
use crate::chunk::tiles::StackedTiles;
use crate::coords::CoordinateGrid;

/// Culling decision for a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlan {
    /// Position along the tile axis when the plan was made.
    pub tile: usize,
    /// Index of the tile in the original chunk grid.
    pub chunk: usize,
    pub coverage: Coverage,
}

impl TilePlan {
    /// Whether the tile is kept for resampling.
    pub fn has_data(&self) -> bool {
        self.coverage.keeps_tile()
    }
}

/// Test every tile footprint against the destination footprint.
///
/// Only corner samples are read, so this is cheap enough to run eagerly
/// before any kernel work is scheduled.
pub fn plan_tiles(tiles: &StackedTiles, destination: &CoordinateGrid<'_>) -> Vec<TilePlan> {
    let dst_footprint = Footprint::from_corners(&destination.x, &destination.y);
    if dst_footprint.area() == 0.0 {
        log::debug!("Destination footprint has zero area, keeping all tiles");
    }

    (0..tiles.num_tiles())
        .map(|k| {
            let tile = tiles.tile(k);
            let footprint = Footprint::from_corners(&tile.x, &tile.y);
            let coverage = dst_footprint.coverage_of(&footprint);
            log::trace!("Chunk {}: {:?}", tile.chunk, coverage);
            TilePlan {
                tile: k,
                chunk: tile.chunk,
                coverage,
            }
        })
        .collect()
}

/// Plan and drop every disjoint tile from all stacked arrays.
///
/// Returns the plans of all tiles, including the dropped ones.
pub fn cull_tiles(tiles: &mut StackedTiles, destination: &CoordinateGrid<'_>) -> Vec<TilePlan> {
    let plans = plan_tiles(tiles, destination);
    let keep: Vec<usize> = plans.iter().filter(|p| p.has_data()).map(|p| p.tile).collect();

    log::debug!(
        "Culling kept {} of {} tiles",
        keep.len(),
        tiles.num_tiles()
    );
    if keep.len() < tiles.num_tiles() {
        tiles.retain(&keep);
    }
    plans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::grid::ChunkGrid;
    use crate::gradient::coordinate_gradients;
    use ndarray::{array, Array2, Array3};

    /// 4x4 source with x = col and y = row, split into 2x2 tiles.
    fn stacked_4x4() -> StackedTiles {
        let data = Array3::from_shape_fn((1, 4, 4), |(_, r, c)| (r * 4 + c) as f64);
        let x = Array2::from_shape_fn((4, 4), |(_, c)| c as f64);
        let y = Array2::from_shape_fn((4, 4), |(r, _)| r as f64);
        let source = CoordinateGrid::new(x.view(), y.view()).unwrap();
        let grads = coordinate_gradients(&source).unwrap();
        StackedTiles::build(&data.view(), &source, &grads, &ChunkGrid::new(2, 2).unwrap())
            .unwrap()
    }

    #[test]
    fn test_only_top_left_tile_survives() {
        let mut tiles = stacked_4x4();
        let dst_x = array![[0.0, 1.0], [0.0, 1.0]];
        let dst_y = array![[0.0, 0.0], [1.0, 1.0]];
        let dst = CoordinateGrid::new(dst_x.view(), dst_y.view()).unwrap();

        let plans = cull_tiles(&mut tiles, &dst);

        assert_eq!(plans.len(), 4);
        assert_eq!(plans[0].coverage, Coverage::Intersects);
        for plan in &plans[1..] {
            assert_eq!(plan.coverage, Coverage::Disjoint, "chunk {}", plan.chunk);
        }
        assert_eq!(tiles.num_tiles(), 1);
        assert_eq!(tiles.chunks(), &[0]);
        assert_eq!(tiles.data.dim(), (1, 2, 2, 1));
    }

    #[test]
    fn test_zero_area_destination_keeps_everything() {
        let mut tiles = stacked_4x4();
        let dst_x = Array2::from_elem((3, 3), 1000.0);
        let dst_y = Array2::from_elem((3, 3), -1000.0);
        let dst = CoordinateGrid::new(dst_x.view(), dst_y.view()).unwrap();

        let plans = cull_tiles(&mut tiles, &dst);

        assert!(plans.iter().all(|p| p.has_data()));
        assert_eq!(tiles.num_tiles(), 4);
    }

    #[test]
    fn test_destination_outside_source_drops_everything() {
        let mut tiles = stacked_4x4();
        let dst_x = array![[100.0, 101.0], [100.0, 101.0]];
        let dst_y = array![[100.0, 100.0], [101.0, 101.0]];
        let dst = CoordinateGrid::new(dst_x.view(), dst_y.view()).unwrap();

        cull_tiles(&mut tiles, &dst);
        assert_eq!(tiles.num_tiles(), 0);
    }

    #[test]
    fn test_tile_with_invalid_corners_is_kept() {
        let data = Array3::<f64>::zeros((1, 4, 4));
        let mut x = Array2::from_shape_fn((4, 4), |(_, c)| c as f64 + 100.0);
        let y = Array2::from_shape_fn((4, 4), |(r, _)| r as f64 + 100.0);
        // bottom-right chunk lies off the projection disk on two corners
        x[(3, 3)] = f64::INFINITY;
        x[(2, 3)] = f64::NAN;
        let source = CoordinateGrid::new(x.view(), y.view()).unwrap();
        let grads = coordinate_gradients(&source).unwrap();
        let mut tiles =
            StackedTiles::build(&data.view(), &source, &grads, &ChunkGrid::new(2, 2).unwrap())
                .unwrap();

        let dst_x = array![[0.0, 1.0], [0.0, 1.0]];
        let dst_y = array![[0.0, 0.0], [1.0, 1.0]];
        let dst = CoordinateGrid::new(dst_x.view(), dst_y.view()).unwrap();

        let plans = cull_tiles(&mut tiles, &dst);
        assert_eq!(plans[3].coverage, Coverage::Uncertain);
        assert_eq!(tiles.chunks(), &[3]);
    }

    #[test]
    fn test_single_row_tiles_are_culled() {
        // 4x4 source split into four one-row tiles at y = 0, 10, 20, 30
        let data = Array3::<f64>::zeros((1, 4, 4));
        let x = Array2::from_shape_fn((4, 4), |(_, c)| 10.0 * c as f64);
        let y = Array2::from_shape_fn((4, 4), |(r, _)| 10.0 * r as f64);
        let source = CoordinateGrid::new(x.view(), y.view()).unwrap();
        let grads = coordinate_gradients(&source).unwrap();
        let mut tiles =
            StackedTiles::build(&data.view(), &source, &grads, &ChunkGrid::new(4, 1).unwrap())
                .unwrap();

        let dst_x = array![[5.0, 15.0], [5.0, 15.0]];
        let dst_y = array![[-1.0, -1.0], [1.0, 1.0]];
        let dst = CoordinateGrid::new(dst_x.view(), dst_y.view()).unwrap();

        let plans = cull_tiles(&mut tiles, &dst);
        assert_eq!(plans[0].coverage, Coverage::Intersects);
        for plan in &plans[1..] {
            assert_eq!(plan.coverage, Coverage::Disjoint, "chunk {}", plan.chunk);
        }
        assert_eq!(tiles.chunks(), &[0]);
    }
}
