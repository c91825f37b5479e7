//! Re-tiling of chunked source grids and tile culling.

pub mod footprint;
pub mod grid;
pub mod planner;
pub mod split;
pub mod stack;
pub mod tiles;

pub use footprint::{Coverage, Footprint};
pub use grid::ChunkGrid;
pub use tiles::{StackedTiles, TileView};
