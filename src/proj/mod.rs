//! Coordinate transforms between map frames.

pub mod crs;

pub use crs::{is_geographic, CrsTransform};
