//! Coarse footprint polygons of coordinate grids.
//!
//! A footprint is built from the four corner samples only, never the full
//! border. On strongly curved grids this can miss a real intersection.

use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Coord, Intersects, Line, LineString, Polygon};
use ndarray::ArrayView2;

/// Outcome of testing a tile footprint against the destination footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    Intersects,
    Disjoint,
    /// The test could not be evaluated reliably.
    Uncertain,
}

impl Coverage {
    /// Culling is fail-open: only a tile that is known to be disjoint is dropped.
    pub fn keeps_tile(self) -> bool {
        !matches!(self, Coverage::Disjoint)
    }
}

/// Polygon through the finite corners of a coordinate grid.
#[derive(Clone, Debug)]
pub struct Footprint {
    vertices: Vec<Coord<f64>>,
}

impl Footprint {
    /// Corners `(0, 0)`, `(0, N)`, `(M, N)`, `(M, 0)` in that cyclic order,
    /// skipping any corner whose x or y is not finite.
    pub fn from_corners(x: &ArrayView2<'_, f64>, y: &ArrayView2<'_, f64>) -> Self {
        let (rows, cols) = x.dim();
        if rows == 0 || cols == 0 || y.dim() != (rows, cols) {
            return Self {
                vertices: Vec::new(),
            };
        }
        let (last_row, last_col) = (rows - 1, cols - 1);
        let corners = [
            (0, 0),
            (0, last_col),
            (last_row, last_col),
            (last_row, 0),
        ];

        let vertices = corners
            .iter()
            .map(|&idx| Coord {
                x: x[idx],
                y: y[idx],
            })
            .filter(|c| c.x.is_finite() && c.y.is_finite())
            .collect();
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    /// Fewer than three vertices cannot enclose anything.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Unsigned area, `0.0` for degenerate footprints.
    ///
    /// Zero means the extent cannot be assessed, not that it is empty.
    pub fn area(&self) -> f64 {
        match self.polygon() {
            Some(poly) => poly.unsigned_area(),
            None => 0.0,
        }
    }

    /// Whether two non-adjacent edges of the closed ring properly cross.
    ///
    /// Repeated vertices are collapsed first, so a ring folded onto a line
    /// (a tile one sample thick) does not count as crossing itself.
    pub fn is_self_intersecting(&self) -> bool {
        let mut ring: Vec<Coord<f64>> = Vec::with_capacity(self.vertices.len());
        for &v in &self.vertices {
            if ring.last() != Some(&v) {
                ring.push(v);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let n = ring.len();
        if n < 4 {
            return false;
        }
        let edges: Vec<Line<f64>> = (0..n)
            .map(|i| Line::new(ring[i], ring[(i + 1) % n]))
            .collect();
        for i in 0..n {
            for j in (i + 2)..n {
                // first and last edge share vertex 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                if let Some(LineIntersection::SinglePoint {
                    is_proper: true, ..
                }) = line_intersection(edges[i], edges[j])
                {
                    return true;
                }
            }
        }
        false
    }

    /// Intersection test between this (destination) footprint and a tile footprint.
    pub fn coverage_of(&self, tile: &Footprint) -> Coverage {
        if self.area() == 0.0 {
            return Coverage::Uncertain;
        }
        if tile.is_self_intersecting() || self.is_self_intersecting() {
            return Coverage::Uncertain;
        }
        match (self.polygon(), tile.polygon()) {
            (Some(dst), Some(src)) => {
                if dst.intersects(&src) {
                    Coverage::Intersects
                } else {
                    Coverage::Disjoint
                }
            }
            _ => Coverage::Uncertain,
        }
    }

    fn polygon(&self) -> Option<Polygon<f64>> {
        if self.is_degenerate() {
            return None;
        }
        Some(Polygon::new(LineString::from(self.vertices.clone()), vec![]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn square(x0: f64, y0: f64, size: f64) -> Footprint {
        let x = array![[x0, x0 + size], [x0, x0 + size]];
        let y = array![[y0, y0], [y0 + size, y0 + size]];
        Footprint::from_corners(&x.view(), &y.view())
    }

    #[test]
    fn test_corners_in_cyclic_order() {
        let x = Array2::from_shape_fn((3, 4), |(_, c)| c as f64);
        let y = Array2::from_shape_fn((3, 4), |(r, _)| r as f64 * 10.0);
        let fp = Footprint::from_corners(&x.view(), &y.view());

        let pts: Vec<(f64, f64)> = fp.vertices().iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(pts, vec![(0.0, 0.0), (3.0, 0.0), (3.0, 20.0), (0.0, 20.0)]);
        assert_relative_eq!(fp.area(), 60.0);
    }

    #[test]
    fn test_non_finite_corners_dropped() {
        let x = array![[0.0, f64::INFINITY], [0.0, 1.0]];
        let y = array![[0.0, 0.0], [1.0, f64::NAN]];
        let fp = Footprint::from_corners(&x.view(), &y.view());

        assert_eq!(fp.vertices().len(), 2);
        assert!(fp.is_degenerate());
        assert_eq!(fp.area(), 0.0);
    }

    #[test]
    fn test_coincident_corners_have_zero_area() {
        let x = Array2::from_elem((3, 3), 5.0);
        let y = Array2::from_elem((3, 3), 5.0);
        let fp = Footprint::from_corners(&x.view(), &y.view());
        assert!(!fp.is_degenerate());
        assert_eq!(fp.area(), 0.0);
    }

    #[test]
    fn test_overlapping_and_disjoint() {
        let dst = square(0.0, 0.0, 10.0);
        assert_eq!(dst.coverage_of(&square(5.0, 5.0, 10.0)), Coverage::Intersects);
        assert_eq!(dst.coverage_of(&square(20.0, 0.0, 5.0)), Coverage::Disjoint);
        // Containment counts as intersecting
        assert_eq!(dst.coverage_of(&square(2.0, 2.0, 1.0)), Coverage::Intersects);
    }

    #[test]
    fn test_zero_area_destination_is_uncertain() {
        let x = Array2::from_elem((2, 2), 1.0);
        let y = Array2::from_elem((2, 2), 1.0);
        let dst = Footprint::from_corners(&x.view(), &y.view());
        let far = square(1000.0, 1000.0, 1.0);

        let cov = dst.coverage_of(&far);
        assert_eq!(cov, Coverage::Uncertain);
        assert!(cov.keeps_tile());
    }

    #[test]
    fn test_degenerate_tile_is_uncertain() {
        let dst = square(0.0, 0.0, 10.0);
        let x = array![[f64::NAN, 100.0], [f64::NAN, 101.0]];
        let y = array![[f64::NAN, 100.0], [f64::NAN, 101.0]];
        let tile = Footprint::from_corners(&x.view(), &y.view());

        assert_eq!(dst.coverage_of(&tile), Coverage::Uncertain);
    }

    #[test]
    fn test_bowtie_is_self_intersecting() {
        // Corners swapped on the bottom row, as when a tile wraps a discontinuity
        let x = array![[0.0, 1.0], [1.0, 0.0]];
        let y = array![[0.0, 0.0], [1.0, 1.0]];
        let bowtie = Footprint::from_corners(&x.view(), &y.view());
        assert!(bowtie.is_self_intersecting());
        assert!(!square(0.0, 0.0, 1.0).is_self_intersecting());

        let dst = square(50.0, 50.0, 1.0);
        assert_eq!(dst.coverage_of(&bowtie), Coverage::Uncertain);
    }

    #[test]
    fn test_single_row_tile_is_not_self_intersecting() {
        // One sample thick: the ring folds back onto itself along y = 20
        let x = array![[0.0, 10.0, 20.0, 30.0]];
        let y = array![[20.0, 20.0, 20.0, 20.0]];
        let tile = Footprint::from_corners(&x.view(), &y.view());
        assert_eq!(tile.vertices().len(), 4);
        assert!(!tile.is_self_intersecting());

        let dst = square(0.0, -1.0, 2.0);
        assert_eq!(dst.coverage_of(&tile), Coverage::Disjoint);
    }

    #[test]
    fn test_only_disjoint_drops() {
        assert!(Coverage::Intersects.keeps_tile());
        assert!(Coverage::Uncertain.keeps_tile());
        assert!(!Coverage::Disjoint.keeps_tile());
    }
}
