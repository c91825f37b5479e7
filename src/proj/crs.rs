use ndarray::{Array2, ArrayView2, Zip};
use proj4rs::Proj;

use crate::error::ProjError;

/// Thin wrapper around proj4rs that handles radians/degrees conversion transparently.
///
/// proj4rs works in radians for geographic CRS, while coordinate grids of
/// lon/lat data are in degrees. This wrapper converts on the way in and out.
pub struct CrsTransform {
    src: Proj,
    dst: Proj,
    src_is_geo: bool,
    dst_is_geo: bool,
}

impl CrsTransform {
    /// Create a transform from `src_crs` to `dst_crs`.
    ///
    /// Accepts EPSG codes ("EPSG:4326") or PROJ strings ("+proj=utm +zone=33 ...").
    pub fn new(src_crs: &str, dst_crs: &str) -> Result<Self, ProjError> {
        let src = parse(src_crs)?;
        let dst = parse(dst_crs)?;
        let src_is_geo = src.is_latlong();
        let dst_is_geo = dst.is_latlong();
        Ok(Self {
            src,
            dst,
            src_is_geo,
            dst_is_geo,
        })
    }

    /// Transform a single point from the source CRS to the destination CRS.
    ///
    /// Coordinates are in CRS native units (degrees for geographic, metres for
    /// projected).
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let mut point = if self.src_is_geo {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        proj4rs::transform::transform(&self.src, &self.dst, &mut point)
            .map_err(|e| ProjError::TransformFailed(e.to_string()))?;

        if self.dst_is_geo {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok(point)
        }
    }

    /// Transform whole coordinate grids.
    ///
    /// Points that cannot be transformed (outside the projection domain) come
    /// out as NaN rather than failing the grid, so that they drop out of
    /// footprints and resample to no data.
    pub fn transform_grid(
        &self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView2<'_, f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let mut out_x = Array2::from_elem(x.raw_dim(), f64::NAN);
        let mut out_y = Array2::from_elem(x.raw_dim(), f64::NAN);
        Zip::from(&mut out_x)
            .and(&mut out_y)
            .and(x)
            .and(y)
            .for_each(|ox, oy, &xi, &yi| {
                if let Ok((tx, ty)) = self.transform(xi, yi) {
                    if tx.is_finite() && ty.is_finite() {
                        *ox = tx;
                        *oy = ty;
                    }
                }
            });
        (out_x, out_y)
    }
}

fn parse(crs: &str) -> Result<Proj, ProjError> {
    Proj::from_user_string(crs).map_err(|e| ProjError::UnknownCrs(format!("{crs}: {e}")))
}

/// Whether `crs` is a geographic (lon/lat) coordinate system.
pub fn is_geographic(crs: &str) -> Result<bool, ProjError> {
    Ok(parse(crs)?.is_latlong())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_roundtrip_4326_to_32633() {
        // Oslo, Norway: ~10.75°E, ~59.91°N
        let fwd = CrsTransform::new("EPSG:4326", "EPSG:32633").unwrap();
        let inv = CrsTransform::new("EPSG:32633", "EPSG:4326").unwrap();

        let (e, n) = fwd.transform(10.75, 59.91).unwrap();
        assert!(e > 200_000.0 && e < 800_000.0, "easting out of range: {e}");
        assert!(n > 6_000_000.0 && n < 7_000_000.0, "northing out of range: {n}");

        let (lon, lat) = inv.transform(e, n).unwrap();
        assert_relative_eq!(lon, 10.75, epsilon = 1e-8);
        assert_relative_eq!(lat, 59.91, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_crs() {
        assert!(CrsTransform::new("EPSG:99999", "EPSG:4326").is_err());
        assert!(is_geographic("not a crs").is_err());
    }

    #[test]
    fn test_is_geographic() {
        assert!(is_geographic("EPSG:4326").unwrap());
        assert!(!is_geographic("EPSG:32633").unwrap());
        assert!(is_geographic("+proj=longlat +datum=WGS84").unwrap());
    }

    #[test]
    fn test_transform_grid() {
        let ct = CrsTransform::new("EPSG:4326", "EPSG:32633").unwrap();
        let lon = array![[14.0, 15.0], [14.0, 15.0]];
        let lat = array![[60.0, 60.0], [59.0, 59.0]];

        let (x, y) = ct.transform_grid(&lon.view(), &lat.view());

        assert_eq!(x.dim(), (2, 2));
        // 15°E is the central meridian of UTM zone 33
        assert_relative_eq!(x[(0, 1)], 500_000.0, epsilon = 1.0);
        assert!(x[(0, 0)] < x[(0, 1)]);
        assert!(y[(0, 0)] > y[(1, 0)]);
    }

    #[test]
    fn test_transform_grid_keeps_nan() {
        let ct = CrsTransform::new("EPSG:4326", "EPSG:3857").unwrap();
        let lon = array![[f64::NAN, 0.0]];
        let lat = array![[0.0, 0.0]];

        let (x, y) = ct.transform_grid(&lon.view(), &lat.view());
        assert!(x[(0, 0)].is_nan() && y[(0, 0)].is_nan());
        assert_relative_eq!(x[(0, 1)], 0.0, epsilon = 1e-6);
    }
}
