//! Resampler bound to a source and a target geo definition.
//!
//! Gradient search needs source and destination coordinates in one map
//! frame. When the source has projected coordinates the destination is
//! brought into the source projection; otherwise the source lon/lats are
//! projected into the destination frame. Lon/lat on both sides is rejected.

use ndarray::{Array2, ArrayD, ArrayViewD};

use crate::affine::Affine;
use crate::chunk::grid::ChunkGrid;
use crate::coords::CoordinateGrid;
use crate::error::WarpError;
use crate::kernel::{GradientSearchKernel, TileKernel};
use crate::proj::{is_geographic, CrsTransform};
use crate::warp::engine::{resample, ResampleOptions};

const LONLAT_CRS: &str = "EPSG:4326";

/// Where a grid of pixels lies on the Earth.
#[derive(Clone, Debug)]
pub enum GeoDefinition {
    /// Regular grid described by a CRS and an affine geotransform.
    Area {
        crs: String,
        transform: Affine,
        shape: (usize, usize),
    },
    /// Irregular grid with explicit lon/lat (degrees) per pixel.
    Swath { lons: Array2<f64>, lats: Array2<f64> },
}

impl GeoDefinition {
    pub fn area(crs: impl Into<String>, transform: Affine, shape: (usize, usize)) -> Self {
        Self::Area {
            crs: crs.into(),
            transform,
            shape,
        }
    }

    pub fn swath(lons: Array2<f64>, lats: Array2<f64>) -> Result<Self, WarpError> {
        if lons.dim() != lats.dim() {
            return Err(WarpError::Shape(format!(
                "Swath lons {:?} and lats {:?} differ in shape",
                lons.dim(),
                lats.dim()
            )));
        }
        Ok(Self::Swath { lons, lats })
    }

    /// CRS the native coordinates are expressed in.
    fn crs(&self) -> &str {
        match self {
            Self::Area { crs, .. } => crs,
            Self::Swath { .. } => LONLAT_CRS,
        }
    }

    fn is_geographic(&self) -> Result<bool, WarpError> {
        match self {
            Self::Area { crs, .. } => Ok(is_geographic(crs)?),
            Self::Swath { .. } => Ok(true),
        }
    }

    /// Pixel coordinates in [`GeoDefinition::crs`].
    fn native_coords(&self) -> Result<(Array2<f64>, Array2<f64>), WarpError> {
        match self {
            Self::Area {
                transform, shape, ..
            } => transform.pixel_centers(*shape),
            Self::Swath { lons, lats } => Ok((lons.clone(), lats.clone())),
        }
    }
}

/// Source and destination coordinates in a common map frame.
#[derive(Clone, Debug)]
pub struct PreparedCoords {
    pub src_x: Array2<f64>,
    pub src_y: Array2<f64>,
    pub dst_x: Array2<f64>,
    pub dst_y: Array2<f64>,
    /// The common frame is the source projection.
    pub in_source_frame: bool,
}

pub struct GradientSearchResampler {
    source: GeoDefinition,
    target: GeoDefinition,
    coords: Option<PreparedCoords>,
}

impl GradientSearchResampler {
    pub fn new(source: GeoDefinition, target: GeoDefinition) -> Self {
        Self {
            source,
            target,
            coords: None,
        }
    }

    /// Compute (once) the coordinates of both grids in a common frame.
    pub fn prepare(&mut self) -> Result<&PreparedCoords, WarpError> {
        let coords = match self.coords.take() {
            Some(coords) => coords,
            None => self.compute_coords()?,
        };
        Ok(self.coords.insert(coords))
    }

    fn compute_coords(&self) -> Result<PreparedCoords, WarpError> {
        let source_geo = self.source.is_geographic()?;
        let target_geo = self.target.is_geographic()?;
        if source_geo && target_geo {
            return Err(WarpError::UnsupportedProjectionPair);
        }

        let (mut src_x, mut src_y) = self.source.native_coords()?;
        let (mut dst_x, mut dst_y) = self.target.native_coords()?;
        let in_source_frame = !source_geo;

        if self.source.crs() != self.target.crs() {
            if in_source_frame {
                let ct = CrsTransform::new(self.target.crs(), self.source.crs())?;
                (dst_x, dst_y) = ct.transform_grid(&dst_x.view(), &dst_y.view());
            } else {
                let ct = CrsTransform::new(self.source.crs(), self.target.crs())?;
                (src_x, src_y) = ct.transform_grid(&src_x.view(), &src_y.view());
            }
        }
        log::debug!(
            "Resampling in the {} frame ({})",
            if in_source_frame { "source" } else { "target" },
            if in_source_frame {
                self.source.crs()
            } else {
                self.target.crs()
            }
        );

        Ok(PreparedCoords {
            src_x,
            src_y,
            dst_x,
            dst_y,
            in_source_frame,
        })
    }

    /// Resample `data` with the default [`GradientSearchKernel`].
    pub fn compute(
        &mut self,
        data: &ArrayViewD<'_, f64>,
        grid: &ChunkGrid,
        options: &ResampleOptions,
    ) -> Result<ArrayD<f64>, WarpError> {
        self.compute_with(data, grid, options, &GradientSearchKernel::default())
    }

    pub fn compute_with<K: TileKernel + ?Sized>(
        &mut self,
        data: &ArrayViewD<'_, f64>,
        grid: &ChunkGrid,
        options: &ResampleOptions,
        kernel: &K,
    ) -> Result<ArrayD<f64>, WarpError> {
        if !matches!(data.ndim(), 2 | 3) {
            return Err(WarpError::UnsupportedRank(data.ndim()));
        }
        let coords = self.prepare()?;
        let source = CoordinateGrid::new(coords.src_x.view(), coords.src_y.view())?;
        let destination = CoordinateGrid::new(coords.dst_x.view(), coords.dst_y.view())?;
        resample(data, &source, &destination, grid, options, kernel)
    }
}
