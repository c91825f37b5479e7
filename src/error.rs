use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarpError {
    #[error("Unsupported data rank {0}: gradient search only supports 2D or 3D arrays")]
    UnsupportedRank(usize),

    #[error("Cannot resample lon/lat to lon/lat with gradient search")]
    UnsupportedProjectionPair,

    #[error("Kernel failed on chunk {chunk}: {reason}")]
    TileKernel { chunk: usize, reason: String },

    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("Resampling error: {0}")]
    Resampling(String),

    #[error("Invalid affine transform: {0}")]
    Affine(String),

    #[error("Invalid shape: {0}")]
    Shape(String),

    #[error("Array layout error: {0}")]
    Layout(#[from] ndarray::ShapeError),
}

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Transform failed: {0}")]
    TransformFailed(String),
}
