pub mod affine;
pub mod chunk;
pub mod coords;
pub mod error;
pub mod gradient;
pub mod kernel;
pub mod proj;
pub mod resample;
pub mod resampler;
pub mod warp;
#[cfg(feature = "python")]
mod py;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
