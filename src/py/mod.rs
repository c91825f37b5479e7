use pyo3::prelude::*;

mod resample;

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(resample::gradient_search, m)?)?;
    Ok(())
}
