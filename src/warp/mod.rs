pub mod engine;
pub mod reduce;

pub use engine::{resample, resample_default, ResampleOptions, ResamplePlan};
