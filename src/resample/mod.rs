//! Point samplers used by the gradient-search kernel.

pub mod bilinear;
pub mod nearest;

/// Interpolation applied once a destination pixel has been located in the source tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResamplingMethod {
    Nearest,
    #[default]
    Bilinear,
}

impl ResamplingMethod {
    /// Parse from a string name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nearest" | "nn" => Some(Self::Nearest),
            "bilinear" => Some(Self::Bilinear),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
        }
    }
}
