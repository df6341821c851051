//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, per-component array mismatches, unsupported intensity
//! distributions, physically overlapping layouts, rotation padding violations and
//! failures raised while running a generation job.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("component array '{field}' has length {found}, expected {expected}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unsupported intensity distribution '{tag}' (uniform, normal, lognormal, gumbel)")]
    UnsupportedDistribution { tag: String },

    #[error("layout overlap: {cells} cell(s) covered by more than one component (max count {max_count})")]
    LayoutOverlap { cells: usize, max_count: u32 },

    #[error("rotation of component {component} left {cells} cell(s) outside the cropped grid")]
    RotationBounds { component: usize, cells: usize },

    #[error("intensity sampling did not produce finite values after {attempts} attempt(s)")]
    SamplingExhausted { attempts: usize },

    #[error("sample {index} failed: {source}")]
    SampleFailed {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps `self` with the index of the sample that produced it.
    pub fn in_sample(self, index: usize) -> Self {
        Error::SampleFailed {
            index,
            source: Box::new(self),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
