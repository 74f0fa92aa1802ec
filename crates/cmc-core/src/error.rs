//! Error types for scaling, injection and sampling.

use cmc_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScalingError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum InjectionError {
    /// A value that is not a finite number.
    #[error("{name}[{index}] must be a finite number, got {value}")]
    NonNumeric {
        name: &'static str,
        index: usize,
        value: f64,
    },
    #[error("{name}[{index}] must be positive, got {value}")]
    NonPositive {
        name: &'static str,
        index: usize,
        value: f64,
    },
    #[error("got {masses} masses but {radii} radii")]
    LengthMismatch { masses: usize, radii: usize },
    #[error("{name} must contain at least one value")]
    Empty { name: &'static str },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("unknown sampler '{name}', registered samplers: {available}")]
    UnknownSampler { name: String, available: String },
    #[error("invalid sample request: {message}")]
    InvalidRequest { message: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}
