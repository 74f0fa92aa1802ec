//! Error types for cluster file output.

use std::path::PathBuf;

use cmc_core::ScalingError;
use cmc_fits::FitsError;
use cmc_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(
        "file extension not recognized, valid file types are fits and hdf5: {}",
        path.display()
    )]
    UnrecognizedExtension { path: PathBuf },

    #[error("metallicity is not set; pass it as an override or record it on the singles table")]
    MissingMetallicity,

    #[error("table is in N-body units but the cluster mass is unknown")]
    ScaledWithoutClusterMass,

    #[error("HDF5 support is not compiled in (enable the `hdf5` feature)")]
    Hdf5Unavailable,

    #[error("invalid cluster layout: {message}")]
    InvalidLayout { message: String },

    #[error("missing table {name}")]
    MissingTable { name: String },

    #[error("missing header keyword {keyword}")]
    MissingHeaderKeyword { keyword: String },

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Scaling(#[from] ScalingError),

    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[cfg(feature = "hdf5")]
    #[error("hdf5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

impl OutputError {
    pub fn invalid_layout(message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            message: message.into(),
        }
    }

    pub fn missing_keyword(keyword: impl Into<String>) -> Self {
        Self::MissingHeaderKeyword {
            keyword: keyword.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
