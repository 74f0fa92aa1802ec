//! Cluster transformations: N-body unit scaling, black hole injection and
//! sampler dispatch.

pub mod black_holes;
pub mod error;
pub mod sampler;
pub mod scaling;

pub use black_holes::{InjectionSummary, Quantities, add_black_holes};
pub use error::{InjectionError, SamplerError, ScalingError};
pub use sampler::{SampleRequest, Sampler, SamplerRegistry};
pub use scaling::{
    Energies, PARSEC_PER_RSUN, ScalingParams, ScalingReport, cluster_energies,
    scale_to_nbody_units, scaled_to_nbody_units,
};
