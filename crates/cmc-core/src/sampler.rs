//! Sampler dispatch.
//!
//! Sampling strategies live outside this workspace and register themselves
//! by name.

use std::collections::BTreeMap;

use cmc_model::{BinariesTable, SinglesTable};
use tracing::debug;

use crate::error::SamplerError;

/// Inputs to a sampling strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleRequest {
    /// Number of systems (singles plus binaries) to draw.
    pub size: usize,
    pub seed: Option<u64>,
    /// Strategy-specific numeric parameters.
    pub params: BTreeMap<String, f64>,
}

impl SampleRequest {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }
}

/// A strategy that draws initial tables.
pub trait Sampler {
    /// Name the strategy is registered under.
    fn name(&self) -> &str;

    fn sample(&self, request: &SampleRequest)
    -> Result<(SinglesTable, BinariesTable), SamplerError>;
}

/// Samplers keyed by name.
#[derive(Default)]
pub struct SamplerRegistry {
    samplers: BTreeMap<String, Box<dyn Sampler>>,
}

impl SamplerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sampler under its name, returning any sampler it replaces.
    pub fn register(&mut self, sampler: impl Sampler + 'static) -> Option<Box<dyn Sampler>> {
        let name = sampler.name().to_string();
        debug!(sampler = %name, "registered sampler");
        self.samplers.insert(name, Box::new(sampler))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Sampler> {
        self.samplers.get(name).map(Box::as_ref)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.samplers.keys().map(String::as_str).collect()
    }

    /// Draw tables with the named sampler.
    pub fn sample(
        &self,
        name: &str,
        request: &SampleRequest,
    ) -> Result<(SinglesTable, BinariesTable), SamplerError> {
        let sampler = self
            .get(name)
            .ok_or_else(|| SamplerError::UnknownSampler {
                name: name.to_string(),
                available: self.names().join(", "),
            })?;
        debug!(sampler = name, size = request.size, "sampling");
        sampler.sample(request)
    }
}

impl std::fmt::Debug for SamplerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerRegistry")
            .field("samplers", &self.names())
            .finish()
    }
}
