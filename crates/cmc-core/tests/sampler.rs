//! Integration tests for sampler dispatch.

use cmc_core::{SampleRequest, Sampler, SamplerError, SamplerRegistry};
use cmc_model::{BinariesTable, SinglesArrays, SinglesTable};

/// Places `size` unit-mass stars on a line.
struct LineSampler;

impl Sampler for LineSampler {
    fn name(&self) -> &str {
        "line"
    }

    fn sample(
        &self,
        request: &SampleRequest,
    ) -> Result<(SinglesTable, BinariesTable), SamplerError> {
        let n = request.size;
        let spacing = request.param("spacing").unwrap_or(1.0);
        let singles = SinglesTable::from_arrays(SinglesArrays {
            id: (1..=n as i64).collect(),
            k: vec![1; n],
            m: vec![1.0; n],
            reff: vec![1.0; n],
            r: (1..=n).map(|i| i as f64 * spacing).collect(),
            vr: vec![0.1; n],
            vt: vec![0.1; n],
            binind: vec![0; n],
        })?;
        Ok((singles, BinariesTable::empty()?))
    }
}

#[test]
fn dispatches_by_name() {
    let mut registry = SamplerRegistry::new();
    assert!(registry.register(LineSampler).is_none());
    assert_eq!(registry.names(), vec!["line"]);

    let request = SampleRequest::new(4).with_seed(7).with_param("spacing", 0.5);
    let (singles, binaries) = registry.sample("line", &request).unwrap();
    assert_eq!(singles.height(), 4);
    assert!(binaries.is_empty());
    assert_eq!(singles.f64_column("r").unwrap()[3], 2.0);
}

#[test]
fn unknown_sampler_lists_available() {
    let mut registry = SamplerRegistry::new();
    registry.register(LineSampler);

    let err = registry
        .sample("multidim", &SampleRequest::new(10))
        .unwrap_err();
    match err {
        SamplerError::UnknownSampler { name, available } => {
            assert_eq!(name, "multidim");
            assert_eq!(available, "line");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn register_replaces_existing() {
    let mut registry = SamplerRegistry::new();
    registry.register(LineSampler);
    assert!(registry.register(LineSampler).is_some());
    assert!(registry.get("line").is_some());
    assert_eq!(registry.names().len(), 1);
}
