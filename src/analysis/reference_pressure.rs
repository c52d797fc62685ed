//! Reference (bubble-point) pressure selection.
//!
//! Evaluated as an ordered list of fallible lookups; the first one that
//! produces a finite, positive value wins:
//!
//! 1. value for the method the service recommends
//! 2. value for the configured default method
//! 3. any available per-method value (alphabetical by method)
//! 4. value embedded in the point-value result
//!
//! If all four miss, `min(fraction × GOR, cap)` is used and logged as a
//! degraded result. Selection never fails.

use crate::config::FluidConfig;
use crate::types::{FluidCurveResponse, FluidPropertiesResponse, ReferencePressureSource};
use tracing::{debug, warn};

/// Everything the lookups may draw from.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePressureInputs<'a> {
    /// `None` when the curve call failed
    pub curve: Option<&'a FluidCurveResponse>,
    pub properties: &'a FluidPropertiesResponse,
    /// scf/stb
    pub gas_oil_ratio: f64,
    pub default_method: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReferencePressure {
    pub value: f64,
    pub source: ReferencePressureSource,
    pub method: Option<String>,
}

type Lookup = fn(&ReferencePressureInputs<'_>) -> Option<(f64, Option<String>)>;

const LOOKUP_CHAIN: [(ReferencePressureSource, Lookup); 4] = [
    (ReferencePressureSource::Recommended, recommended_method),
    (ReferencePressureSource::DefaultMethod, default_method),
    (ReferencePressureSource::AnyAvailable, any_available),
    (ReferencePressureSource::Embedded, embedded),
];

/// Run the fallback chain.
pub fn resolve_reference_pressure(
    inputs: &ReferencePressureInputs<'_>,
    cfg: &FluidConfig,
) -> ResolvedReferencePressure {
    for (source, lookup) in LOOKUP_CHAIN {
        if let Some((value, method)) = lookup(inputs) {
            debug!(%source, value, method = ?method, "reference pressure resolved");
            return ResolvedReferencePressure {
                value,
                source,
                method,
            };
        }
    }

    let value = gor_estimate(inputs.gas_oil_ratio, cfg);
    warn!(
        gor = inputs.gas_oil_ratio,
        value, "no correlation bubble point available, using GOR estimate (degraded)"
    );
    ResolvedReferencePressure {
        value,
        source: ReferencePressureSource::GorEstimate,
        method: None,
    }
}

/// Last-resort estimate `min(fraction × GOR, cap)`; non-finite GOR counts as 0.
pub fn gor_estimate(gas_oil_ratio: f64, cfg: &FluidConfig) -> f64 {
    let gor = if gas_oil_ratio.is_finite() {
        gas_oil_ratio.max(0.0)
    } else {
        0.0
    };
    (cfg.gor_estimate_fraction * gor).min(cfg.gor_estimate_cap)
}

fn usable(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

fn method_value(
    inputs: &ReferencePressureInputs<'_>,
    method: &str,
) -> Option<(f64, Option<String>)> {
    let curve = inputs.curve?;
    curve
        .metadata
        .bubble_points
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(method))
        .and_then(|(name, &v)| usable(v).map(|v| (v, Some(name.clone()))))
}

fn recommended_method(inputs: &ReferencePressureInputs<'_>) -> Option<(f64, Option<String>)> {
    let method = inputs.curve?.metadata.recommended_correlations.pb.as_deref()?;
    method_value(inputs, method)
}

fn default_method(inputs: &ReferencePressureInputs<'_>) -> Option<(f64, Option<String>)> {
    method_value(inputs, inputs.default_method)
}

fn any_available(inputs: &ReferencePressureInputs<'_>) -> Option<(f64, Option<String>)> {
    inputs
        .curve?
        .metadata
        .bubble_points
        .iter()
        .find_map(|(name, &v)| usable(v).map(|v| (v, Some(name.clone()))))
}

fn embedded(inputs: &ReferencePressureInputs<'_>) -> Option<(f64, Option<String>)> {
    inputs.properties.embedded_reference_pressure().map(|v| (v, None))
}
