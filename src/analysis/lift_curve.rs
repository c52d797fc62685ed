//! Lift-performance request assembly and traverse → curve conversion.

use super::error::AnalysisError;
use super::state::StageKind;
use crate::config::LiftConfig;
use crate::services::ServiceError;
use crate::types::{
    Curve, CurveRole, CurveValidationError, FluidSnapshot, GeometrySegment, LiftFluidProperties,
    LiftInputs, LiftRequest, LiftResponse, Point,
};

/// Build a lift-performance request. Fluid-derived values override any
/// caller-supplied equivalents; caller values only fill gaps the snapshot
/// cannot (non-finite entries, reservoir pressure).
///
/// Fails without a reference pressure or a positive liquid rate.
pub fn build_lift_request(
    snapshot: &FluidSnapshot,
    inputs: &LiftInputs,
    geometry: &[GeometrySegment],
    method: &str,
    cfg: &LiftConfig,
) -> Result<LiftRequest, AnalysisError> {
    let reference_pressure = snapshot.reference_pressure.ok_or_else(|| {
        AnalysisError::Precondition("fluid snapshot has no reference pressure".to_string())
    })?;

    let prefer = |fluid: f64, caller: Option<f64>| -> f64 {
        if fluid.is_finite() {
            fluid
        } else {
            caller.filter(|v| v.is_finite()).unwrap_or(0.0)
        }
    };

    let fluid_properties = LiftFluidProperties {
        oil_rate: prefer(snapshot.oil_rate, inputs.oil_rate),
        water_rate: prefer(snapshot.water_rate, inputs.water_rate),
        gas_rate: prefer(snapshot.gas_rate, inputs.gas_rate),
        oil_gravity: prefer(snapshot.oil_gravity, inputs.oil_gravity),
        gas_gravity: prefer(snapshot.gas_gravity, inputs.gas_gravity),
        water_gravity: prefer(snapshot.water_gravity, inputs.water_gravity),
        reference_pressure: prefer(reference_pressure, inputs.reference_pressure),
        temperature: Some(prefer(snapshot.temperature, inputs.temperature)),
        reservoir_pressure: inputs.reservoir_pressure,
        extra: Default::default(),
    };

    let request = LiftRequest {
        fluid_properties,
        geometry: geometry.to_vec(),
        method: method.to_string(),
        surface_pressure: inputs.surface_pressure,
        mode: inputs.mode.clone().unwrap_or_else(|| cfg.mode.clone()),
        survey_data: inputs.survey.clone(),
    };
    positive_liquid_rate(&request)?;
    Ok(request)
}

/// Liquid rate the traverse is scaled from. Must be finite and above zero.
pub fn positive_liquid_rate(request: &LiftRequest) -> Result<f64, AnalysisError> {
    let rate = request.fluid_properties.liquid_rate();
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(AnalysisError::Precondition(format!(
            "lift curve needs a positive liquid rate, got {rate}"
        )))
    }
}

/// Turn one pressure traverse into a rate/pressure curve.
///
/// The traverse is sampled at `sample_count` rate fractions
/// (`step, 2·step, …`) of the request's liquid rate, scaling the bottom-hole
/// pressure by `sqrt(fraction)`.
pub fn lift_curve_from_response(
    request: &LiftRequest,
    response: &LiftResponse,
    cfg: &LiftConfig,
    stage: StageKind,
) -> Result<Curve, AnalysisError> {
    let base_rate = positive_liquid_rate(request)?;

    let bhp = response
        .resolved_bottomhole_pressure()
        .ok_or_else(|| AnalysisError::Upstream {
            stage,
            source: ServiceError::decode("no bottom-hole pressure or pressure profile"),
        })?;

    let points = (1..=cfg.sample_count)
        .map(|i| {
            let fraction = i as f64 * cfg.sample_step;
            Point::new(base_rate * fraction, bhp * fraction.sqrt())
        })
        .collect();

    Curve::new(points).map_err(|e| {
        AnalysisError::Validation(CurveValidationError {
            curve: CurveRole::Lift,
            rule: e.rule,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProfilePoint, ReferencePressureSource};
    use chrono::Utc;

    fn cfg() -> LiftConfig {
        LiftConfig::default()
    }

    fn snapshot() -> FluidSnapshot {
        FluidSnapshot {
            oil_rate: 800.0,
            water_rate: 200.0,
            gas_rate: 400.0,
            gas_oil_ratio: 500.0,
            oil_gravity: 35.0,
            gas_gravity: 0.7,
            water_gravity: 1.05,
            temperature: 190.0,
            reference_pressure: Some(2100.0),
            reference_pressure_source: Some(ReferencePressureSource::Recommended),
            reference_method: Some("standing".into()),
            properties: Default::default(),
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn test_fluid_values_override_caller() {
        let inputs = LiftInputs {
            oil_rate: Some(5.0),
            gas_gravity: Some(0.9),
            reference_pressure: Some(1.0),
            reservoir_pressure: Some(3200.0),
            ..Default::default()
        };
        let req = build_lift_request(&snapshot(), &inputs, &[], "gray", &cfg()).unwrap();
        assert_eq!(req.fluid_properties.oil_rate, 800.0);
        assert_eq!(req.fluid_properties.gas_gravity, 0.7);
        assert_eq!(req.fluid_properties.reference_pressure, 2100.0);
        assert_eq!(req.fluid_properties.reservoir_pressure, Some(3200.0));
        assert_eq!(req.method, "gray");
        assert_eq!(req.mode, "production");
    }

    #[test]
    fn test_missing_reference_pressure_is_precondition() {
        let mut snap = snapshot();
        snap.reference_pressure = None;
        let err = build_lift_request(&snap, &LiftInputs::default(), &[], "gray", &cfg())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Precondition(_)));
    }

    #[test]
    fn test_zero_liquid_rate_is_precondition() {
        let mut snap = snapshot();
        snap.oil_rate = 0.0;
        snap.water_rate = 0.0;
        let err = build_lift_request(&snap, &LiftInputs::default(), &[], "gray", &cfg())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Precondition(_)));
    }

    #[test]
    fn test_curve_sampling() {
        let req = build_lift_request(&snapshot(), &LiftInputs::default(), &[], "gray", &cfg())
            .unwrap();
        let resp = LiftResponse {
            pressure_profile: vec![],
            bottomhole_pressure: Some(1600.0),
        };
        let curve =
            lift_curve_from_response(&req, &resp, &cfg(), StageKind::LiftPerformance).unwrap();
        assert_eq!(curve.len(), 20);
        let first = curve.first();
        let last = curve.last();
        assert!((first.rate - 200.0).abs() < 1e-9);
        assert!((first.pressure - 1600.0 * 0.2_f64.sqrt()).abs() < 1e-9);
        assert!((last.rate - 4000.0).abs() < 1e-9);
        assert!((last.pressure - 3200.0).abs() < 1e-9);
        // Fraction 1.0 reproduces the traverse itself
        let unit = curve.points()[4];
        assert!((unit.rate - 1000.0).abs() < 1e-9);
        assert!((unit.pressure - 1600.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_pressure_is_upstream_error() {
        let req = build_lift_request(&snapshot(), &LiftInputs::default(), &[], "gray", &cfg())
            .unwrap();
        let resp = LiftResponse {
            pressure_profile: vec![ProfilePoint {
                depth: f64::NAN,
                pressure: 10.0,
            }],
            bottomhole_pressure: None,
        };
        let err =
            lift_curve_from_response(&req, &resp, &cfg(), StageKind::Sensitivity).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Upstream {
                stage: StageKind::Sensitivity,
                ..
            }
        ));
    }
}
