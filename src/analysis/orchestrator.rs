//! Analysis orchestrator: sequences the remote calculations and keeps the
//! derived curves in `AnalysisState` consistent with each other.
//!
//! ## Stage Dependencies
//!
//! ```text
//! fluid properties ──► inflow ──┐
//!        │                      ├──► operating point
//!        └──► lift performance ─┘
//!                 ├──► correlation comparison
//!                 └──► sensitivity
//! ```
//!
//! Lift performance, comparison and sensitivity require a fluid snapshot with
//! a reference pressure and a positive liquid rate, and
//! fail with `AnalysisError::Precondition` before any remote call otherwise.
//! A precondition failure leaves the stage status untouched.
//! Sweeps run their iterations one after another.

use super::error::AnalysisError;
use super::lift_curve::{build_lift_request, lift_curve_from_response, positive_liquid_rate};
use super::recommendation::{rule_based_method, CorrelationRecommendation, RecommendationSource};
use super::reference_pressure::{resolve_reference_pressure, ReferencePressureInputs};
use super::sensitivity::{
    LiftRun, SensitivityCase, SensitivityFailure, SensitivityParameter, SensitivityResult,
};
use super::state::{AnalysisState, StageKind};
use crate::config::{self, EngineConfig};
use crate::curves::find_operating_point;
use crate::services::{
    FluidPropertyService, HttpCalculationClient, InflowService, LiftPerformanceService,
    ServiceError,
};
use crate::types::{
    Curve, CurveRole, CurveValidationError, FluidInputs, FluidSnapshot, GeometrySegment,
    LiftInputs, LiftRequest, OperatingPoint, RecommendationInputs,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one correlation comparison run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub curves: BTreeMap<String, Curve>,
    pub operating_points: BTreeMap<String, OperatingPoint>,
    /// Method → error message for every method that failed
    pub failures: BTreeMap<String, String>,
}

/// Coordinates the fluid, inflow and lift services for one or more sessions.
///
/// Holds no session data itself; every operation works on the
/// `AnalysisState` it is handed.
pub struct AnalysisOrchestrator {
    fluid: Arc<dyn FluidPropertyService>,
    inflow: Arc<dyn InflowService>,
    lift: Arc<dyn LiftPerformanceService>,
    config: EngineConfig,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator using the global configuration (or defaults).
    pub fn new(
        fluid: Arc<dyn FluidPropertyService>,
        inflow: Arc<dyn InflowService>,
        lift: Arc<dyn LiftPerformanceService>,
    ) -> Self {
        Self {
            fluid,
            inflow,
            lift,
            config: config::current(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// One HTTP client serving all three service roles.
    pub fn from_client(client: HttpCalculationClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Inflow
    // ========================================================================

    /// Recompute the inflow curve from the session's inflow inputs.
    ///
    /// `override_reference_pressure` replaces the input's reference pressure
    /// for this call only. If a lift curve exists the operating point is
    /// refreshed as well.
    pub async fn calculate_inflow_curve(
        &self,
        state: &mut AnalysisState,
        override_reference_pressure: Option<f64>,
    ) -> Result<Curve, AnalysisError> {
        state.stages.begin(StageKind::Inflow);
        let result = self.inflow_curve(state, override_reference_pressure).await;
        let curve = finish(state, StageKind::Inflow, result)?;

        info!(stage = %StageKind::Inflow, points = curve.len(), "inflow curve updated");
        state.inflow_curve = Some(curve.clone());
        state.completeness.inflow = true;

        if let Some(lift) = state.lift_curve.as_ref() {
            match find_operating_point(curve.points(), lift.points()) {
                Ok(op) => {
                    state.operating_point = op;
                    state.completeness.results = op.is_some();
                }
                Err(e) => warn!(error = %e, "operating point refresh skipped"),
            }
        }
        Ok(curve)
    }

    async fn inflow_curve(
        &self,
        state: &AnalysisState,
        override_reference_pressure: Option<f64>,
    ) -> Result<Curve, AnalysisError> {
        let mut inputs = state.inflow_inputs.clone();
        if let Some(pb) = override_reference_pressure {
            inputs.reference_pressure = Some(pb);
        }

        let response = self
            .inflow
            .compute_inflow(&inputs)
            .await
            .map_err(upstream(StageKind::Inflow))?;

        Curve::new(response.inflow_curve).map_err(|e| {
            AnalysisError::Validation(CurveValidationError {
                curve: CurveRole::Inflow,
                rule: e.rule,
            })
        })
    }

    // ========================================================================
    // Fluid properties
    // ========================================================================

    /// Compute fluid properties, resolve the reference pressure, then bring
    /// the inflow curve in line with it.
    ///
    /// Only the point-value call is required. If the later inflow refresh
    /// fails its error is returned, but the new snapshot stays committed.
    pub async fn calculate_fluid_properties(
        &self,
        state: &mut AnalysisState,
        inputs: FluidInputs,
    ) -> Result<FluidSnapshot, AnalysisError> {
        state.fluid_inputs = inputs.clone();
        state.stages.begin(StageKind::FluidProperties);

        let result = self.fluid_snapshot(&inputs).await;
        let snapshot = finish(state, StageKind::FluidProperties, result)?;

        state.fluid = Some(snapshot.clone());
        state.completeness.fluid = true;

        if let Some(pb) = snapshot.reference_pressure {
            state.inflow_inputs.reference_pressure = Some(pb);
            self.calculate_inflow_curve(state, Some(pb)).await?;
        }
        Ok(snapshot)
    }

    async fn fluid_snapshot(&self, inputs: &FluidInputs) -> Result<FluidSnapshot, AnalysisError> {
        let properties = self
            .fluid
            .compute_properties(inputs)
            .await
            .map_err(upstream(StageKind::FluidProperties))?;

        let curve = match self.fluid.compute_curve(inputs).await {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(error = %e, "fluid property curve unavailable, using point values only");
                None
            }
        };

        let gas_oil_ratio = properties
            .computed_gas_oil_ratio()
            .unwrap_or_else(|| inputs.gas_oil_ratio());

        let resolved = resolve_reference_pressure(
            &ReferencePressureInputs {
                curve: curve.as_ref(),
                properties: &properties,
                gas_oil_ratio,
                default_method: &self.config.fluid.default_method,
            },
            &self.config.fluid,
        );

        info!(
            stage = %StageKind::FluidProperties,
            reference_pressure = resolved.value,
            source = %resolved.source,
            "fluid properties computed"
        );

        Ok(FluidSnapshot {
            oil_rate: inputs.oil_rate,
            water_rate: inputs.water_rate,
            gas_rate: inputs.gas_rate,
            gas_oil_ratio,
            oil_gravity: inputs.oil_gravity,
            gas_gravity: inputs.gas_gravity,
            water_gravity: inputs.water_gravity,
            temperature: inputs.temperature,
            reference_pressure: Some(resolved.value),
            reference_pressure_source: Some(resolved.source),
            reference_method: resolved.method,
            properties: properties.values,
            computed_at: Utc::now(),
        })
    }

    // ========================================================================
    // Lift performance
    // ========================================================================

    /// Compute the lift curve for the committed string geometry and refresh
    /// the operating point.
    ///
    /// The lift curve and operating point are replaced together, only when
    /// both were computed.
    pub async fn calculate_lift_performance_curve(
        &self,
        state: &mut AnalysisState,
        inputs: LiftInputs,
        geometry: &[GeometrySegment],
    ) -> Result<LiftRun, AnalysisError> {
        let snapshot = require_fluid(state)?.clone();
        let method = self.lift_method(&inputs);
        let request = build_lift_request(&snapshot, &inputs, geometry, &method, &self.config.lift)?;

        state.lift_inputs = inputs;
        state.stages.begin(StageKind::LiftPerformance);
        let result = self
            .execute(request, state.inflow_curve.as_ref(), StageKind::LiftPerformance)
            .await;
        let run = finish(state, StageKind::LiftPerformance, result)?;

        info!(
            stage = %StageKind::LiftPerformance,
            method = %method,
            operating_point = ?run.operating_point,
            "lift performance curve updated"
        );
        state.lift_curve = Some(run.curve.clone());
        state.operating_point = run.operating_point;
        state.completeness.hydraulics = true;
        state.completeness.results = run.operating_point.is_some();
        Ok(run)
    }

    // ========================================================================
    // Sweeps
    // ========================================================================

    /// Run the lift calculation once per correlation method, in order.
    ///
    /// A failing method is logged and listed in `failures`; the others still
    /// run. `on_progress` receives an integer percent after every method and
    /// always ends at 100. The stage fails only when every method failed, in
    /// which case the previous comparison maps are kept.
    pub async fn run_correlation_comparison(
        &self,
        state: &mut AnalysisState,
        methods: &[String],
        geometry: &[GeometrySegment],
        mut on_progress: impl FnMut(u8) + Send,
    ) -> Result<ComparisonResult, AnalysisError> {
        let snapshot = require_fluid(state)?.clone();
        let requests = methods
            .iter()
            .map(|method| {
                build_lift_request(
                    &snapshot,
                    &state.lift_inputs,
                    geometry,
                    method,
                    &self.config.lift,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        state.stages.begin(StageKind::Comparison);

        let mut result = ComparisonResult::default();
        if methods.is_empty() {
            on_progress(100);
        }

        for (i, (method, request)) in methods.iter().zip(requests).enumerate() {
            let run = self
                .execute(request, state.inflow_curve.as_ref(), StageKind::Comparison)
                .await;

            match run {
                Ok(run) => {
                    debug!(
                        method = %method,
                        operating_point = ?run.operating_point,
                        "comparison method done"
                    );
                    if let Some(op) = run.operating_point {
                        result.operating_points.insert(method.clone(), op);
                    }
                    result.curves.insert(method.clone(), run.curve);
                }
                Err(e) => {
                    warn!(method = %method, error = %e, "comparison method failed, skipping");
                    result.failures.insert(method.clone(), e.to_string());
                }
            }

            on_progress(percent(i + 1, methods.len()));
        }

        if !methods.is_empty() && result.curves.is_empty() {
            state.stages.fail(
                StageKind::Comparison,
                format!("all {} correlation methods failed", methods.len()),
            );
            return Ok(result);
        }

        info!(
            stage = %StageKind::Comparison,
            succeeded = result.curves.len(),
            failed = result.failures.len(),
            "correlation comparison complete"
        );
        state.comparison_curves = result.curves.clone();
        state.comparison_points = result.operating_points.clone();
        state.stages.succeed(StageKind::Comparison);
        Ok(result)
    }

    /// Run a baseline lift calculation and one more per `values` entry with
    /// `parameter` perturbed.
    ///
    /// A baseline failure fails the whole sweep. Failed cases are recorded
    /// and left out of `cases`.
    pub async fn run_sensitivity_analysis(
        &self,
        state: &mut AnalysisState,
        parameter: SensitivityParameter,
        values: &[f64],
        geometry: &[GeometrySegment],
    ) -> Result<SensitivityResult, AnalysisError> {
        let snapshot = require_fluid(state)?.clone();
        let method = self.lift_method(&state.lift_inputs);
        let base_request = build_lift_request(
            &snapshot,
            &state.lift_inputs,
            geometry,
            &method,
            &self.config.lift,
        )?;
        state.stages.begin(StageKind::Sensitivity);

        let baseline = self
            .execute(base_request.clone(), state.inflow_curve.as_ref(), StageKind::Sensitivity)
            .await;
        let base_case = finish(state, StageKind::Sensitivity, baseline)?;

        let mut cases = Vec::with_capacity(values.len());
        let mut failures = Vec::new();
        for &value in values {
            let mut request = base_request.clone();
            parameter.apply(&mut request, value);

            match self
                .execute(request, state.inflow_curve.as_ref(), StageKind::Sensitivity)
                .await
            {
                Ok(run) => cases.push(SensitivityCase { value, run }),
                Err(e) => {
                    warn!(
                        parameter = %parameter,
                        value,
                        error = %e,
                        "sensitivity case failed, skipping"
                    );
                    failures.push(SensitivityFailure {
                        value,
                        error: e.to_string(),
                    });
                }
            }
        }

        let result = SensitivityResult {
            parameter,
            values: values.to_vec(),
            base_case,
            cases,
            failures,
        };

        info!(
            stage = %StageKind::Sensitivity,
            parameter = %result.parameter,
            cases = result.cases.len(),
            failed = result.failures.len(),
            "sensitivity analysis complete"
        );
        state.sensitivity = Some(result.clone());
        state.stages.succeed(StageKind::Sensitivity);
        Ok(result)
    }

    // ========================================================================
    // Recommendation
    // ========================================================================

    /// Ask the lift service for a correlation; fall back to the static rules
    /// if it fails or answers with an empty name.
    pub async fn recommend_correlation(
        &self,
        inputs: &RecommendationInputs,
    ) -> CorrelationRecommendation {
        match self.lift.recommend(inputs).await {
            Ok(resp) if !resp.method.trim().is_empty() => CorrelationRecommendation {
                method: resp.method,
                source: RecommendationSource::Service,
            },
            Ok(_) => self.rule_based(inputs, "empty method name"),
            Err(e) => self.rule_based(inputs, &e.to_string()),
        }
    }

    fn rule_based(&self, inputs: &RecommendationInputs, reason: &str) -> CorrelationRecommendation {
        let method = rule_based_method(inputs, &self.config.correlations);
        warn!(
            reason,
            method = %method,
            "recommendation service unavailable, using rule-based choice"
        );
        CorrelationRecommendation {
            method,
            source: RecommendationSource::RuleBased,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn lift_method(&self, inputs: &LiftInputs) -> String {
        inputs
            .method
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.lift.default_method.clone())
    }

    /// One lift-service call turned into a curve and, when an inflow curve
    /// is present, an operating point.
    async fn execute(
        &self,
        request: LiftRequest,
        inflow: Option<&Curve>,
        stage: StageKind,
    ) -> Result<LiftRun, AnalysisError> {
        positive_liquid_rate(&request)?;
        let response = self
            .lift
            .compute_lift_performance(&request)
            .await
            .map_err(upstream(stage))?;

        let curve = lift_curve_from_response(&request, &response, &self.config.lift, stage)?;
        let operating_point = match inflow {
            Some(inflow) => find_operating_point(inflow.points(), curve.points())?,
            None => None,
        };

        Ok(LiftRun {
            curve,
            operating_point,
            result: response,
        })
    }
}

fn upstream(stage: StageKind) -> impl FnOnce(ServiceError) -> AnalysisError {
    move |source| AnalysisError::Upstream { stage, source }
}

fn require_fluid(state: &AnalysisState) -> Result<&FluidSnapshot, AnalysisError> {
    let snapshot = state.fluid.as_ref().ok_or_else(|| {
        AnalysisError::Precondition("fluid properties have not been calculated".to_string())
    })?;
    if snapshot.reference_pressure.is_none() {
        return Err(AnalysisError::Precondition(
            "fluid properties carry no reference pressure".to_string(),
        ));
    }
    Ok(snapshot)
}

/// Record the stage outcome; errors pass through unchanged.
fn finish<T>(
    state: &mut AnalysisState,
    stage: StageKind,
    result: Result<T, AnalysisError>,
) -> Result<T, AnalysisError> {
    match result {
        Ok(v) => {
            state.stages.succeed(stage);
            Ok(v)
        }
        Err(e) => {
            warn!(stage = %stage, error = %e, "stage failed, keeping previous results");
            state.stages.fail(stage, e.to_string());
            Err(e)
        }
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done * 100) / total).min(100) as u8
}
