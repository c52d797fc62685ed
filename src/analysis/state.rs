//! Analysis session state and per-stage bookkeeping

use super::sensitivity::SensitivityResult;
use crate::types::{Curve, FluidInputs, FluidSnapshot, InflowInputs, LiftInputs, OperatingPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Stages
// ============================================================================

/// Independently tracked analysis stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Inflow,
    FluidProperties,
    LiftPerformance,
    Sensitivity,
    Comparison,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Inflow => write!(f, "inflow"),
            StageKind::FluidProperties => write!(f, "fluid properties"),
            StageKind::LiftPerformance => write!(f, "lift performance"),
            StageKind::Sensitivity => write!(f, "sensitivity"),
            StageKind::Comparison => write!(f, "correlation comparison"),
        }
    }
}

/// Idle → Running → (Succeeded | Failed), restarting at Running on the next
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub status: StageStatus,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StageState {
    pub fn is_running(&self) -> bool {
        self.status == StageStatus::Running
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageBook {
    pub inflow: StageState,
    pub fluid_properties: StageState,
    pub lift_performance: StageState,
    pub sensitivity: StageState,
    pub comparison: StageState,
}

impl StageBook {
    pub fn get(&self, stage: StageKind) -> &StageState {
        match stage {
            StageKind::Inflow => &self.inflow,
            StageKind::FluidProperties => &self.fluid_properties,
            StageKind::LiftPerformance => &self.lift_performance,
            StageKind::Sensitivity => &self.sensitivity,
            StageKind::Comparison => &self.comparison,
        }
    }

    fn get_mut(&mut self, stage: StageKind) -> &mut StageState {
        match stage {
            StageKind::Inflow => &mut self.inflow,
            StageKind::FluidProperties => &mut self.fluid_properties,
            StageKind::LiftPerformance => &mut self.lift_performance,
            StageKind::Sensitivity => &mut self.sensitivity,
            StageKind::Comparison => &mut self.comparison,
        }
    }

    pub(crate) fn begin(&mut self, stage: StageKind) {
        let s = self.get_mut(stage);
        s.status = StageStatus::Running;
        s.last_error = None;
        s.updated_at = Some(Utc::now());
    }

    pub(crate) fn succeed(&mut self, stage: StageKind) {
        let s = self.get_mut(stage);
        s.status = StageStatus::Succeeded;
        s.updated_at = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, stage: StageKind, message: impl Into<String>) {
        let s = self.get_mut(stage);
        s.status = StageStatus::Failed;
        s.last_error = Some(message.into());
        s.updated_at = Some(Utc::now());
    }

    /// Return a finished stage to Idle (e.g. once a UI has shown the outcome).
    pub fn acknowledge(&mut self, stage: StageKind) {
        let s = self.get_mut(stage);
        if !s.is_running() {
            s.status = StageStatus::Idle;
        }
    }

    pub fn any_running(&self) -> bool {
        [
            &self.inflow,
            &self.fluid_properties,
            &self.lift_performance,
            &self.sensitivity,
            &self.comparison,
        ]
        .iter()
        .any(|s| s.is_running())
    }
}

/// Which parts of the analysis have produced results this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub fluid: bool,
    pub inflow: bool,
    pub hydraulics: bool,
    pub results: bool,
}

// ============================================================================
// Analysis State
// ============================================================================

/// Working memory of one analysis session.
///
/// Owned by the caller and handed to each orchestrator operation by
/// `&mut`; a failed operation leaves previously derived data in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisState {
    pub inflow_inputs: InflowInputs,
    pub fluid_inputs: FluidInputs,
    pub lift_inputs: LiftInputs,

    pub fluid: Option<FluidSnapshot>,
    pub inflow_curve: Option<Curve>,
    pub lift_curve: Option<Curve>,
    pub operating_point: Option<OperatingPoint>,

    /// Correlation method → lift curve from the last comparison run
    pub comparison_curves: BTreeMap<String, Curve>,
    /// Correlation method → operating point from the last comparison run
    pub comparison_points: BTreeMap<String, OperatingPoint>,
    pub sensitivity: Option<SensitivityResult>,

    pub stages: StageBook,
    pub completeness: Completeness,
}

impl AnalysisState {
    pub fn new(inflow: InflowInputs, fluid: FluidInputs, lift: LiftInputs) -> Self {
        Self {
            inflow_inputs: inflow,
            fluid_inputs: fluid,
            lift_inputs: lift,
            ..Default::default()
        }
    }
}
