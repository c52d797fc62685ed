//! Analysis orchestration
//!
//! Drives the remote fluid-property, inflow and lift-performance
//! calculations for one analysis session and derives the operating point,
//! correlation comparisons and sensitivity sweeps from them.
//!
//! ## Stages
//!
//! | Stage             | Operation                          | Needs            |
//! |-------------------|------------------------------------|------------------|
//! | Fluid properties  | `calculate_fluid_properties`       | nothing          |
//! | Inflow            | `calculate_inflow_curve`           | nothing          |
//! | Lift performance  | `calculate_lift_performance_curve` | fluid snapshot   |
//! | Comparison        | `run_correlation_comparison`       | fluid snapshot   |
//! | Sensitivity       | `run_sensitivity_analysis`         | fluid snapshot   |
//!
//! Every stage moves Idle → Running → Succeeded | Failed. A failure records
//! its message on the stage and leaves earlier results in `AnalysisState`.

mod error;
mod lift_curve;
mod orchestrator;
mod recommendation;
mod reference_pressure;
mod sensitivity;
mod state;

pub use error::AnalysisError;
pub use lift_curve::{build_lift_request, lift_curve_from_response, positive_liquid_rate};
pub use orchestrator::{AnalysisOrchestrator, ComparisonResult};
pub use recommendation::{rule_based_method, CorrelationRecommendation, RecommendationSource};
pub use reference_pressure::{
    gor_estimate, resolve_reference_pressure, ReferencePressureInputs, ResolvedReferencePressure,
};
pub use sensitivity::{
    LiftRun, SensitivityCase, SensitivityFailure, SensitivityParameter, SensitivityResult,
};
pub use state::{AnalysisState, Completeness, StageBook, StageKind, StageState, StageStatus};
