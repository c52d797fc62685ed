//! wellperf: Well Performance Analysis Core
//!
//! Nodal-analysis building blocks for a production well.
//!
//! ## Architecture
//!
//! - **Curves**: inflow/lift curve validation, interpolation and operating-point intersection
//! - **String Design**: casing/BHA component depth layout, diagnostics and geometry export
//! - **Services**: async traits and an HTTP client for the remote PVT, IPR and VLP calculations
//! - **Analysis**: session state and the orchestrator that sequences the remote stages

pub mod analysis;
pub mod config;
pub mod curves;
pub mod services;
pub mod string_design;
pub mod types;

// Re-export configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    ComponentRow, Curve, CurveValidationError, DraftOverride, GeometrySegment, OperatingPoint,
    Point, RowId, StringKind,
};

// Re-export core operations
pub use analysis::{AnalysisError, AnalysisOrchestrator, AnalysisState, SensitivityParameter};
pub use curves::{find_operating_point, interpolate_pressure};
pub use services::{HttpCalculationClient, ServiceError};
pub use string_design::{
    recalculate, to_geometry_segments, validate_string, ComponentString, RecalcContext,
};
