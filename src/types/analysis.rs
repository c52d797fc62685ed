//! Analysis inputs, service payloads and derived fluid state
//!
//! Field units follow oilfield conventions: rates in stb/d (liquids) and
//! Mscf/d (gas), pressures in psia, temperatures in °F, depths in ft.

use super::{GeometrySegment, Point};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Inflow Performance
// ============================================================================

/// Inputs to the inflow-performance service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflowInputs {
    pub reservoir_pressure: f64,
    /// Bubble-point (reference) pressure; overridden after fluid properties run.
    #[serde(default)]
    pub reference_pressure: Option<f64>,
    #[serde(default)]
    pub productivity_index: Option<f64>,
    #[serde(default)]
    pub test_rate: Option<f64>,
    #[serde(default)]
    pub test_pressure: Option<f64>,
    #[serde(default = "default_inflow_model")]
    pub model: String,
    #[serde(default = "default_inflow_points")]
    pub points: u32,
}

fn default_inflow_model() -> String {
    "vogel".to_string()
}

fn default_inflow_points() -> u32 {
    20
}

impl Default for InflowInputs {
    fn default() -> Self {
        Self {
            reservoir_pressure: 3000.0,
            reference_pressure: None,
            productivity_index: Some(1.0),
            test_rate: None,
            test_pressure: None,
            model: default_inflow_model(),
            points: default_inflow_points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflowResponse {
    pub inflow_curve: Vec<Point>,
}

// ============================================================================
// Fluid Properties (PVT)
// ============================================================================

/// Inputs to the fluid-property service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidInputs {
    pub oil_rate: f64,
    #[serde(default)]
    pub water_rate: f64,
    /// Mscf/d
    #[serde(default)]
    pub gas_rate: f64,
    /// °API
    pub oil_gravity: f64,
    pub gas_gravity: f64,
    #[serde(default = "default_water_gravity")]
    pub water_gravity: f64,
    pub temperature: f64,
    pub pressure: f64,
    /// Property → correlation name overrides
    #[serde(default)]
    pub correlations: BTreeMap<String, String>,
}

fn default_water_gravity() -> f64 {
    1.07
}

impl Default for FluidInputs {
    fn default() -> Self {
        Self {
            oil_rate: 1000.0,
            water_rate: 0.0,
            gas_rate: 500.0,
            oil_gravity: 35.0,
            gas_gravity: 0.65,
            water_gravity: default_water_gravity(),
            temperature: 180.0,
            pressure: 3000.0,
            correlations: BTreeMap::new(),
        }
    }
}

impl FluidInputs {
    /// Producing gas-oil ratio in scf/stb; zero when there is no oil rate.
    pub fn gas_oil_ratio(&self) -> f64 {
        if self.oil_rate > 0.0 && self.gas_rate.is_finite() {
            self.gas_rate * 1000.0 / self.oil_rate
        } else {
            0.0
        }
    }
}

/// Point-value result from the fluid-property service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluidPropertiesResponse {
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
    #[serde(default)]
    pub metadata: FluidPropertiesMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluidPropertiesMetadata {
    #[serde(default, alias = "pb")]
    pub bubble_point: Option<f64>,
    #[serde(default)]
    pub correlations_used: BTreeMap<String, String>,
}

impl FluidPropertiesResponse {
    /// Reference pressure carried in the point-value result itself.
    pub fn embedded_reference_pressure(&self) -> Option<f64> {
        self.metadata
            .bubble_point
            .or_else(|| self.values.get("pb").copied())
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    /// Gas-oil ratio as computed by the service, if it reported one.
    pub fn computed_gas_oil_ratio(&self) -> Option<f64> {
        self.values
            .get("gor")
            .or_else(|| self.values.get("rs"))
            .copied()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Property-vs-pressure curve result; only the metadata is consumed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluidCurveResponse {
    #[serde(default)]
    pub metadata: FluidCurveMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluidCurveMetadata {
    /// Correlation method → bubble-point pressure
    #[serde(default)]
    pub bubble_points: BTreeMap<String, f64>,
    #[serde(default)]
    pub recommended_correlations: RecommendedCorrelations,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendedCorrelations {
    #[serde(default)]
    pub pb: Option<String>,
}

/// Where the reference pressure of a fluid snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePressureSource {
    /// Value for the method the service recommends
    Recommended,
    /// Value for the configured default method
    DefaultMethod,
    /// First value available from any method
    AnyAvailable,
    /// Value embedded in the point-value result
    Embedded,
    /// `min(fraction × GOR, cap)` heuristic
    GorEstimate,
}

impl ReferencePressureSource {
    /// True when the value did not come from a correlation run.
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::GorEstimate)
    }
}

impl std::fmt::Display for ReferencePressureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Recommended => "recommended",
            Self::DefaultMethod => "default_method",
            Self::AnyAvailable => "any_available",
            Self::Embedded => "embedded",
            Self::GorEstimate => "gor_estimate",
        };
        f.write_str(s)
    }
}

/// Derived fluid state shared by every lift-performance run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidSnapshot {
    pub oil_rate: f64,
    pub water_rate: f64,
    pub gas_rate: f64,
    pub gas_oil_ratio: f64,
    pub oil_gravity: f64,
    pub gas_gravity: f64,
    pub water_gravity: f64,
    pub temperature: f64,
    pub reference_pressure: Option<f64>,
    pub reference_pressure_source: Option<ReferencePressureSource>,
    /// Correlation the reference pressure belongs to, when known
    pub reference_method: Option<String>,
    pub properties: BTreeMap<String, f64>,
    pub computed_at: DateTime<Utc>,
}

impl FluidSnapshot {
    pub fn liquid_rate(&self) -> f64 {
        self.oil_rate + self.water_rate
    }
}

// ============================================================================
// Lift Performance (VLP)
// ============================================================================

/// A directional survey station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    pub md: f64,
    pub inclination: f64,
    #[serde(default)]
    pub azimuth: f64,
}

/// Caller-supplied lift-performance inputs. Fluid fields are optional because
/// the fluid snapshot overrides them whenever it carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftInputs {
    #[serde(default)]
    pub oil_rate: Option<f64>,
    #[serde(default)]
    pub water_rate: Option<f64>,
    #[serde(default)]
    pub gas_rate: Option<f64>,
    #[serde(default)]
    pub oil_gravity: Option<f64>,
    #[serde(default)]
    pub gas_gravity: Option<f64>,
    #[serde(default)]
    pub water_gravity: Option<f64>,
    #[serde(default)]
    pub reference_pressure: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub reservoir_pressure: Option<f64>,
    /// Wellhead pressure
    #[serde(default = "default_surface_pressure")]
    pub surface_pressure: f64,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub survey: Vec<SurveyStation>,
}

fn default_surface_pressure() -> f64 {
    100.0
}

impl Default for LiftInputs {
    fn default() -> Self {
        Self {
            oil_rate: None,
            water_rate: None,
            gas_rate: None,
            oil_gravity: None,
            gas_gravity: None,
            water_gravity: None,
            reference_pressure: None,
            temperature: None,
            reservoir_pressure: None,
            surface_pressure: default_surface_pressure(),
            method: None,
            mode: None,
            survey: Vec::new(),
        }
    }
}

/// Fluid block of a lift-performance request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiftFluidProperties {
    pub oil_rate: f64,
    pub water_rate: f64,
    pub gas_rate: f64,
    pub oil_gravity: f64,
    pub gas_gravity: f64,
    pub water_gravity: f64,
    pub reference_pressure: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservoir_pressure: Option<f64>,
    /// Pass-through numeric properties (sensitivity on arbitrary names)
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl LiftFluidProperties {
    pub fn liquid_rate(&self) -> f64 {
        self.oil_rate + self.water_rate
    }
}

/// Full request to the lift-performance service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftRequest {
    pub fluid_properties: LiftFluidProperties,
    pub geometry: Vec<GeometrySegment>,
    pub method: String,
    pub surface_pressure: f64,
    pub mode: String,
    #[serde(default)]
    pub survey_data: Vec<SurveyStation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub depth: f64,
    pub pressure: f64,
}

/// Pressure traverse returned by the lift-performance service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftResponse {
    #[serde(default)]
    pub pressure_profile: Vec<ProfilePoint>,
    #[serde(default)]
    pub bottomhole_pressure: Option<f64>,
}

impl LiftResponse {
    /// Reported bottom-hole pressure, or the deepest profile sample.
    pub fn resolved_bottomhole_pressure(&self) -> Option<f64> {
        self.bottomhole_pressure
            .filter(|p| p.is_finite())
            .or_else(|| {
                self.pressure_profile
                    .iter()
                    .filter(|p| p.depth.is_finite() && p.pressure.is_finite())
                    .max_by(|a, b| a.depth.total_cmp(&b.depth))
                    .map(|p| p.pressure)
            })
    }
}

/// Inputs to the correlation recommendation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInputs {
    /// Maximum well inclination (degrees from vertical)
    pub inclination: f64,
    /// Mscf/d
    pub gas_rate: f64,
    #[serde(default)]
    pub liquid_rate: f64,
    #[serde(default)]
    pub tubing_inner_diameter: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub method: String,
}
