//! Sensitivity parameters and sweep results.

use crate::types::{Curve, LiftRequest, LiftResponse, OperatingPoint};
use serde::{Deserialize, Serialize};

/// Input perturbed across a sensitivity sweep.
///
/// `WaterCut` and `Gor` redistribute rates; every other parameter is set
/// directly on the request. Unrecognised names travel to the service as
/// extra numeric fluid properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensitivityParameter {
    /// Fraction 0–1 of total liquid that is water
    WaterCut,
    /// scf/stb
    Gor,
    ReservoirPressure,
    SurfacePressure,
    OilRate,
    WaterRate,
    GasRate,
    OilGravity,
    GasGravity,
    WaterGravity,
    Temperature,
    Other(String),
}

impl SensitivityParameter {
    pub fn name(&self) -> &str {
        match self {
            Self::WaterCut => "water_cut",
            Self::Gor => "gor",
            Self::ReservoirPressure => "reservoir_pressure",
            Self::SurfacePressure => "surface_pressure",
            Self::OilRate => "oil_rate",
            Self::WaterRate => "water_rate",
            Self::GasRate => "gas_rate",
            Self::OilGravity => "oil_gravity",
            Self::GasGravity => "gas_gravity",
            Self::WaterGravity => "water_gravity",
            Self::Temperature => "temperature",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Apply one sweep value to a copy of the baseline request.
    pub fn apply(&self, request: &mut LiftRequest, value: f64) {
        let fluid = &mut request.fluid_properties;
        match self {
            Self::WaterCut => {
                let liquid = fluid.liquid_rate();
                let cut = value.clamp(0.0, 1.0);
                fluid.water_rate = liquid * cut;
                fluid.oil_rate = liquid - fluid.water_rate;
            }
            Self::Gor => fluid.gas_rate = fluid.oil_rate * value / 1000.0,
            Self::ReservoirPressure => fluid.reservoir_pressure = Some(value),
            Self::SurfacePressure => request.surface_pressure = value,
            Self::OilRate => fluid.oil_rate = value,
            Self::WaterRate => fluid.water_rate = value,
            Self::GasRate => fluid.gas_rate = value,
            Self::OilGravity => fluid.oil_gravity = value,
            Self::GasGravity => fluid.gas_gravity = value,
            Self::WaterGravity => fluid.water_gravity = value,
            Self::Temperature => fluid.temperature = Some(value),
            Self::Other(name) => {
                fluid.extra.insert(name.clone(), value);
            }
        }
    }
}

impl From<&str> for SensitivityParameter {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "water_cut" | "wc" => Self::WaterCut,
            "gor" => Self::Gor,
            "reservoir_pressure" => Self::ReservoirPressure,
            "surface_pressure" | "whp" => Self::SurfacePressure,
            "oil_rate" => Self::OilRate,
            "water_rate" => Self::WaterRate,
            "gas_rate" => Self::GasRate,
            "oil_gravity" => Self::OilGravity,
            "gas_gravity" => Self::GasGravity,
            "water_gravity" => Self::WaterGravity,
            "temperature" => Self::Temperature,
            _ => Self::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for SensitivityParameter {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<SensitivityParameter> for String {
    fn from(p: SensitivityParameter) -> Self {
        p.name().to_string()
    }
}

impl std::str::FromStr for SensitivityParameter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for SensitivityParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Results
// ============================================================================

/// One lift-performance run and what it implies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftRun {
    pub curve: Curve,
    pub operating_point: Option<OperatingPoint>,
    pub result: LiftResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCase {
    pub value: f64,
    #[serde(flatten)]
    pub run: LiftRun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityFailure {
    pub value: f64,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub parameter: SensitivityParameter,
    pub values: Vec<f64>,
    pub base_case: LiftRun,
    /// Successful cases only, in sweep order
    pub cases: Vec<SensitivityCase>,
    pub failures: Vec<SensitivityFailure>,
}
