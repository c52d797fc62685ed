//! Engine Configuration - operator-tunable analysis defaults as TOML values
//!
//! Each struct implements `Default` with values matching `config::defaults`,
//! so running without a config file behaves exactly like the built-in values.

use super::defaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "WELLPERF_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "wellperf.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$WELLPERF_CONFIG` env var
/// 2. `./wellperf.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Component string recalculation
    #[serde(default)]
    pub string: StringConfig,

    /// Fluid-property reference pressure selection
    #[serde(default)]
    pub fluid: FluidConfig,

    /// Lift-performance curve sampling
    #[serde(default)]
    pub lift: LiftConfig,

    /// Rule-based correlation recommendation
    #[serde(default)]
    pub correlations: CorrelationConfig,

    /// Remote calculation services
    #[serde(default)]
    pub services: ServiceConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLPERF_CONFIG` environment variable
    /// 2. `./wellperf.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "Failed to load config from {}, falling back",
                            CONFIG_ENV_VAR
                        );
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Two-pass: unknown keys only warn
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Engine config saved");
        Ok(())
    }

    /// Validate values for internal consistency.
    ///
    /// Rules:
    /// - All numeric values must be finite
    /// - Divisors and sample counts must be positive
    /// - Method names must be non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_positive(
            self.string.average_joint_length,
            "string.average_joint_length",
            &mut errors,
        );
        Self::check_positive(
            self.fluid.gor_estimate_fraction,
            "fluid.gor_estimate_fraction",
            &mut errors,
        );
        Self::check_positive(self.fluid.gor_estimate_cap, "fluid.gor_estimate_cap", &mut errors);
        Self::check_positive(self.lift.sample_step, "lift.sample_step", &mut errors);
        Self::check_positive(
            self.correlations.inclination_threshold_deg,
            "correlations.inclination_threshold_deg",
            &mut errors,
        );
        Self::check_positive(
            self.correlations.gas_rate_threshold,
            "correlations.gas_rate_threshold",
            &mut errors,
        );

        if self.lift.sample_count < 2 {
            errors.push(format!(
                "lift.sample_count ({}) must be >= 2 to form a curve",
                self.lift.sample_count
            ));
        }
        if self.services.timeout_secs == 0 {
            errors.push("services.timeout_secs must be > 0".to_string());
        }

        for (name, value) in [
            ("fluid.default_method", &self.fluid.default_method),
            ("lift.default_method", &self.lift.default_method),
            ("lift.mode", &self.lift.mode),
            ("correlations.vertical_method", &self.correlations.vertical_method),
            ("correlations.high_gas_method", &self.correlations.high_gas_method),
            ("correlations.fallback_method", &self.correlations.fallback_method),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so test finiteness first
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
        } else if value <= 0.0 {
            errors.push(format!("{name} ({value}) must be > 0"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// String Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringConfig {
    /// Average tubing joint length (ft) for joint count derivation
    #[serde(default = "default_average_joint_length")]
    pub average_joint_length: f64,

    /// Component types (case-insensitive) whose count is derived from length
    #[serde(default = "default_joint_types")]
    pub joint_types: Vec<String>,
}

fn default_average_joint_length() -> f64 {
    defaults::AVERAGE_JOINT_LENGTH
}

fn default_joint_types() -> Vec<String> {
    defaults::JOINT_BASED_TYPES.iter().map(|s| (*s).to_string()).collect()
}

impl Default for StringConfig {
    fn default() -> Self {
        Self {
            average_joint_length: default_average_joint_length(),
            joint_types: default_joint_types(),
        }
    }
}

// ============================================================================
// Fluid Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Bubble-point correlation preferred when the service recommends none
    #[serde(default = "default_bubble_point_method")]
    pub default_method: String,

    #[serde(default = "default_gor_estimate_fraction")]
    pub gor_estimate_fraction: f64,

    /// psia
    #[serde(default = "default_gor_estimate_cap")]
    pub gor_estimate_cap: f64,
}

fn default_bubble_point_method() -> String {
    defaults::DEFAULT_BUBBLE_POINT_METHOD.to_string()
}

fn default_gor_estimate_fraction() -> f64 {
    defaults::GOR_ESTIMATE_FRACTION
}

fn default_gor_estimate_cap() -> f64 {
    defaults::GOR_ESTIMATE_CAP
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            default_method: default_bubble_point_method(),
            gor_estimate_fraction: default_gor_estimate_fraction(),
            gor_estimate_cap: default_gor_estimate_cap(),
        }
    }
}

// ============================================================================
// Lift Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftConfig {
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    #[serde(default = "default_sample_step")]
    pub sample_step: f64,

    /// Correlation used when the caller names none
    #[serde(default = "default_lift_method")]
    pub default_method: String,

    #[serde(default = "default_lift_mode")]
    pub mode: String,
}

fn default_sample_count() -> usize {
    defaults::LIFT_SAMPLE_COUNT
}

fn default_sample_step() -> f64 {
    defaults::LIFT_SAMPLE_STEP
}

fn default_lift_method() -> String {
    defaults::DEFAULT_LIFT_METHOD.to_string()
}

fn default_lift_mode() -> String {
    defaults::DEFAULT_LIFT_MODE.to_string()
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            sample_step: default_sample_step(),
            default_method: default_lift_method(),
            mode: default_lift_mode(),
        }
    }
}

// ============================================================================
// Correlation Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Below this inclination (deg) the well counts as near-vertical
    #[serde(default = "default_inclination_threshold")]
    pub inclination_threshold_deg: f64,

    /// Above this gas rate (Mscf/d) the high-gas method is chosen
    #[serde(default = "default_gas_rate_threshold")]
    pub gas_rate_threshold: f64,

    #[serde(default = "default_vertical_method")]
    pub vertical_method: String,

    #[serde(default = "default_high_gas_method")]
    pub high_gas_method: String,

    #[serde(default = "default_fallback_method")]
    pub fallback_method: String,
}

fn default_inclination_threshold() -> f64 {
    defaults::NEAR_VERTICAL_INCLINATION_DEG
}

fn default_gas_rate_threshold() -> f64 {
    defaults::HIGH_GAS_RATE
}

fn default_vertical_method() -> String {
    defaults::VERTICAL_METHOD.to_string()
}

fn default_high_gas_method() -> String {
    defaults::HIGH_GAS_METHOD.to_string()
}

fn default_fallback_method() -> String {
    defaults::FALLBACK_METHOD.to_string()
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            inclination_threshold_deg: default_inclination_threshold(),
            gas_rate_threshold: default_gas_rate_threshold(),
            vertical_method: default_vertical_method(),
            high_gas_method: default_high_gas_method(),
            fallback_method: default_fallback_method(),
        }
    }
}

// ============================================================================
// Service Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the calculation services.
    ///
    /// Can be overridden by `WELLPERF_SERVICE_URL` or `--service-url`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    defaults::SERVICE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    defaults::SERVICE_HTTP_TIMEOUT_SECS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: EngineConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.string.average_joint_length, 30.0);
        assert_eq!(config.fluid.default_method, "standing");
        assert_eq!(config.fluid.gor_estimate_cap, 5000.0);
        assert_eq!(config.lift.sample_count, 20);
        assert_eq!(config.correlations.inclination_threshold_deg, 30.0);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[string]
average_joint_length = 40.0

[correlations]
high_gas_method = "ansari"
"#;
        let config: EngineConfig = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.string.average_joint_length, 40.0);
        assert_eq!(config.correlations.high_gas_method, "ansari");
        // Non-overridden values retain defaults
        assert_eq!(config.string.joint_types.len(), 3);
        assert_eq!(config.correlations.vertical_method, "hagedorn_brown");
    }

    #[test]
    fn test_validation_catches_zero_joint_length() {
        let mut config = EngineConfig::default();
        config.string.average_joint_length = 0.0;
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("average_joint_length")));
        }
    }

    #[test]
    fn test_validation_catches_nan() {
        let mut config = EngineConfig::default();
        config.fluid.gor_estimate_fraction = f64::NAN;
        assert!(config.validate().is_err(), "NaN fraction must be rejected");
    }

    #[test]
    fn test_validation_catches_single_sample() {
        let mut config = EngineConfig::default();
        config.lift.sample_count = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_empty_method() {
        let mut config = EngineConfig::default();
        config.correlations.fallback_method = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let original = EngineConfig::default();
        let toml_str = original.to_toml().expect("serialization should work");
        assert!(toml_str.contains("[string]"));
        assert!(toml_str.contains("[services]"));
        let roundtripped: EngineConfig =
            toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(original.lift.sample_step, roundtripped.lift.sample_step);
        assert_eq!(original.services.base_url, roundtripped.services.base_url);
    }
}
