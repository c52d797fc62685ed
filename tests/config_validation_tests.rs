//! Config Validation Tests
//!
//! Typo detection, range validation and file loading for `EngineConfig`,
//! exercised independently from the analysis code.

use std::io::Write;
use wellperf::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use wellperf::config::{self, ConfigError, EngineConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_lift_section_warns_with_suggestion() {
    let toml_str = r#"
[lift]
sample_cont = 25
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("sample_cont"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("lift.sample_count"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[string]
average_joint_length = 31.5
joint_types = ["tubing", "drill pipe"]

[fluid]
default_method = "vasquez_beggs"
gor_estimate_fraction = 0.5
gor_estimate_cap = 4500.0

[lift]
sample_count = 20
sample_step = 0.2
default_method = "hagedorn_brown"
mode = "production"

[correlations]
inclination_threshold_deg = 25.0
gas_rate_threshold = 1200.0
vertical_method = "hagedorn_brown"
high_gas_method = "gray"
fallback_method = "beggs_brill"

[services]
base_url = "https://calc.example.net"
timeout_secs = 10
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Valid config should produce 0 warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn unknown_section_warns() {
    let warnings = validate_unknown_keys("[pvt_tables]\nrows = 4\n");
    assert!(warnings.iter().any(|w| w.field.contains("pvt_tables")));
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn known_keys_set_is_complete() {
    let toml_str = EngineConfig::default()
        .to_toml()
        .expect("Default config should serialize");
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Default config serialization should produce 0 unknown-key warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let known = known_config_keys();
    assert!(suggest_correction("zzz_completely_invalid_xyz_12345", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn default_config_is_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn inclination_over_90_is_error() {
    let mut config = EngineConfig::default();
    config.correlations.inclination_threshold_deg = 120.0;
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("inclination_threshold_deg")));
}

#[test]
fn short_joint_length_is_only_a_warning() {
    let mut config = EngineConfig::default();
    config.string.average_joint_length = 9.0;
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.iter().any(|w| w.field == "string.average_joint_length"));
    assert!(config.validate().is_ok());
}

#[test]
fn single_sample_is_rejected() {
    let mut config = EngineConfig::default();
    config.lift.sample_count = 1;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("lift.sample_count")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_applies_partial_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[string]\naverage_joint_length = 40.0\n\n[services]\ntimeout_secs = 5"
    )
    .unwrap();

    let config = EngineConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.string.average_joint_length, 40.0);
    assert_eq!(config.services.timeout_secs, 5);
    // Untouched sections keep defaults
    assert_eq!(config.lift.sample_count, 20);
    assert_eq!(config.fluid.default_method, "standing");
}

#[test]
fn load_from_file_rejects_bad_url() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[services]\nbase_url = \"calc:8000\"").unwrap();

    let err = EngineConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("services.base_url"));
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wellperf.toml");

    let mut config = EngineConfig::default();
    config.correlations.high_gas_method = "ansari".to_string();
    config.save_to_file(&path).unwrap();

    let loaded = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.correlations.high_gas_method, "ansari");
}

#[test]
fn global_config_initializes_once() {
    let mut cfg = EngineConfig::default();
    cfg.string.average_joint_length = 42.0;
    config::init(cfg);
    assert!(config::is_initialized());

    // Later calls are ignored
    config::init(EngineConfig::default());
    assert_eq!(config::get().string.average_joint_length, 42.0);
    assert_eq!(config::current().string.average_joint_length, 42.0);
}
