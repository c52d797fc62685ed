//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse: the raw TOML is first walked as a `toml::Value` and every
//! dotted key compared against the known set, emitting "did you mean?"
//! warnings. Normal serde deserialization follows. Warnings never reject a file.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `EngineConfig`.
///
/// Maintained by hand alongside engine_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [string]
        "string",
        "string.average_joint_length",
        "string.joint_types",
        // [fluid]
        "fluid",
        "fluid.default_method",
        "fluid.gor_estimate_fraction",
        "fluid.gor_estimate_cap",
        // [lift]
        "lift",
        "lift.sample_count",
        "lift.sample_step",
        "lift.default_method",
        "lift.mode",
        // [correlations]
        "correlations",
        "correlations.inclination_threshold_deg",
        "correlations.gas_rate_threshold",
        "correlations.vertical_method",
        "correlations.high_gas_method",
        "correlations.fallback_method",
        // [services]
        "services",
        "services.base_url",
        "services.timeout_secs",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Closest known key within edit distance 3, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse raw TOML and return warnings for any unknown config keys.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed `EngineConfig`.
///
/// Returns (errors, warnings). Errors are impossible values; warnings are
/// suspicious but usable.
pub fn validate_physical_ranges(
    config: &super::EngineConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Tubing joints run 20-45 ft (range 1-3); anything outside is a unit mix-up
    let joint = config.string.average_joint_length;
    if joint.is_finite() && !(10.0..=100.0).contains(&joint) {
        warnings.push(ValidationWarning {
            field: "string.average_joint_length".to_string(),
            message: format!(
                "average_joint_length = {joint:.1} ft is outside typical range (10-100 ft)"
            ),
            suggestion: None,
        });
    }

    // Bubble point can never exceed ~10,000 psia for black oils
    let cap = config.fluid.gor_estimate_cap;
    if cap.is_finite() && cap > 15_000.0 {
        errors.push(format!(
            "fluid.gor_estimate_cap = {cap:.0} psia is outside physical range (0-15000 psia)"
        ));
    }

    // Inclination is measured from vertical
    let inc = config.correlations.inclination_threshold_deg;
    if inc.is_finite() && inc > 90.0 {
        errors.push(format!(
            "correlations.inclination_threshold_deg = {inc:.1} cannot exceed 90 degrees"
        ));
    }

    // Sampling beyond ~10x the base rate leaves the traverse's validity range
    let span = config.lift.sample_step * config.lift.sample_count as f64;
    if span.is_finite() && span > 10.0 {
        warnings.push(ValidationWarning {
            field: "lift.sample_step".to_string(),
            message: format!("lift sampling reaches {span:.1}x the base rate (typical max 4x)"),
            suggestion: None,
        });
    }

    if !config.services.base_url.starts_with("http://")
        && !config.services.base_url.starts_with("https://")
    {
        errors.push(format!(
            "services.base_url = '{}' must start with http:// or https://",
            config.services.base_url
        ));
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
