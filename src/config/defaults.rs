//! System-wide default constants.
//!
//! Numerical tolerances of the curve solver are fixed here rather than in
//! `wellperf.toml`; everything operator-tunable has a matching config field.

// ============================================================================
// Curve Intersection
// ============================================================================

/// Allowed backwards step in rate before a curve counts as non-monotonic.
pub const MONOTONIC_TOLERANCE: f64 = 1e-6;

/// Segment direction determinant below which two segments are treated as parallel.
pub const PARALLEL_DETERMINANT_EPS: f64 = 1e-10;

/// Slack on the interpolation parameters `t1, t2 ∈ [-ε, 1+ε]`.
pub const SEGMENT_PARAMETER_EPS: f64 = 1e-10;

/// Maximum disagreement between the two segment-side estimates of an intersection.
pub const INTERSECTION_AGREEMENT_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Component Strings
// ============================================================================

/// Average joint length used to derive tubing joint counts (ft).
pub const AVERAGE_JOINT_LENGTH: f64 = 30.0;

/// Component types whose count is derived from length rather than entered.
pub const JOINT_BASED_TYPES: &[&str] = &["tubing", "drill pipe", "drill_pipe"];

// ============================================================================
// Fluid Properties
// ============================================================================

/// Correlation preferred when the service does not recommend one.
pub const DEFAULT_BUBBLE_POINT_METHOD: &str = "standing";

/// Fraction of GOR used by the last-resort reference pressure estimate.
pub const GOR_ESTIMATE_FRACTION: f64 = 0.5;

/// Cap on the last-resort reference pressure estimate (psia).
pub const GOR_ESTIMATE_CAP: f64 = 5000.0;

// ============================================================================
// Lift Performance
// ============================================================================

/// Number of synthetic rate samples taken from one pressure traverse.
pub const LIFT_SAMPLE_COUNT: usize = 20;

/// Rate-fraction step between consecutive samples (0.2×, 0.4×, …).
pub const LIFT_SAMPLE_STEP: f64 = 0.2;

pub const DEFAULT_LIFT_METHOD: &str = "hagedorn_brown";

pub const DEFAULT_LIFT_MODE: &str = "production";

// ============================================================================
// Correlation Recommendation (rule-based fallback)
// ============================================================================

pub const NEAR_VERTICAL_INCLINATION_DEG: f64 = 30.0;

/// Mscf/d
pub const HIGH_GAS_RATE: f64 = 1000.0;

pub const VERTICAL_METHOD: &str = "hagedorn_brown";

pub const HIGH_GAS_METHOD: &str = "gray";

pub const FALLBACK_METHOD: &str = "beggs_brill";

// ============================================================================
// Calculation Services
// ============================================================================

pub const SERVICE_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client timeout for calculation service requests (seconds).
pub const SERVICE_HTTP_TIMEOUT_SECS: u64 = 30;
