//! Performance-curve types: Point, Curve, OperatingPoint

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Point
// ============================================================================

/// A single sample on a performance curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Liquid rate (stb/d)
    pub rate: f64,
    /// Flowing bottom-hole pressure (psia)
    pub pressure: f64,
}

impl Point {
    pub const fn new(rate: f64, pressure: f64) -> Self {
        Self { rate, pressure }
    }

    pub fn is_finite(&self) -> bool {
        self.rate.is_finite() && self.pressure.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((rate, pressure): (f64, f64)) -> Self {
        Self { rate, pressure }
    }
}

// ============================================================================
// Curve Validation Errors
// ============================================================================

/// Which of the two curves handed to the intersector failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveRole {
    Inflow,
    Lift,
    /// Curve validated outside of an intersection (construction, deserialization)
    Standalone,
}

impl std::fmt::Display for CurveRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveRole::Inflow => write!(f, "inflow"),
            CurveRole::Lift => write!(f, "lift"),
            CurveRole::Standalone => write!(f, "curve"),
        }
    }
}

/// The rule a malformed curve broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveRule {
    #[error("needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("point {index} has a non-finite rate or pressure")]
    NonFinite { index: usize },

    #[error("rate sequence is not monotonic at point {index}")]
    NonMonotonic { index: usize },
}

/// A curve was rejected before any intersection was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{curve} curve rejected: {rule}")]
pub struct CurveValidationError {
    pub curve: CurveRole,
    pub rule: CurveRule,
}

// ============================================================================
// Curve
// ============================================================================

/// Direction of the rate axis along a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveDirection {
    Ascending,
    Descending,
}

/// Ordered, rate-monotonic sequence of at least two finite points.
///
/// Construction always validates; a `Curve` value is therefore safe to hand
/// to the intersector and the interpolator without re-checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Curve {
    points: Vec<Point>,
}

impl Curve {
    /// Validate and wrap a point sequence.
    pub fn new(points: Vec<Point>) -> Result<Self, CurveValidationError> {
        crate::curves::validate_points(&points).map_err(|rule| CurveValidationError {
            curve: CurveRole::Standalone,
            rule,
        })?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated curve; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn direction(&self) -> CurveDirection {
        if self.last().rate >= self.first().rate {
            CurveDirection::Ascending
        } else {
            CurveDirection::Descending
        }
    }

    /// (min, max) rate covered by the curve.
    pub fn rate_range(&self) -> (f64, f64) {
        let (a, b) = (self.first().rate, self.last().rate);
        (a.min(b), a.max(b))
    }
}

impl TryFrom<Vec<Point>> for Curve {
    type Error = CurveValidationError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Curve> for Vec<Point> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

impl AsRef<[Point]> for Curve {
    fn as_ref(&self) -> &[Point] {
        &self.points
    }
}

// ============================================================================
// Operating Point
// ============================================================================

/// Rate/pressure pair satisfying both the inflow and the lift curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub rate: f64,
    pub pressure: f64,
}

impl From<Point> for OperatingPoint {
    fn from(p: Point) -> Self {
        Self {
            rate: p.rate,
            pressure: p.pressure,
        }
    }
}

impl std::fmt::Display for OperatingPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} stb/d @ {:.1} psia", self.rate, self.pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_rejects_single_point() {
        let err = Curve::new(vec![Point::new(0.0, 100.0)]).unwrap_err();
        assert_eq!(err.rule, CurveRule::TooFewPoints { count: 1 });
        assert_eq!(err.curve, CurveRole::Standalone);
    }

    #[test]
    fn test_curve_direction_and_range() {
        let curve = Curve::new(vec![
            Point::new(500.0, 1000.0),
            Point::new(250.0, 2000.0),
            Point::new(0.0, 3000.0),
        ])
        .unwrap();
        assert_eq!(curve.direction(), CurveDirection::Descending);
        assert_eq!(curve.rate_range(), (0.0, 500.0));
    }

    #[test]
    fn test_curve_deserialize_validates() {
        let ok: Result<Curve, _> =
            serde_json::from_str(r#"[{"rate":0,"pressure":10},{"rate":5,"pressure":8}]"#);
        assert!(ok.is_ok());

        let bad: Result<Curve, _> = serde_json::from_str(
            r#"[{"rate":0,"pressure":10},{"rate":5,"pressure":8},{"rate":2,"pressure":7}]"#,
        );
        assert!(bad.is_err(), "non-monotonic curve must not deserialize");
    }
}
