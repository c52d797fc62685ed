//! Linear pressure interpolation along a validated curve.

use crate::types::{Curve, CurveDirection, Point};

/// Pressure on `curve` at `target_rate`, by binary search for the bracketing
/// segment and linear interpolation within it.
///
/// Works for ascending and descending curves. Returns `None` when the target
/// lies outside the curve's rate range.
pub fn interpolate_pressure(target_rate: f64, curve: &Curve) -> Option<f64> {
    let (lo, hi) = curve.rate_range();
    if !target_rate.is_finite() || target_rate < lo || target_rate > hi {
        return None;
    }
    interpolate_within(target_rate, curve.points(), curve.direction())
}

fn interpolate_within(
    target_rate: f64,
    points: &[Point],
    direction: CurveDirection,
) -> Option<f64> {
    // First point at or past the target in curve order
    let idx = match direction {
        CurveDirection::Ascending => points.partition_point(|p| p.rate < target_rate),
        CurveDirection::Descending => points.partition_point(|p| p.rate > target_rate),
    };

    let upper = *points.get(idx)?;
    if idx == 0 {
        return Some(upper.pressure);
    }
    let lower = points[idx - 1];

    let dr = upper.rate - lower.rate;
    if dr.abs() <= f64::EPSILON {
        return Some(upper.pressure);
    }
    let frac = (target_rate - lower.rate) / dr;
    Some(lower.pressure + frac * (upper.pressure - lower.pressure))
}
