//! Curve shape checks applied before any intersection or interpolation.

use crate::config::defaults::MONOTONIC_TOLERANCE;
use crate::types::{CurveRule, Point};

/// Check that a point sequence forms a usable curve:
/// at least two points, all finite, and rate monotonic end-to-end
/// (non-decreasing or non-increasing, each step within `MONOTONIC_TOLERANCE`).
pub fn validate_points(points: &[Point]) -> Result<(), CurveRule> {
    if points.len() < 2 {
        return Err(CurveRule::TooFewPoints { count: points.len() });
    }

    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(CurveRule::NonFinite { index });
    }

    let first_violation = |ascending: bool| {
        points.windows(2).position(|w| {
            let step = w[1].rate - w[0].rate;
            if ascending {
                step < -MONOTONIC_TOLERANCE
            } else {
                step > MONOTONIC_TOLERANCE
            }
        })
    };

    match (first_violation(true), first_violation(false)) {
        (None, _) | (_, None) => Ok(()),
        // Report the later break: the direction that held longer is the intended one
        (Some(a), Some(d)) => Err(CurveRule::NonMonotonic { index: a.max(d) + 1 }),
    }
}
