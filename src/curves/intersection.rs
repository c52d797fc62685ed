//! Operating point solver: piecewise-linear intersection of an inflow curve
//! and a lift curve.
//!
//! Every segment of one curve is tested against every segment of the other
//! using the 2D cross product of their direction vectors. Parallel pairs are
//! skipped, crossings are solved with Cramer's rule, and the resulting
//! candidates are reduced to a single operating point:
//!
//! 1. sort by rate, highest first
//! 2. take the highest-rate candidate with strictly positive rate
//! 3. otherwise take the highest-rate candidate regardless of sign
//!
//! No crossing at all is a valid `Ok(None)`, distinct from a malformed input.

use super::validate_points;
use crate::config::defaults::{
    INTERSECTION_AGREEMENT_TOLERANCE, PARALLEL_DETERMINANT_EPS, SEGMENT_PARAMETER_EPS,
};
use crate::types::{CurveRole, CurveValidationError, OperatingPoint, Point};
use tracing::debug;

/// Locate the operating point of an inflow/lift curve pair.
///
/// Both inputs are validated first; a malformed curve yields a
/// `CurveValidationError` naming the curve and the rule it broke.
pub fn find_operating_point(
    inflow: &[Point],
    lift: &[Point],
) -> Result<Option<OperatingPoint>, CurveValidationError> {
    validate_points(inflow).map_err(|rule| CurveValidationError {
        curve: CurveRole::Inflow,
        rule,
    })?;
    validate_points(lift).map_err(|rule| CurveValidationError {
        curve: CurveRole::Lift,
        rule,
    })?;

    let mut candidates = Vec::new();
    for a in inflow.windows(2) {
        for b in lift.windows(2) {
            if let Some(p) = segment_intersection(a[0], a[1], b[0], b[1]) {
                candidates.push(p);
            }
        }
    }

    let selected = select_candidate(candidates);
    debug!(?selected, "operating point search complete");
    Ok(selected.map(OperatingPoint::from))
}

/// Intersection of segment `p1→p2` with segment `p3→p4`, if they cross.
fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let (d1x, d1y) = (p2.rate - p1.rate, p2.pressure - p1.pressure);
    let (d2x, d2y) = (p4.rate - p3.rate, p4.pressure - p3.pressure);

    let det = d1x * d2y - d1y * d2x;
    if det.abs() < PARALLEL_DETERMINANT_EPS {
        // Parallel or collinear: no unique crossing
        return None;
    }

    let (ox, oy) = (p3.rate - p1.rate, p3.pressure - p1.pressure);
    let t1 = (ox * d2y - oy * d2x) / det;
    let t2 = (ox * d1y - oy * d1x) / det;

    let in_range = |t: f64| (-SEGMENT_PARAMETER_EPS..=1.0 + SEGMENT_PARAMETER_EPS).contains(&t);
    if !in_range(t1) || !in_range(t2) {
        return None;
    }
    let (t1, t2) = (t1.clamp(0.0, 1.0), t2.clamp(0.0, 1.0));

    let on_first = Point::new(p1.rate + t1 * d1x, p1.pressure + t1 * d1y);
    let on_second = Point::new(p3.rate + t2 * d2x, p3.pressure + t2 * d2y);

    let disagree = (on_first.rate - on_second.rate).abs() > INTERSECTION_AGREEMENT_TOLERANCE
        || (on_first.pressure - on_second.pressure).abs() > INTERSECTION_AGREEMENT_TOLERANCE;
    if disagree {
        return Some(Point::new(
            (on_first.rate + on_second.rate) / 2.0,
            (on_first.pressure + on_second.pressure) / 2.0,
        ));
    }
    Some(on_first)
}

fn select_candidate(mut candidates: Vec<Point>) -> Option<Point> {
    candidates.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    candidates
        .iter()
        .copied()
        .find(|p| p.rate > 0.0)
        .or_else(|| candidates.first().copied())
}
