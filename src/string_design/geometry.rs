//! Flow-path geometry handed to the lift-performance service.

use crate::types::{ComponentRow, GeometrySegment};

/// Convert a committed layout into geometry segments, skipping rows with no
/// length.
pub fn to_geometry_segments(rows: &[ComponentRow]) -> Vec<GeometrySegment> {
    rows.iter()
        .filter(|r| r.bottom > r.top)
        .map(|r| GeometrySegment {
            top: r.top,
            bottom: r.bottom,
            inner_diameter: r.inner_diameter,
            outer_diameter: r.outer_diameter,
            component_type: r.component_type.clone(),
        })
        .collect()
}
