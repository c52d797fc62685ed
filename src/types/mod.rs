//! Shared data structures for well performance analysis
//!
//! - `curve`: Point, Curve, OperatingPoint and curve validation errors
//! - `component`: ComponentRow, DraftOverride, StringKind, GeometrySegment
//! - `analysis`: service inputs/outputs and the derived fluid snapshot

mod analysis;
mod component;
mod curve;

pub use analysis::*;
pub use component::*;
pub use curve::*;
