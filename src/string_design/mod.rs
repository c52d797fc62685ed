//! Component string design: casing programs and bottom-hole assemblies
//!
//! - `recalculator`: one-pass depth propagation under pending drafts
//! - `validation`: diameter and overlap diagnostics
//! - `editor`: `ComponentString`, the add/edit/commit/remove lifecycle
//! - `geometry`: export of a committed layout as flow-path segments

mod editor;
mod geometry;
mod recalculator;
mod validation;

pub use editor::ComponentString;
pub use geometry::to_geometry_segments;
pub use recalculator::{recalculate, RecalcContext};
pub use validation::validate_string;
