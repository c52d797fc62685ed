//! Sequential depth recalculation for an ordered component string.
//!
//! One pass, strictly in list order, carrying a running "current bottom":
//!
//! ```text
//! row 0      top = max(draft top | own top, initial top)
//! row n>0    BHA:    top = previous bottom
//!            casing: top = max(own top, prev top)
//!                                       if prev.ID > this.OD (telescoped)
//!                          previous bottom otherwise
//! bottom     explicit draft bottom → authoritative, length back-derived
//!                                    (casing, or BHA count 0: count = 1)
//!            otherwise             → top + count × length
//!                                    (joint-based tubing: top + length)
//! ```
//!
//! Invalid numbers never propagate: NaN or negative lengths and diameters
//! become 0, invalid counts become 1, and a bottom above its top is clamped
//! to the top. Nothing here returns an error.

use crate::config::defaults::AVERAGE_JOINT_LENGTH;
use crate::types::{ComponentRow, DraftOverride, RowId, StringKind};
use std::collections::HashMap;

/// Per-call settings for `recalculate`.
#[derive(Debug, Clone)]
pub struct RecalcContext {
    pub kind: StringKind,
    /// Average joint length (ft) for tubing joint counts
    pub average_joint_length: f64,
    /// Lower-cased component types whose count is derived from length
    pub joint_types: Vec<String>,
}

impl RecalcContext {
    /// Context for `kind` using the active engine configuration.
    pub fn new(kind: StringKind) -> Self {
        let cfg = crate::config::current();
        Self {
            kind,
            average_joint_length: cfg.string.average_joint_length,
            joint_types: cfg
                .string
                .joint_types
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn with_average_joint_length(mut self, length: f64) -> Self {
        self.average_joint_length = length;
        self
    }

    /// Average joint length, replaced by the default when non-positive or NaN.
    pub fn effective_joint_length(&self) -> f64 {
        if self.average_joint_length.is_finite() && self.average_joint_length > 0.0 {
            self.average_joint_length
        } else {
            AVERAGE_JOINT_LENGTH
        }
    }

    /// True for tubing-type rows of a BHA string.
    pub fn is_joint_based(&self, component_type: &str) -> bool {
        self.kind == StringKind::Bha
            && self
                .joint_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(component_type.trim()))
    }

    fn joint_count(&self, total_length: f64) -> u32 {
        let joints = (total_length / self.effective_joint_length()).ceil();
        if joints.is_finite() && joints > 0.0 {
            joints.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

/// Recompute top/bottom/length/count for every row after applying `drafts`.
///
/// Returns a new list; the input rows are left untouched and row ids are
/// preserved.
pub fn recalculate(
    rows: &[ComponentRow],
    initial_top: f64,
    drafts: &HashMap<RowId, DraftOverride>,
    ctx: &RecalcContext,
) -> Vec<ComponentRow> {
    let initial_top = non_negative(initial_top);
    let mut out: Vec<ComponentRow> = Vec::with_capacity(rows.len());
    let mut current_bottom = initial_top;

    for row in rows {
        let draft = drafts.get(&row.id);
        let mut next = merge_stable_fields(row, draft);

        let own_top = draft
            .and_then(|d| d.top)
            .unwrap_or(row.top);
        let own_top = if own_top.is_finite() {
            own_top.max(initial_top)
        } else {
            current_bottom
        };

        next.top = match (out.last(), ctx.kind) {
            (None, _) => own_top,
            (Some(_), StringKind::Bha) => current_bottom,
            (Some(prev), StringKind::Casing) => {
                if prev.inner_diameter > next.outer_diameter {
                    own_top.max(prev.top)
                } else {
                    current_bottom
                }
            }
        };

        let joint_based = ctx.is_joint_based(&next.component_type);
        let explicit_bottom = draft.and_then(|d| d.bottom).filter(|b| b.is_finite());

        match explicit_bottom {
            Some(bottom) => {
                next.bottom = bottom.max(next.top);
                let span = next.span();
                match ctx.kind {
                    StringKind::Bha if joint_based => {
                        next.length_per_unit = span;
                        next.count = ctx.joint_count(span);
                    }
                    StringKind::Bha if next.count > 0 => {
                        next.length_per_unit = span / f64::from(next.count);
                    }
                    // count × length must reproduce the bottom on the next pass
                    StringKind::Bha | StringKind::Casing => {
                        next.length_per_unit = span;
                        next.count = 1;
                    }
                }
            }
            None => {
                let run = if joint_based {
                    next.count = ctx.joint_count(next.length_per_unit);
                    next.length_per_unit
                } else {
                    f64::from(next.count) * next.length_per_unit
                };
                next.bottom = next.top + run;
            }
        }

        if !next.bottom.is_finite() || next.bottom < next.top {
            next.bottom = next.top;
        }
        current_bottom = next.bottom;
        out.push(next);
    }

    out
}

/// Apply a draft's non-depth fields and normalise numbers.
fn merge_stable_fields(row: &ComponentRow, draft: Option<&DraftOverride>) -> ComponentRow {
    let mut next = row.clone();
    if let Some(d) = draft {
        if let Some(t) = &d.component_type {
            next.component_type.clone_from(t);
        }
        if let Some(desc) = &d.description {
            next.description.clone_from(desc);
        }
        if let Some(od) = d.outer_diameter {
            next.outer_diameter = od;
        }
        if let Some(id) = d.inner_diameter {
            next.inner_diameter = id;
        }
        if let Some(len) = d.length {
            next.length_per_unit = len;
        }
        if let Some(count) = d.count {
            next.count = sanitize_count(count);
        }
    }

    next.outer_diameter = non_negative(next.outer_diameter);
    next.inner_diameter = non_negative(next.inner_diameter);
    next.length_per_unit = non_negative(next.length_per_unit);
    next
}

fn sanitize_count(count: i64) -> u32 {
    if count < 0 {
        1
    } else {
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
