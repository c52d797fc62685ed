//! Editable component string: dense ordered rows plus a side map of pending
//! drafts keyed by row id.
//!
//! Edits follow a two-phase cycle. `stage_draft` only records the patch;
//! `preview` shows the recalculated layout without touching the rows;
//! `commit` runs the recalculation, replaces the rows and clears the drafts.

use super::geometry::to_geometry_segments;
use super::recalculator::{recalculate, RecalcContext};
use super::validation::validate_string;
use crate::types::{ComponentRow, DraftOverride, GeometrySegment, RowId, StringKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentString {
    kind: StringKind,
    initial_top: f64,
    rows: Vec<ComponentRow>,
    #[serde(skip)]
    drafts: HashMap<RowId, DraftOverride>,
}

impl ComponentString {
    pub fn new(kind: StringKind, initial_top: f64) -> Self {
        Self::from_rows(kind, initial_top, Vec::new())
    }

    pub fn from_rows(kind: StringKind, initial_top: f64, rows: Vec<ComponentRow>) -> Self {
        Self {
            kind,
            initial_top,
            rows,
            drafts: HashMap::new(),
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn initial_top(&self) -> f64 {
        self.initial_top
    }

    pub fn rows(&self) -> &[ComponentRow] {
        &self.rows
    }

    pub fn row(&self, id: &RowId) -> Option<&ComponentRow> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn drafts(&self) -> &HashMap<RowId, DraftOverride> {
        &self.drafts
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.drafts.is_empty()
    }

    /// Deepest committed bottom, or the string's starting depth when empty.
    pub fn bottom_depth(&self) -> f64 {
        self.rows.last().map_or(self.initial_top, |r| r.bottom)
    }

    /// Append a blank row hanging from the current bottom.
    pub fn add_row(&mut self, component_type: &str) -> RowId {
        let id = RowId::generate();
        let mut row = ComponentRow::new(id.clone(), component_type);
        row.top = self.bottom_depth();
        row.bottom = row.top;
        debug!(row = %id, kind = %self.kind, "component row added");
        self.rows.push(row);
        id
    }

    /// Remove a row and any draft pending against it.
    pub fn remove_row(&mut self, id: &RowId) -> Option<ComponentRow> {
        let idx = self.rows.iter().position(|r| &r.id == id)?;
        self.drafts.remove(id);
        Some(self.rows.remove(idx))
    }

    /// Record a patch for a row. Unknown ids are ignored.
    pub fn stage_draft(&mut self, id: &RowId, patch: DraftOverride) -> bool {
        if self.row(id).is_none() {
            warn!(row = %id, "draft for unknown component row ignored");
            return false;
        }
        if patch.is_empty() {
            return true;
        }
        self.drafts.entry(id.clone()).or_default().merge(patch);
        true
    }

    pub fn discard_drafts(&mut self) {
        self.drafts.clear();
    }

    pub fn context(&self) -> RecalcContext {
        RecalcContext::new(self.kind)
    }

    /// Layout the rows would have if the pending drafts were committed.
    pub fn preview(&self, ctx: &RecalcContext) -> Vec<ComponentRow> {
        recalculate(&self.rows, self.initial_top, &self.drafts, ctx)
    }

    /// Apply pending drafts with the configured context.
    pub fn commit(&mut self) -> &[ComponentRow] {
        let ctx = self.context();
        self.commit_with(&ctx)
    }

    pub fn commit_with(&mut self, ctx: &RecalcContext) -> &[ComponentRow] {
        self.rows = self.preview(ctx);
        self.drafts.clear();
        debug!(
            kind = %self.kind,
            rows = self.rows.len(),
            bottom = self.bottom_depth(),
            "component string committed"
        );
        &self.rows
    }

    pub fn validate(&self) -> Vec<String> {
        validate_string(&self.rows)
    }

    pub fn geometry(&self) -> Vec<GeometrySegment> {
        to_geometry_segments(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(kind: StringKind) -> RecalcContext {
        RecalcContext {
            kind,
            average_joint_length: 30.0,
            joint_types: vec!["tubing".to_string()],
        }
    }

    #[test]
    fn test_add_row_hangs_from_bottom() {
        let mut string = ComponentString::new(StringKind::Bha, 100.0);
        let first = string.add_row("collar");
        assert_eq!(string.row(&first).unwrap().top, 100.0);

        string.stage_draft(
            &first,
            DraftOverride {
                length: Some(30.0),
                ..Default::default()
            },
        );
        string.commit_with(&ctx(StringKind::Bha));
        assert_eq!(string.bottom_depth(), 130.0);

        let second = string.add_row("bit");
        assert_eq!(string.row(&second).unwrap().top, 130.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_preview_does_not_commit() {
        let mut string = ComponentString::new(StringKind::Bha, 0.0);
        let id = string.add_row("collar");
        string.stage_draft(
            &id,
            DraftOverride {
                length: Some(10.0),
                count: Some(3),
                ..Default::default()
            },
        );
        let preview = string.preview(&ctx(StringKind::Bha));
        assert_eq!(preview[0].bottom, 30.0);
        assert_eq!(string.rows()[0].bottom, 0.0);
        assert!(string.has_pending_edits());

        string.commit_with(&ctx(StringKind::Bha));
        assert_eq!(string.rows()[0].bottom, 30.0);
        assert!(!string.has_pending_edits());
    }

    #[test]
    fn test_drafts_merge_until_commit() {
        let mut string = ComponentString::new(StringKind::Casing, 0.0);
        let id = string.add_row("casing");
        string.stage_draft(
            &id,
            DraftOverride {
                length: Some(500.0),
                ..Default::default()
            },
        );
        string.stage_draft(
            &id,
            DraftOverride {
                outer_diameter: Some(9.625),
                ..Default::default()
            },
        );
        let draft = &string.drafts()[&id];
        assert_eq!(draft.length, Some(500.0));
        assert_eq!(draft.outer_diameter, Some(9.625));
    }

    #[test]
    fn test_remove_row_drops_draft() {
        let mut string = ComponentString::new(StringKind::Bha, 0.0);
        let id = string.add_row("collar");
        string.stage_draft(
            &id,
            DraftOverride {
                length: Some(10.0),
                ..Default::default()
            },
        );
        assert!(string.remove_row(&id).is_some());
        assert!(string.rows().is_empty());
        assert!(!string.has_pending_edits());
        assert!(string.remove_row(&id).is_none());
    }

    #[test]
    fn test_discard_keeps_committed_rows() {
        let mut string = ComponentString::new(StringKind::Bha, 0.0);
        let id = string.add_row("collar");
        string.stage_draft(
            &id,
            DraftOverride {
                length: Some(10.0),
                ..Default::default()
            },
        );
        string.discard_drafts();
        assert!(!string.has_pending_edits());
        string.commit_with(&ctx(StringKind::Bha));
        assert_eq!(string.rows()[0].bottom, 0.0);
    }

    #[test]
    fn test_unknown_row_draft_ignored() {
        let mut string = ComponentString::new(StringKind::Bha, 0.0);
        assert!(!string.stage_draft(&RowId::from("ghost"), DraftOverride::default()));
        assert!(!string.has_pending_edits());
    }
}
