//! String design integration tests
//!
//! Depth recalculation, diagnostics and the editing lifecycle for casing
//! programs and bottom-hole assemblies.

use std::collections::HashMap;
use wellperf::types::{ComponentRow, DraftOverride, RowId, StringKind};
use wellperf::{recalculate, to_geometry_segments, validate_string, ComponentString, RecalcContext};

fn ctx(kind: StringKind) -> RecalcContext {
    RecalcContext {
        kind,
        average_joint_length: 30.0,
        joint_types: vec!["tubing".into(), "drill pipe".into(), "drill_pipe".into()],
    }
}

fn row(id: &str, ty: &str, count: u32, len: f64, od: f64, inner: f64) -> ComponentRow {
    ComponentRow::new(RowId::from(id), ty).with_geometry(count, len, od, inner)
}

fn casing_program() -> Vec<ComponentRow> {
    vec![
        row("conductor", "conductor", 1, 120.0, 20.0, 19.0),
        row("surface", "casing", 40, 40.0, 13.375, 12.415).with_top(0.0),
        row("intermediate", "casing", 1, 3000.0, 9.625, 8.681).with_top(1500.0),
        row("production", "casing", 2, 2500.0, 7.0, 6.184).with_top(4000.0),
    ]
}

#[test]
fn bha_example_stacks_rows() {
    let rows = vec![
        row("collar", "drill collar", 2, 15.0, 6.5, 2.8125),
        row("bit", "bit", 1, 10.0, 8.5, 0.0),
    ];
    let out = recalculate(&rows, 0.0, &HashMap::new(), &ctx(StringKind::Bha));
    assert_eq!(out[0].bottom, 30.0);
    assert_eq!(out[1].top, 30.0);
    assert_eq!(out[1].bottom, 40.0);
}

#[test]
fn casing_telescopes_inside_previous_bore() {
    let rows = vec![
        row("a", "casing", 1, 1000.0, 5.5, 5.0).with_top(0.0),
        row("b", "liner", 1, 800.0, 4.5, 3.958).with_top(750.0),
    ];
    let out = recalculate(&rows, 0.0, &HashMap::new(), &ctx(StringKind::Casing));
    assert_eq!(out[1].top, 750.0, "liner hangs from its own top, not A's bottom");
    assert_eq!(out[1].bottom, 1550.0);
}

#[test]
fn telescoped_row_without_top_hangs_from_previous_top() {
    let rows = vec![
        row("a", "casing", 1, 1000.0, 5.5, 5.0).with_top(200.0),
        row("b", "liner", 1, 800.0, 4.5, 3.958),
    ];
    let out = recalculate(&rows, 0.0, &HashMap::new(), &ctx(StringKind::Casing));
    assert_eq!(out[0].bottom, 1200.0);
    assert_eq!(out[1].top, 200.0, "liner starts at A's top, not A's bottom");
    assert_eq!(out[1].bottom, 1000.0);
}

#[test]
fn casing_draft_bottom_is_stable_across_commits() {
    let casing = ctx(StringKind::Casing);
    let mut string = ComponentString::from_rows(
        StringKind::Casing,
        0.0,
        vec![
            row("a", "casing", 3, 40.0, 9.625, 8.5),
            row("b", "casing", 1, 200.0, 9.625, 8.5),
        ],
    );
    string.stage_draft(
        &RowId::from("a"),
        DraftOverride {
            bottom: Some(100.0),
            ..Default::default()
        },
    );
    let once = string.commit_with(&casing).to_vec();

    // an unrelated edit must not move the committed shoe
    string.stage_draft(
        &RowId::from("b"),
        DraftOverride {
            description: Some("production".into()),
            ..Default::default()
        },
    );
    let twice = string.commit_with(&casing);
    assert_eq!(twice[0], once[0]);
    assert_eq!(twice[0].bottom, 100.0);
    assert_eq!(twice[1].top, 100.0);
    assert_eq!(twice[1].bottom, 300.0);
}

#[test]
fn recalculate_is_idempotent() {
    let no_drafts = HashMap::new();
    for kind in [StringKind::Casing, StringKind::Bha] {
        let once = recalculate(&casing_program(), 0.0, &no_drafts, &ctx(kind));
        let twice = recalculate(&once, 0.0, &no_drafts, &ctx(kind));
        assert_eq!(once, twice, "{kind} pass is not idempotent");
    }
}

#[test]
fn idempotent_after_draft_applied() {
    let rows = vec![
        row("tbg", "Tubing", 0, 0.0, 3.5, 2.992),
        row("pkr", "packer", 1, 8.0, 5.9, 2.9),
    ];
    let mut drafts = HashMap::new();
    drafts.insert(
        RowId::from("tbg"),
        DraftOverride {
            length: Some(6000.0),
            ..Default::default()
        },
    );
    let bha = ctx(StringKind::Bha);
    let once = recalculate(&rows, 0.0, &drafts, &bha);
    assert_eq!(once[0].count, 200);
    assert_eq!(once[1].top, 6000.0);

    let twice = recalculate(&once, 0.0, &HashMap::new(), &bha);
    assert_eq!(once, twice);
}

#[test]
fn draft_bottom_on_first_row_shifts_followers() {
    let rows = vec![
        row("collar", "drill collar", 3, 30.0, 6.5, 2.8125),
        row("mwd", "mwd", 1, 35.0, 6.75, 3.0),
    ];
    let mut drafts = HashMap::new();
    drafts.insert(
        RowId::from("collar"),
        DraftOverride {
            bottom: Some(120.0),
            ..Default::default()
        },
    );
    let out = recalculate(&rows, 0.0, &drafts, &ctx(StringKind::Bha));
    assert_eq!(out[0].length_per_unit, 40.0);
    assert_eq!(out[1].top, 120.0);
    assert_eq!(out[1].bottom, 155.0);
}

#[test]
fn validate_reports_nothing_for_contiguous_string() {
    let out = recalculate(&casing_program(), 0.0, &HashMap::new(), &ctx(StringKind::Bha));
    assert!(validate_string(&out).is_empty(), "{:?}", validate_string(&out));
}

#[test]
fn telescoped_program_reports_forward_overlaps() {
    // Each inner string overlaps the one above it and cannot contain its OD
    let out = recalculate(&casing_program(), 0.0, &HashMap::new(), &ctx(StringKind::Casing));
    let messages = validate_string(&out);
    assert!(!messages.is_empty());
    assert!(messages.iter().all(|m| m.contains("overlaps")));
}

#[test]
fn validate_flags_inverted_diameters_and_bad_overlap() {
    let mut bad = row("bad", "casing", 1, 100.0, 4.0, 5.0);
    bad.bottom = 100.0;
    assert_eq!(validate_string(&[bad]).len(), 1);

    let mut upper = row("upper", "casing", 1, 0.0, 9.625, 8.681);
    upper.bottom = 2000.0;
    let mut lower = row("lower", "casing", 1, 0.0, 9.625, 8.5);
    lower.top = 1800.0;
    lower.bottom = 3000.0;
    let messages = validate_string(&[upper, lower]);
    assert_eq!(messages.len(), 1);
}

#[test]
fn editor_lifecycle_produces_geometry() {
    let mut string = ComponentString::new(StringKind::Bha, 0.0);
    let tubing = string.add_row("tubing");
    let pump = string.add_row("esp");

    string.stage_draft(
        &tubing,
        DraftOverride {
            length: Some(4500.0),
            outer_diameter: Some(2.875),
            inner_diameter: Some(2.441),
            ..Default::default()
        },
    );
    string.stage_draft(
        &pump,
        DraftOverride {
            length: Some(60.0),
            outer_diameter: Some(4.0),
            inner_diameter: Some(2.0),
            ..Default::default()
        },
    );
    assert!(string.has_pending_edits());

    string.commit_with(&ctx(StringKind::Bha));
    assert!(!string.has_pending_edits());
    assert_eq!(string.bottom_depth(), 4560.0);
    assert!(string.validate().is_empty());

    let segments = to_geometry_segments(string.rows());
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].top, 4500.0);
    assert_eq!(segments[0].inner_diameter, 2.441);
}
