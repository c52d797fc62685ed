//! Diagnostic checks on a component layout. Never mutates the rows.
//!
//! Overlap detection compares each row only against rows that follow it in
//! list order (`later.top < earlier.bottom`). Lists that are not sorted by
//! depth can therefore hide an overlap; this mirrors how the editing grid
//! has always reported overlaps and is kept as a known limitation.

use crate::types::ComponentRow;

/// Return a human-readable message for every violation found.
///
/// - a row whose outer diameter is smaller than its inner diameter
/// - a later row starting above an earlier row's bottom, unless the later
///   row's bore (ID) can contain the earlier row's OD
pub fn validate_string(rows: &[ComponentRow]) -> Vec<String> {
    let mut messages = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        if row.outer_diameter < row.inner_diameter {
            messages.push(format!(
                "Row {} ({}): outer diameter {:.3} in is smaller than inner diameter {:.3} in",
                i + 1,
                label(row),
                row.outer_diameter,
                row.inner_diameter
            ));
        }
    }

    for (i, earlier) in rows.iter().enumerate() {
        for (j, later) in rows.iter().enumerate().skip(i + 1) {
            let overlaps = later.top < earlier.bottom;
            let contains = later.inner_diameter >= earlier.outer_diameter;
            if overlaps && !contains {
                messages.push(format!(
                    "Row {} ({}) overlaps row {} ({}) between {:.1} ft and {:.1} ft: \
                     bore {:.3} in cannot contain OD {:.3} in",
                    j + 1,
                    label(later),
                    i + 1,
                    label(earlier),
                    later.top,
                    earlier.bottom,
                    later.inner_diameter,
                    earlier.outer_diameter
                ));
            }
        }
    }

    messages
}

fn label(row: &ComponentRow) -> &str {
    if row.description.is_empty() {
        if row.component_type.is_empty() {
            row.id.as_str()
        } else {
            &row.component_type
        }
    } else {
        &row.description
    }
}
