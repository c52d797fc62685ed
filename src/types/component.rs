//! Component string types: ComponentRow, DraftOverride, StringKind

use serde::{Deserialize, Serialize};

// ============================================================================
// Row Identity
// ============================================================================

/// Stable identity of a component row, unchanged across recalculation passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub String);

impl RowId {
    /// Fresh random id for a newly added row.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// String Kind
// ============================================================================

/// Which ordered list a row belongs to. Drives the top-depth rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringKind {
    /// Casing/liner program: a later string may telescope inside the previous one.
    #[default]
    Casing,
    /// Bottom-hole assembly / tubing string: strictly contiguous.
    Bha,
}

impl std::fmt::Display for StringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StringKind::Casing => write!(f, "casing"),
            StringKind::Bha => write!(f, "bha"),
        }
    }
}

impl std::str::FromStr for StringKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "casing" => Ok(StringKind::Casing),
            "bha" | "tubing" => Ok(StringKind::Bha),
            other => Err(format!("unknown string kind '{other}' (expected casing or bha)")),
        }
    }
}

// ============================================================================
// Component Row
// ============================================================================

/// One physical segment (casing joint, tubing, tool) of an ordered string.
///
/// Depths are measured depth in feet, diameters in inches. For joint-based
/// tubing rows `length_per_unit` carries the total run length and `count`
/// is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRow {
    pub id: RowId,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub length_per_unit: f64,
    #[serde(default)]
    pub outer_diameter: f64,
    #[serde(default)]
    pub inner_diameter: f64,
    #[serde(default)]
    pub component_type: String,
    #[serde(default)]
    pub description: String,
}

fn default_count() -> u32 {
    1
}

impl ComponentRow {
    /// Blank row as created by an "add row" action.
    pub fn new(id: RowId, component_type: &str) -> Self {
        Self {
            id,
            top: 0.0,
            bottom: 0.0,
            count: 1,
            length_per_unit: 0.0,
            outer_diameter: 0.0,
            inner_diameter: 0.0,
            component_type: component_type.to_string(),
            description: String::new(),
        }
    }

    /// Builder-style setter used heavily by tests and fixtures.
    #[must_use]
    pub fn with_geometry(mut self, count: u32, length_per_unit: f64, od: f64, id: f64) -> Self {
        self.count = count;
        self.length_per_unit = length_per_unit;
        self.outer_diameter = od;
        self.inner_diameter = id;
        self
    }

    #[must_use]
    pub fn with_top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    /// Span between top and bottom.
    pub fn span(&self) -> f64 {
        self.bottom - self.top
    }
}

// ============================================================================
// Draft Override
// ============================================================================

/// Pending partial edit to one row, keyed by row id until the next
/// recalculation pass consumes it.
///
/// Wire names follow the editing grid's column keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, rename = "od", skip_serializing_if = "Option::is_none")]
    pub outer_diameter: Option<f64>,
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub inner_diameter: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(default, rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DraftOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer a newer patch on top of this one; fields set in `newer` win.
    pub fn merge(&mut self, newer: DraftOverride) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if newer.$field.is_some() { self.$field = newer.$field; })*
            };
        }
        take!(
            top,
            bottom,
            count,
            length,
            outer_diameter,
            inner_diameter,
            component_type,
            description
        );
    }
}

// ============================================================================
// Geometry handed to the lift-performance service
// ============================================================================

/// Flow-path segment derived from a committed component layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySegment {
    pub top: f64,
    pub bottom: f64,
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    #[serde(default)]
    pub component_type: String,
}
