//! Layout and mutation settings.
//!
//! Every field has a default matching the reference look of the editor,
//! and both structs deserialize from partial JSON (`#[serde(default)]`).

use serde::{Deserialize, Serialize};

// ─── Layout ──────────────────────────────────────────────────────────────

/// Geometry constants for sizing, tree layout, and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Narrowest node box.
    pub min_width: f32,
    /// Widest node box; longer titles wrap instead.
    pub max_width: f32,
    /// Shortest node box.
    pub base_height: f32,
    /// Horizontal padding on each side of the title, and total vertical padding.
    pub padding: f32,
    /// Average glyph advance used to estimate label widths.
    pub char_width: f32,
    pub line_height: f32,
    /// Extra space between the title block and the description preview.
    pub description_gap: f32,
    /// Gap between adjacent depth columns.
    pub depth_spacing: f32,
    /// Breadth of one tidy-tree slot (sibling distance before spacing).
    pub node_breadth: f32,
    /// Minimum gap between sibling boxes after spacing.
    pub min_node_gap: f32,
    /// Deepest level the visible tree keeps. Deeper nodes are hidden and
    /// reported as a layout warning.
    pub max_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: 140.0,
            max_width: 240.0,
            base_height: 50.0,
            padding: 30.0,
            char_width: 6.0,
            line_height: 20.0,
            description_gap: 8.0,
            depth_spacing: 130.0,
            node_breadth: 120.0,
            min_node_gap: 40.0,
            max_depth: 50,
        }
    }
}

// ─── Mutation policy ─────────────────────────────────────────────────────

/// How duplicate cross-links are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkDirection {
    /// `(A, B)` and `(B, A)` are the same link.
    #[default]
    Undirected,
    /// `(A, B)` and `(B, A)` may coexist; only same-direction repeats clash.
    Directed,
}

/// Rules applied by the document mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationPolicy {
    pub link_direction: LinkDirection,
    /// Clear the parent's `collapsed` flag when a child is added to it.
    pub expand_on_add: bool,
    /// Longest description accepted by rename, in characters.
    pub max_description_len: usize,
    /// Title given to a child created without one.
    pub default_child_name: String,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            link_direction: LinkDirection::Undirected,
            expand_on_add: true,
            max_description_len: 5000,
            default_child_name: "New Topic".to_string(),
        }
    }
}
