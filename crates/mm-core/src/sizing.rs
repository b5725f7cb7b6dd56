//! Node sizing: box widths, heights, and wrapped titles, columnized by depth.
//!
//! Every node at the same depth shares one width (the widest clamped label
//! in that column), and the horizontal coordinate of a column is derived
//! from the widths of the columns before it.

use crate::collapse::VisibleTree;
use crate::config::LayoutConfig;
use crate::model::UNTITLED;
use crate::wrap::{Lines, wrap_text};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Computed size and text of one visible node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMetrics {
    pub width: f32,
    pub height: f32,
    pub title_lines: Lines,
    pub has_description: bool,
}

/// Per-depth column widths and their derived horizontal offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthColumns {
    pub widths: Vec<f32>,
    pub offsets: Vec<f32>,
}

impl DepthColumns {
    fn from_widths(widths: Vec<f32>, config: &LayoutConfig) -> Self {
        let mut offsets = Vec::with_capacity(widths.len());
        let mut x = 0.0;
        for width in &widths {
            offsets.push(x);
            x += width + config.depth_spacing;
        }
        Self { widths, offsets }
    }

    /// Width shared by every node at `depth`.
    pub fn width(&self, depth: usize) -> Option<f32> {
        self.widths.get(depth).copied()
    }

    /// Horizontal coordinate of the column at `depth`.
    pub fn offset(&self, depth: usize) -> Option<f32> {
        self.offsets.get(depth).copied()
    }
}

fn display_title(name: &str) -> &str {
    if name.trim().is_empty() {
        UNTITLED
    } else {
        name
    }
}

/// Width a label asks for before column alignment.
pub fn label_width(name: &str, config: &LayoutConfig) -> f32 {
    let chars = display_title(name).chars().count() as f32;
    let width = chars * config.char_width + config.padding * 2.0;
    // Not `clamp`: a config with min above max must not panic. Max wins.
    width.max(config.min_width).min(config.max_width)
}

/// Characters per title line for a box of `width`.
pub fn chars_per_line(width: f32, config: &LayoutConfig) -> usize {
    let text_width = width - config.padding * 2.0;
    ((text_width / config.char_width).floor() as usize).max(1)
}

/// Size every visible node.
pub fn compute_sizes(
    tree: &VisibleTree<'_>,
    config: &LayoutConfig,
) -> (HashMap<NodeIndex, NodeMetrics>, DepthColumns) {
    let floor = config.min_width.min(config.max_width);
    let mut widths = vec![floor; tree.max_depth() + 1];
    for visible in tree.graph.node_weights() {
        let width = label_width(&visible.node.name, config);
        if width > widths[visible.depth] {
            widths[visible.depth] = width;
        }
    }
    let columns = DepthColumns::from_widths(widths, config);

    let mut metrics = HashMap::with_capacity(tree.len());
    for idx in tree.preorder() {
        let visible = tree.graph[idx];
        let width = columns.widths[visible.depth];
        let title_lines = wrap_text(
            display_title(&visible.node.name),
            chars_per_line(width, config),
        );
        let has_description = !visible.node.description.trim().is_empty();

        let mut content = title_lines.len() as f32 * config.line_height;
        if has_description {
            content += config.line_height + config.description_gap;
        }
        let height = config.base_height.max(content + config.padding);

        log::trace!(
            "size {}: {width}x{height} ({} lines)",
            visible.id(),
            title_lines.len()
        );
        metrics.insert(
            idx,
            NodeMetrics {
                width,
                height,
                title_lines,
                has_description,
            },
        );
    }

    (metrics, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::{Document, Node};

    fn doc() -> Document {
        let root = Node::new(NodeId::intern("s_root"), "Root")
            .with_child(Node::new(
                NodeId::intern("s_long"),
                "A considerably longer title that will need wrapping",
            ))
            .with_child(Node::new(NodeId::intern("s_short"), "Short").with_description("notes"));
        Document::from_root(root)
    }

    #[test]
    fn label_width_is_clamped() {
        let config = LayoutConfig::default();
        assert_eq!(label_width("a", &config), 140.0);
        assert_eq!(label_width(&"x".repeat(100), &config), 240.0);
        // 20 chars * 6 + 60 = 180
        assert_eq!(label_width(&"y".repeat(20), &config), 180.0);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let config = LayoutConfig {
            min_width: 300.0,
            max_width: 240.0,
            ..LayoutConfig::default()
        };
        assert_eq!(label_width("a", &config), 240.0);
        assert_eq!(label_width(&"x".repeat(200), &config), 240.0);

        let d = doc();
        let tree = VisibleTree::build(&d, config.max_depth);
        let (metrics, columns) = compute_sizes(&tree, &config);
        assert!(columns.widths.iter().all(|w| *w == 240.0));
        assert!(metrics.values().all(|m| m.width == 240.0));
    }

    #[test]
    fn same_depth_shares_width() {
        let d = doc();
        let tree = VisibleTree::build(&d, 50);
        let config = LayoutConfig::default();
        let (metrics, columns) = compute_sizes(&tree, &config);

        let long = &metrics[&tree.index_of(NodeId::intern("s_long")).unwrap()];
        let short = &metrics[&tree.index_of(NodeId::intern("s_short")).unwrap()];
        assert_eq!(long.width, short.width);
        assert_eq!(long.width, 240.0);
        assert_eq!(columns.width(1), Some(240.0));
        assert_eq!(columns.width(0), Some(140.0));
    }

    #[test]
    fn height_accounts_for_lines_and_description() {
        let d = doc();
        let tree = VisibleTree::build(&d, 50);
        let config = LayoutConfig::default();
        let (metrics, _) = compute_sizes(&tree, &config);

        // 240 wide → 30 chars per line → 2 lines → 40 + 30 = 70
        let long = &metrics[&tree.index_of(NodeId::intern("s_long")).unwrap()];
        assert_eq!(long.title_lines.len(), 2);
        assert_eq!(long.height, 70.0);
        assert!(!long.has_description);

        // 1 line + description: 20 + 28 + 30 = 78
        let short = &metrics[&tree.index_of(NodeId::intern("s_short")).unwrap()];
        assert!(short.has_description);
        assert_eq!(short.height, 78.0);

        let root = &metrics[&tree.root];
        assert_eq!(root.height, 50.0);
    }

    #[test]
    fn column_offsets_accumulate() {
        let d = doc();
        let tree = VisibleTree::build(&d, 50);
        let config = LayoutConfig::default();
        let (_, columns) = compute_sizes(&tree, &config);
        assert_eq!(columns.offset(0), Some(0.0));
        assert_eq!(columns.offset(1), Some(140.0 + 130.0));
    }

    #[test]
    fn blank_name_renders_untitled() {
        let d = Document::from_root(Node::new(NodeId::intern("s_blank"), "  "));
        let tree = VisibleTree::build(&d, 50);
        let (metrics, _) = compute_sizes(&tree, &LayoutConfig::default());
        assert_eq!(metrics[&tree.root].title_lines.as_slice(), &[UNTITLED]);
    }
}
