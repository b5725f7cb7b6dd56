//! Depth-column tree layout.
//!
//! The pipeline for one pass is:
//!
//! 1. derive the visible tree from the collapse flags (`collapse`),
//! 2. size every visible node and build the depth column table (`sizing`),
//! 3. place nodes along the breadth axis with a contour-merging tidy tree,
//! 4. push crowded siblings apart (`spacing`),
//! 5. route visible cross-links between the final boxes (`route`).
//!
//! Everything is recomputed from the document on every pass. The output is
//! a plain list of positioned boxes plus routed links; diffing against a
//! previous pass is left to the renderer.

use crate::collapse::VisibleTree;
use crate::config::LayoutConfig;
use crate::error::Error;
use crate::id::NodeId;
use crate::model::Document;
use crate::route::{Point, RoutedLink, route_links};
use crate::sizing::{DepthColumns, compute_sizes};
use crate::spacing::resolve_spacing;
use crate::wrap::Lines;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::HashMap;

/// A visible node with its final geometry.
///
/// `x` is the depth column coordinate and `y` the breadth position; both
/// give the box **center**.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeBox {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title_lines: Lines,
    pub has_description: bool,
    /// Collapsed with hidden children behind it.
    pub collapsed: bool,
    /// Has children in the document, visible or not.
    pub has_children: bool,
}

impl NodeBox {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    /// Visible nodes in pre-order.
    pub nodes: Vec<NodeBox>,
    /// Visible cross-links.
    pub links: Vec<RoutedLink>,
    #[serde(skip)]
    pub columns: DepthColumns,
    /// Non-fatal problems met during the pass.
    #[serde(skip)]
    pub warnings: Vec<Error>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl Layout {
    pub fn get(&self, id: NodeId) -> Option<&NodeBox> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Topmost visible node under a canvas point.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<NodeId> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.contains(px, py))
            .map(|n| n.id)
    }

    /// Bounding box of all visible nodes as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.nodes.first()?;
        let init = (first.left(), first.top(), first.right(), first.bottom());
        Some(self.nodes.iter().fold(init, |(x0, y0, x1, y1), n| {
            (x0.min(n.left()), y0.min(n.top()), x1.max(n.right()), y1.max(n.bottom()))
        }))
    }
}

/// Lay out a document.
pub fn resolve_layout(doc: &Document, config: &LayoutConfig) -> Layout {
    let tree = VisibleTree::build(doc, config.max_depth);
    let warnings: Vec<Error> = tree.truncated.iter().cloned().collect();

    let (metrics, columns) = compute_sizes(&tree, config);

    let mut positions = tidy_positions(&tree, config.node_breadth);
    resolve_spacing(&tree, &metrics, &mut positions, config);

    let mut nodes = Vec::with_capacity(tree.len());
    let mut index = HashMap::with_capacity(tree.len());
    for idx in tree.preorder() {
        let visible = tree.graph[idx];
        let Some(m) = metrics.get(&idx) else {
            continue;
        };
        index.insert(visible.id(), nodes.len());
        nodes.push(NodeBox {
            id: visible.id(),
            parent: tree.parent(idx).map(|p| tree.graph[p].id()),
            depth: visible.depth,
            x: columns.offset(visible.depth).unwrap_or(0.0),
            y: positions.get(&idx).copied().unwrap_or(0.0),
            width: m.width,
            height: m.height,
            title_lines: m.title_lines.clone(),
            has_description: m.has_description,
            collapsed: visible.node.collapsed && visible.node.has_children(),
            has_children: visible.node.has_children(),
        });
    }

    let links = route_links(&doc.cross_links, |id| index.get(&id).map(|&i| &nodes[i]));

    log::debug!(
        "layout: {} of {} nodes visible, {} of {} links routed",
        nodes.len(),
        doc.node_count(),
        links.len(),
        doc.cross_links.len()
    );

    Layout {
        nodes,
        links,
        columns,
        warnings,
        index,
    }
}

// ─── Tidy tree ───────────────────────────────────────────────────────────

/// Left/right extent of a subtree per relative depth (index 0 = its root).
struct Contour {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Contour {
    fn leaf() -> Self {
        Self {
            left: vec![0.0],
            right: vec![0.0],
        }
    }

    fn empty() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Widen this contour by `other` shifted by `offset`, level by level.
    fn merge(&mut self, other: &Contour, offset: f32) {
        for d in 0..other.left.len() {
            let (l, r) = (other.left[d] + offset, other.right[d] + offset);
            if d < self.left.len() {
                self.left[d] = self.left[d].min(l);
                self.right[d] = self.right[d].max(r);
            } else {
                self.left.push(l);
                self.right.push(r);
            }
        }
    }

    /// Append `below` one level under this contour.
    fn merge_below(&mut self, below: &Contour, offset: f32) {
        for d in 0..below.left.len() {
            self.left.push(below.left[d] + offset);
            self.right.push(below.right[d] + offset);
        }
    }
}

/// Breadth positions for every visible node, root at 0.
///
/// Siblings sit at least `breadth` apart and nodes of neighbouring subtrees
/// at least `2 * breadth`; each parent is centered over its first and last
/// child.
pub fn tidy_positions(tree: &VisibleTree<'_>, breadth: f32) -> HashMap<NodeIndex, f32> {
    let mut relative = HashMap::with_capacity(tree.len());
    place_subtree(tree, tree.root, breadth, &mut relative);

    let mut absolute = HashMap::with_capacity(tree.len());
    absolute.insert(tree.root, 0.0);
    // Pre-order guarantees the parent is placed first.
    for idx in tree.preorder() {
        if let Some(parent) = tree.parent(idx) {
            let base = absolute.get(&parent).copied().unwrap_or(0.0);
            let rel = relative.get(&idx).copied().unwrap_or(0.0);
            absolute.insert(idx, base + rel);
        }
    }
    absolute
}

fn place_subtree(
    tree: &VisibleTree<'_>,
    idx: NodeIndex,
    breadth: f32,
    relative: &mut HashMap<NodeIndex, f32>,
) -> Contour {
    let children = tree.children(idx);
    if children.is_empty() {
        return Contour::leaf();
    }

    let mut offsets = Vec::with_capacity(children.len());
    let mut row: Option<Contour> = None;
    for &child in &children {
        let contour = place_subtree(tree, child, breadth, relative);
        let offset = match &row {
            None => 0.0,
            Some(placed) => {
                let shared = placed.right.len().min(contour.left.len());
                (0..shared)
                    .map(|d| {
                        let sep = if d == 0 { breadth } else { 2.0 * breadth };
                        placed.right[d] + sep - contour.left[d]
                    })
                    .fold(f32::MIN, f32::max)
            }
        };
        row.get_or_insert_with(Contour::empty)
            .merge(&contour, offset);
        offsets.push(offset);
    }

    let mid = (offsets[0] + offsets[offsets.len() - 1]) / 2.0;
    for (&child, offset) in children.iter().zip(&offsets) {
        relative.insert(child, offset - mid);
    }

    let mut contour = Contour::leaf();
    if let Some(row) = row {
        contour.merge_below(&row, -mid);
    }
    contour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CrossLink, Node};

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    #[test]
    fn single_node_at_origin() {
        let doc = Document::from_root(Node::new(id("l_only"), "Only"));
        let layout = resolve_layout(&doc, &LayoutConfig::default());
        assert_eq!(layout.nodes.len(), 1);
        let root = layout.get(id("l_only")).unwrap();
        assert_eq!((root.x, root.y), (0.0, 0.0));
        assert!(layout.warnings.is_empty());
    }

    #[test]
    fn parent_centered_over_children() {
        let root = Node::new(id("t_root"), "Root")
            .with_child(Node::new(id("t_a"), "A"))
            .with_child(Node::new(id("t_b"), "B"))
            .with_child(Node::new(id("t_c"), "C"));
        let doc = Document::from_root(root);
        let tree = VisibleTree::build(&doc, 50);
        let pos = tidy_positions(&tree, 120.0);

        let y = |s: &str| pos[&tree.index_of(id(s)).unwrap()];
        assert_eq!(y("t_a"), -120.0);
        assert_eq!(y("t_b"), 0.0);
        assert_eq!(y("t_c"), 120.0);
        assert_eq!(y("t_root"), 0.0);
    }

    #[test]
    fn cousins_get_double_separation() {
        // Root → A → (A1, A2), Root → B → (B1)
        let root = Node::new(id("cz_root"), "Root")
            .with_child(
                Node::new(id("cz_a"), "A")
                    .with_child(Node::new(id("cz_a1"), "A1"))
                    .with_child(Node::new(id("cz_a2"), "A2")),
            )
            .with_child(Node::new(id("cz_b"), "B").with_child(Node::new(id("cz_b1"), "B1")));
        let doc = Document::from_root(root);
        let tree = VisibleTree::build(&doc, 50);
        let pos = tidy_positions(&tree, 120.0);
        let y = |s: &str| pos[&tree.index_of(id(s)).unwrap()];

        assert_eq!(y("cz_a2") - y("cz_a1"), 120.0);
        assert!(y("cz_b1") - y("cz_a2") >= 240.0 - 1e-3);
        assert!(y("cz_b") - y("cz_a") >= 120.0 - 1e-3);
    }

    #[test]
    fn x_follows_depth_columns() {
        let root = Node::new(id("x_root"), "Root")
            .with_child(Node::new(id("x_a"), "A").with_child(Node::new(id("x_a1"), "A1")));
        let doc = Document::from_root(root);
        let layout = resolve_layout(&doc, &LayoutConfig::default());
        assert_eq!(layout.get(id("x_root")).unwrap().x, 0.0);
        assert_eq!(layout.get(id("x_a")).unwrap().x, 270.0);
        assert_eq!(layout.get(id("x_a1")).unwrap().x, 540.0);
        assert_eq!(layout.get(id("x_a1")).unwrap().parent, Some(id("x_a")));
    }

    #[test]
    fn collapsed_links_are_filtered_not_deleted() {
        let root = Node::new(id("cl_root"), "Root")
            .with_child(Node::new(id("cl_a"), "A").with_child(Node::new(id("cl_a1"), "A1")))
            .with_child(Node::new(id("cl_b"), "B"));
        let mut doc = Document::from_root(root);
        doc.cross_links
            .push(CrossLink::new(id("cl_link"), id("cl_a1"), id("cl_b")));

        let layout = resolve_layout(&doc, &LayoutConfig::default());
        assert_eq!(layout.links.len(), 1);

        doc.get_by_id_mut(id("cl_a")).unwrap().collapsed = true;
        let layout = resolve_layout(&doc, &LayoutConfig::default());
        assert!(layout.links.is_empty());
        assert!(!layout.is_visible(id("cl_a1")));
        assert!(layout.get(id("cl_a")).unwrap().collapsed);
        assert_eq!(doc.cross_links.len(), 1);
    }

    #[test]
    fn hit_test_finds_box() {
        let doc = Document::from_root(Node::new(id("hit_root"), "Root"));
        let layout = resolve_layout(&doc, &LayoutConfig::default());
        assert_eq!(layout.hit_test(10.0, 10.0), Some(id("hit_root")));
        assert_eq!(layout.hit_test(500.0, 500.0), None);
        let (x0, y0, x1, y1) = layout.bounds().unwrap();
        assert_eq!((x0, y0, x1, y1), (-70.0, -25.0, 70.0, 25.0));
    }
}
