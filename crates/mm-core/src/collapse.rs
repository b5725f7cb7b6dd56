//! Collapse synchronization: derive the visible tree from the `collapsed` flags.
//!
//! The persisted tree always keeps every child. Which nodes take part in a
//! layout pass is a pure function of the document: the root is visible, and
//! the children of a visible node are visible unless that node is collapsed.
//! Rebuilding is idempotent: the same document always yields the
//! same visible set.

use crate::error::Error;
use crate::id::NodeId;
use crate::model::{Document, Node};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A node taking part in the current layout pass.
#[derive(Debug, Clone, Copy)]
pub struct VisibleNode<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

impl VisibleNode<'_> {
    pub fn id(&self) -> NodeId {
        self.node.id
    }
}

/// The visible part of a document, as a parent → child graph.
///
/// Nodes are inserted in pre-order, so sorting sibling indices restores
/// document order.
#[derive(Debug)]
pub struct VisibleTree<'a> {
    pub graph: DiGraph<VisibleNode<'a>, ()>,
    pub root: NodeIndex,
    index: HashMap<NodeId, NodeIndex>,
    /// Set when a branch was cut at the depth ceiling.
    pub truncated: Option<Error>,
}

impl<'a> VisibleTree<'a> {
    /// Build the visible tree, stopping any branch deeper than `max_depth`.
    pub fn build(doc: &'a Document, max_depth: usize) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let root = graph.add_node(VisibleNode {
            node: &doc.root,
            depth: 0,
        });
        index.insert(doc.root.id, root);

        let mut tree = Self {
            graph,
            root,
            index,
            truncated: None,
        };
        tree.expand(root, max_depth);
        tree
    }

    fn expand(&mut self, parent: NodeIndex, max_depth: usize) {
        let VisibleNode { node, depth } = self.graph[parent];
        if node.collapsed {
            return;
        }
        if depth >= max_depth {
            if node.has_children() {
                log::warn!(
                    "collapse sync: depth limit {max_depth} reached at {}, hiding its children",
                    node.id
                );
                self.truncated = Some(Error::DepthLimitExceeded {
                    stage: "collapse sync",
                    limit: max_depth,
                });
            }
            return;
        }
        for child in &node.children {
            let idx = self.graph.add_node(VisibleNode {
                node: child,
                depth: depth + 1,
            });
            self.graph.add_edge(parent, idx, ());
            self.index.insert(child.id, idx);
            self.expand(idx, max_depth);
        }
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Visible children in document order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// All visible indices in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Deepest visible depth.
    pub fn max_depth(&self) -> usize {
        self.graph
            .node_weights()
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }

    /// Visible IDs in pre-order.
    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.graph.node_weights().map(|n| n.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        let root = Node::new(NodeId::intern("c_root"), "Root")
            .with_child(
                Node::new(NodeId::intern("c_a"), "A")
                    .with_child(Node::new(NodeId::intern("c_a1"), "A1"))
                    .with_child(Node::new(NodeId::intern("c_a2"), "A2")),
            )
            .with_child(Node::new(NodeId::intern("c_b"), "B"));
        Document::from_root(root)
    }

    #[test]
    fn expanded_tree_is_fully_visible() {
        let d = doc();
        let tree = VisibleTree::build(&d, 50);
        assert_eq!(tree.len(), 5);
        assert!(tree.truncated.is_none());
        let kids: Vec<NodeId> = tree
            .children(tree.root)
            .into_iter()
            .map(|i| tree.graph[i].id())
            .collect();
        assert_eq!(kids, vec![NodeId::intern("c_a"), NodeId::intern("c_b")]);
    }

    #[test]
    fn collapsed_node_hides_descendants_but_keeps_them() {
        let mut d = doc();
        d.get_by_id_mut(NodeId::intern("c_a")).unwrap().collapsed = true;
        let tree = VisibleTree::build(&d, 50);
        assert!(tree.is_visible(NodeId::intern("c_a")));
        assert!(!tree.is_visible(NodeId::intern("c_a1")));
        assert!(d.contains(NodeId::intern("c_a1")));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let mut d = doc();
        d.get_by_id_mut(NodeId::intern("c_a")).unwrap().collapsed = true;
        let first = VisibleTree::build(&d, 50).visible_ids();
        let second = VisibleTree::build(&d, 50).visible_ids();
        assert_eq!(first, second);
    }

    #[test]
    fn depth_ceiling_truncates_with_warning() {
        let d = doc();
        let tree = VisibleTree::build(&d, 1);
        assert_eq!(tree.len(), 3);
        assert!(matches!(
            tree.truncated,
            Some(Error::DepthLimitExceeded { limit: 1, .. })
        ));
    }

    #[test]
    fn parent_lookup() {
        let d = doc();
        let tree = VisibleTree::build(&d, 50);
        let a1 = tree.index_of(NodeId::intern("c_a1")).unwrap();
        let a = tree.parent(a1).unwrap();
        assert_eq!(tree.graph[a].id(), NodeId::intern("c_a"));
        assert!(tree.parent(tree.root).is_none());
        assert_eq!(tree.max_depth(), 2);
    }
}
