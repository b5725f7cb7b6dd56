//! Core data model for mind map documents.
//!
//! The document is an owned tree: every `Node` exclusively owns its
//! `children`, so cycles and shared subtrees cannot be expressed. Cross-links
//! are a separate overlay of directed `(source, target)` pairs that never
//! affect ownership or collapse behavior.
//!
//! Collapse is a single flag per node. The children of a collapsed node stay
//! in `children`; which nodes are visible is derived by `collapse::VisibleTree`.

use crate::config::LinkDirection;
use crate::id::{LinkId, NodeId};
use serde::Serialize;
use std::collections::HashSet;

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Title shown for, and given to, nodes whose name is blank.
pub const UNTITLED: &str = "Untitled";

/// A single topic in the mind map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub description: String,
    #[serde(rename = "isCollapsed")]
    pub collapsed: bool,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            collapsed: false,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Find a node in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Find a node in this subtree mutably.
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Detach the descendant `id` (with its whole subtree) from its parent.
    fn remove_descendant(&mut self, id: NodeId) -> Option<Node> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            let removed = self.children.remove(pos);
            if self.children.is_empty() {
                // Nothing left to hide.
                self.collapsed = false;
            }
            return Some(removed);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.remove_descendant(id))
    }

    /// All IDs in this subtree, pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node.id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

// ─── Cross-links ─────────────────────────────────────────────────────────

/// A directed connection between two nodes outside the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossLink {
    pub id: LinkId,
    #[serde(rename = "sourceId")]
    pub source: NodeId,
    #[serde(rename = "targetId")]
    pub target: NodeId,
}

impl CrossLink {
    pub fn new(id: LinkId, source: NodeId, target: NodeId) -> Self {
        Self { id, source, target }
    }

    /// Whether this link connects `source` → `target` under `direction`.
    pub fn connects(&self, source: NodeId, target: NodeId, direction: LinkDirection) -> bool {
        let forward = self.source == source && self.target == target;
        match direction {
            LinkDirection::Directed => forward,
            LinkDirection::Undirected => {
                forward || (self.source == target && self.target == source)
            }
        }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The unit of persistence and of undo/redo snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "tree")]
    pub root: Node,
    #[serde(rename = "crossLinks")]
    pub cross_links: Vec<CrossLink>,
}

impl Document {
    /// A fresh single-node document.
    #[must_use]
    pub fn new(title: &str) -> Self {
        let title = title.trim();
        let name = if title.is_empty() { UNTITLED } else { title };
        Self::from_root(Node::new(NodeId::with_prefix("node"), name))
    }

    pub fn from_root(root: Node) -> Self {
        Self {
            root,
            cross_links: Vec::new(),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id
    }

    /// Look up a node by ID.
    pub fn get_by_id(&self, id: NodeId) -> Option<&Node> {
        self.root.find(id)
    }

    /// Look up a node mutably by ID.
    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_by_id(id).is_some()
    }

    /// All node IDs, pre-order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.root.ids()
    }

    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// A generated node ID not present in this document.
    pub fn fresh_node_id(&self) -> NodeId {
        let taken: HashSet<NodeId> = self.node_ids().into_iter().collect();
        loop {
            let id = NodeId::with_prefix("node");
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    /// A generated link ID not used by any link in this document.
    pub fn fresh_link_id(&self) -> LinkId {
        loop {
            let id = NodeId::with_prefix("link");
            if self.link(id).is_none() {
                return id;
            }
        }
    }

    /// Append `child` under `parent`. Returns `false` if `parent` is missing.
    pub fn add_child(&mut self, parent: NodeId, child: Node) -> bool {
        match self.get_by_id_mut(parent) {
            Some(node) => {
                node.children.push(child);
                true
            }
            None => false,
        }
    }

    /// Detach a non-root node and its subtree, then drop every cross-link
    /// that no longer resolves. The root cannot be removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Option<Node> {
        if id == self.root.id {
            return None;
        }
        let removed = self.root.remove_descendant(id)?;
        self.prune_dangling_links();
        Some(removed)
    }

    /// Drop cross-links whose source or target is no longer in the tree.
    /// Returns how many links were dropped.
    pub fn prune_dangling_links(&mut self) -> usize {
        let ids: HashSet<NodeId> = self.node_ids().into_iter().collect();
        let before = self.cross_links.len();
        self.cross_links
            .retain(|l| ids.contains(&l.source) && ids.contains(&l.target));
        before - self.cross_links.len()
    }

    pub fn link(&self, id: LinkId) -> Option<&CrossLink> {
        self.cross_links.iter().find(|l| l.id == id)
    }

    /// An existing link equivalent to `source` → `target` under `direction`.
    pub fn find_link(
        &self,
        source: NodeId,
        target: NodeId,
        direction: LinkDirection,
    ) -> Option<&CrossLink> {
        self.cross_links
            .iter()
            .find(|l| l.connects(source, target, direction))
    }

    pub fn remove_link(&mut self, id: LinkId) -> Option<CrossLink> {
        let pos = self.cross_links.iter().position(|l| l.id == id)?;
        Some(self.cross_links.remove(pos))
    }
}
