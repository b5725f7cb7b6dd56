//! Spacing resolver: enforce a minimum gap between sibling boxes.
//!
//! The tidy tree separates sibling *subtrees* by a fixed slot size, which
//! is not enough once boxes grow taller than a slot (wrapped titles,
//! descriptions). This pass walks the visible tree bottom-up and pushes
//! siblings apart along the breadth axis until every adjacent pair satisfies
//! `b - a >= a.height / 2 + min_gap + b.height / 2`.
//!
//! Only siblings under the same parent are guaranteed apart; boxes in
//! distant branches may still overlap.

use crate::collapse::VisibleTree;
use crate::config::LayoutConfig;
use crate::sizing::NodeMetrics;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Push siblings apart in place. Recursion follows the visible tree, which
/// is already cut at `config.max_depth`.
pub fn resolve_spacing(
    tree: &VisibleTree<'_>,
    metrics: &HashMap<NodeIndex, NodeMetrics>,
    positions: &mut HashMap<NodeIndex, f32>,
    config: &LayoutConfig,
) {
    space_children(tree, tree.root, metrics, positions, config);
}

fn space_children(
    tree: &VisibleTree<'_>,
    parent: NodeIndex,
    metrics: &HashMap<NodeIndex, NodeMetrics>,
    positions: &mut HashMap<NodeIndex, f32>,
    config: &LayoutConfig,
) {
    let mut children = tree.children(parent);
    if children.is_empty() {
        return;
    }

    // Post-order: settle each child's own subtree first.
    for &child in &children {
        space_children(tree, child, metrics, positions, config);
    }
    if children.len() < 2 {
        return;
    }

    let pos = |positions: &HashMap<NodeIndex, f32>, idx: NodeIndex| {
        positions.get(&idx).copied().unwrap_or(0.0)
    };
    children.sort_by(|a, b| pos(positions, *a).total_cmp(&pos(positions, *b)));

    let height = |idx: NodeIndex| metrics.get(&idx).map_or(0.0, |m| m.height);
    for i in 0..children.len() - 1 {
        let (a, b) = (children[i], children[i + 1]);
        let required = height(a) / 2.0 + config.min_node_gap + height(b) / 2.0;
        let actual = pos(positions, b) - pos(positions, a);
        if actual < required {
            let shift = required - actual;
            log::trace!(
                "spacing: shift {} and {} later siblings by {shift}",
                tree.graph[b].id(),
                children.len() - i - 2
            );
            for &sibling in &children[i + 1..] {
                shift_subtree(tree, sibling, shift, positions);
            }
        }
    }
}

/// Move a node and its whole visible subtree along the breadth axis.
pub fn shift_subtree(
    tree: &VisibleTree<'_>,
    idx: NodeIndex,
    delta: f32,
    positions: &mut HashMap<NodeIndex, f32>,
) {
    let mut stack = vec![idx];
    while let Some(current) = stack.pop() {
        *positions.entry(current).or_insert(0.0) += delta;
        stack.extend(tree.children(current));
    }
}
