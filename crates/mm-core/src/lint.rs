//! Lint diagnostics for mind map documents.
//!
//! Reports structural issues without modifying the document. The parser
//! already repairs most of these on load, so findings usually point at a
//! document assembled in code or edited outside the mutator.

use crate::config::MutationPolicy;
use crate::id::NodeId;
use crate::model::{Document, Node};
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks a document invariant.
    Error,
    /// Allowed, but likely a mistake.
    Warning,
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node or link this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "dangling-link").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document, policy: &MutationPolicy) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_nodes(&doc.root, policy, &mut HashSet::new(), &mut diags);
    lint_links(doc, policy, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_nodes(
    node: &Node,
    policy: &MutationPolicy,
    seen: &mut HashSet<NodeId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    if !seen.insert(node.id) {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!("Node id `{}` is used more than once.", node.id),
            severity: LintSeverity::Error,
            rule: "duplicate-id",
        });
    }
    if node.name.trim().is_empty() {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!("Node `{}` has a blank name.", node.id),
            severity: LintSeverity::Error,
            rule: "blank-name",
        });
    }
    let len = node.description.trim().chars().count();
    if len > policy.max_description_len {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!(
                "Description of `{}` is {len} characters, limit is {}.",
                node.id, policy.max_description_len
            ),
            severity: LintSeverity::Warning,
            rule: "long-description",
        });
    }
    if node.collapsed && !node.has_children() {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!("Node `{}` is collapsed but has no children.", node.id),
            severity: LintSeverity::Warning,
            rule: "collapsed-leaf",
        });
    }
    for child in &node.children {
        lint_nodes(child, policy, seen, diags);
    }
}

fn lint_links(doc: &Document, policy: &MutationPolicy, diags: &mut Vec<LintDiagnostic>) {
    let ids: HashSet<NodeId> = doc.node_ids().into_iter().collect();
    let mut link_ids = HashSet::new();

    for (i, link) in doc.cross_links.iter().enumerate() {
        if !link_ids.insert(link.id) {
            diags.push(LintDiagnostic {
                node_id: link.id,
                message: format!("Link id `{}` is used more than once.", link.id),
                severity: LintSeverity::Error,
                rule: "duplicate-link-id",
            });
        }
        if link.source == link.target {
            diags.push(LintDiagnostic {
                node_id: link.id,
                message: format!("Link `{}` connects `{}` to itself.", link.id, link.source),
                severity: LintSeverity::Error,
                rule: "self-link",
            });
        }
        for endpoint in [link.source, link.target] {
            if !ids.contains(&endpoint) {
                diags.push(LintDiagnostic {
                    node_id: link.id,
                    message: format!("Link `{}` points at missing node `{endpoint}`.", link.id),
                    severity: LintSeverity::Error,
                    rule: "dangling-link",
                });
            }
        }
        let earlier = &doc.cross_links[..i];
        if earlier
            .iter()
            .any(|l| l.connects(link.source, link.target, policy.link_direction))
        {
            diags.push(LintDiagnostic {
                node_id: link.id,
                message: format!(
                    "Link `{}` duplicates an earlier link between `{}` and `{}`.",
                    link.id, link.source, link.target
                ),
                severity: LintSeverity::Warning,
                rule: "duplicate-link",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
