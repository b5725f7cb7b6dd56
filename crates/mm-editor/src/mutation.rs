//! Document mutator: the structural edits a user can make.
//!
//! Each edit is a `Mutation` value. Applying one is split in two so callers
//! can snapshot in between:
//!
//! - `check` validates against the current document and reports whether the
//!   edit would change anything, without touching the document;
//! - `apply` re-validates and performs the edit.
//!
//! A rejected mutation leaves the document untouched.

use mm_core::config::MutationPolicy;
use mm_core::error::ValidationError;
use mm_core::id::{LinkId, NodeId};
use mm_core::model::{CrossLink, Document, Node};

/// A structural or content edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Append a new child. `name: None` uses the policy's default title.
    AddChild {
        parent: NodeId,
        name: Option<String>,
        description: String,
    },
    /// Set a node's title and description.
    Rename {
        id: NodeId,
        name: String,
        description: String,
    },
    /// Remove a node and its whole subtree.
    DeleteNode { id: NodeId },
    /// Flip the collapse flag. No-op on a node without children.
    ToggleCollapse { id: NodeId },
    CreateCrossLink { source: NodeId, target: NodeId },
    /// Remove a cross-link. No-op if it does not exist.
    DeleteCrossLink { id: LinkId },
}

/// What an applied mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Valid, but nothing to change.
    Unchanged,
    /// The document changed. `created` is the id of the new node or link.
    Changed { created: Option<NodeId> },
}

impl Outcome {
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Changed { .. })
    }

    pub fn created(&self) -> Option<NodeId> {
        match self {
            Outcome::Changed { created } => *created,
            Outcome::Unchanged => None,
        }
    }
}

fn check_description(description: &str, policy: &MutationPolicy) -> Result<(), ValidationError> {
    let len = description.trim().chars().count();
    if len > policy.max_description_len {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: policy.max_description_len,
        });
    }
    Ok(())
}

fn require_node(doc: &Document, id: NodeId) -> Result<&Node, ValidationError> {
    doc.get_by_id(id).ok_or(ValidationError::NodeNotFound(id))
}

impl Mutation {
    /// Short label for history entries.
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::AddChild { .. } => "Add child",
            Mutation::Rename { .. } => "Edit node",
            Mutation::DeleteNode { .. } => "Delete node",
            Mutation::ToggleCollapse { .. } => "Toggle collapse",
            Mutation::CreateCrossLink { .. } => "Create link",
            Mutation::DeleteCrossLink { .. } => "Delete link",
        }
    }

    /// Validate against `doc`. `Ok(false)` means the mutation is valid but
    /// would not change anything.
    pub fn check(&self, doc: &Document, policy: &MutationPolicy) -> Result<bool, ValidationError> {
        match self {
            Mutation::AddChild {
                parent,
                name,
                description,
            } => {
                require_node(doc, *parent)?;
                if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                    return Err(ValidationError::EmptyTitle);
                }
                check_description(description, policy)?;
                Ok(true)
            }
            Mutation::Rename {
                id,
                name,
                description,
            } => {
                let node = require_node(doc, *id)?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(ValidationError::EmptyTitle);
                }
                check_description(description, policy)?;
                Ok(node.name != name || node.description != description.trim())
            }
            Mutation::DeleteNode { id } => {
                if *id == doc.root_id() {
                    return Err(ValidationError::DeleteRoot);
                }
                require_node(doc, *id)?;
                Ok(true)
            }
            Mutation::ToggleCollapse { id } => Ok(require_node(doc, *id)?.has_children()),
            Mutation::CreateCrossLink { source, target } => {
                if source == target {
                    return Err(ValidationError::SelfLink);
                }
                for endpoint in [*source, *target] {
                    if !doc.contains(endpoint) {
                        return Err(ValidationError::UnknownLinkEndpoint(endpoint));
                    }
                }
                if doc
                    .find_link(*source, *target, policy.link_direction)
                    .is_some()
                {
                    return Err(ValidationError::DuplicateLink {
                        from: *source,
                        to: *target,
                    });
                }
                Ok(true)
            }
            Mutation::DeleteCrossLink { id } => Ok(doc.link(*id).is_some()),
        }
    }

    /// Validate, then perform the mutation on `doc`.
    pub fn apply(
        &self,
        doc: &mut Document,
        policy: &MutationPolicy,
    ) -> Result<Outcome, ValidationError> {
        if !self.check(doc, policy)? {
            return Ok(Outcome::Unchanged);
        }
        Ok(self.perform(doc, policy))
    }

    /// Perform a mutation that `check` already accepted.
    pub(crate) fn perform(&self, doc: &mut Document, policy: &MutationPolicy) -> Outcome {
        let created = match self {
            Mutation::AddChild {
                parent,
                name,
                description,
            } => {
                let id = doc.fresh_node_id();
                let name = name
                    .as_deref()
                    .map_or(policy.default_child_name.as_str(), str::trim);
                let child = Node::new(id, name).with_description(description.trim());
                if let Some(node) = doc.get_by_id_mut(*parent) {
                    if policy.expand_on_add {
                        node.collapsed = false;
                    }
                    node.children.push(child);
                }
                Some(id)
            }
            Mutation::Rename {
                id,
                name,
                description,
            } => {
                if let Some(node) = doc.get_by_id_mut(*id) {
                    node.name = name.trim().to_string();
                    node.description = description.trim().to_string();
                }
                None
            }
            Mutation::DeleteNode { id } => {
                if let Some(removed) = doc.remove_subtree(*id) {
                    log::debug!("deleted {} ({} nodes)", removed.id, removed.count());
                }
                None
            }
            Mutation::ToggleCollapse { id } => {
                if let Some(node) = doc.get_by_id_mut(*id) {
                    node.collapsed = !node.collapsed;
                }
                None
            }
            Mutation::CreateCrossLink { source, target } => {
                let id = doc.fresh_link_id();
                doc.cross_links.push(CrossLink::new(id, *source, *target));
                Some(id)
            }
            Mutation::DeleteCrossLink { id } => {
                doc.remove_link(*id);
                None
            }
        };
        Outcome::Changed { created }
    }
}
