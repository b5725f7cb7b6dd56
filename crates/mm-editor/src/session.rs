//! Editing session: the one object that owns everything mutable.
//!
//! A session holds the current document, its latest layout, the undo/redo
//! history, the link tool, the selection and the store. Every edit runs the
//! same cycle to completion before returning:
//!
//! validate → snapshot → mutate → re-layout → persist
//!
//! A failed save never rolls the edit back. It is reported through
//! `save_status` and can be retried or reconciled with undo.

use crate::commands::CommandStack;
use crate::linking::LinkTool;
use crate::mutation::{Mutation, Outcome};
use crate::store::{DocumentStore, StoredMap};
use mm_core::config::{LayoutConfig, MutationPolicy};
use mm_core::emitter::emit_document;
use mm_core::error::{Error, PersistenceError, ValidationError};
use mm_core::id::{LinkId, NodeId};
use mm_core::layout::{Layout, resolve_layout};
use mm_core::lint::{LintSeverity, lint_document};
use mm_core::model::Document;
use mm_core::parser::load_or_default;
use serde::{Deserialize, Serialize};

// ─── Configuration ───────────────────────────────────────────────────────

/// Everything a session can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub layout: LayoutConfig,
    pub policy: MutationPolicy,
    /// Undo and redo depth.
    pub history_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            policy: MutationPolicy::default(),
            history_depth: 20,
        }
    }
}

impl SessionConfig {
    /// Read a config from JSON. Missing fields keep their defaults.
    pub fn from_json(input: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Outcome of the most recent persistence request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// Nothing saved yet in this session.
    #[default]
    Idle,
    Saved,
    Failed(PersistenceError),
}

// ─── Session ─────────────────────────────────────────────────────────────

pub struct Session<S: DocumentStore> {
    map_id: String,
    title: String,
    document: Document,
    layout: Layout,
    history: CommandStack,
    config: SessionConfig,
    linking: LinkTool,
    selected: Option<NodeId>,
    save_status: SaveStatus,
    store: S,
}

impl<S: DocumentStore> Session<S> {
    /// Load `map_id` from `store`. Malformed data falls back to a fresh
    /// document named after the map; a failed load is an error.
    pub fn open(store: S, map_id: &str, config: SessionConfig) -> Result<Self, Error> {
        let stored = store.load(map_id)?;
        let document = load_or_default(&stored.data, &stored.title);

        for diag in lint_document(&document, &config.policy) {
            match diag.severity {
                LintSeverity::Error => log::warn!("open {map_id}: [{}] {}", diag.rule, diag.message),
                LintSeverity::Warning => {
                    log::debug!("open {map_id}: [{}] {}", diag.rule, diag.message)
                }
            }
        }

        Ok(Self::new(store, map_id, &stored.title, document, config))
    }

    /// Start a session on an in-memory document. Nothing is saved until
    /// the first edit.
    pub fn new(
        store: S,
        map_id: &str,
        title: &str,
        document: Document,
        config: SessionConfig,
    ) -> Self {
        let layout = resolve_layout(&document, &config.layout);
        Self {
            map_id: map_id.to_string(),
            title: title.to_string(),
            document,
            layout,
            history: CommandStack::new(config.history_depth),
            config,
            linking: LinkTool::new(),
            selected: None,
            save_status: SaveStatus::Idle,
            store,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Layout of the current document.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn link_tool(&self) -> &LinkTool {
        &self.linking
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Validate and apply one mutation. A valid mutation that would change
    /// nothing returns `Outcome::Unchanged` and takes no snapshot.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Outcome, Error> {
        if !mutation.check(&self.document, &self.config.policy)? {
            log::debug!("{}: nothing to change", mutation.describe());
            return Ok(Outcome::Unchanged);
        }

        self.history.snapshot(&self.document, mutation.describe());
        let outcome = mutation.perform(&mut self.document, &self.config.policy);
        log::debug!("{} applied", mutation.describe());

        self.refresh();
        Ok(outcome)
    }

    /// Add a child titled with the default name. Returns its id.
    pub fn add_child(&mut self, parent: NodeId) -> Result<NodeId, Error> {
        let outcome = self.apply(Mutation::AddChild {
            parent,
            name: None,
            description: String::new(),
        })?;
        outcome
            .created()
            .ok_or(Error::Validation(ValidationError::NodeNotFound(parent)))
    }

    pub fn rename_node(&mut self, id: NodeId, name: &str, description: &str) -> Result<Outcome, Error> {
        self.apply(Mutation::Rename {
            id,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn delete_node(&mut self, id: NodeId) -> Result<Outcome, Error> {
        self.apply(Mutation::DeleteNode { id })
    }

    pub fn toggle_collapse(&mut self, id: NodeId) -> Result<Outcome, Error> {
        self.apply(Mutation::ToggleCollapse { id })
    }

    /// Create a link. Returns its id.
    pub fn create_cross_link(&mut self, source: NodeId, target: NodeId) -> Result<LinkId, Error> {
        let outcome = self.apply(Mutation::CreateCrossLink { source, target })?;
        outcome
            .created()
            .ok_or(Error::Validation(ValidationError::DuplicateLink {
                from: source,
                to: target,
            }))
    }

    pub fn delete_cross_link(&mut self, id: LinkId) -> Result<Outcome, Error> {
        self.apply(Mutation::DeleteCrossLink { id })
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Restore the document as it was before the last edit.
    pub fn undo(&mut self) -> Option<String> {
        let description = self.history.undo(&mut self.document)?;
        log::debug!("undo: {description}");
        self.refresh();
        Some(description)
    }

    pub fn redo(&mut self) -> Option<String> {
        let description = self.history.redo(&mut self.document)?;
        log::debug!("redo: {description}");
        self.refresh();
        Some(description)
    }

    // ─── Selection and linking ───────────────────────────────────────────

    pub fn select(&mut self, id: NodeId) -> Result<(), ValidationError> {
        if !self.document.contains(id) {
            return Err(ValidationError::NodeNotFound(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Start drawing a link from `source`.
    pub fn begin_link(&mut self, source: NodeId) -> Result<(), ValidationError> {
        if !self.document.contains(source) {
            return Err(ValidationError::NodeNotFound(source));
        }
        self.linking.begin(source);
        Ok(())
    }

    /// Route a node click to the link tool. Returns the outcome when the
    /// click completed a link.
    pub fn click_node(&mut self, id: NodeId) -> Result<Option<Outcome>, Error> {
        match self.linking.click_node(id) {
            Some(mutation) => self.apply(mutation).map(Some),
            None => Ok(None),
        }
    }

    /// A click on empty canvas cancels linking.
    pub fn click_canvas(&mut self) {
        self.linking.click_canvas();
    }

    pub fn cancel_link(&mut self) {
        self.linking.cancel();
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Send the current document again, e.g. after a failed save.
    pub fn retry_save(&mut self) -> Result<(), PersistenceError> {
        self.persist()
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let result = emit_document(&self.document)
            .map_err(|err| PersistenceError::Io(err.to_string()))
            .and_then(|data| {
                let map = StoredMap {
                    title: self.title.clone(),
                    data,
                };
                self.store.save(&self.map_id, &map)
            });

        match &result {
            Ok(()) => self.save_status = SaveStatus::Saved,
            Err(err) => {
                log::warn!("save {}: {err}", self.map_id);
                self.save_status = SaveStatus::Failed(err.clone());
            }
        }
        result
    }

    /// Re-layout, drop references to nodes that no longer exist, persist.
    fn refresh(&mut self) {
        self.layout = resolve_layout(&self.document, &self.config.layout);
        for warning in &self.layout.warnings {
            log::warn!("layout {}: {warning}", self.map_id);
        }

        if self.selected.is_some_and(|id| !self.document.contains(id)) {
            self.selected = None;
        }
        if self
            .linking
            .source()
            .is_some_and(|id| !self.document.contains(id))
        {
            self.linking.cancel();
        }

        // The outcome is kept in `save_status`.
        let _ = self.persist();
    }
}
