//! Undo/Redo command stack.
//!
//! History is snapshot-based: before every mutation the whole document is
//! cloned onto the undo stack. Undo swaps the current document with the
//! newest snapshot and moves the current one onto the redo stack; redo is
//! the mirror image. Both stacks are bounded, dropping the oldest entry.

use mm_core::model::Document;

/// A deep copy of the document taken before a mutation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: Document,
    pub description: String,
}

/// Manages bounded undo/redo stacks of document snapshots.
pub struct CommandStack {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum depth of each stack.
    max_depth: usize,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    fn push_bounded(stack: &mut Vec<Snapshot>, snapshot: Snapshot, max_depth: usize) {
        stack.push(snapshot);
        if stack.len() > max_depth {
            stack.remove(0);
        }
    }

    /// Record `doc` as it is before a mutation. Clears the redo stack.
    pub fn snapshot(&mut self, doc: &Document, description: &str) {
        Self::push_bounded(
            &mut self.undo_stack,
            Snapshot {
                document: doc.clone(),
                description: description.to_string(),
            },
            self.max_depth,
        );
        self.redo_stack.clear();
    }

    /// Restore the newest snapshot into `doc`. Returns its description, or
    /// `None` (leaving `doc` alone) when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Option<String> {
        let snapshot = self.undo_stack.pop()?;
        let current = std::mem::replace(doc, snapshot.document);
        Self::push_bounded(
            &mut self.redo_stack,
            Snapshot {
                document: current,
                description: snapshot.description.clone(),
            },
            self.max_depth,
        );
        Some(snapshot.description)
    }

    /// Re-apply the newest undone state into `doc`.
    pub fn redo(&mut self, doc: &mut Document) -> Option<String> {
        let snapshot = self.redo_stack.pop()?;
        let current = std::mem::replace(doc, snapshot.document);
        Self::push_bounded(
            &mut self.undo_stack,
            Snapshot {
                document: current,
                description: snapshot.description.clone(),
            },
            self.max_depth,
        );
        Some(snapshot.description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, e.g. after loading a different map.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
