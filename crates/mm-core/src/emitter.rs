//! Emitter: `Document` → persisted JSON.
//!
//! Always writes the current shape, `{ "tree": …, "crossLinks": […] }`,
//! with `isCollapsed` as the collapse key. The output round-trips through
//! `parse_document`.

use crate::error::Error;
use crate::model::Document;

/// Serialize a document compactly, as sent to the store.
pub fn emit_document(doc: &Document) -> Result<String, Error> {
    Ok(serde_json::to_string(doc)?)
}

/// Serialize a document with indentation, for files meant to be read.
pub fn emit_document_pretty(doc: &Document) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(doc)?)
}
