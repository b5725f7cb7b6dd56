//! Error taxonomy shared by the core and the editor.
//!
//! None of these are fatal: validation errors abort a single mutation,
//! parse errors fall back to a fresh document, depth-limit errors are
//! reported as layout warnings, and persistence errors become a save status.

use crate::id::NodeId;

/// A mutation was rejected. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("description is {len} characters, maximum is {max}")]
    DescriptionTooLong { len: usize, max: usize },
    #[error("cannot delete the root node")]
    DeleteRoot,
    #[error("a node cannot link to itself")]
    SelfLink,
    #[error("link endpoint {0} does not exist")]
    UnknownLinkEndpoint(NodeId),
    #[error("a link between {from} and {to} already exists")]
    DuplicateLink { from: NodeId, to: NodeId },
}

/// Failure at the persistence boundary (load/save).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("map {0} not found")]
    NotFound(String),
    #[error("authentication required")]
    Auth,
    #[error("network error: {0}")]
    Network(String),
    #[error("storage error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("malformed document: {0}")]
    Parse(String),
    #[error("{stage} stopped at depth limit {limit}")]
    DepthLimitExceeded { stage: &'static str, limit: usize },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
