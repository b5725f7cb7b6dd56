pub mod collapse;
pub mod config;
pub mod emitter;
pub mod error;
pub mod id;
pub mod layout;
pub mod lint;
pub mod model;
pub mod parser;
pub mod route;
pub mod sizing;
pub mod spacing;
pub mod wrap;

pub use collapse::VisibleTree;
pub use config::{LayoutConfig, LinkDirection, MutationPolicy};
pub use emitter::{emit_document, emit_document_pretty};
pub use error::{Error, PersistenceError, ValidationError};
pub use id::{LinkId, NodeId};
pub use layout::{Layout, NodeBox, resolve_layout};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use parser::{load_or_default, parse_document};
pub use route::{Point, RoutedLink};
pub use wrap::wrap_text;

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
