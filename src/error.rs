//! Error type shared by every fallible editor operation.

use thiserror::Error;

pub type Result<T, E = EditorError> = std::result::Result<T, E>;

/// Failures surfaced by the editor core.
///
/// Unknown state ids and missing shape classes are programmer errors in the
/// host; the rest describe documents that violate the tree invariants.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("state {state} has no child states; cannot transition to {target}")]
    NoStates { state: String, target: String },

    #[error("state {parent} has no child state with id {id}")]
    UnknownState { parent: String, id: String },

    #[error("no shape class registered for type {0}")]
    NoShapeClass(String),

    #[error("shape record is missing its type")]
    MissingShapeType,

    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("shape not found: {0}")]
    ShapeNotFound(String),

    #[error("shape {id} already exists on page {page}")]
    DuplicateShape { id: String, page: String },

    #[error("shape {id} references missing parent {parent}")]
    OrphanShape { id: String, parent: String },

    #[error("shape {id} cannot move under {parent}: it would become its own ancestor")]
    ParentCycle { id: String, parent: String },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
}
