//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the forest invariants or
/// references that cannot be resolved against a forest.
///
/// The selection operations themselves never fail; these errors come from
/// building a forest and from resolving user-supplied references.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("leaf without label: {path}")]
    UnlabeledLeaf { path: String },

    #[error("duplicate leaf label: {label}")]
    DuplicateLeafLabel { label: String },

    #[error("label used by more than one node or as an extra label: {label}")]
    AmbiguousLabel { label: String },

    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error("unknown encoding policy: {0}")]
    UnknownPolicy(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
