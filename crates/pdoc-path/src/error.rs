//! Error types for path access and mutation.

use pdoc_types::{Path, Step, TypeError, ValueKind};
use thiserror::Error;

/// Errors that can occur while navigating or mutating a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A step was applied after an earlier step already resolved to nothing.
    #[error("access on nil at {path}: an earlier step found no value")]
    AccessOnNil { path: Path },

    /// An array index at or past the end of the array.
    #[error("index {index} out of range at {path} (length {len})")]
    IndexOutOfRange { path: Path, index: usize, len: usize },

    /// A step applied to a node that cannot be stepped into that way.
    #[error("cannot apply step {step} to {kind} at {path}")]
    UnsupportedContainerType {
        path: Path,
        kind: ValueKind,
        step: Step,
    },

    /// A write addressed a container of the wrong kind.
    #[error("structural mismatch at {path}: expected {expected}, found {found}")]
    StructuralMismatch {
        path: Path,
        expected: String,
        found: ValueKind,
    },

    /// The parent of a simple write does not resolve.
    #[error("parent not found: {path}")]
    ParentNotFound { path: Path },

    /// A search selector that is not a valid regular expression.
    #[error("invalid selector pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A leaf value whose raw text does not decode.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Convenience alias for path results.
pub type PathResult<T> = Result<T, PathError>;
