//! Error types for the diff crate.

use pdoc_types::Path;

/// Errors that can occur during diff and merge operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// Both documents hold different scalars (or kinds) at the same path.
    #[error("merge conflict at {path}: {first} != {second}")]
    MergeConflict {
        path: Path,
        first: String,
        second: String,
    },

    /// A depth limit cut the walk short; merging a truncated subtree would
    /// silently drop whatever lies below it.
    #[error("merge cannot descend into truncated {kind} at {path}")]
    MergeDepthUnsupported { path: Path, kind: String },

    /// Merge mode was requested through the read-only entry point.
    #[error("merge mode needs a mutable first document; use merge_into")]
    ReadOnlyMerge,

    /// Grafting a merged subtree failed.
    #[error("path error: {0}")]
    Path(#[from] pdoc_path::PathError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
