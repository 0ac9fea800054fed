//! High-level SDK for pdoc property-list documents.
//!
//! Provides one API over the lower crates: a [`Document`] that owns a value
//! tree and remembers where it came from, the plain functions of the
//! [`api`] module for callers that prefer to hold bare [`Value`]s, and the
//! [`StateLedger`] that tracks application versions across runs.

pub mod api;
pub mod document;
pub mod error;
pub mod state;

pub use document::Document;
pub use error::{SdkError, SdkResult};
pub use state::{AppState, StateLedger};

// Re-export key types
pub use pdoc_diff::{ChangeKind, DiffMode, DiffOptions, DiffRecord, ResultFilter};
pub use pdoc_path::{ContainerKind, ForcedStep, Leaf, Selector, Slot};
pub use pdoc_types::{path, Date, Dictionary, Native, NodeKind, Path, Step, Value, ValueKind};
