//! Diff and merge engine for pdoc documents.
//!
//! Compares two value trees structurally, producing change records, and
//! can instead graft whatever the second document has that the first lacks
//! into the first.
//!
//! # Key Types
//!
//! - [`DiffRecord`] / [`ChangeKind`] -- One reported difference
//! - [`DiffOptions`] / [`DiffMode`] / [`ResultFilter`] -- What to compare and report
//! - [`DiffSink`] / [`LogSink`] -- Where emitted records go

pub mod engine;
pub mod error;
pub mod options;
pub mod record;
pub mod sink;

pub use engine::{combine, diff, diff_with, merge_into};
pub use error::{DiffError, DiffResult};
pub use options::{DiffMode, DiffOptions, ResultFilter};
pub use record::{ChangeKind, DiffRecord};
pub use sink::{DiffSink, LogSink};
