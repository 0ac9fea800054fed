//! Error types for the codec crate.

use pdoc_types::TypeError;
use thiserror::Error;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not well-formed XML or not a property list.
    #[error("parse error: {reason}")]
    Parse { reason: String },

    /// An element that is not one of the known value tags.
    #[error("unknown value kind: <{0}>")]
    UnknownValueKind(String),

    /// A `<data>` or `<date>` payload that does not decode.
    #[error(transparent)]
    MalformedEncoding(#[from] TypeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;
