use thiserror::Error;

/// Errors produced by value model operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A kind token or element tag that names no known value kind.
    #[error("unknown value kind: {0}")]
    UnknownValueKind(String),

    /// Input that does not decode under the requested encoding.
    #[error("malformed {encoding} input: {reason}")]
    MalformedEncoding { encoding: String, reason: String },
}

impl TypeError {
    pub(crate) fn malformed(encoding: &str, reason: impl Into<String>) -> Self {
        Self::MalformedEncoding {
            encoding: encoding.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for value model results.
pub type TypeResult<T> = Result<T, TypeError>;
