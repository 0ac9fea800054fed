use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("document has no file to save to")]
    NoSource,

    #[error("invalid state document: {0}")]
    InvalidState(String),

    #[error("type error: {0}")]
    Type(#[from] pdoc_types::TypeError),

    #[error("path error: {0}")]
    Path(#[from] pdoc_path::PathError),

    #[error("diff error: {0}")]
    Diff(#[from] pdoc_diff::DiffError),

    #[error("codec error: {0}")]
    Codec(#[from] pdoc_codec::CodecError),
}

pub type SdkResult<T> = Result<T, SdkError>;
