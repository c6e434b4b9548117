use pickscope_syntax::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Document is not open: {0}")]
    DocumentNotOpen(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ParseError> for PickscopeError {
    fn from(err: ParseError) -> Self {
        PickscopeError::Parsing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PickscopeError>;
