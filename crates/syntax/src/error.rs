use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Incompatible grammar: {0}")]
    Language(String),
    #[error("Parser produced no tree")]
    NoTree,
}
