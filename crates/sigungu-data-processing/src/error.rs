use std::path::PathBuf;

use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Corpus file not found: {}", .0.display())]
    CorpusNotFound(PathBuf),
    #[error("Corpus contains no district names")]
    EmptyCorpus,
    #[error("Token cap must be at least 1")]
    InvalidTokenCap,
}
