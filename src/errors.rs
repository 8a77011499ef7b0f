use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("WRONG_KIND: {0}")]
    WrongKind(String),
    #[error("INVALID_OPERATION: {0}")]
    InvalidOperation(String),
    #[error("PERSISTENCE: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
