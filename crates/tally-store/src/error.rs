use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter key may not be blank")]
    EmptyKey,

    #[error("storage error: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
