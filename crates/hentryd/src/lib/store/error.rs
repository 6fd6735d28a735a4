use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend failure (filesystem, object store, ...)
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<crate::entry::EntryError> for StoreError {
    fn from(err: crate::entry::EntryError) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
