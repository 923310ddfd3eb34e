use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Client-supplied input the store cannot accept.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// Stored data that does not have the shape of a document.
    #[error("corrupt stored document: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(e: sea_orm::DbErr) -> Self {
        StorageError::Db(e.to_string())
    }
}
