use async_trait::async_trait;
use erased_serde::Serialize as ErasedSerialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationError(String),

    #[error("Serialization failed: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::OperationError(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::SerializationError(error.to_string())
    }
}

/// Every artifact a run produces.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum StorageCategory {
    Topics,
    Answers,
    SearchScreenshot,
    TopicScreenshot(String),
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Serializes `data` as JSON, replacing whatever the category held.
    async fn store_serialized(
        &self,
        category: StorageCategory,
        data: &(dyn ErasedSerialize + Sync),
    ) -> Result<PathBuf, StorageError>;

    async fn store_bytes(
        &self,
        category: StorageCategory,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError>;
}
