//! Error types for the snapshot store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O errors from the snapshot file or its lock.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another run holds the store lock.
    #[error("store is locked, {} already exists", .path.display())]
    Locked { path: PathBuf },
}
