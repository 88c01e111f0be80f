//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::store::TargetStore;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed store file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// A backend holds exactly one [`TargetStore`]. Every save replaces the
/// previous contents in full.
pub trait Storage {
    /// Whether a store has been written to this backend
    fn exists(&self) -> bool;

    /// Loads the stored targets
    ///
    /// # Returns
    ///
    /// * `Ok(Some(TargetStore))` - The store was read successfully
    /// * `Ok(None)` - No store exists yet
    /// * `Err(StorageError)` - The store exists but could not be read or parsed
    fn load(&self) -> StorageResult<Option<TargetStore>>;

    /// Writes the whole store, overwriting what was there
    fn save(&mut self, store: &TargetStore) -> StorageResult<()>;
}
