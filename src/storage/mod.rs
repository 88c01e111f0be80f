//! Storage module for persisting the target store
//!
//! This module handles reading and writing the tracked sites, including:
//! - The JSON store file used at runtime
//! - An in-memory backend for tests
//! - Startup loading with a clear distinction between "absent" and "corrupt"

mod json_file;
mod memory;
mod traits;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::store::TargetStore;
use std::path::Path;

/// Outcome of opening the store at startup
#[derive(Debug)]
pub enum StoreStatus {
    /// The store file exists and was read
    Loaded(TargetStore),
    /// There is no store file yet
    Missing,
    /// The store file exists but cannot be read or parsed
    Unusable(StorageError),
}

/// Opens the store file at `path`
///
/// Never fails: a file that exists but cannot be used is logged and
/// reported as [`StoreStatus::Unusable`], and the file is left untouched.
pub fn open_storage(path: &Path) -> (JsonFileStorage, StoreStatus) {
    let storage = JsonFileStorage::new(path);

    let status = match storage.load() {
        Ok(Some(store)) => StoreStatus::Loaded(store),
        Ok(None) => StoreStatus::Missing,
        Err(e) => {
            tracing::error!("Failed to read store {}: {}", path.display(), e);
            StoreStatus::Unusable(e)
        }
    };

    (storage, status)
}

/// Startup flow for the store file
///
/// A loaded store is used as is. A missing or unusable store is only
/// replaced with an empty one if `confirm_create` agrees; it receives the
/// status so it can word its question.
///
/// # Returns
///
/// * `Ok(Some((storage, store)))` - Ready to monitor
/// * `Ok(None)` - Creation was declined; nothing was written
/// * `Err(StorageError)` - Asking or writing the empty store failed
pub fn open_or_create<C>(
    path: &Path,
    confirm_create: C,
) -> StorageResult<Option<(JsonFileStorage, TargetStore)>>
where
    C: FnOnce(&StoreStatus) -> std::io::Result<bool>,
{
    let (mut storage, status) = open_storage(path);

    if let StoreStatus::Loaded(store) = status {
        tracing::info!("Loaded {} targets from {}", store.len(), path.display());
        return Ok(Some((storage, store)));
    }

    if !confirm_create(&status)? {
        tracing::info!("No store created at {}", path.display());
        return Ok(None);
    }

    let store = storage.create_empty()?;
    Ok(Some((storage, store)))
}
