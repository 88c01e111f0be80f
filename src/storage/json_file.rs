//! JSON file storage backend

use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::store::TargetStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the target store in a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a backend for the given file; nothing is read or written yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes an empty store, creating the file
    pub fn create_empty(&mut self) -> StorageResult<TargetStore> {
        let store = TargetStore::new();
        self.save(&store)?;
        tracing::info!("Created empty store at {}", self.path.display());
        Ok(store)
    }
}

impl Storage for JsonFileStorage {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> StorageResult<Option<TargetStore>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No store file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let store: TargetStore =
            serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
                path: self.path.display().to_string(),
                source,
            })?;

        tracing::debug!(
            "Loaded {} targets from {}",
            store.len(),
            self.path.display()
        );
        Ok(Some(store))
    }

    fn save(&mut self, store: &TargetStore) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(store)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;

        tracing::debug!("Saved {} targets to {}", store.len(), self.path.display());
        Ok(())
    }
}
