//! In-memory storage backend

use crate::storage::traits::{Storage, StorageResult};
use crate::store::TargetStore;

/// Keeps the last saved store in memory and counts saves
///
/// Used by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saved: Option<TargetStore>,
    save_count: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn saved(&self) -> Option<&TargetStore> {
        self.saved.as_ref()
    }
}

impl Storage for MemoryStorage {
    fn exists(&self) -> bool {
        self.saved.is_some()
    }

    fn load(&self) -> StorageResult<Option<TargetStore>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, store: &TargetStore) -> StorageResult<()> {
        self.saved = Some(store.clone());
        self.save_count += 1;
        Ok(())
    }
}
