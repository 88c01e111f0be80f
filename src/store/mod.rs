//! Target store: the set of monitored storefronts
//!
//! The store maps a target id to its [`Target`] record and is the single unit
//! of persistence. It is a plain in-memory container; saving it is the
//! caller's job (see [`crate::monitor::Monitor`]).

mod target;

pub use target::{OpaqueValue, Product, Target, Variant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

/// Errors raised by target store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Target not found: {0}")]
    NotFound(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

/// Mapping of target id to target
///
/// Serializes as a bare JSON object keyed by id. Iteration follows key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetStore {
    targets: BTreeMap<String, Target>,
}

impl TargetStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a target with no products, replacing any target with the same id
    ///
    /// An empty `id` is replaced by `len() + 1`. That key is not checked
    /// against existing ids, so after a removal it can overwrite a live target.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The id the target was stored under
    /// * `Err(StoreError::InvalidTarget)` - Host or path is empty
    pub fn add(&mut self, id: &str, host: &str, path: &str) -> Result<String, StoreError> {
        let host = normalize_host(host);
        if host.is_empty() {
            return Err(StoreError::InvalidTarget("host cannot be empty".to_string()));
        }

        let path = normalize_path(path)
            .ok_or_else(|| StoreError::InvalidTarget("path cannot be empty".to_string()))?;

        let id = match id.trim() {
            "" => (self.targets.len() + 1).to_string(),
            given => given.to_string(),
        };

        if self.targets.contains_key(&id) {
            tracing::debug!("Replacing existing target {}", id);
        }
        self.targets.insert(id.clone(), Target::new(host, path));

        Ok(id)
    }

    /// Removes a target
    ///
    /// # Returns
    ///
    /// * `Ok(Target)` - The removed target
    /// * `Err(StoreError::NotFound)` - No target has this id; the store is unchanged
    pub fn remove(&mut self, id: &str) -> Result<Target, StoreError> {
        self.targets
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Lists `(id, host + path)` pairs in iteration order
    ///
    /// Returns `None` for an empty store instead of an empty iterator.
    pub fn list(&self) -> Option<impl Iterator<Item = (&str, String)> + '_> {
        if self.targets.is_empty() {
            return None;
        }

        Some(
            self.targets
                .iter()
                .map(|(id, target)| (id.as_str(), target.location())),
        )
    }

    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    /// Replaces the product list of a target wholesale
    ///
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub fn set_products(&mut self, id: &str, products: Vec<Product>) -> bool {
        match self.targets.get_mut(id) {
            Some(target) => {
                target.products = products;
                true
            }
            None => false,
        }
    }

    /// Records the time of a successful fetch
    pub fn mark_checked(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        match self.targets.get_mut(id) {
            Some(target) => {
                target.checked_at = Some(at);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the current ids in iteration order
    pub fn ids(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> + '_ {
        self.targets.iter().map(|(id, target)| (id.as_str(), target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Strips an `http://`/`https://` scheme (and anything after the authority)
/// from a user-supplied host
pub fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some((_, rest)) = trimmed.split_once("://") {
        if let Ok(parsed) = Url::parse(trimmed) {
            if let Some(host) = parsed.host_str() {
                return match parsed.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                };
            }
        }
        return rest.trim_end_matches('/').to_string();
    }

    trimmed.trim_end_matches('/').to_string()
}

/// Trims a request path and makes sure it starts with `/`
fn normalize_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: 1.into(),
            handle: "x".to_string(),
            variants: vec![Variant {
                id: 10.into(),
                title: "S".to_string(),
                available: true,
                price: "9.99".into(),
            }],
        }
    }

    #[test]
    fn test_add_then_list() {
        let mut store = TargetStore::new();
        let id = store.add("a", "shop1.com", "/products.json").unwrap();
        assert_eq!(id, "a");

        let listed: Vec<_> = store.list().unwrap().collect();
        assert_eq!(
            listed,
            vec![("a", "shop1.com/products.json".to_string())]
        );
    }

    #[test]
    fn test_list_empty_store_is_none() {
        let store = TargetStore::new();
        assert!(store.list().is_none());
    }

    #[test]
    fn test_add_without_id_uses_count_plus_one() {
        let mut store = TargetStore::new();
        assert_eq!(store.add("", "shop1.com", "/products.json").unwrap(), "1");
        assert_eq!(store.add("  ", "shop2.com", "/products.json").unwrap(), "2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_auto_id_can_overwrite_after_remove() {
        let mut store = TargetStore::new();
        store.add("", "shop1.com", "/products.json").unwrap();
        store.add("", "shop2.com", "/products.json").unwrap();
        store.remove("1").unwrap();

        // len() is 1 again, so the next generated key collides with "2"
        let id = store.add("", "shop3.com", "/products.json").unwrap();
        assert_eq!(id, "2");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2").unwrap().host, "shop3.com");
    }

    #[test]
    fn test_readd_replaces_and_resets_products() {
        let mut store = TargetStore::new();
        store.add("a", "shop1.com", "/products.json").unwrap();
        assert!(store.set_products("a", vec![sample_product()]));

        store.add("a", "shop9.com", "/collections/all.json").unwrap();

        assert_eq!(store.len(), 1);
        let target = store.get("a").unwrap();
        assert_eq!(target.host, "shop9.com");
        assert_eq!(target.path, "/collections/all.json");
        assert!(target.products.is_empty());
    }

    #[test]
    fn test_remove_missing_reports_not_found() {
        let mut store = TargetStore::new();
        store.add("a", "shop1.com", "/products.json").unwrap();
        let before = store.clone();

        assert_eq!(
            store.remove("zzz"),
            Err(StoreError::NotFound("zzz".to_string()))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_existing() {
        let mut store = TargetStore::new();
        store.add("a", "shop1.com", "/products.json").unwrap();
        let removed = store.remove("a").unwrap();
        assert_eq!(removed.host, "shop1.com");
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_empty_host_or_path() {
        let mut store = TargetStore::new();
        assert!(matches!(
            store.add("a", "", "/products.json"),
            Err(StoreError::InvalidTarget(_))
        ));
        assert!(matches!(
            store.add("a", "https://", "/products.json"),
            Err(StoreError::InvalidTarget(_))
        ));
        assert!(matches!(
            store.add("a", "shop1.com", "  "),
            Err(StoreError::InvalidTarget(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_products_unknown_id() {
        let mut store = TargetStore::new();
        assert!(!store.set_products("ghost", vec![sample_product()]));
        assert!(store.is_empty());
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("shop1.com"), "shop1.com");
        assert_eq!(normalize_host("https://shop1.com"), "shop1.com");
        assert_eq!(normalize_host("http://shop1.com/"), "shop1.com");
        assert_eq!(normalize_host("https://shop1.com:8443/x"), "shop1.com:8443");
        assert_eq!(normalize_host("  shop1.com/ "), "shop1.com");
    }

    #[test]
    fn test_path_gets_leading_slash() {
        let mut store = TargetStore::new();
        store.add("a", "shop1.com", "products.json").unwrap();
        assert_eq!(store.get("a").unwrap().path, "/products.json");
    }

    #[test]
    fn test_store_file_shape() {
        let mut store = TargetStore::new();
        store.add("a", "shop1.com", "/products.json").unwrap();

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"a": {"loc": "shop1.com", "path": "/products.json", "products": []}})
        );
    }
}
