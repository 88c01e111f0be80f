//! Payload extraction
//!
//! Turns a raw `products.json` body into [`Product`] records. Extraction is
//! best-effort: a malformed payload yields an empty product list and a log
//! line, never an error that could stop the cycle.

use crate::store::{Product, TargetStore};
use serde::Deserialize;
use thiserror::Error;

/// Why a payload could not be turned into products
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("payload is empty")]
    Empty,

    #[error("invalid products payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level shape of the storefront endpoint; other fields are ignored
#[derive(Debug, Deserialize)]
struct ProductsPayload {
    products: Vec<Product>,
}

/// Parses a payload strictly
///
/// `products` must be a JSON array. Each product needs `id`, `handle` and
/// `variants`; each variant needs `id`, `title`, `available` and `price`.
pub fn parse_products(payload: &str) -> Result<Vec<Product>, ExtractError> {
    if payload.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    let parsed: ProductsPayload = serde_json::from_str(payload)?;
    Ok(parsed.products)
}

/// Extracts the products for `target_id` from a fetched payload
///
/// Returns an empty list when the payload is empty, the target is not in the
/// store, or the payload does not parse. The store is only read.
pub fn extract(payload: &str, target_id: &str, store: &TargetStore) -> Vec<Product> {
    if !store.contains(target_id) {
        tracing::warn!("Ignoring payload for unknown target {}", target_id);
        return Vec::new();
    }

    match parse_products(payload) {
        Ok(products) => {
            tracing::debug!("Extracted {} products for {}", products.len(), target_id);
            products
        }
        Err(e) => {
            tracing::warn!("Could not extract products for {}: {}", target_id, e);
            Vec::new()
        }
    }
}
