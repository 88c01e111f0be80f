//! Target, product and variant records
//!
//! These types are both the in-memory model and the on-disk format of the
//! store file. Identifier and price fields are opaque: whatever the storefront
//! sent (number or string) is kept and written back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar passed through from the storefront payload without interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OpaqueValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for OpaqueValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One purchasable SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: OpaqueValue,
    pub title: String,
    pub available: bool,
    pub price: OpaqueValue,
}

/// One item listed by a storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: OpaqueValue,
    pub handle: String,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Number of variants currently marked available
    pub fn available_variants(&self) -> usize {
        self.variants.iter().filter(|v| v.available).count()
    }
}

/// A monitored storefront endpoint
///
/// The target id is the key it is stored under in the
/// [`TargetStore`](crate::store::TargetStore), not a field of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Network location without scheme (e.g. `shop1.com`)
    #[serde(rename = "loc")]
    pub host: String,

    /// Request path of the JSON endpoint (e.g. `/products.json`)
    pub path: String,

    /// Products seen on the last successful fetch
    #[serde(default)]
    pub products: Vec<Product>,

    /// When the last successful fetch happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl Target {
    /// Creates a target with no products
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            products: Vec::new(),
            checked_at: None,
        }
    }

    /// `host + path`, as shown by `list`
    pub fn location(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}
