//! Availability statistics for the target store
//!
//! This module provides functionality for summarising what the last cycles
//! stored and printing it.

use crate::store::TargetStore;
use chrono::{DateTime, Utc};

/// Per-target numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStatistics {
    pub id: String,
    pub location: String,
    pub products: usize,
    pub variants: usize,
    pub available_variants: usize,
    pub checked_at: Option<DateTime<Utc>>,
}

/// Store-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Number of tracked targets
    pub total_targets: usize,

    /// Total products across all targets
    pub total_products: usize,

    /// Total variants across all targets
    pub total_variants: usize,

    /// Variants currently marked available
    pub available_variants: usize,

    /// Targets that have never been fetched successfully
    pub never_checked: Vec<String>,

    /// Breakdown per target, in store order
    pub targets: Vec<TargetStatistics>,
}

impl StoreStatistics {
    /// Share of variants that are available, in percent
    pub fn availability_rate(&self) -> f64 {
        if self.total_variants == 0 {
            return 0.0;
        }
        (self.available_variants as f64 / self.total_variants as f64) * 100.0
    }
}

/// Computes statistics from the store
pub fn load_statistics(store: &TargetStore) -> StoreStatistics {
    let mut stats = StoreStatistics::default();

    for (id, target) in store.iter() {
        let variants: usize = target.products.iter().map(|p| p.variants.len()).sum();
        let available: usize = target.products.iter().map(|p| p.available_variants()).sum();

        stats.total_targets += 1;
        stats.total_products += target.products.len();
        stats.total_variants += variants;
        stats.available_variants += available;

        if target.checked_at.is_none() {
            stats.never_checked.push(id.to_string());
        }

        stats.targets.push(TargetStatistics {
            id: id.to_string(),
            location: target.location(),
            products: target.products.len(),
            variants,
            available_variants: available,
            checked_at: target.checked_at,
        });
    }

    stats
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Overview:");
    println!("  Targets: {}", stats.total_targets);
    println!("  Products: {}", stats.total_products);
    println!("  Variants: {}", stats.total_variants);
    println!(
        "  Available variants: {} ({:.1}%)",
        stats.available_variants,
        stats.availability_rate()
    );
    println!();

    if !stats.targets.is_empty() {
        println!("Targets:");
        for target in &stats.targets {
            let checked = target
                .checked_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "  {} ({}): {} products, {}/{} variants available, checked {}",
                target.id,
                target.location,
                target.products,
                target.available_variants,
                target.variants,
                checked
            );
        }
        println!();
    }

    if !stats.never_checked.is_empty() {
        println!("Never checked ({}):", stats.never_checked.len());
        for id in &stats.never_checked {
            println!("  - {}", id);
        }
    }
}
