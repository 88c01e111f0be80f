//! Markdown availability report
//!
//! This module renders the target store as a human-readable markdown report:
//! an overview followed by one section per target listing its products and
//! which variants are in stock.

use crate::output::stats::load_statistics;
use crate::output::OutputResult;
use crate::store::TargetStore;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for `store` to `output_path`
pub fn generate_markdown_summary(store: &TargetStore, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(store, Utc::now());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats the store as markdown
pub fn format_markdown_summary(store: &TargetStore, generated_at: DateTime<Utc>) -> String {
    let stats = load_statistics(store);
    let mut md = String::new();

    md.push_str("# Storefront-Watch Availability Report\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Targets**: {}\n", stats.total_targets));
    md.push_str(&format!("- **Products**: {}\n", stats.total_products));
    md.push_str(&format!(
        "- **Available Variants**: {} / {} ({:.1}%)\n\n",
        stats.available_variants,
        stats.total_variants,
        stats.availability_rate()
    ));

    if store.is_empty() {
        md.push_str("_No targets are being tracked._\n");
        return md;
    }

    for (id, target) in store.iter() {
        md.push_str(&format!("## {} ({})\n\n", id, target.location()));

        match target.checked_at {
            Some(at) => md.push_str(&format!(
                "Last checked: {}\n\n",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            None => md.push_str("Last checked: never\n\n"),
        }

        if target.products.is_empty() {
            md.push_str("_No products recorded._\n\n");
            continue;
        }

        md.push_str("| Product | Variant | Price | Available |\n");
        md.push_str("|---------|---------|-------|-----------|\n");
        for product in &target.products {
            for variant in &product.variants {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    escape_cell(&product.handle),
                    escape_cell(&variant.title),
                    variant.price,
                    if variant.available { "yes" } else { "no" }
                ));
            }
        }
        md.push('\n');
    }

    md
}

/// Keeps table cells on one line and off the column separators
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
