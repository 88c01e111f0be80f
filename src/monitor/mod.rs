//! Monitor module for storefront polling
//!
//! This module contains the core monitoring logic, including:
//! - HTTP fetching of storefront JSON endpoints
//! - Best-effort product extraction
//! - Fixed-interval pacing between cycles
//! - Overall cycle coordination and persistence

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use coordinator::{CycleReport, Monitor};
pub use extractor::{extract, parse_products, ExtractError};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::storage::Storage;
use crate::store::TargetStore;
use crate::WatchError;

/// Builds a monitor that fetches over HTTPS
///
/// # Arguments
///
/// * `config` - The loaded configuration
/// * `store` - The target store read at startup
/// * `storage` - Where the store is saved after every change and cycle
///
/// # Returns
///
/// * `Ok(Monitor)` - Ready to accept commands or run cycles
/// * `Err(WatchError)` - The HTTP client could not be built
///
/// # Example
///
/// ```no_run
/// use storefront_watch::config::Config;
/// use storefront_watch::monitor::build_monitor;
/// use storefront_watch::storage::JsonFileStorage;
/// use storefront_watch::store::TargetStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let storage = JsonFileStorage::new(&config.store.path);
/// let mut monitor = build_monitor(&config, TargetStore::new(), storage)?;
/// monitor.run_cycle().await;
/// # Ok(())
/// # }
/// ```
pub fn build_monitor<S: Storage>(
    config: &Config,
    store: TargetStore,
    storage: S,
) -> Result<Monitor<HttpFetcher, S>, WatchError> {
    let client = build_http_client(&config.http)?;
    let fetcher = HttpFetcher::new(client);
    let scheduler = Scheduler::from_config(&config.monitor);

    Ok(Monitor::new(store, fetcher, storage, scheduler))
}
