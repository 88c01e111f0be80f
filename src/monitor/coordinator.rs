//! Monitor coordinator - main monitoring loop
//!
//! This module owns the target store and drives every cycle:
//! - Fetching each target's endpoint in store order, one at a time
//! - Extracting products and writing them back into the store
//! - Persisting the whole store once per cycle
//! - Sleeping for the fixed interval until cancelled
//!
//! It also exposes the add/remove/list operations used by the command prompt,
//! so every store mutation goes through the same persistence path.

use crate::monitor::extractor::extract;
use crate::monitor::fetcher::{FetchResult, Fetcher};
use crate::monitor::scheduler::Scheduler;
use crate::storage::Storage;
use crate::store::{Target, TargetStore};
use crate::WatchError;
use chrono::Utc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Outcome of a single cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: u64,
    /// Targets visited
    pub targets: usize,
    /// Targets whose products were replaced
    pub updated: usize,
    /// Targets left stale because no response arrived
    pub fetch_failures: usize,
    /// Targets that answered with a non-2xx status
    pub http_errors: usize,
    /// Fetched targets whose payload yielded no products
    pub empty_payloads: usize,
    /// Products stored across all updated targets
    pub products: usize,
    /// Whether the end-of-cycle save succeeded
    pub saved: bool,
    /// Wall time spent in the cycle
    pub duration: Duration,
}

/// Main monitor structure
pub struct Monitor<F, S> {
    store: TargetStore,
    fetcher: F,
    storage: S,
    scheduler: Scheduler,
    cycles: u64,
}

impl<F: Fetcher, S: Storage> Monitor<F, S> {
    /// Creates a monitor over an already loaded store
    pub fn new(store: TargetStore, fetcher: F, storage: S, scheduler: Scheduler) -> Self {
        Self {
            store,
            fetcher,
            storage,
            scheduler,
            cycles: 0,
        }
    }

    pub fn store(&self) -> &TargetStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of cycles run to completion so far
    ///
    /// A cycle cancelled part way through is not counted.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Adds or replaces a target and persists the store
    ///
    /// An empty `id` gets an auto-assigned key (see [`TargetStore::add`]).
    /// A failed save is logged; the in-memory change is kept.
    pub fn register_target(
        &mut self,
        id: &str,
        host: &str,
        path: &str,
    ) -> Result<String, WatchError> {
        let id = self.store.add(id, host, path)?;
        tracing::info!(
            "Registered target {} -> {}",
            id,
            self.store.get(&id).map(Target::location).unwrap_or_default()
        );
        self.persist();
        Ok(id)
    }

    /// Removes a target and persists the store
    ///
    /// An unknown id is logged as a warning and returned as
    /// [`StoreError::NotFound`](crate::store::StoreError::NotFound); nothing is saved.
    pub fn unregister_target(&mut self, id: &str) -> Result<Target, WatchError> {
        match self.store.remove(id) {
            Ok(target) => {
                tracing::info!("Removed target {}", id);
                self.persist();
                Ok(target)
            }
            Err(e) => {
                tracing::warn!("Cannot remove target: {}", e);
                Err(e.into())
            }
        }
    }

    /// Lists `(id, host + path)` pairs, or `None` when nothing is tracked
    pub fn list_targets(&self) -> Option<impl Iterator<Item = (&str, String)> + '_> {
        self.store.list()
    }

    /// Runs one full cycle
    ///
    /// Each target is fetched, extracted and written back in turn. A fetch
    /// that gets no response leaves that target's products untouched. Any
    /// response body, whatever its status, goes through extraction, so an
    /// unparseable payload or error page replaces them with an empty list.
    /// The store is saved exactly once at the end, whatever happened to
    /// individual targets.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();

        let mut report = CycleReport {
            cycle: self.cycles + 1,
            ..CycleReport::default()
        };

        for id in self.store.ids() {
            let (host, path) = match self.store.get(&id) {
                Some(target) => (target.host.clone(), target.path.clone()),
                None => continue,
            };
            report.targets += 1;

            let body = match self.fetcher.fetch(&host, &path).await {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError {
                    status_code, body, ..
                } => {
                    tracing::debug!("Target {}: extracting HTTP {} body", id, status_code);
                    report.http_errors += 1;
                    body
                }
                FetchResult::NetworkError { .. } => {
                    tracing::debug!("Target {}: keeping previous products", id);
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let products = extract(&body, &id, &self.store);
            if products.is_empty() {
                report.empty_payloads += 1;
            }
            report.products += products.len();

            tracing::debug!("Target {}: {} products", id, products.len());
            self.store.set_products(&id, products);
            self.store.mark_checked(&id, Utc::now());
            report.updated += 1;
        }

        report.saved = self.persist();
        report.duration = started.elapsed();
        self.cycles = report.cycle;

        tracing::info!(
            "Cycle {}: {} targets, {} updated, {} fetch failures, {} HTTP errors, {} products ({:?})",
            report.cycle,
            report.targets,
            report.updated,
            report.fetch_failures,
            report.http_errors,
            report.products,
            report.duration
        );

        report
    }

    /// Runs cycles until `cancel` fires
    ///
    /// Cancellation is honoured both between cycles and in the middle of
    /// one; an interrupted cycle is not saved.
    ///
    /// # Returns
    ///
    /// The number of cycles that ran to completion.
    pub async fn run(&mut self, cancel: &CancellationToken) -> u64 {
        tracing::info!(
            "Monitoring {} targets every {:?}",
            self.store.len(),
            self.scheduler.interval()
        );

        let mut completed = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Monitoring cancelled");
                    break;
                }
                _ = self.run_cycle() => {
                    completed += 1;
                }
            }

            if !self.scheduler.wait(cancel).await {
                break;
            }
        }

        tracing::info!("Monitoring stopped after {} cycles", completed);
        completed
    }

    /// Saves the store, logging failures
    fn persist(&mut self) -> bool {
        match self.storage.save(&self.store) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save target store: {}", e);
                false
            }
        }
    }
}
