//! Trending-search keyword harvesting.
//!
//! This module provides the [`TrendKeywordHarvester`], which queries an
//! external trending-search provider once per region over a bounded worker
//! pool and extracts keyword tokens from the returned explore-link URIs.
//!
//! # Concurrency Model
//!
//! - Each region lookup runs in its own Tokio task
//! - A semaphore permit is acquired before starting each lookup
//! - Permits are released automatically when lookups complete (RAII)
//! - The caller blocks until every region's task has completed (fan-in);
//!   there is no streaming and no early return
//!
//! # Failure Model
//!
//! A connection, timeout, TLS, or response-format failure in one region
//! degrades that region's result to empty. It never aborts or affects the
//! other regions' tasks.

mod error;
mod extract;
mod provider;

pub use error::ProviderError;
pub use extract::keywords_from_uris;
pub use provider::{DEFAULT_TRENDS_BASE_URL, GoogleTrendsProvider, TrendProvider};

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// Default number of concurrent region lookups.
pub const HARVEST_CONCURRENCY: usize = 15;

/// A region to harvest trending searches for: an ISO country code paired
/// with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// ISO 3166 country code sent to the provider.
    pub code: String,
    /// Human-readable display name, used only for logging.
    pub name: String,
}

impl Region {
    /// Creates a region from a code and display name.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Harvests trending-search keywords across regions concurrently.
pub struct TrendKeywordHarvester {
    provider: Arc<dyn TrendProvider>,
    concurrency: usize,
}

impl std::fmt::Debug for TrendKeywordHarvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendKeywordHarvester")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl TrendKeywordHarvester {
    /// Creates a harvester over the given provider with the default
    /// concurrency bound.
    #[must_use]
    pub fn new(provider: Arc<dyn TrendProvider>) -> Self {
        Self::with_concurrency(provider, HARVEST_CONCURRENCY)
    }

    /// Creates a harvester with an explicit concurrency bound (used by tests).
    #[must_use]
    pub fn with_concurrency(provider: Arc<dyn TrendProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    /// Returns the configured concurrency bound.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Harvests keywords for every region and returns their union.
    ///
    /// All regions are submitted to the worker pool and this method waits
    /// for every lookup to complete. A failed region contributes an empty
    /// result; the harvest itself never fails.
    #[instrument(skip(self, regions), fields(regions = regions.len()))]
    pub async fn harvest(&self, regions: &[Region]) -> HashSet<String> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(regions.len());

        for region in regions {
            // Closed only if the semaphore is dropped, which it never is
            // while handles are outstanding; treat closure as an empty region.
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                warn!(region = %region.code, "worker pool closed, skipping region");
                continue;
            };

            let provider = Arc::clone(&self.provider);
            let region = region.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                debug!(region = %region.code, name = %region.name, "retrieving searches");
                match provider.today_searches(&region.code).await {
                    Ok(uris) => uris,
                    Err(e) => {
                        warn!(region = %region.code, error = %e, "trend lookup failed");
                        Vec::new()
                    }
                }
            }));
        }

        // Fan-in: concatenate every region's URIs before tokenizing.
        let mut uris = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(region_uris) => uris.extend(region_uris),
                Err(e) => warn!(error = %e, "region lookup task panicked"),
            }
        }

        let keywords = keywords_from_uris(&uris);
        info!(
            uris = uris.len(),
            keywords = keywords.len(),
            "harvest complete"
        );
        keywords
    }
}
