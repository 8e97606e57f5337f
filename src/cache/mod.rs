//! Local cache for remote plain-text resources.
//!
//! This module provides [`ResourceCache`], which makes sure a remote text
//! file (a wordlist, typically) exists on disk under a configurable root,
//! downloading it at most once per run per file.
//!
//! # Known race
//!
//! The existence fast path is intentionally unsynchronized: two concurrent
//! callers asking for the same URL can both miss, both fetch, and both write
//! the file. Only directory creation is guarded by a mutex; the file write
//! itself is not deduplicated. The writes are byte-identical in practice so
//! the last one wins, but this is a real, known race, not a feature.
//!
//! # Example
//!
//! ```no_run
//! use passvet_core::cache::ResourceCache;
//! use std::path::Path;
//!
//! # async fn example() {
//! let cache = ResourceCache::new(Path::new("./cache"));
//! let ok = cache
//!     .ensure("https://example.com/wordlists/english.txt", Some("wordlists"))
//!     .await;
//! println!("cached: {ok}");
//! # }
//! ```

mod error;

pub use error::CacheError;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::user_agent;

/// Default connect timeout for resource fetches, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout for resource fetches, in seconds.
///
/// Wordlist files are small (tens of KB); two minutes is generous.
pub const READ_TIMEOUT_SECS: u64 = 120;

/// Ensures remote text resources exist locally, fetching each at most once
/// per run.
///
/// The cache root is an explicit configuration value supplied at
/// construction; no working-directory state is consulted or mutated.
#[derive(Debug)]
pub struct ResourceCache {
    client: Client,
    root: PathBuf,
    /// Guards directory creation only. See the module docs for the
    /// deliberately-unsynchronized parts of the ensure path.
    dir_lock: Mutex<()>,
}

impl ResourceCache {
    /// Creates a cache rooted at `root` with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self::new_with_timeouts(root, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a cache rooted at `root` with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(root: &Path, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            root: root.to_path_buf(),
            dir_lock: Mutex::new(()),
        }
    }

    /// Returns the configured cache root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the local path a URL maps to, or `None` for unusable URLs.
    ///
    /// The mapping is deterministic: the URL's final path segment, inside
    /// `subdir` (when given) under the cache root.
    #[must_use]
    pub fn local_path(&self, url: &str, subdir: Option<&str>) -> Option<PathBuf> {
        self.target_path(url, subdir).ok()
    }

    /// Makes sure the resource at `url` exists in the cache.
    ///
    /// Returns `true` if the file is present when this call completes
    /// (already cached, or fetched and written now), `false` on any failure.
    /// Failures are logged and degrade to `false`; nothing propagates to the
    /// caller and nothing is written on a failed fetch. There are no retries:
    /// a fetch failure is permanent for this call.
    ///
    /// A second call for an already-cached URL performs zero network
    /// requests.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn ensure(&self, url: &str, subdir: Option<&str>) -> bool {
        match self.ensure_inner(url, subdir).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "resource fetch failed");
                false
            }
        }
    }

    async fn ensure_inner(&self, url: &str, subdir: Option<&str>) -> Result<(), CacheError> {
        let target = self.target_path(url, subdir)?;

        // Unsynchronized fast path: may race a concurrent ensure() of the
        // same URL. Both callers can miss here and both fetch below.
        if target.exists() {
            debug!(path = %target.display(), "cache hit");
            return Ok(());
        }

        let body = self.fetch(url).await?;

        {
            let _guard = self
                .dir_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            // Re-check under the lock so the winner of a directory-creation
            // race does the work once. The file write below stays outside
            // the lock and is NOT deduplicated.
            if !target.exists()
                && let Some(parent) = target.parent()
            {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CacheError::io(parent.to_path_buf(), e))?;
            }
        }

        tokio::fs::write(&target, &body)
            .await
            .map_err(|e| CacheError::io(target.clone(), e))?;

        info!(path = %target.display(), bytes = body.len(), "resource cached");
        Ok(())
    }

    /// Single blocking-style GET of the resource body. No retries.
    async fn fetch(&self, url: &str) -> Result<String, CacheError> {
        debug!("fetching resource");
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CacheError::timeout(url)
            } else {
                CacheError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::http_status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                CacheError::timeout(url)
            } else {
                CacheError::network(url, e)
            }
        })
    }

    fn target_path(&self, url: &str, subdir: Option<&str>) -> Result<PathBuf, CacheError> {
        let parsed = Url::parse(url).map_err(|_| CacheError::invalid_url(url.to_string()))?;
        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| CacheError::invalid_url(url.to_string()))?;

        let mut path = self.root.clone();
        if let Some(subdir) = subdir {
            path.push(subdir);
        }
        path.push(file_name);
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> ResourceCache {
        ResourceCache::new(dir.path())
    }

    #[test]
    fn test_local_path_uses_final_url_segment() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        let path = cache
            .local_path("https://example.com/lists/english.txt", None)
            .unwrap();
        assert_eq!(path, temp_dir.path().join("english.txt"));
    }

    #[test]
    fn test_local_path_places_file_inside_subdir() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        let path = cache
            .local_path("https://example.com/lists/german.txt", Some("wordlists"))
            .unwrap();
        assert_eq!(path, temp_dir.path().join("wordlists").join("german.txt"));
    }

    #[test]
    fn test_local_path_rejects_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        assert!(cache.local_path("not-a-valid-url", None).is_none());
    }

    #[test]
    fn test_local_path_rejects_url_without_file_segment() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        assert!(cache.local_path("https://example.com/", None).is_none());
    }

    // These two never reach the network, so a plain block_on runtime is
    // enough; no #[tokio::test] machinery needed.
    #[test]
    fn test_ensure_returns_true_for_preexisting_file_without_network() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        // Seed the file by hand; the URL's host does not even resolve, so a
        // network attempt would fail and return false.
        std::fs::write(temp_dir.path().join("seeded.txt"), "hello\n").unwrap();

        let ok = tokio_test::block_on(cache.ensure("http://no-such-host.invalid/seeded.txt", None));
        assert!(ok, "pre-existing file must satisfy ensure without network");
    }

    #[test]
    fn test_ensure_returns_false_for_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        assert!(!tokio_test::block_on(cache.ensure("not-a-valid-url", None)));
    }

    #[tokio::test]
    async fn test_ensure_returns_false_on_connection_failure_and_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        let ok = cache
            .ensure("http://no-such-host.invalid/english.txt", Some("wordlists"))
            .await;
        assert!(!ok);

        // Nothing gets written on a failed fetch, not even the subdirectory.
        assert!(!temp_dir.path().join("wordlists").exists());
    }
}
