//! Dictionary assembly from wordlist downloads and trend harvesting.
//!
//! This module provides the [`WordlistAggregator`], which orchestrates the
//! [`ResourceCache`] over a fixed catalog of per-language wordlist sources
//! and the [`TrendKeywordHarvester`] over a fixed catalog of regions, then
//! unions every resulting token into one [`CommonWordSet`].
//!
//! The set is built lazily on the first [`WordlistAggregator::build`] call
//! and memoized for the lifetime of the aggregator; there is no
//! invalidation or refresh. The whole dictionary is held in memory, which
//! is fine at the scale of a handful of wordlist files but is a known
//! scaling limit.

mod sources;

pub use sources::{CACHE_SUBDIR, WordlistSource, builtin_regions, builtin_sources};

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{OnceCell, Semaphore};
use tracing::{debug, info, instrument, warn};

use crate::cache::ResourceCache;
use crate::trends::{Region, TrendKeywordHarvester};

/// Number of concurrent wordlist downloads. Independent of the harvester's
/// pool; no ordering holds between the two.
pub const DOWNLOAD_CONCURRENCY: usize = 10;

/// Minimum token length, in characters, for a wordlist line to count as a
/// keyword. Blank and trivially-short lines would otherwise poison the
/// substring gate (an empty token is a substring of every password).
const MIN_TOKEN_CHARS: usize = 3;

/// The aggregated dictionary of common tokens.
///
/// Unique elements, no meaningful order, immutable once built. Safe for
/// unsynchronized concurrent reads by any number of validator invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonWordSet {
    words: HashSet<String>,
}

impl CommonWordSet {
    /// Returns the number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the dictionary holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns `true` if the exact token is present.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Iterates over the tokens in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Returns every dictionary token that appears as a substring of the
    /// password. Matching is case-sensitive; no normalization is applied on
    /// either side.
    #[must_use]
    pub fn common<'a>(&'a self, password: &str) -> HashSet<&'a str> {
        self.words
            .iter()
            .filter(|token| password.contains(token.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<String> for CommonWordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

/// Builds the canonical [`CommonWordSet`] once per instance.
///
/// Lifecycle is owned by the caller: construct one aggregator, share it by
/// reference, and the first `build()` does the work. Subsequent calls return
/// the memoized result without re-fetching anything.
pub struct WordlistAggregator {
    cache: Arc<ResourceCache>,
    harvester: TrendKeywordHarvester,
    regions: Vec<Region>,
    sources: Vec<WordlistSource>,
    /// Cache subdirectory scanned in the final union step.
    subdir: String,
    download_concurrency: usize,
    offline: bool,
    dictionary: OnceCell<Arc<CommonWordSet>>,
}

impl std::fmt::Debug for WordlistAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordlistAggregator")
            .field("regions", &self.regions.len())
            .field("sources", &self.sources.len())
            .field("subdir", &self.subdir)
            .field("offline", &self.offline)
            .finish_non_exhaustive()
    }
}

impl WordlistAggregator {
    /// Creates an aggregator over the built-in region and source catalogs.
    #[must_use]
    pub fn new(cache: Arc<ResourceCache>, harvester: TrendKeywordHarvester) -> Self {
        Self::with_catalog(
            cache,
            harvester,
            builtin_regions(),
            builtin_sources(),
            CACHE_SUBDIR,
        )
    }

    /// Creates an aggregator over an explicit catalog (used by tests).
    #[must_use]
    pub fn with_catalog(
        cache: Arc<ResourceCache>,
        harvester: TrendKeywordHarvester,
        regions: Vec<Region>,
        sources: Vec<WordlistSource>,
        subdir: &str,
    ) -> Self {
        Self {
            cache,
            harvester,
            regions,
            sources,
            subdir: subdir.to_string(),
            download_concurrency: DOWNLOAD_CONCURRENCY,
            offline: false,
            dictionary: OnceCell::new(),
        }
    }

    /// Skips harvesting and downloading entirely; the dictionary is built
    /// from whatever files already sit in the cache subdirectory.
    #[must_use]
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Builds the dictionary, or returns the memoized result of an earlier
    /// call.
    ///
    /// Never fails: every network-class failure inside degrades its unit of
    /// work (one region, one source) to an empty contribution, so a fully
    /// offline run still yields whatever the local cache holds — possibly
    /// an empty set.
    #[instrument(skip(self))]
    pub async fn build(&self) -> Arc<CommonWordSet> {
        Arc::clone(
            self.dictionary
                .get_or_init(|| async { Arc::new(self.assemble().await) })
                .await,
        )
    }

    async fn assemble(&self) -> CommonWordSet {
        let mut words = if self.offline {
            debug!("offline mode, skipping trend harvest");
            HashSet::new()
        } else {
            self.harvester.harvest(&self.regions).await
        };

        if !self.offline {
            self.download_sources().await;
        }

        let file_tokens = self.read_cached_files();
        words.extend(file_tokens);

        info!(tokens = words.len(), "dictionary assembled");
        words.into_iter().collect()
    }

    /// Fans `ResourceCache::ensure` out over the source catalog on its own
    /// bounded pool and waits for every download to settle.
    async fn download_sources(&self) {
        let semaphore = Arc::new(Semaphore::new(self.download_concurrency));
        let mut handles = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                warn!(url = %source.url, "worker pool closed, skipping source");
                continue;
            };

            let cache = Arc::clone(&self.cache);
            let source = source.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                cache.ensure(&source.url, source.subdir.as_deref()).await
            }));
        }

        let mut fetched = 0usize;
        let mut failed = 0usize;
        for handle in handles {
            match handle.await {
                Ok(true) => fetched += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    warn!(error = %e, "download task panicked");
                    failed += 1;
                }
            }
        }

        info!(fetched, failed, "wordlist downloads settled");
    }

    /// Unions token lines from every file currently present in the cache
    /// subdirectory — including files left over from previous runs, not
    /// only the ones just downloaded.
    fn read_cached_files(&self) -> HashSet<String> {
        let dir = self.cache.root().join(&self.subdir);
        let mut tokens = HashSet::new();

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "cache subdirectory not readable");
                return tokens;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            match std::fs::read_to_string(&path) {
                Ok(contents) => {
                    let before = tokens.len();
                    tokens.extend(
                        contents
                            .lines()
                            .map(|line| line.trim_end_matches('\r'))
                            .filter(|line| line.chars().count() >= MIN_TOKEN_CHARS)
                            .map(str::to_string),
                    );
                    debug!(
                        path = %path.display(),
                        tokens = tokens.len() - before,
                        "wordlist file read"
                    );
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable wordlist file");
                }
            }
        }

        tokens
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::trends::{ProviderError, TrendProvider};

    struct CountingProvider {
        calls: AtomicUsize,
        uris: Vec<String>,
    }

    impl CountingProvider {
        fn with_uris(uris: Vec<String>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                uris,
            })
        }

        fn failing() -> Arc<Self> {
            Self::with_uris(Vec::new())
        }
    }

    #[async_trait]
    impl TrendProvider for CountingProvider {
        async fn today_searches(&self, region_code: &str) -> Result<Vec<String>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.uris.is_empty() {
                Err(ProviderError::timeout(region_code))
            } else {
                Ok(self.uris.clone())
            }
        }
    }

    fn aggregator_in(
        dir: &TempDir,
        provider: Arc<dyn TrendProvider>,
        regions: Vec<Region>,
        sources: Vec<WordlistSource>,
    ) -> WordlistAggregator {
        let cache = Arc::new(ResourceCache::new(dir.path()));
        let harvester = TrendKeywordHarvester::new(provider);
        WordlistAggregator::with_catalog(cache, harvester, regions, sources, CACHE_SUBDIR)
    }

    fn seed_wordlist(dir: &TempDir, name: &str, contents: &str) {
        let subdir = dir.path().join(CACHE_SUBDIR);
        std::fs::create_dir_all(&subdir).unwrap();
        std::fs::write(subdir.join(name), contents).unwrap();
    }

    #[test]
    fn test_common_word_set_common_matches_substrings_case_sensitively() {
        let set: CommonWordSet = ["monkey", "Dragon", "qwerty"]
            .into_iter()
            .map(String::from)
            .collect();

        let hits = set.common("xxmonkeyDragonxx");
        assert!(hits.contains("monkey"));
        assert!(hits.contains("Dragon"));
        assert!(!hits.contains("qwerty"));

        // Case-sensitive: "dragon" in the password does not match "Dragon".
        assert!(set.common("firedragon").is_empty());
    }

    #[test]
    fn test_common_word_set_empty_has_no_matches() {
        let set = CommonWordSet::default();
        assert!(set.is_empty());
        assert!(set.common("anything").is_empty());
    }

    #[tokio::test]
    async fn test_build_unions_harvest_and_preexisting_files() {
        let temp_dir = TempDir::new().unwrap();
        seed_wordlist(&temp_dir, "leftover.txt", "monkey\ndragon\nab\n\n");

        let provider = CountingProvider::with_uris(vec![
            "/trends/explore?q=solar+eclipse&geo=US".to_string(),
        ]);
        let aggregator = aggregator_in(
            &temp_dir,
            provider,
            vec![Region::new("US", "US")],
            Vec::new(),
        );

        let set = aggregator.build().await;

        // Harvested tokens and file lines land in one set.
        assert!(set.contains("solar"));
        assert!(set.contains("eclipse"));
        assert!(set.contains("monkey"));
        assert!(set.contains("dragon"));
        // Sub-3-character lines and blanks are not tokens.
        assert!(!set.contains("ab"));
        assert!(!set.contains(""));
    }

    #[tokio::test]
    async fn test_build_never_fails_when_everything_is_offline() {
        let temp_dir = TempDir::new().unwrap();
        seed_wordlist(&temp_dir, "cached.txt", "password\nletmein\n");

        let provider = CountingProvider::failing();
        let aggregator = aggregator_in(
            &temp_dir,
            provider,
            vec![Region::new("US", "US"), Region::new("GB", "UK")],
            vec![WordlistSource::in_subdir(
                "http://no-such-host.invalid/english.txt",
                CACHE_SUBDIR,
            )],
        );

        let set = aggregator.build().await;
        assert!(set.contains("password"));
        assert!(set.contains("letmein"));
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn test_build_with_nothing_available_yields_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        let provider = CountingProvider::failing();
        let aggregator = aggregator_in(&temp_dir, provider, Vec::new(), Vec::new());

        let set = aggregator.build().await;
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_build_is_memoized_and_does_not_requery() {
        let temp_dir = TempDir::new().unwrap();
        let provider = CountingProvider::with_uris(vec![
            "/trends/explore?q=first+run&geo=US".to_string(),
        ]);
        let aggregator = aggregator_in(
            &temp_dir,
            provider.clone(),
            vec![Region::new("US", "US")],
            Vec::new(),
        );

        let first = aggregator.build().await;
        let calls_after_first = provider.calls.load(Ordering::SeqCst);
        let second = aggregator.build().await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), calls_after_first);
        assert!(Arc::ptr_eq(&first, &second), "memoized Arc must be reused");
    }

    #[tokio::test]
    async fn test_offline_mode_skips_harvest_entirely() {
        let temp_dir = TempDir::new().unwrap();
        seed_wordlist(&temp_dir, "local.txt", "offline\n");

        let provider = CountingProvider::with_uris(vec![
            "/trends/explore?q=should+not+appear&geo=US".to_string(),
        ]);
        let aggregator = aggregator_in(
            &temp_dir,
            provider.clone(),
            vec![Region::new("US", "US")],
            Vec::new(),
        )
        .offline(true);

        let set = aggregator.build().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(set.contains("offline"));
        assert!(!set.contains("should"));
    }
}
