//! Trending-search providers.
//!
//! The external "today's top searches" capability is an opaque collaborator
//! behind the [`TrendProvider`] trait. The default implementation talks to
//! the Google Trends daily-trends endpoint; tests substitute a mock server
//! via [`GoogleTrendsProvider::with_base_url`] or a hand-rolled trait impl.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::ProviderError;
use crate::user_agent;

/// Default base URL for the Google Trends API.
pub const DEFAULT_TRENDS_BASE_URL: &str = "https://trends.google.com";

/// Connect timeout for provider requests, in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout for provider requests, in seconds.
const READ_TIMEOUT_SECS: u64 = 60;

/// Host language sent with every provider request.
const HOST_LANGUAGE: &str = "en-US";

/// Timezone offset (minutes) sent with every provider request.
const TIMEZONE_OFFSET: i32 = 360;

/// An external source of today's trending search queries.
///
/// Implementations may fail with connection, timeout, TLS, or
/// response-format errors; callers are expected to treat each region's
/// lookup as an isolated failure domain.
#[async_trait]
pub trait TrendProvider: Send + Sync {
    /// Returns today's trending-search URIs for one region.
    ///
    /// Each element is a URI-like string of the form
    /// `/trends/explore?q=<query>&date=...&geo=<code>`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on any network or payload failure.
    async fn today_searches(&self, region_code: &str) -> Result<Vec<String>, ProviderError>;
}

/// [`TrendProvider`] backed by the Google Trends daily-trends endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTrendsProvider {
    client: Client,
    base_url: String,
}

impl Default for GoogleTrendsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTrendsProvider {
    /// Creates a provider pointed at the real Google Trends API.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_TRENDS_BASE_URL)
    }

    /// Creates a provider pointed at an alternate base URL (used by tests).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TrendProvider for GoogleTrendsProvider {
    #[instrument(skip(self))]
    async fn today_searches(&self, region_code: &str) -> Result<Vec<String>, ProviderError> {
        let url = format!(
            "{}/trends/api/dailytrends?hl={HOST_LANGUAGE}&tz={TIMEZONE_OFFSET}&geo={region_code}&ns=15",
            self.base_url
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(region_code)
            } else {
                ProviderError::network(region_code, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::http_status(region_code, status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(region_code)
            } else {
                ProviderError::network(region_code, e)
            }
        })?;

        let uris = parse_daily_trends(region_code, &body)?;
        debug!(region = region_code, uris = uris.len(), "trends retrieved");
        Ok(uris)
    }
}

/// XSSI guard prefix Google prepends to every JSON API payload.
const XSSI_PREFIX: &str = ")]}',";

/// Parses a daily-trends payload into explore-link URIs.
///
/// The payload starts with an XSSI guard line, followed by JSON nesting the
/// actual searches under `default.trendingSearchesDays[].trendingSearches[]`.
fn parse_daily_trends(region_code: &str, body: &str) -> Result<Vec<String>, ProviderError> {
    let json = body
        .trim_start()
        .strip_prefix(XSSI_PREFIX)
        .unwrap_or(body)
        .trim_start();

    let payload: DailyTrendsPayload = serde_json::from_str(json)
        .map_err(|e| ProviderError::response_format(region_code, e))?;

    Ok(payload
        .default
        .trending_searches_days
        .into_iter()
        .flat_map(|day| day.trending_searches)
        .map(|search| search.title.explore_link)
        .collect())
}

#[derive(Debug, Deserialize)]
struct DailyTrendsPayload {
    default: DailyTrendsDefault,
}

#[derive(Debug, Deserialize)]
struct DailyTrendsDefault {
    #[serde(rename = "trendingSearchesDays", default)]
    trending_searches_days: Vec<TrendingSearchesDay>,
}

#[derive(Debug, Deserialize)]
struct TrendingSearchesDay {
    #[serde(rename = "trendingSearches", default)]
    trending_searches: Vec<TrendingSearch>,
}

#[derive(Debug, Deserialize)]
struct TrendingSearch {
    title: TrendingSearchTitle,
}

#[derive(Debug, Deserialize)]
struct TrendingSearchTitle {
    #[serde(rename = "exploreLink")]
    explore_link: String,
}
