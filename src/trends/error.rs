//! Error types for the trending-search provider.

use thiserror::Error;

/// Errors that can occur while querying a trending-search provider.
///
/// The harvester catches every one of these at the per-region boundary and
/// degrades that region's result to empty, so none of them ever aborts a
/// harvest.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error querying trends for region {region}: {source}")]
    Network {
        /// The region code being queried.
        region: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout querying trends for region {region}")]
    Timeout {
        /// The region code being queried.
        region: String,
    },

    /// HTTP error response from the provider.
    #[error("HTTP {status} querying trends for region {region}")]
    HttpStatus {
        /// The region code being queried.
        region: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provider returned a payload that does not parse as expected.
    #[error("malformed trends response for region {region}: {source}")]
    ResponseFormat {
        /// The region code being queried.
        region: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    /// Creates a network error from a reqwest error.
    pub fn network(region: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            region: region.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(region: impl Into<String>) -> Self {
        Self::Timeout {
            region: region.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(region: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            region: region.into(),
            status,
        }
    }

    /// Creates a response-format error.
    pub fn response_format(region: impl Into<String>, source: serde_json::Error) -> Self {
        Self::ResponseFormat {
            region: region.into(),
            source,
        }
    }
}
