//! Keyword extraction from harvested explore-link URIs.

use std::collections::HashSet;

use tracing::debug;

/// Leading path prefix of every explore-link URI the provider returns.
const EXPLORE_PREFIX: &str = "/trends/explore?q=";

/// Minimum keyword length, in characters. Shorter tokens are discarded.
const MIN_KEYWORD_CHARS: usize = 3;

/// Extracts keyword tokens from explore-link URIs.
///
/// For each URI: strip the `/trends/explore?q=` prefix, cut the trailing
/// query-string suffix at the first `&`, percent-decode, then split on the
/// literal `+` separator (the provider's space encoding). Tokens longer than
/// 2 characters become keywords; case is preserved as found.
#[must_use]
pub fn keywords_from_uris<I, S>(uris: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keywords = HashSet::new();

    for uri in uris {
        let uri = uri.as_ref();
        let query = uri.strip_prefix(EXPLORE_PREFIX).unwrap_or(uri);
        let query = query.split('&').next().unwrap_or(query);
        let decoded = urlencoding::decode(query).unwrap_or_else(|e| {
            debug!(query = %query, error = %e, "percent-decoding failed, using raw query");
            query.into()
        });

        for word in decoded.split('+') {
            if word.chars().count() >= MIN_KEYWORD_CHARS {
                keywords.insert(word.to_string());
            }
        }
    }

    keywords
}
