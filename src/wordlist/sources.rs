//! Built-in region and wordlist-source catalogs.

use crate::trends::Region;

/// Shared cache subdirectory every built-in wordlist source downloads into.
pub const CACHE_SUBDIR: &str = "wordlists";

/// A remote wordlist: a URL plus an optional storage subdirectory.
///
/// The source maps deterministically to one local file, named by the URL's
/// final path segment, inside the subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistSource {
    /// URL of the plain-text, one-token-per-line wordlist file.
    pub url: String,
    /// Storage subdirectory under the cache root, if any.
    pub subdir: Option<String>,
}

impl WordlistSource {
    /// Creates a source stored directly under the cache root.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            subdir: None,
        }
    }

    /// Creates a source stored inside a subdirectory of the cache root.
    pub fn in_subdir(url: impl Into<String>, subdir: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            subdir: Some(subdir.into()),
        }
    }
}

/// Regions whose trending searches seed the dictionary.
#[must_use]
pub fn builtin_regions() -> Vec<Region> {
    [
        ("US", "US"),
        ("CA", "Canada"),
        ("AU", "Australia"),
        ("GB", "UK"),
        ("NZ", "New Zealand"),
        ("AR", "Argentina"),
        ("AT", "Austria"),
        ("BE", "Belgium"),
        ("BR", "Brazil"),
        ("BG", "Bulgaria"),
        ("CL", "Chile"),
        ("HK", "Hong Kong"),
    ]
    .into_iter()
    .map(|(code, name)| Region::new(code, name))
    .collect()
}

/// Base URL of the per-language most-common-words lists.
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/oprogramador/most-common-words-by-language/master/src/resources";

/// Languages with a built-in wordlist source.
const WORDLIST_LANGUAGES: &[&str] = &[
    "english",
    "spanish",
    "french",
    "german",
    "portuguese",
    "italian",
    "dutch",
    "russian",
    "polish",
    "swedish",
    "norwegian",
    "danish",
    "finnish",
    "turkish",
    "czech",
    "romanian",
    "hungarian",
    "greek",
    "ukrainian",
    "indonesian",
];

/// Per-language wordlist sources, all targeting the shared cache
/// subdirectory.
#[must_use]
pub fn builtin_sources() -> Vec<WordlistSource> {
    WORDLIST_LANGUAGES
        .iter()
        .map(|language| {
            WordlistSource::in_subdir(
                format!("{WORDLIST_BASE_URL}/{language}.txt"),
                CACHE_SUBDIR,
            )
        })
        .collect()
}
