//! Passvet Core Library
//!
//! This library builds a local dictionary of common words and keywords by
//! concurrently downloading per-language wordlist files and harvesting
//! trending-search terms, then validates candidate passwords against a
//! four-gate policy (length, sequential runs, character-class diversity,
//! dictionary substring match).
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cache`] - Local cache for remote text resources (download-once-per-run)
//! - [`trends`] - Concurrent trending-search keyword harvesting
//! - [`wordlist`] - Dictionary assembly and the built-in source catalogs
//! - [`policy`] - The four-gate password policy validator
//!
//! Data flows aggregator → (cache, harvester) → [`wordlist::CommonWordSet`]
//! → validator. The aggregator instance is constructed explicitly by the
//! caller and passed by reference; there is no hidden module-level state.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod policy;
pub mod trends;
pub mod wordlist;

pub(crate) mod user_agent;

// Re-export commonly used types
pub use cache::{CacheError, ResourceCache};
pub use policy::{
    MIN_CHARACTER_CLASSES, MIN_PASSWORD_LENGTH, PasswordPolicyValidator, PolicyGate, Verdict,
};
pub use trends::{
    GoogleTrendsProvider, HARVEST_CONCURRENCY, ProviderError, Region, TrendKeywordHarvester,
    TrendProvider,
};
pub use wordlist::{
    CACHE_SUBDIR, CommonWordSet, DOWNLOAD_CONCURRENCY, WordlistAggregator, WordlistSource,
};
