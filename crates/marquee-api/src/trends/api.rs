//! `TrendStore` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::TrendingEntry;
use crate::tmdb::Movie;

/// Trend document store trait.
///
/// Abstracts store operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TrendStore: Send)]
pub trait LocalTrendStore {
    /// Records one search for `term`, creating its counter on first use.
    ///
    /// `movie` is stored as the term's representative when the counter is
    /// created.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying requests fail.
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<()>;

    /// Returns the `limit` most searched terms, highest count first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn top_searches(&self, limit: u32) -> Result<Vec<TrendingEntry>>;
}
