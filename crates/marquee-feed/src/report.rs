//! Post-success hook invoked after a search finds movies.
#![allow(clippy::future_not_send)]

use std::sync::Arc;

use anyhow::Result;
use marquee_api::tmdb::Movie;
use marquee_api::trends::TrendStore;

/// Receives each successful, non-empty search together with its top result.
///
/// The feed runs the hook on its own task; errors are logged there and
/// never reach the feed's state.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(SearchReporter: Send)]
pub trait LocalSearchReporter {
    /// Reports that `term` was searched and `top` was its first result.
    ///
    /// # Errors
    ///
    /// Returns an error if the report could not be delivered.
    async fn report(&self, term: &str, top: &Movie) -> Result<()>;
}

/// Reporter that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReporter;

impl SearchReporter for NoReporter {
    async fn report(&self, _term: &str, _top: &Movie) -> Result<()> {
        Ok(())
    }
}

/// Reporter that records searches in a shared trend store.
#[derive(Debug)]
pub struct TrendReporter<S> {
    store: Arc<S>,
}

impl<S> TrendReporter<S> {
    /// Wraps `store`.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: TrendStore + Sync> SearchReporter for TrendReporter<S> {
    async fn report(&self, term: &str, top: &Movie) -> Result<()> {
        self.store.record_search(term, top).await
    }
}
