//! Trend document store client module.
//!
//! Keeps one counter document per search term in a hosted document
//! collection and reads back the most searched terms.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTrendStore, TrendStore};
#[allow(clippy::module_name_repetitions)]
pub use client::{TrendStoreClient, TrendStoreClientBuilder};
pub use types::{
    DocumentList, NewTrendDocument, PLACEHOLDER_POSTER_URL, Query, TrendDocument, TrendingEntry,
};
