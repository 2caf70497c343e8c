//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DiscoverParams, MovieListResponse, SearchMovieParams};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Searches for movies by free text, most popular first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieListResponse>;

    /// Lists popular movies (`discover/movie` sorted by popularity).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_movies(&self, params: &DiscoverParams) -> Result<MovieListResponse>;

    /// Fetches a fixed listing such as `movie/top_rated?language=en-US&page=1`.
    ///
    /// `endpoint` is resolved against the client's base URL; absolute URLs
    /// must share its origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is on a foreign origin, or the HTTP
    /// request or JSON parsing fails.
    async fn fetch_listing(&self, endpoint: &str) -> Result<MovieListResponse>;
}
