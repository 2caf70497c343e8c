//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie listing endpoints.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverParams, Movie, MovieListResponse, NO_POSTER, POSTER_BASE_URL, SearchMovieParams,
    TmdbErrorResponse,
};
