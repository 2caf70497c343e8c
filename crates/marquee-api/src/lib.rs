//! API client library for marquee.
//!
//! Provides clients for the TMDB movie API and the trend document store.

mod pacer;

/// TMDB API client.
pub mod tmdb;

/// Trend document store client.
pub mod trends;
