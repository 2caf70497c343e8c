//! Movie requests and classification of their results.

use std::fmt;

use anyhow::Result;
use marquee_api::tmdb::{DiscoverParams, Movie, MovieListResponse, SearchMovieParams, TmdbApi};

/// Shown when the listing succeeded but matched nothing.
pub const NO_MOVIES_FOUND: &str = "No movies found. Try a different search term.";

/// Shown when the API rejected the request without a message.
pub const FAILED_TO_FETCH: &str = "Failed to fetch movies";

/// Shown for transport failures (HTTP status, network, decoding).
pub const TRANSPORT_ERROR: &str = "Error fetching movies. Please try again later.";

/// Why a listing has no movies to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Non-success status, network failure or undecodable body.
    Transport,
    /// The API answered but flagged the request as failed.
    Rejected,
    /// The API answered with zero total results.
    NoResults,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport failure"),
            Self::Rejected => write!(f, "request rejected"),
            Self::NoResults => write!(f, "no results"),
        }
    }
}

/// A user-facing fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    /// Failure class.
    pub kind: FetchErrorKind,
    /// Message to display.
    pub message: String,
}

impl FetchError {
    /// Creates an error of `kind` with `message`.
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

/// Terminal result of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Movies to show, in API order.
    Loaded(Vec<Movie>),
    /// Nothing to show.
    Failed(FetchError),
}

/// Classifies a listing response.
///
/// A rejected or empty listing is a valid answer and is not logged; a
/// transport failure is logged with its full cause chain.
#[must_use]
pub fn classify(result: Result<MovieListResponse>) -> FetchOutcome {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Error fetching movies: {err:#}");
            return FetchOutcome::Failed(FetchError::new(FetchErrorKind::Transport, TRANSPORT_ERROR));
        }
    };

    if response.success == Some(false) {
        let message = response
            .status_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| String::from(FAILED_TO_FETCH));
        return FetchOutcome::Failed(FetchError::new(FetchErrorKind::Rejected, message));
    }

    if response.total_results == Some(0) {
        return FetchOutcome::Failed(FetchError::new(FetchErrorKind::NoResults, NO_MOVIES_FOUND));
    }

    FetchOutcome::Loaded(response.results)
}

/// One request against the movie API.
#[derive(Debug, Clone)]
pub enum MovieRequest {
    /// Free-text search.
    Search(SearchMovieParams),
    /// Popularity ordered listing, used for an empty search.
    Discover(DiscoverParams),
    /// A fixed endpoint such as `movie/top_rated?language=en-US&page=1`.
    Listing(String),
}

impl MovieRequest {
    /// Builds the search-mode request for `query`: discover when empty.
    #[must_use]
    pub fn for_query(query: &str, language: &str) -> Self {
        if query.is_empty() {
            Self::Discover(DiscoverParams::default().language(language))
        } else {
            Self::Search(SearchMovieParams::new(query).language(language))
        }
    }

    /// The search term, for requests that record trends.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        match self {
            Self::Search(params) if !params.query.is_empty() => Some(&params.query),
            _ => None,
        }
    }

    /// Sends the request and classifies the response.
    pub async fn fetch<A: TmdbApi + Sync>(&self, api: &A) -> FetchOutcome {
        let result = match self {
            Self::Search(params) => api.search_movies(params).await,
            Self::Discover(params) => api.discover_movies(params).await,
            Self::Listing(endpoint) => api.fetch_listing(endpoint).await,
        };
        classify(result)
    }
}

impl fmt::Display for MovieRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(params) => write!(f, "search {:?}", params.query),
            Self::Discover(_) => write!(f, "discover"),
            Self::Listing(endpoint) => write!(f, "listing {endpoint}"),
        }
    }
}
