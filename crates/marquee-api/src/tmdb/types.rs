//! TMDB API response types and request parameters.

use serde::Deserialize;

/// Base URL for poster images at the `w500` size.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Placeholder shown for movies without a poster.
pub const NO_POSTER: &str = "/no-movie.png";

// --- Movie ---

/// A single movie as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Synopsis.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Average rating.
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
}

impl Movie {
    /// Rating with one decimal place, or `No rating` when unrated.
    #[must_use]
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{v:.1}"),
            _ => String::from("No rating"),
        }
    }

    /// Release year, or `No data` when the date is missing.
    #[must_use]
    pub fn year_label(&self) -> &str {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
            .unwrap_or("No data")
    }

    /// Full poster URL, or the placeholder when the movie has no poster.
    #[must_use]
    pub fn poster_url(&self) -> String {
        self.poster_path.as_deref().map_or_else(
            || String::from(NO_POSTER),
            |path| format!("{POSTER_BASE_URL}/{}", path.trim_start_matches('/')),
        )
    }
}

/// Deserializes a nullable string into an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Listing response ---

/// Response body shared by `search/movie`, `discover/movie` and the
/// fixed listings such as `movie/top_rated`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies on this page.
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Total number of results.
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Logical success flag. `Some(false)` means the request was rejected.
    #[serde(default)]
    pub success: Option<bool>,
    /// Message accompanying a rejection.
    #[serde(default)]
    pub status_message: Option<String>,
}

// --- Error ---

/// TMDB API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB-specific status code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Always `false` for errors.
    #[serde(default)]
    pub success: bool,
}

// --- Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Parameters for `discover/movie` endpoint (popularity ordered).
#[derive(Debug, Clone)]
pub struct DiscoverParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl Default for DiscoverParams {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            page: 1,
        }
    }
}

impl DiscoverParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
