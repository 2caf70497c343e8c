//! Fetch state of a single movie feed.

use marquee_api::tmdb::Movie;

use crate::outcome::{FetchError, FetchOutcome};

/// Observable state of one feed.
///
/// Invariants: `error.is_some()` implies `movies.is_empty()`, and
/// `loading` is true only while the latest issued request is unresolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    /// Raw query text, updated on every keystroke.
    pub query: String,
    /// Query text after the debounce delay; drives search requests.
    pub debounced_query: String,
    /// Movies of the latest successful request.
    pub movies: Vec<Movie>,
    /// Failure of the latest request, if any.
    pub error: Option<FetchError>,
    /// A request is in flight.
    pub loading: bool,
    /// Sequence number of the latest issued request (0 before the first).
    pub issued: u64,
}

impl FetchState {
    /// Marks a new request as dispatched and returns its sequence number.
    pub(crate) fn begin(&mut self) -> u64 {
        self.issued = self.issued.saturating_add(1);
        self.loading = true;
        self.error = None;
        self.issued
    }

    /// Applies the outcome of request `seq`.
    ///
    /// Returns `false`, leaving the state untouched, when `seq` is not the
    /// latest issued request.
    pub(crate) fn finish(&mut self, seq: u64, outcome: FetchOutcome) -> bool {
        if seq != self.issued {
            return false;
        }

        self.loading = false;
        match outcome {
            FetchOutcome::Loaded(movies) => {
                self.movies = movies;
                self.error = None;
            }
            FetchOutcome::Failed(err) => {
                self.movies.clear();
                self.error = Some(err);
            }
        }
        true
    }

    /// Error message to display, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
