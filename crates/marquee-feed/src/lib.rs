//! Movie feeds for marquee.
//!
//! A [`MovieFeed`] owns the request lifecycle of one listing source
//! (free-text search or a fixed endpoint): debouncing, dispatch, response
//! classification and the loading flag. A [`TrendingBoard`] loads the
//! search leaderboard once.

mod feed;
mod outcome;
mod report;
mod state;
mod trending;

#[cfg(test)]
mod testing;

pub use feed::{DEFAULT_DEBOUNCE, FeedConfig, MovieFeed};
pub use outcome::{
    FAILED_TO_FETCH, FetchError, FetchErrorKind, FetchOutcome, MovieRequest, NO_MOVIES_FOUND,
    TRANSPORT_ERROR, classify,
};
pub use report::{LocalSearchReporter, NoReporter, SearchReporter, TrendReporter};
pub use state::FetchState;
pub use trending::{DEFAULT_TRENDING_LIMIT, TrendingBoard};
