//! Test doubles for the movie API, the trend store and reporters.
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};
use marquee_api::tmdb::{DiscoverParams, Movie, MovieListResponse, SearchMovieParams, TmdbApi};
use marquee_api::trends::{TrendStore, TrendingEntry};

use crate::report::SearchReporter;

pub const BATMAN_JSON: &str = include_str!("../../../fixtures/tmdb/search_movie_batman.json");
pub const EMPTY_JSON: &str = include_str!("../../../fixtures/tmdb/search_movie_empty.json");
pub const DISCOVER_JSON: &str = include_str!("../../../fixtures/tmdb/discover_movie.json");
pub const TOP_RATED_JSON: &str = include_str!("../../../fixtures/tmdb/top_rated.json");

/// Parses a listing body.
pub fn listing(json: &str) -> MovieListResponse {
    serde_json::from_str(json).unwrap()
}

/// Scripted reply for one request key.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Time the request takes.
    pub delay: Duration,
    /// Body to decode, `None` for a transport failure.
    pub body: Option<&'static str>,
}

impl Reply {
    pub const fn body(body: &'static str) -> Self {
        Self {
            delay: Duration::ZERO,
            body: Some(body),
        }
    }

    pub const fn failure() -> Self {
        Self {
            delay: Duration::ZERO,
            body: None,
        }
    }

    pub const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Movie API that answers from a script keyed by `search:<q>`, `discover`
/// or `listing:<endpoint>`. Unscripted searches return the batman fixture,
/// unscripted discover/listing return the discover fixture.
#[derive(Debug, Default)]
pub struct ScriptedTmdb {
    calls: Mutex<Vec<String>>,
    replies: Mutex<HashMap<String, Reply>>,
}

impl ScriptedTmdb {
    pub fn reply(self, key: &str, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(String::from(key), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, key: String) -> Result<MovieListResponse> {
        self.calls.lock().unwrap().push(key.clone());
        let scripted = self.replies.lock().unwrap().get(&key).cloned();
        let reply = scripted.unwrap_or_else(|| {
            if key.starts_with("search:") {
                Reply::body(BATMAN_JSON)
            } else {
                Reply::body(DISCOVER_JSON)
            }
        });

        tokio::time::sleep(reply.delay).await;
        match reply.body {
            Some(body) => Ok(serde_json::from_str(body)?),
            None => bail!("request failed: connection refused"),
        }
    }
}

impl TmdbApi for ScriptedTmdb {
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieListResponse> {
        self.answer(format!("search:{}", params.query)).await
    }

    async fn discover_movies(&self, _params: &DiscoverParams) -> Result<MovieListResponse> {
        self.answer(String::from("discover")).await
    }

    async fn fetch_listing(&self, endpoint: &str) -> Result<MovieListResponse> {
        self.answer(format!("listing:{endpoint}")).await
    }
}

/// Reporter that records every report.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, u64)>>,
    fail: bool,
}

impl RecordingReporter {
    pub fn failing() -> Self {
        Self {
            reports: Mutex::default(),
            fail: true,
        }
    }

    pub fn reports(&self) -> Vec<(String, u64)> {
        self.reports.lock().unwrap().clone()
    }
}

impl SearchReporter for RecordingReporter {
    async fn report(&self, term: &str, top: &Movie) -> Result<()> {
        self.reports
            .lock()
            .unwrap()
            .push((String::from(term), top.id));
        if self.fail {
            bail!("trend store unreachable");
        }
        Ok(())
    }
}

/// In-memory trend store.
#[derive(Debug, Default)]
pub struct MemoryTrendStore {
    recorded: Mutex<Vec<(String, u64)>>,
    entries: Vec<TrendingEntry>,
    fail: bool,
    lookups: Mutex<u32>,
}

impl MemoryTrendStore {
    pub fn with_entries(entries: Vec<TrendingEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<(String, u64)> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> u32 {
        *self.lookups.lock().unwrap()
    }
}

impl TrendStore for MemoryTrendStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<()> {
        self.recorded
            .lock()
            .unwrap()
            .push((String::from(term), movie.id));
        Ok(())
    }

    async fn top_searches(&self, limit: u32) -> Result<Vec<TrendingEntry>> {
        *self.lookups.lock().unwrap() += 1;
        if self.fail {
            bail!("trend store error (HTTP 503)");
        }
        let limit = usize::try_from(limit).unwrap();
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}

/// A leaderboard entry for `term`.
pub fn entry(id: &str, term: &str, count: u64) -> TrendingEntry {
    TrendingEntry {
        id: String::from(id),
        title: term.to_uppercase(),
        poster_url: None,
        search_term: String::from(term),
        count,
    }
}
