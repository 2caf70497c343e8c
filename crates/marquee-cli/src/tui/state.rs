//! Browser state management.

use marquee_api::tmdb::Movie;
use marquee_api::trends::TrendingEntry;
use marquee_feed::FetchState;

use super::animation::{Carousel, Reveal};

/// Headline revealed character by character on start.
pub const HEADLINE: &str = "Find Movies You'll Enjoy Without the Hassle";

/// Carousel auto-advance period, in ticks.
pub const CAROUSEL_ADVANCE_TICKS: u32 = 25;

/// Which widget receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The search input.
    Search,
    /// The top-rated carousel.
    Carousel,
}

/// What a movie section shows. Exactly one variant applies at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionView<'a> {
    /// A request is in flight.
    Loading,
    /// The latest request failed.
    Error(&'a str),
    /// The latest request succeeded with nothing to show.
    Empty,
    /// Movies to show.
    Populated(&'a [Movie]),
}

impl<'a> SectionView<'a> {
    /// Picks the view for `state`, showing at most `limit` movies.
    #[must_use]
    pub fn of(state: &'a FetchState, limit: Option<usize>) -> Self {
        if state.loading {
            return Self::Loading;
        }
        if let Some(message) = state.error_message() {
            return Self::Error(message);
        }
        let movies = limit.map_or(state.movies.as_slice(), |limit| {
            state
                .movies
                .get(..limit.min(state.movies.len()))
                .unwrap_or_default()
        });
        if movies.is_empty() {
            Self::Empty
        } else {
            Self::Populated(movies)
        }
    }
}

/// Result of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing to forward.
    None,
    /// The query text changed.
    QueryChanged,
    /// Leave the browser.
    Quit,
}

/// State for the movie browser TUI.
#[derive(Debug)]
pub struct BrowserState {
    /// Query text as typed.
    pub query: String,
    /// Widget receiving keys.
    pub focus: Focus,
    /// Search feed ("Latest Movies").
    pub latest: FetchState,
    /// Fixed-endpoint feed ("Top Rated Movies").
    pub top_rated: FetchState,
    /// Trending searches, in rank order.
    pub trending: Vec<TrendingEntry>,
    /// Top-rated carousel position.
    pub carousel: Carousel,
    /// Headline intro.
    pub intro: Reveal,
    /// Staggered reveal of the trending strip, keyed by entry id.
    pub trending_reveal: Reveal,
    /// First visible row of the latest list.
    pub list_offset: usize,
    carousel_limit: usize,
}

impl BrowserState {
    /// Creates the initial state.
    #[must_use]
    pub fn new(carousel_limit: usize) -> Self {
        let mut intro = Reveal::new();
        let headline: Vec<char> = HEADLINE.chars().collect();
        intro.sync(&headline);
        Self {
            query: String::new(),
            focus: Focus::Search,
            latest: FetchState::default(),
            top_rated: FetchState::default(),
            trending: Vec::new(),
            carousel: Carousel::new(CAROUSEL_ADVANCE_TICKS),
            intro,
            trending_reveal: Reveal::new(),
            list_offset: 0,
            carousel_limit,
        }
    }

    /// Number of movies the carousel shows.
    #[must_use]
    pub const fn carousel_limit(&self) -> usize {
        self.carousel_limit
    }

    /// View of the top-rated section.
    #[must_use]
    pub fn top_rated_view(&self) -> SectionView<'_> {
        SectionView::of(&self.top_rated, Some(self.carousel_limit))
    }

    /// View of the latest section.
    #[must_use]
    pub fn latest_view(&self) -> SectionView<'_> {
        SectionView::of(&self.latest, None)
    }

    /// Replaces the search feed state.
    pub fn update_latest(&mut self, latest: FetchState) {
        if latest.movies != self.latest.movies {
            self.list_offset = 0;
        }
        self.latest = latest;
    }

    /// Replaces the top-rated feed state and reconfigures the carousel.
    pub fn update_top_rated(&mut self, top_rated: FetchState) {
        self.top_rated = top_rated;
        let shown = self.top_rated.movies.len().min(self.carousel_limit);
        let active = Carousel::should_run(
            Some(self.carousel_limit),
            shown,
            self.top_rated.loading,
            self.top_rated.error.is_some(),
        );
        self.carousel.configure(shown, active);
    }

    /// Replaces the trending entries, restarting the reveal when they differ.
    pub fn set_trending(&mut self, entries: Vec<TrendingEntry>) {
        let ids: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        self.trending_reveal.sync(&ids);
        self.trending = entries;
    }

    /// Trending entries revealed so far.
    #[must_use]
    pub fn visible_trending(&self) -> &[TrendingEntry] {
        let shown = self.trending_reveal.visible().min(self.trending.len());
        self.trending.get(..shown).unwrap_or_default()
    }

    /// Advances the animations by one tick.
    pub fn tick(&mut self) {
        self.intro.tick();
        self.trending_reveal.tick();
        self.carousel.tick();
    }

    /// Visible part of the headline.
    #[must_use]
    pub fn headline(&self) -> String {
        HEADLINE.chars().take(self.intro.visible()).collect()
    }

    /// Appends a character to the query.
    pub fn query_push(&mut self, c: char) {
        self.query.push(c);
    }

    /// Removes the last character of the query. Returns whether it changed.
    pub fn query_pop(&mut self) -> bool {
        self.query.pop().is_some()
    }

    /// Moves focus between the search input and the carousel.
    pub const fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Carousel,
            Focus::Carousel => Focus::Search,
        };
    }

    /// Scrolls the latest list up one row.
    pub const fn scroll_up(&mut self) {
        self.list_offset = self.list_offset.saturating_sub(1);
    }

    /// Scrolls the latest list down one row.
    pub fn scroll_down(&mut self) {
        if self.list_offset.saturating_add(1) < self.latest.movies.len() {
            self.list_offset = self.list_offset.saturating_add(1);
        }
    }
}
