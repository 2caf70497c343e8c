//! Debounced, sequence-numbered movie feed.
//!
//! Each [`MovieFeed`] is driven by one background task that owns the
//! [`FetchState`]. Commands from the handle (query edits, endpoint changes)
//! and request completions are processed in order on that task; readers
//! observe the state through a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use marquee_api::tmdb::{Movie, TmdbApi};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::outcome::{FetchOutcome, MovieRequest};
use crate::report::SearchReporter;
use crate::state::FetchState;

/// Delay between the last query edit and the search it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Feed tuning.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Quiet period before a query edit becomes a request.
    pub debounce: Duration,
    /// Language sent with search and discover requests.
    pub language: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            language: String::from("en-US"),
        }
    }
}

#[derive(Debug)]
enum Command {
    SetQuery(String),
    SetEndpoint(Option<String>),
}

#[derive(Debug)]
struct Completion {
    seq: u64,
    request: MovieRequest,
    outcome: FetchOutcome,
}

/// Handle to a running movie feed.
///
/// Dropping the handle stops the feed. Requests already in flight finish
/// but their results are discarded.
#[derive(Debug)]
pub struct MovieFeed {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<FetchState>,
}

impl MovieFeed {
    /// Starts a feed and dispatches its initial request.
    ///
    /// With an `endpoint` the feed lists that endpoint and ignores the
    /// query; without one it searches the debounced query, falling back to
    /// discover for an empty query. `reporter` is told about every current
    /// search that returns at least one movie.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<A, R>(
        api: Arc<A>,
        reporter: Arc<R>,
        endpoint: Option<String>,
        config: FeedConfig,
    ) -> Self
    where
        A: TmdbApi + Sync + 'static,
        R: SearchReporter + Sync + 'static,
    {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let (published, state) = watch::channel(FetchState::default());

        let mut driver = Driver {
            api,
            reporter,
            config,
            endpoint,
            state: FetchState::default(),
            published,
            done_tx,
        };
        driver.dispatch();
        tokio::spawn(driver.run(commands_rx, done_rx));

        Self { commands, state }
    }

    /// Replaces the raw query text.
    pub fn set_query(&self, query: impl Into<String>) {
        self.send(Command::SetQuery(query.into()));
    }

    /// Switches between endpoint mode (`Some`) and search mode (`None`).
    pub fn set_endpoint(&self, endpoint: Option<String>) {
        self.send(Command::SetEndpoint(endpoint));
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.clone()
    }

    /// Waits until the latest issued request has resolved.
    ///
    /// Returns `None` once the feed has stopped.
    pub async fn settled(&mut self) -> Option<FetchState> {
        self.state
            .wait_for(|s| !s.loading && s.issued > 0)
            .await
            .ok()
            .map(|state| FetchState::clone(&state))
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!("movie feed stopped, command dropped");
        }
    }
}

struct Driver<A, R> {
    api: Arc<A>,
    reporter: Arc<R>,
    config: FeedConfig,
    endpoint: Option<String>,
    state: FetchState,
    published: watch::Sender<FetchState>,
    done_tx: mpsc::UnboundedSender<Completion>,
}

impl<A, R> Driver<A, R>
where
    A: TmdbApi + Sync + 'static,
    R: SearchReporter + Sync + 'static,
{
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut done: mpsc::UnboundedReceiver<Completion>,
    ) {
        let debounce = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(debounce);
        let mut armed = false;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    let rearm = match command {
                        Command::SetQuery(query) => self.set_query(query),
                        Command::SetEndpoint(endpoint) => self.set_endpoint(endpoint),
                    };
                    if rearm {
                        debounce.as_mut().reset(self.debounce_deadline());
                        armed = true;
                    }
                }
                () = &mut debounce, if armed => {
                    armed = false;
                    self.debounce_elapsed();
                }
                Some(completion) = done.recv() => self.complete(completion),
            }
        }
        tracing::debug!("movie feed stopped");
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn debounce_deadline(&self) -> Instant {
        Instant::now() + self.config.debounce
    }

    /// Returns whether the debounce timer must restart.
    fn set_query(&mut self, query: String) -> bool {
        if self.state.query == query {
            return false;
        }
        self.state.query = query;
        self.publish();
        self.endpoint.is_none()
    }

    /// Returns whether the debounce timer must restart.
    fn set_endpoint(&mut self, endpoint: Option<String>) -> bool {
        if self.endpoint == endpoint {
            return false;
        }
        self.endpoint = endpoint;
        self.dispatch();
        self.endpoint.is_none()
    }

    fn debounce_elapsed(&mut self) {
        if self.endpoint.is_some() || self.state.debounced_query == self.state.query {
            return;
        }
        self.state.debounced_query.clone_from(&self.state.query);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        let request = self.endpoint.as_ref().map_or_else(
            || MovieRequest::for_query(&self.state.debounced_query, &self.config.language),
            |endpoint| MovieRequest::Listing(endpoint.clone()),
        );
        let seq = self.state.begin();
        tracing::debug!(seq, %request, "dispatching movie request");
        self.publish();

        let api = Arc::clone(&self.api);
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let outcome = request.fetch(api.as_ref()).await;
            if done
                .send(Completion {
                    seq,
                    request,
                    outcome,
                })
                .is_err()
            {
                tracing::debug!(seq, "movie feed stopped before request finished");
            }
        });
    }

    fn complete(&mut self, completion: Completion) {
        let Completion {
            seq,
            request,
            outcome,
        } = completion;
        let report = top_result(&request, &outcome);

        if !self.state.finish(seq, outcome) {
            tracing::debug!(seq, latest = self.state.issued, "discarding stale movie response");
            return;
        }
        tracing::debug!(seq, movies = self.state.movies.len(), "movie request settled");
        self.publish();

        if let Some((term, top)) = report {
            let reporter = Arc::clone(&self.reporter);
            tokio::spawn(async move {
                if let Err(err) = reporter.report(&term, &top).await {
                    tracing::warn!("Error updating search count for {term}: {err:#}");
                }
            });
        }
    }

    fn publish(&self) {
        self.published.send_replace(self.state.clone());
    }
}

/// The search term and first movie of a successful, non-empty search.
fn top_result(request: &MovieRequest, outcome: &FetchOutcome) -> Option<(String, Movie)> {
    let term = request.search_term()?;
    match outcome {
        FetchOutcome::Loaded(movies) => movies.first().map(|top| (String::from(term), top.clone())),
        FetchOutcome::Failed(_) => None,
    }
}
