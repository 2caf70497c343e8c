//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Terminal input is read on a
//! blocking task and forwarded to the async loop, which also follows the
//! movie feeds and drives the animation ticks.

pub mod animation;
/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use marquee_api::tmdb::TmdbApi;
use marquee_api::trends::{TrendStore, TrendingEntry};
use marquee_feed::{MovieFeed, NoReporter, TrendReporter, TrendingBoard};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use self::animation::register_animations;
use self::state::{BrowserState, Focus, KeyAction};
use crate::config::AppConfig;

/// How long the input reader waits for an event before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Runs the movie browser until the user quits.
///
/// The search feed reports successful searches to `store` and the trending
/// strip is loaded from it when a store is given.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing or input handling fails.
pub async fn run_browser<A, S>(
    api: Arc<A>,
    store: Option<Arc<S>>,
    config: &AppConfig,
) -> Result<()>
where
    A: TmdbApi + Sync + 'static,
    S: TrendStore + Sync + 'static,
{
    register_animations();

    let latest = match &store {
        Some(store) => MovieFeed::spawn(
            Arc::clone(&api),
            Arc::new(TrendReporter::new(Arc::clone(store))),
            None,
            config.feed_config(),
        ),
        None => MovieFeed::spawn(
            Arc::clone(&api),
            Arc::new(NoReporter),
            None,
            config.feed_config(),
        ),
    };
    let top_rated = MovieFeed::spawn(
        api,
        Arc::new(NoReporter),
        Some(config.tmdb.top_rated_endpoint.clone()),
        config.feed_config(),
    );
    let trending = spawn_trending(store, config.trends.limit);

    enable_raw_mode().context("failed to enable raw mode")?;
    let result = run_on_alternate_screen(&latest, &top_rated, trending, config).await;
    combine(result, restore_terminal())
}

/// Enters the alternate screen and runs the event loop on it.
async fn run_on_alternate_screen(
    latest: &MovieFeed,
    top_rated: &MovieFeed,
    trending: Option<oneshot::Receiver<Vec<TrendingEntry>>>,
    config: &AppConfig,
) -> Result<()> {
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserState::new(config.ui.carousel_limit);
    run_event_loop(
        &mut terminal,
        &mut state,
        latest,
        top_rated,
        trending,
        config.ui.tick(),
    )
    .await
}

/// Leaves the alternate screen and raw mode. Both steps always run.
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");
    combine(raw, screen)
}

/// Keeps the first error, attaching the second one when both steps failed.
fn combine(first: Result<()>, second: Result<()>) -> Result<()> {
    match (first, second) {
        (Err(err), Err(later)) => {
            Err(err.context(format!("terminal cleanup also failed: {later:#}")))
        }
        (first, second) => first.and(second),
    }
}

/// Loads the trending strip in the background.
fn spawn_trending<S>(
    store: Option<Arc<S>>,
    limit: u32,
) -> Option<oneshot::Receiver<Vec<TrendingEntry>>>
where
    S: TrendStore + Sync + 'static,
{
    let store = store?;
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let mut board = TrendingBoard::new(limit);
        let entries = board.mount(store.as_ref()).await.to_vec();
        if tx.send(entries).is_err() {
            tracing::debug!("browser closed before trending searches loaded");
        }
    });
    Some(rx)
}

/// Reads terminal events on a blocking task until the receiver is dropped.
fn spawn_input_reader(events: mpsc::UnboundedSender<Event>) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || {
        while !events.is_closed() {
            if event::poll(INPUT_POLL).context("failed to poll events")? {
                let ev = event::read().context("failed to read event")?;
                if events.send(ev).is_err() {
                    break;
                }
            }
        }
        Ok(())
    })
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    latest: &MovieFeed,
    top_rated: &MovieFeed,
    mut trending: Option<oneshot::Receiver<Vec<TrendingEntry>>>,
    tick: Duration,
) -> Result<()> {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let reader = spawn_input_reader(events_tx);

    let mut latest_rx = latest.subscribe();
    let mut top_rated_rx = top_rated.subscribe();
    state.update_latest(latest_rx.borrow_and_update().clone());
    state.update_top_rated(top_rated_rx.borrow_and_update().clone());

    let mut trending_pending = trending.is_some();

    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            ev = events.recv() => {
                let Some(ev) = ev else {
                    break;
                };
                if let Event::Key(key) = ev
                    && key.kind == KeyEventKind::Press
                {
                    match handle_key(state, key.code, key.modifiers) {
                        KeyAction::Quit => break,
                        KeyAction::QueryChanged => latest.set_query(state.query.clone()),
                        KeyAction::None => {}
                    }
                }
            }
            _ = ticker.tick() => state.tick(),
            Ok(()) = latest_rx.changed() => {
                state.update_latest(latest_rx.borrow_and_update().clone());
            }
            Ok(()) = top_rated_rx.changed() => {
                state.update_top_rated(top_rated_rx.borrow_and_update().clone());
            }
            entries = recv_trending(&mut trending), if trending_pending => {
                trending_pending = false;
                if let Some(entries) = entries {
                    state.set_trending(entries);
                }
            }
        }
    }

    drop(events);
    reader.await.context("input reader task failed")?
}

/// Waits for the trending strip; never resolves without a loader.
async fn recv_trending(
    rx: &mut Option<oneshot::Receiver<Vec<TrendingEntry>>>,
) -> Option<Vec<TrendingEntry>> {
    match rx {
        Some(rx) => rx.await.ok(),
        None => std::future::pending().await,
    }
}

/// Handles a key press. Returns what the caller must forward.
fn handle_key(state: &mut BrowserState, key: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match key {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Tab | KeyCode::BackTab => state.switch_focus(),
        KeyCode::Up => state.scroll_up(),
        KeyCode::Down => state.scroll_down(),
        KeyCode::Left if state.focus == Focus::Carousel => state.carousel.prev(),
        KeyCode::Right if state.focus == Focus::Carousel => state.carousel.next(),
        KeyCode::Backspace if state.focus == Focus::Search => {
            if state.query_pop() {
                return KeyAction::QueryChanged;
            }
        }
        KeyCode::Char(c) if state.focus == Focus::Search => {
            state.query_push(c);
            return KeyAction::QueryChanged;
        }
        _ => {}
    }
    KeyAction::None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_combine_reports_both_failures() {
        // Arrange
        let first = Err(anyhow::anyhow!("event loop failed"));
        let second = Err(anyhow::anyhow!("failed to leave alternate screen"));

        // Act
        let err = combine(first, second).unwrap_err();

        // Assert
        let message = format!("{err:#}");
        assert!(message.contains("event loop failed"));
        assert!(message.contains("failed to leave alternate screen"));
    }

    #[test]
    fn test_combine_keeps_single_failure() {
        // Arrange & Act
        let cleanup = combine(Ok(()), Err(anyhow::anyhow!("failed to disable raw mode")));
        let run = combine(Err(anyhow::anyhow!("draw failed")), Ok(()));

        // Assert
        assert_eq!(cleanup.unwrap_err().to_string(), "failed to disable raw mode");
        assert_eq!(run.unwrap_err().to_string(), "draw failed");
        assert!(combine(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_typing_edits_query() {
        // Arrange
        let mut state = BrowserState::new(10);

        // Act
        let first = handle_key(&mut state, KeyCode::Char('o'), KeyModifiers::NONE);
        handle_key(&mut state, KeyCode::Char('k'), KeyModifiers::NONE);
        let erased = handle_key(&mut state, KeyCode::Backspace, KeyModifiers::NONE);

        // Assert
        assert_eq!(first, KeyAction::QueryChanged);
        assert_eq!(erased, KeyAction::QueryChanged);
        assert_eq!(state.query, "o");
    }

    #[test]
    fn test_backspace_on_empty_query_is_noop() {
        // Arrange
        let mut state = BrowserState::new(10);

        // Act
        let action = handle_key(&mut state, KeyCode::Backspace, KeyModifiers::NONE);

        // Assert
        assert_eq!(action, KeyAction::None);
    }

    #[test]
    fn test_quit_keys() {
        // Arrange
        let mut state = BrowserState::new(10);

        // Act & Assert
        assert_eq!(
            handle_key(&mut state, KeyCode::Esc, KeyModifiers::NONE),
            KeyAction::Quit
        );
        assert_eq!(
            handle_key(&mut state, KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_carousel_keys_need_focus() {
        // Arrange
        let mut state = BrowserState::new(10);
        state.carousel.configure(3, true);

        // Act
        handle_key(&mut state, KeyCode::Right, KeyModifiers::NONE);
        let unfocused = state.carousel.index();
        handle_key(&mut state, KeyCode::Tab, KeyModifiers::NONE);
        handle_key(&mut state, KeyCode::Left, KeyModifiers::NONE);
        let typed = handle_key(&mut state, KeyCode::Char('x'), KeyModifiers::NONE);

        // Assert
        assert_eq!(unfocused, 0);
        assert_eq!(state.focus, Focus::Carousel);
        assert_eq!(state.carousel.index(), 2);
        assert_eq!(typed, KeyAction::None);
        assert!(state.query.is_empty());
    }
}
