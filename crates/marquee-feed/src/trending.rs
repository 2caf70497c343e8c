//! Leaderboard of the most searched terms.

use marquee_api::trends::{TrendStore, TrendingEntry};

/// Number of leaderboard entries shown by default.
pub const DEFAULT_TRENDING_LIMIT: u32 = 5;

/// Trending searches, loaded once when the board is mounted.
#[derive(Debug, Clone)]
pub struct TrendingBoard {
    limit: u32,
    entries: Vec<TrendingEntry>,
    mounted: bool,
}

impl Default for TrendingBoard {
    fn default() -> Self {
        Self::new(DEFAULT_TRENDING_LIMIT)
    }
}

impl TrendingBoard {
    /// Creates an empty board showing at most `limit` entries.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            limit,
            entries: Vec::new(),
            mounted: false,
        }
    }

    /// Loads the leaderboard from `store` on the first call.
    ///
    /// Later calls return the entries loaded the first time. A store error
    /// is logged and leaves the board empty.
    pub async fn mount<S: TrendStore + Sync>(&mut self, store: &S) -> &[TrendingEntry] {
        if !self.mounted {
            self.mounted = true;
            match store.top_searches(self.limit).await {
                Ok(entries) => {
                    tracing::debug!(count = entries.len(), "trending searches loaded");
                    self.entries = entries;
                }
                Err(err) => tracing::warn!("Error fetching trending movies: {err:#}"),
            }
        }
        &self.entries
    }

    /// Entries in rank order (highest count first).
    #[must_use]
    pub fn entries(&self) -> &[TrendingEntry] {
        &self.entries
    }

    /// Whether nothing is there to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use tracing::Level;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::testing::{MemoryTrendStore, entry};

    #[tokio::test]
    async fn test_mount_loads_once() {
        // Arrange
        let store = MemoryTrendStore::with_entries(vec![
            entry("1", "batman", 12),
            entry("2", "godzilla", 3),
        ]);
        let mut board = TrendingBoard::default();

        // Act
        let first = board.mount(&store).await.len();
        let second = board.mount(&store).await.len();

        // Assert
        assert_eq!(first, 2);
        assert_eq!(second, 2);
        assert_eq!(store.lookups(), 1);
        assert_eq!(board.entries()[0].search_term, "batman");
    }

    #[tokio::test]
    async fn test_mount_respects_limit() {
        // Arrange
        let store = MemoryTrendStore::with_entries(vec![
            entry("1", "batman", 12),
            entry("2", "godzilla", 3),
            entry("3", "alien", 2),
        ]);
        let mut board = TrendingBoard::new(2);

        // Act
        let entries = board.mount(&store).await;

        // Assert
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].search_term, "godzilla");
    }

    #[tokio::test]
    async fn test_mount_failure_leaves_board_empty_and_warns() {
        // Arrange
        let store = MemoryTrendStore::failing();
        let mut board = TrendingBoard::default();
        let (subscriber, handle) = subscriber::mock()
            .with_filter(|meta| meta.level() <= &Level::WARN)
            .event(
                expect::event().at_level(Level::WARN).with_fields(expect::msg(
                    "Error fetching trending movies: trend store error (HTTP 503)",
                )),
            )
            .only()
            .run_with_handle();
        let guard = tracing::subscriber::set_default(subscriber);

        // Act
        let entries = board.mount(&store).await.len();

        // Assert
        assert_eq!(entries, 0);
        assert!(board.is_empty());
        assert_eq!(store.lookups(), 1);
        drop(guard);
        handle.assert_finished();
    }
}
