//! TUI rendering logic for the movie browser.

use marquee_api::tmdb::Movie;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::state::{BrowserState, Focus, SectionView};

/// Number of carousel slots drawn side by side.
const CAROUSEL_SLOTS: usize = 4;

/// Draws the browser UI.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
pub fn draw(frame: &mut Frame, state: &BrowserState) {
    let show_trending = !state.trending.is_empty();
    let mut constraints = vec![Constraint::Length(3)]; // header
    if show_trending {
        constraints.push(Constraint::Length(3)); // trending strip
    }
    constraints.push(Constraint::Length(5)); // top rated carousel
    constraints.push(Constraint::Min(5)); // latest list
    constraints.push(Constraint::Length(3)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    draw_header(frame, chunks[next], state);
    next += 1;
    if show_trending {
        draw_trending(frame, chunks[next], state);
        next += 1;
    }
    draw_top_rated(frame, chunks[next], state);
    draw_latest(frame, chunks[next + 1], state);
    draw_footer(frame, chunks[next + 2]);
}

/// Draws the headline and the search input.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let headline = Paragraph::new(Span::styled(
        state.headline(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).title(" marquee "));
    frame.render_widget(headline, header_chunks[0]);

    let input_style = if state.focus == Focus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = if state.query.is_empty() {
        Span::styled(
            "Search through thousands of movies",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(state.query.as_str())
    };
    let search = Paragraph::new(input).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(input_style)
            .title(" Search "),
    );
    frame.render_widget(search, header_chunks[1]);
}

/// Draws the revealed part of the trending strip with ranks starting at 1.
fn draw_trending(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let mut spans = Vec::new();
    for (i, entry) in state.visible_trending().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            format!("{}.", i.saturating_add(1)),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", entry.title)));
    }

    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Based on your searches "),
    );
    frame.render_widget(strip, area);
}

/// Draws the top-rated carousel.
fn draw_top_rated(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let border_style = if state.focus == Focus::Carousel {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Top Rated Movies ");

    let lines = match state.top_rated_view() {
        SectionView::Populated(movies) => carousel_lines(state, movies),
        view => vec![status_line(view)],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Carousel strip followed by the current movie's card.
fn carousel_lines<'a>(state: &BrowserState, movies: &'a [Movie]) -> Vec<Line<'a>> {
    let current = state.carousel.index();
    let mut strip = vec![Span::raw("\u{2039} ")];
    for (slot, idx) in state.carousel.window(CAROUSEL_SLOTS).enumerate() {
        let Some(movie) = movies.get(idx) else {
            continue;
        };
        if slot > 0 {
            strip.push(Span::raw(" \u{2502} "));
        }
        let style = if idx == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        strip.push(Span::styled(movie.title.as_str(), style));
    }
    strip.push(Span::raw(" \u{203a}"));

    let mut lines = vec![Line::from(strip)];
    if let Some(movie) = movies.get(current) {
        let mut card = card_line(movie);
        card.spans.push(Span::styled(
            format!(
                "  [{}/{}]",
                current.saturating_add(1),
                movies.len().min(state.carousel_limit())
            ),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(card);
    }
    lines
}

/// Draws the latest movies list.
fn draw_latest(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Latest Movies ");

    match state.latest_view() {
        SectionView::Populated(movies) => {
            let items: Vec<ListItem> = movies
                .iter()
                .skip(state.list_offset)
                .map(|movie| ListItem::new(card_line(movie)))
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
        view => {
            frame.render_widget(Paragraph::new(status_line(view)).block(block), area);
        }
    }
}

/// Movie card: title, rating, year and poster URL.
fn card_line(movie: &Movie) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            movie.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  \u{2605} {}", movie.rating_label()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(format!("  \u{00b7} {}", movie.year_label())),
        Span::styled(
            format!("  {}", movie.poster_url()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// One-line rendering of a non-populated section.
fn status_line(view: SectionView<'_>) -> Line<'_> {
    match view {
        SectionView::Loading => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )),
        SectionView::Error(message) => {
            Line::from(Span::styled(message, Style::default().fg(Color::Red)))
        }
        SectionView::Empty | SectionView::Populated(_) => Line::from("No movies to show."),
    }
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect) {
    let help_text = "Type to search  Tab: focus  \u{2190}\u{2192}: carousel  \u{2191}\u{2193}: scroll  Esc: quit";
    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use marquee_api::trends::TrendingEntry;
    use marquee_feed::{FetchError, FetchErrorKind, FetchState};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn render(state: &BrowserState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: String::from(title),
            overview: String::new(),
            poster_path: Some(String::from("/poster.jpg")),
            vote_average: Some(8.71),
            release_date: Some(String::from("1994-09-23")),
        }
    }

    #[test]
    fn test_draw_loading_sections() {
        // Arrange
        let mut state = BrowserState::new(10);
        state.update_latest(FetchState {
            loading: true,
            ..FetchState::default()
        });

        // Act
        let screen = render(&state);

        // Assert
        assert!(screen.contains("Top Rated Movies"));
        assert!(screen.contains("Latest Movies"));
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("Based on your searches"));
    }

    #[test]
    fn test_draw_error_and_cards() {
        // Arrange
        let mut state = BrowserState::new(10);
        state.update_latest(FetchState {
            error: Some(FetchError::new(
                FetchErrorKind::Rejected,
                "Invalid API key",
            )),
            issued: 1,
            ..FetchState::default()
        });
        state.update_top_rated(FetchState {
            movies: vec![movie(278, "The Shawshank Redemption")],
            issued: 1,
            ..FetchState::default()
        });

        // Act
        let screen = render(&state);

        // Assert
        assert!(screen.contains("Invalid API key"));
        assert!(screen.contains("The Shawshank Redemption"));
        assert!(screen.contains("8.7"));
        assert!(screen.contains("1994"));
    }

    fn trending_pair() -> Vec<TrendingEntry> {
        vec![
            TrendingEntry {
                id: String::from("a"),
                title: String::from("Batman"),
                poster_url: None,
                search_term: String::from("batman"),
                count: 12,
            },
            TrendingEntry {
                id: String::from("b"),
                title: String::from("Godzilla"),
                poster_url: None,
                search_term: String::from("godzilla"),
                count: 3,
            },
        ]
    }

    #[test]
    fn test_draw_trending_ranks_from_one() {
        // Arrange
        let mut state = BrowserState::new(10);
        state.set_trending(trending_pair());
        state.tick();
        state.tick();

        // Act
        let screen = render(&state);

        // Assert
        assert!(screen.contains("Based on your searches"));
        assert!(screen.contains("1. Batman"));
        assert!(screen.contains("2. Godzilla"));
    }

    #[test]
    fn test_draw_trending_partially_revealed() {
        // Arrange
        let mut state = BrowserState::new(10);
        state.set_trending(trending_pair());
        state.tick();

        // Act
        let screen = render(&state);

        // Assert
        assert!(screen.contains("1. Batman"));
        assert!(!screen.contains("Godzilla"));
    }
}
