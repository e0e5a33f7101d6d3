//! TUI rendering for the catalog and detail screens.

use cinecat_screens::DetailController;
use cinecat_screens::view::{
    BACK_LABEL, CATALOG_TITLE, CatalogView, DetailView, LOADING_DETAILS, LOADING_MOVIES,
    MOVIE_NOT_FOUND, MovieCard, MovieDetailsCard, NO_IMAGE, NO_MOVIES_FOUND, RELEASE_LABEL,
    RETRY_LABEL, SEARCH_PLACEHOLDER, SYNOPSIS_LABEL, VOTE_LABEL, detail_title,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::state::{BrowserState, InputMode, Screen};

/// Draws the active screen. Returns the height of the main area.
#[allow(clippy::indexing_slicing)]
pub fn draw<A>(frame: &mut Frame, state: &mut BrowserState<A>) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    match state.screen {
        Screen::Catalog => {
            draw_catalog_header(frame, chunks[0], state);
            draw_catalog_list(frame, chunks[1], state);
        }
        Screen::Detail => {
            draw_detail_header(frame, chunks[0], state);
            draw_detail_body(frame, chunks[1], state);
        }
    }
    draw_footer(frame, chunks[2], state);

    chunks[1].height
}

/// Draws the search box and the error banner.
#[allow(clippy::indexing_slicing)]
fn draw_catalog_header<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let searching = state.input_mode == InputMode::Search;
    let raw_query = state.catalog.raw_query();
    let (search_text, search_style) = if raw_query.is_empty() && !searching {
        (SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else if searching {
        (raw_query, Style::default().fg(Color::Yellow))
    } else {
        (raw_query, Style::default())
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(format!(" {CATALOG_TITLE} ")));
    frame.render_widget(search, header_chunks[0]);

    let status = match state.catalog.error_banner() {
        Some(banner) if banner.retry => Line::from(vec![
            Span::styled(banner.message, Style::default().fg(Color::Red)),
            Span::raw(format!("  [r] {RETRY_LABEL}")),
        ]),
        Some(banner) => Line::from(Span::styled(banner.message, Style::default().fg(Color::Red))),
        None if state.catalog.is_refreshing() => Line::from("Atualizando..."),
        None => Line::from(format!("{} filmes", state.catalog.movies().len())),
    };
    let status = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, header_chunks[1]);
}

/// Draws the movie list, or its loading/empty placeholder.
fn draw_catalog_list<A>(frame: &mut Frame, area: Rect, state: &mut BrowserState<A>) {
    let block = Block::default().borders(Borders::ALL);

    let (cards, loading_more) = match state.catalog.view() {
        CatalogView::Loading => {
            frame.render_widget(Paragraph::new(LOADING_MOVIES).block(block), area);
            return;
        }
        CatalogView::Empty => {
            frame.render_widget(Paragraph::new(NO_MOVIES_FOUND).block(block), area);
            return;
        }
        CatalogView::List {
            cards,
            loading_more,
        } => (cards, loading_more),
    };

    let mut items: Vec<ListItem> = cards.iter().map(card_item).collect();
    if loading_more {
        items.push(ListItem::new(Line::from(Span::styled(
            LOADING_MOVIES,
            Style::default().fg(Color::DarkGray),
        ))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("\u{25b8} ");

    frame.render_stateful_widget(list, area, &mut state.list_state);
}

/// Builds a two-line list entry for a movie.
fn card_item(card: &MovieCard) -> ListItem<'static> {
    let overview = card.overview.lines().next().unwrap_or_default().to_owned();
    ListItem::new(vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(overview, Style::default().fg(Color::Gray))),
    ])
}

/// Draws the detail screen title.
fn draw_detail_header<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>) {
    let movie = state.detail.as_ref().and_then(|detail| detail.movie());
    let title = Paragraph::new(detail_title(movie))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

/// Draws the detail screen body for its current state.
fn draw_detail_body<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>) {
    let view = state
        .detail
        .as_ref()
        .map_or(DetailView::Loading, DetailController::view);

    let lines = match view {
        DetailView::Loading => vec![Line::from(LOADING_DETAILS)],
        DetailView::Failed(message) => vec![
            Line::from(Span::styled(message, Style::default().fg(Color::Red))),
            Line::from(""),
            Line::from(format!("[Esc] {BACK_LABEL}")),
        ],
        DetailView::NotFound => vec![Line::from(MOVIE_NOT_FOUND)],
        DetailView::Loaded(card) => detail_lines(card),
    };

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

/// Lays out a loaded movie.
fn detail_lines(card: MovieDetailsCard) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Yellow);
    vec![
        Line::from(Span::styled(
            card.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(RELEASE_LABEL, label),
            Span::raw(format!(" {}", card.release_date)),
        ]),
        Line::from(vec![
            Span::styled(VOTE_LABEL, label),
            Span::raw(format!(" {}", card.vote_average)),
        ]),
        Line::from(vec![
            Span::styled("Poster:", label),
            Span::raw(format!(" {}", card.poster_url.as_deref().unwrap_or(NO_IMAGE))),
        ]),
        Line::from(""),
        Line::from(Span::styled(SYNOPSIS_LABEL, label.add_modifier(Modifier::BOLD))),
        Line::from(card.overview),
        Line::from(""),
        Line::from(Span::styled(card.page_url, Style::default().fg(Color::DarkGray))),
    ]
}

/// Draws the footer with key hints.
fn draw_footer<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>) {
    let help_text = match (state.screen, state.input_mode) {
        (Screen::Catalog, InputMode::Search) => "Type to search | Esc: clear | Enter: done",
        (Screen::Catalog, InputMode::Normal) => {
            "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  /: search  Enter: details  r: refresh  q: quit"
        }
        (Screen::Detail, _) => "Esc/\u{2190}/h: back  o: open on TMDB  q: quit",
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
