//! Movie browser TUI main loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use cinecat_api::tmdb::TmdbApi;
use cinecat_screens::ApiConfig;
use cinecat_screens::format::movie_page_url;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{BrowserState, InputMode, Screen};
use super::ui;

/// Idle wait between polls when no input is pending.
const TICK: Duration = Duration::from_millis(50);

/// Runs the movie browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(config: ApiConfig<A>) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    let mut state = BrowserState::new(config);
    state.catalog.start();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
///
/// Completed requests are applied before every frame; the loop sleeps on the
/// runtime between polls so background fetches and the debounce timer run.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState<A>,
) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    let mut main_area_height: u16 = 0;

    loop {
        state.pump();

        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        // Two lines per card, minus borders.
        let page_size = usize::from(main_area_height.saturating_sub(2) / 2).max(1);

        if !event::poll(Duration::ZERO).context("failed to poll events")? {
            tokio::time::sleep(TICK).await;
            continue;
        }

        if let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && dispatch_key(state, key, page_size).await
        {
            return Ok(());
        }
    }
}

/// Routes a key press to the active screen. Returns `true` to exit.
///
/// Yields afterwards so fetch and debounce tasks keep running while keys
/// arrive without pause.
async fn dispatch_key<A>(state: &mut BrowserState<A>, key: KeyEvent, page_size: usize) -> bool
where
    A: TmdbApi + Send + Sync + 'static,
{
    let exit = match (state.screen, state.input_mode) {
        (Screen::Catalog, InputMode::Search) => handle_search_input(state, key),
        (Screen::Catalog, InputMode::Normal) => handle_catalog_input(state, key, page_size),
        (Screen::Detail, _) => handle_detail_input(state, key),
    };
    tokio::task::yield_now().await;
    exit
}

/// Returns whether `key` is Ctrl+C.
fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Handles key input in search mode. Returns `true` to exit.
fn handle_search_input<A>(state: &mut BrowserState<A>, key: KeyEvent) -> bool
where
    A: TmdbApi + Send + Sync + 'static,
{
    if is_interrupt(key) {
        return true;
    }
    match key.code {
        KeyCode::Esc => {
            state.search_clear();
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => state.search_pop(),
        KeyCode::Char(c) => state.search_push(c),
        _ => {}
    }
    false
}

/// Handles key input on the catalog list. Returns `true` to exit.
fn handle_catalog_input<A>(state: &mut BrowserState<A>, key: KeyEvent, page_size: usize) -> bool
where
    A: TmdbApi + Send + Sync + 'static,
{
    if is_interrupt(key) {
        return true;
    }
    let page = isize::try_from(page_size).unwrap_or(isize::MAX);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => state.scroll(-1),
        KeyCode::Down | KeyCode::Char('j') => state.scroll(1),
        KeyCode::PageUp => state.scroll(page.saturating_neg()),
        KeyCode::PageDown => state.scroll(page),
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Char('r') => {
            if state.catalog.error().is_some() {
                state.catalog.retry();
            } else {
                state.catalog.refresh();
            }
        }
        KeyCode::Enter => {
            state.open_selected();
        }
        _ => {}
    }
    false
}

/// Handles key input on the detail screen. Returns `true` to exit.
fn handle_detail_input<A>(state: &mut BrowserState<A>, key: KeyEvent) -> bool {
    if is_interrupt(key) {
        return true;
    }
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => state.back(),
        KeyCode::Char('o') => open_movie_page(state),
        _ => {}
    }
    false
}

/// Opens the TMDB page for the movie on the detail screen.
fn open_movie_page<A>(state: &BrowserState<A>) {
    let Some(movie_id) = state.detail.as_ref().and_then(|detail| detail.movie_id()) else {
        return;
    };
    let url = movie_page_url(movie_id);
    if let Err(err) = open::that(&url) {
        tracing::warn!(%url, "failed to open browser: {err}");
    }
}
