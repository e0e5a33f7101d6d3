//! Browser state: which screen is shown, list cursor, and input mode.

use cinecat_api::tmdb::{MovieSummary, TmdbApi};
use cinecat_screens::{ApiConfig, CatalogController, DetailController};
use ratatui::widgets::ListState;

/// Rows from the end of the list at which the next page is requested.
pub const LOAD_MORE_THRESHOLD: usize = 3;

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Movie list with search box.
    Catalog,
    /// Single movie details.
    Detail,
}

/// Input mode for the catalog screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState<A> {
    /// Catalog screen controller.
    pub catalog: CatalogController<A>,
    /// Detail screen controller, present while the detail screen is shown.
    pub detail: Option<DetailController<A>>,
    /// Active screen.
    pub screen: Screen,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Catalog list selection.
    pub list_state: ListState,
    /// Settings for new detail screens.
    config: ApiConfig<A>,
}

impl<A> BrowserState<A> {
    /// Returns the movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.list_state
            .selected()
            .and_then(|idx| self.catalog.movies().get(idx))
    }

    /// Moves the cursor by `delta` rows, clamped to the list.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.catalog.movies().len();
        self.list_state
            .select(step_cursor(self.list_state.selected(), delta, len));
    }

    /// Keeps the cursor inside the list after it changed size.
    pub fn clamp_cursor(&mut self) {
        let len = self.catalog.movies().len();
        let clamped = match self.list_state.selected() {
            _ if len == 0 => None,
            None => Some(0),
            Some(idx) => Some(idx.min(len.saturating_sub(1))),
        };
        self.list_state.select(clamped);
    }

    /// Returns whether the cursor is close enough to the end to fetch more.
    #[must_use]
    pub fn near_end(&self) -> bool {
        is_near_end(self.list_state.selected(), self.catalog.movies().len())
    }

    /// Returns to the catalog, dropping the detail screen and its request.
    pub fn back(&mut self) {
        self.detail = None;
        self.screen = Screen::Catalog;
    }
}

impl<A> BrowserState<A>
where
    A: TmdbApi + Send + Sync + 'static,
{
    /// Creates the state on the catalog screen. Nothing is fetched yet.
    #[must_use]
    pub fn new(config: ApiConfig<A>) -> Self {
        Self {
            catalog: CatalogController::new(config.clone()),
            detail: None,
            screen: Screen::Catalog,
            input_mode: InputMode::Normal,
            list_state: ListState::default(),
            config,
        }
    }

    /// Applies every completed request. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = self.catalog.pump();
        if let Some(detail) = self.detail.as_mut() {
            applied = applied.saturating_add(detail.pump());
        }
        if applied > 0 {
            self.clamp_cursor();
        }
        applied
    }

    /// Moves the cursor and requests the next page when near the end.
    pub fn scroll(&mut self, delta: isize) {
        self.move_cursor(delta);
        if self.near_end() && self.catalog.load_more() {
            tracing::debug!(page = self.catalog.page(), "requested next catalog page");
        }
    }

    /// Opens the detail screen for the movie under the cursor.
    ///
    /// Returns `false` when nothing is selected.
    pub fn open_selected(&mut self) -> bool {
        let Some(route_id) = self.selected_movie().map(|movie| movie.id.to_string()) else {
            return false;
        };
        let mut detail = DetailController::new(self.config.clone());
        detail.open(&route_id);
        self.detail = Some(detail);
        self.screen = Screen::Detail;
        true
    }

    /// Appends a character to the search box.
    pub fn search_push(&mut self, ch: char) {
        let mut query = self.catalog.raw_query().to_owned();
        query.push(ch);
        self.catalog.set_query(query);
    }

    /// Removes the last character from the search box.
    pub fn search_pop(&mut self) {
        let mut query = self.catalog.raw_query().to_owned();
        query.pop();
        self.catalog.set_query(query);
    }

    /// Clears the search box, returning to the popular list.
    pub fn search_clear(&mut self) {
        self.catalog.set_query(String::new());
    }
}

/// Moves `current` by `delta` within `0..len`.
#[must_use]
pub fn step_cursor(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let max = len.saturating_sub(1);
    Some(current.unwrap_or(0).saturating_add_signed(delta).min(max))
}

/// Returns whether `selected` is within [`LOAD_MORE_THRESHOLD`] rows of the end.
#[must_use]
pub fn is_near_end(selected: Option<usize>, len: usize) -> bool {
    selected.is_some_and(|idx| idx.saturating_add(LOAD_MORE_THRESHOLD) >= len)
}
