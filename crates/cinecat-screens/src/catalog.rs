//! Catalog screen state: paginated popular/search listing with a debounced
//! query box.
//!
//! Every fetch is tagged with the generation it was issued under. Replacing
//! the list (query change, refresh) bumps the generation, so a response for
//! an earlier query or a pending load-more that lands afterwards is dropped
//! instead of overwriting the newer list.

use std::time::Duration;

use anyhow::Result;
use cinecat_api::tmdb::{MoviePage, MovieSummary, PopularMoviesParams, SearchMovieParams, TmdbApi};
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::debounce::Debouncer;
use crate::error::{CATALOG_FETCH_FAILED, ScreenError};
use crate::mailbox::Mailbox;
use crate::view::{CatalogView, ErrorBanner};

/// Quiet period between the last keystroke and applying the query.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// How a loaded page is merged into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Page 1: the page becomes the list.
    Replace,
    /// Page > 1: the page is appended to the list.
    Append,
}

/// Identifies an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    page: u32,
    mode: FetchMode,
}

impl FetchTicket {
    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Merge mode for the response.
    #[must_use]
    pub const fn mode(&self) -> FetchMode {
        self.mode
    }
}

/// Completion posted to the catalog mailbox.
#[derive(Debug)]
pub enum CatalogEvent {
    /// The debounce period for input `seq` elapsed.
    QueryApplied {
        /// Input sequence number at scheduling time.
        seq: u64,
        /// Trimmed query text.
        query: String,
    },
    /// A page request finished.
    PageLoaded {
        /// The fetch this answers.
        ticket: FetchTicket,
        /// Page or transport/status/decode error.
        result: Result<MoviePage>,
    },
}

/// State holder for the catalog screen.
#[derive(Debug)]
pub struct CatalogController<A> {
    config: ApiConfig<A>,
    movies: Vec<MovieSummary>,
    page: u32,
    total_pages: Option<u32>,
    raw_query: String,
    applied_query: String,
    is_loading: bool,
    is_refreshing: bool,
    is_loading_more: bool,
    error: Option<ScreenError>,
    /// Bumped on every replacing fetch.
    generation: u64,
    /// Bumped on every input change.
    query_seq: u64,
    debouncer: Debouncer,
    mailbox: Mailbox<CatalogEvent>,
}

impl<A> CatalogController<A> {
    /// Movies currently listed, in server order.
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    /// Last page successfully loaded (1 before any load).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported by the last response, if any.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Search box text as typed.
    #[must_use]
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    /// Query the list currently reflects (empty means popular).
    #[must_use]
    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    /// Whether a first page is loading outside a refresh.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a user-initiated refresh is in flight.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    /// Whether a next-page request is in flight.
    #[must_use]
    pub const fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    /// Current error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ScreenError> {
        self.error.as_ref()
    }

    /// Whether another page exists (unknown counts as yes).
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.total_pages.is_none_or(|total| self.page < total)
    }

    /// Projects the list state for rendering.
    #[must_use]
    pub fn view(&self) -> CatalogView {
        CatalogView::new(&self.movies, self.is_loading, self.is_loading_more)
    }

    /// Projects the error state for rendering.
    #[must_use]
    pub fn error_banner(&self) -> Option<ErrorBanner> {
        self.error.as_ref().map(ErrorBanner::from_error)
    }

    fn clear_loading(&mut self) {
        self.is_loading = false;
        self.is_refreshing = false;
        self.is_loading_more = false;
    }
}

impl<A> CatalogController<A>
where
    A: TmdbApi + Send + Sync + 'static,
{
    /// Creates a controller with the default debounce period.
    ///
    /// Nothing is fetched until [`CatalogController::start`].
    #[must_use]
    pub fn new(config: ApiConfig<A>) -> Self {
        Self::with_debounce(config, DEFAULT_DEBOUNCE)
    }

    /// Creates a controller with a custom debounce period.
    #[must_use]
    pub fn with_debounce(config: ApiConfig<A>, debounce: Duration) -> Self {
        Self {
            config,
            movies: Vec::new(),
            page: 1,
            total_pages: None,
            raw_query: String::new(),
            applied_query: String::new(),
            is_loading: false,
            is_refreshing: false,
            is_loading_more: false,
            error: None,
            generation: 0,
            query_seq: 0,
            debouncer: Debouncer::new(debounce),
            mailbox: Mailbox::new(),
        }
    }

    /// Loads page 1 of the popular list.
    pub fn start(&mut self) {
        self.fetch(1, FetchMode::Replace);
    }

    /// Updates the search box text.
    ///
    /// Text that trims to empty is applied at once; anything else is applied
    /// after the debounce period unless superseded.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.raw_query = text.into();
        self.query_seq = self.query_seq.wrapping_add(1);

        let trimmed = self.raw_query.trim().to_owned();
        if trimmed.is_empty() {
            self.debouncer.cancel();
            self.apply_query(trimmed);
        } else {
            let event = CatalogEvent::QueryApplied {
                seq: self.query_seq,
                query: trimmed,
            };
            let tx = self.mailbox.sender();
            self.debouncer.schedule(event, &tx);
        }
    }

    /// Reloads page 1 of the current source.
    pub fn refresh(&mut self) {
        self.is_refreshing = true;
        self.fetch(1, FetchMode::Replace);
    }

    /// Refreshes if the current error offers a retry.
    ///
    /// Returns whether a refresh was started.
    pub fn retry(&mut self) -> bool {
        if self.error.as_ref().is_some_and(ScreenError::is_retryable) {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Requests the next page unless a load or refresh is in flight or no
    /// page remains.
    ///
    /// Returns whether a fetch was attempted.
    pub fn load_more(&mut self) -> bool {
        // A refresh shares the generation a next page would be tagged with,
        // so appending now could splice a page from the old list.
        if self.is_loading
            || self.is_refreshing
            || self.is_loading_more
            || !self.can_load_more()
        {
            return false;
        }
        let next = self.page.saturating_add(1);
        self.fetch(next, FetchMode::Append);
        true
    }

    /// Applies one mailbox event.
    pub fn handle_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::QueryApplied { seq, query } => {
                if seq == self.query_seq {
                    self.apply_query(query);
                } else {
                    debug!(seq, current = self.query_seq, "superseded query ignored");
                }
            }
            CatalogEvent::PageLoaded { ticket, result } => self.apply_page(ticket, result),
        }
    }

    /// Waits for the next event and applies it.
    pub async fn process_next(&mut self) {
        if let Some(event) = self.mailbox.recv().await {
            self.handle_event(event);
        }
    }

    /// Applies every event already queued. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0_usize;
        while let Some(event) = self.mailbox.try_recv() {
            self.handle_event(event);
            applied = applied.saturating_add(1);
        }
        applied
    }

    fn apply_query(&mut self, query: String) {
        if query == self.applied_query {
            return;
        }
        debug!(query = %query, "search query applied");
        self.applied_query = query;
        self.fetch(1, FetchMode::Replace);
    }

    fn fetch(&mut self, page: u32, mode: FetchMode) {
        let api = match self.config.client() {
            Ok(api) => api,
            Err(err) => {
                warn!("catalog fetch skipped: {err}");
                self.error = Some(err);
                self.clear_loading();
                return;
            }
        };

        if mode == FetchMode::Replace {
            self.generation = self.generation.wrapping_add(1);
            if !self.is_refreshing {
                self.is_loading = true;
            }
        } else {
            self.is_loading_more = true;
        }
        self.error = None;

        let ticket = FetchTicket {
            generation: self.generation,
            page,
            mode,
        };
        let query = self.applied_query.clone();
        let language = self.config.language().to_owned();
        debug!(page, query = %query, "fetching catalog page");

        self.mailbox.spawn(async move {
            let result = if query.is_empty() {
                let params = PopularMoviesParams::new(page).language(language);
                api.popular_movies(&params).await
            } else {
                let params = SearchMovieParams::new(query).language(language).page(page);
                api.search_movies(&params).await
            };
            CatalogEvent::PageLoaded { ticket, result }
        });
    }

    fn apply_page(&mut self, ticket: FetchTicket, result: Result<MoviePage>) {
        if ticket.generation != self.generation {
            debug!(page = ticket.page, "stale catalog response discarded");
            return;
        }

        match result {
            Ok(MoviePage {
                page,
                results,
                total_pages,
                ..
            }) => {
                debug!(page, total_pages, count = results.len(), "catalog page loaded");
                self.page = page;
                self.total_pages = Some(total_pages);
                match ticket.mode {
                    FetchMode::Replace => self.movies = results,
                    FetchMode::Append => self.movies.extend(results),
                }
            }
            Err(err) => {
                error!(page = ticket.page, "failed to fetch catalog page: {err:#}");
                self.error = Some(ScreenError::Request(String::from(CATALOG_FETCH_FAILED)));
            }
        }
        self.clear_loading();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Arc;

    use super::*;
    use crate::testing::{ApiCall, MockApi, page};

    fn controller(api: &Arc<MockApi>) -> CatalogController<MockApi> {
        CatalogController::new(ApiConfig::from_shared(Arc::clone(api)))
    }

    fn ids(catalog: &CatalogController<MockApi>) -> Vec<u64> {
        catalog.movies().iter().map(|movie| movie.id).collect()
    }

    fn popular(page: u32) -> ApiCall {
        ApiCall::Popular {
            page,
            language: String::from("pt-BR"),
        }
    }

    fn search(query: &str, page: u32) -> ApiCall {
        ApiCall::Search {
            query: String::from(query),
            page,
        }
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_loads_first_popular_page() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 3, &[1, 2]));
        let mut catalog = controller(&api);

        // Act
        catalog.start();
        let loading = catalog.is_loading();
        catalog.process_next().await;

        // Assert
        assert!(loading);
        assert!(!catalog.is_loading());
        assert_eq!(ids(&catalog), vec![1, 2]);
        assert_eq!(catalog.page(), 1);
        assert_eq!(catalog.total_pages(), Some(3));
        assert_eq!(api.calls(), vec![popular(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_appends_next_page() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 2, &[1, 2]));
        api.push_page(page(2, 2, &[3, 4]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        let requested = catalog.load_more();
        let loading_more = catalog.is_loading_more();
        catalog.process_next().await;

        // Assert
        assert!(requested);
        assert!(loading_more);
        assert!(!catalog.is_loading_more());
        assert_eq!(ids(&catalog), vec![1, 2, 3, 4]);
        assert_eq!(catalog.page(), 2);
        assert_eq!(api.calls(), vec![popular(1), popular(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_stops_at_last_page() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        let requested = catalog.load_more();

        // Assert
        assert!(!requested);
        assert!(!catalog.can_load_more());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_ignored_while_loading() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 5, &[1]));
        let mut catalog = controller(&api);

        // Act
        catalog.start();
        let during_initial = catalog.load_more();
        catalog.process_next().await;
        let first = catalog.load_more();
        let during_more = catalog.load_more();
        settle().await;

        // Assert
        assert!(!during_initial);
        assert!(first);
        assert!(!during_more);
        assert_eq!(api.calls(), vec![popular(1), popular(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_applied_after_quiet_period() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        api.push_page(page(1, 1, &[9]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        catalog.set_query("  ma");
        tokio::time::advance(Duration::from_millis(200)).await;
        catalog.set_query("  mat ");
        tokio::time::advance(Duration::from_millis(499)).await;
        settle().await;
        let early = catalog.pump();
        let applied_early = catalog.applied_query().to_owned();
        catalog.process_next().await;
        catalog.process_next().await;

        // Assert
        assert_eq!(early, 0);
        assert_eq!(applied_early, "");
        assert_eq!(catalog.raw_query(), "  mat ");
        assert_eq!(catalog.applied_query(), "mat");
        assert_eq!(ids(&catalog), vec![9]);
        assert_eq!(api.calls(), vec![popular(1), search("mat", 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_applies_immediately() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        api.push_page(page(1, 1, &[9]));
        api.push_page(page(1, 1, &[1]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;
        catalog.set_query("mat");
        catalog.process_next().await;
        catalog.process_next().await;

        // Act
        catalog.set_query("   ");
        let applied = catalog.applied_query().to_owned();
        let loading = catalog.is_loading();
        catalog.process_next().await;

        // Assert
        assert_eq!(applied, "");
        assert!(loading);
        assert_eq!(ids(&catalog), vec![1]);
        assert_eq!(api.calls(), vec![popular(1), search("mat", 1), popular(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_debounce_ignored_after_input_cleared() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;
        catalog.set_query("abc");
        tokio::time::advance(DEFAULT_DEBOUNCE).await;
        settle().await;

        // Act
        catalog.set_query("");
        let handled = catalog.pump();

        // Assert
        assert_eq!(handled, 1);
        assert_eq!(catalog.applied_query(), "");
        assert_eq!(api.calls(), vec![popular(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_query_does_not_refetch() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        api.push_page(page(1, 1, &[9]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;
        catalog.set_query("mat");
        catalog.process_next().await;
        catalog.process_next().await;

        // Act
        catalog.set_query("mat  ");
        catalog.process_next().await;

        // Assert
        assert!(!catalog.is_loading());
        assert_eq!(catalog.applied_query(), "mat");
        assert_eq!(api.calls(), vec![popular(1), search("mat", 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_search_response_discarded() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        api.push_page_after(Duration::from_secs(1), page(1, 1, &[7]));
        api.push_page(page(1, 1, &[8]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;
        catalog.set_query("slow");
        catalog.process_next().await;

        // Act
        catalog.set_query("fast");
        catalog.process_next().await;
        catalog.process_next().await;
        let after_fast = ids(&catalog);
        catalog.process_next().await;

        // Assert
        assert_eq!(after_fast, vec![8]);
        assert_eq!(ids(&catalog), vec![8]);
        assert_eq!(catalog.applied_query(), "fast");
        assert!(!catalog.is_loading());
        assert_eq!(
            api.calls(),
            vec![popular(1), search("slow", 1), search("fast", 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_sets_refreshing_not_loading() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 2, &[1]));
        api.push_page(page(1, 2, &[2]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        catalog.refresh();
        let (refreshing, loading) = (catalog.is_refreshing(), catalog.is_loading());
        catalog.process_next().await;

        // Assert
        assert!(refreshing);
        assert!(!loading);
        assert!(!catalog.is_refreshing());
        assert_eq!(ids(&catalog), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_error_keeps_list_and_allows_retry() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 2, &[1, 2]));
        api.push_page_error("TMDB API error (HTTP 500)");
        api.push_page(page(1, 2, &[5]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        catalog.refresh();
        catalog.process_next().await;
        let error = catalog.error().cloned();
        let kept = ids(&catalog);
        let retried = catalog.retry();
        catalog.process_next().await;

        // Assert
        assert_eq!(
            error,
            Some(ScreenError::Request(String::from(CATALOG_FETCH_FAILED)))
        );
        assert_eq!(kept, vec![1, 2]);
        assert!(retried);
        assert!(catalog.error().is_none());
        assert_eq!(ids(&catalog), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_credential_sets_error_without_loading() {
        // Arrange
        let mut catalog = CatalogController::<MockApi>::new(ApiConfig::missing_credential());

        // Act
        catalog.start();
        let after_start = catalog.error().cloned();
        catalog.refresh();
        let retried = catalog.retry();

        // Assert
        assert_eq!(after_start, Some(ScreenError::MissingCredential));
        assert_eq!(catalog.error(), Some(&ScreenError::MissingCredential));
        assert!(!retried);
        assert!(!catalog.is_loading());
        assert!(!catalog.is_refreshing());
        assert!(!catalog.is_loading_more());
        assert_eq!(catalog.pump(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_search_has_nothing_more() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 1, &[1]));
        api.push_page(page(1, 0, &[]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        catalog.set_query("zzzz");
        catalog.process_next().await;
        catalog.process_next().await;

        // Assert
        assert!(catalog.movies().is_empty());
        assert!(!catalog.load_more());
        assert_eq!(catalog.view(), CatalogView::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_discarded_after_query_change() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 3, &[1]));
        api.push_page_after(Duration::from_secs(2), page(2, 3, &[2]));
        api.push_page(page(1, 1, &[9]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        catalog.load_more();
        catalog.set_query("mat");
        catalog.process_next().await;
        catalog.process_next().await;
        catalog.process_next().await;

        // Assert
        assert_eq!(ids(&catalog), vec![9]);
        assert_eq!(catalog.page(), 1);
        assert!(!catalog.is_loading_more());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_ignored_while_refreshing() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 3, &[1]));
        api.push_page(page(2, 3, &[2]));
        api.push_page(page(1, 3, &[10]));
        api.push_page_after(Duration::from_secs(1), page(3, 3, &[3]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;
        catalog.load_more();
        catalog.process_next().await;

        // Act
        catalog.refresh();
        let requested = catalog.load_more();
        catalog.process_next().await;
        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        catalog.pump();

        // Assert
        assert!(!requested);
        assert_eq!(ids(&catalog), vec![10]);
        assert_eq!(catalog.page(), 1);
        assert!(!catalog.is_refreshing());
        assert_eq!(api.calls(), vec![popular(1), popular(2), popular(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_without_credential_sets_error() {
        // Arrange
        let mut catalog = CatalogController::<MockApi>::new(ApiConfig::missing_credential());

        // Act
        let requested = catalog.load_more();

        // Assert
        assert!(requested);
        assert_eq!(catalog.error(), Some(&ScreenError::MissingCredential));
        assert!(!catalog.is_loading_more());
        assert_eq!(catalog.pump(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_error_keeps_list_and_allows_retry() {
        // Arrange
        let api = Arc::new(MockApi::default());
        api.push_page(page(1, 3, &[1, 2]));
        api.push_page_error("TMDB API error (HTTP 500)");
        api.push_page(page(1, 3, &[5]));
        let mut catalog = controller(&api);
        catalog.start();
        catalog.process_next().await;

        // Act
        let requested = catalog.load_more();
        catalog.process_next().await;
        let error = catalog.error().cloned();
        let kept = ids(&catalog);
        let loading_more = catalog.is_loading_more();
        let retried = catalog.retry();
        catalog.process_next().await;

        // Assert
        assert!(requested);
        assert_eq!(
            error,
            Some(ScreenError::Request(String::from(CATALOG_FETCH_FAILED)))
        );
        assert_eq!(kept, vec![1, 2]);
        assert!(!loading_more);
        assert!(retried);
        assert_eq!(ids(&catalog), vec![5]);
        assert_eq!(api.calls(), vec![popular(1), popular(2), popular(1)]);
    }
}
