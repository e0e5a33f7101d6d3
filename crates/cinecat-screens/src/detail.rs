//! Detail screen state: fetches one movie by route identifier.

use anyhow::Result;
use cinecat_api::tmdb::{MovieDetails, TmdbApi};
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::{DETAIL_FETCH_FAILED, ScreenError};
use crate::mailbox::Mailbox;
use crate::view::DetailView;

/// Completion posted to the detail mailbox.
#[derive(Debug)]
pub struct DetailEvent {
    generation: u64,
    movie_id: u64,
    result: Result<MovieDetails>,
}

/// State holder for the detail screen.
#[derive(Debug)]
pub struct DetailController<A> {
    config: ApiConfig<A>,
    movie: Option<MovieDetails>,
    is_loading: bool,
    error: Option<ScreenError>,
    /// Identifier of the last accepted route.
    movie_id: Option<u64>,
    generation: u64,
    mailbox: Mailbox<DetailEvent>,
}

impl<A> DetailController<A> {
    /// Loaded movie, if any.
    #[must_use]
    pub const fn movie(&self) -> Option<&MovieDetails> {
        self.movie.as_ref()
    }

    /// Whether the details request is pending. True until the first open.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Current error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ScreenError> {
        self.error.as_ref()
    }

    /// Identifier of the movie being shown.
    #[must_use]
    pub const fn movie_id(&self) -> Option<u64> {
        self.movie_id
    }

    /// Projects the state for rendering.
    #[must_use]
    pub fn view(&self) -> DetailView {
        DetailView::new(self.movie.as_ref(), self.is_loading, self.error.as_ref())
    }
}

impl<A> DetailController<A>
where
    A: TmdbApi + Send + Sync + 'static,
{
    /// Creates a controller in the loading state.
    #[must_use]
    pub fn new(config: ApiConfig<A>) -> Self {
        Self {
            config,
            movie: None,
            is_loading: true,
            error: None,
            movie_id: None,
            generation: 0,
            mailbox: Mailbox::new(),
        }
    }

    /// Shows the movie named by `route_id`.
    ///
    /// An empty identifier is ignored and the identifier already shown is not
    /// fetched again. A non-numeric identifier is reported as a failed load.
    pub fn open(&mut self, route_id: &str) {
        let route_id = route_id.trim();
        if route_id.is_empty() {
            return;
        }

        let Ok(movie_id) = route_id.parse::<u64>() else {
            warn!(route_id, "invalid movie id in route");
            self.generation = self.generation.wrapping_add(1);
            self.movie_id = None;
            self.movie = None;
            self.error = Some(ScreenError::Request(String::from(DETAIL_FETCH_FAILED)));
            self.is_loading = false;
            return;
        };
        if self.movie_id == Some(movie_id) {
            return;
        }

        self.generation = self.generation.wrapping_add(1);
        self.movie_id = Some(movie_id);
        self.movie = None;

        let api = match self.config.client() {
            Ok(api) => api,
            Err(err) => {
                warn!(movie_id, "details fetch skipped: {err}");
                self.error = Some(err);
                self.is_loading = false;
                return;
            }
        };

        self.is_loading = true;
        self.error = None;
        let generation = self.generation;
        let language = self.config.language().to_owned();
        debug!(movie_id, "fetching movie details");

        self.mailbox.spawn(async move {
            let result = api.movie_details(movie_id, &language).await;
            DetailEvent {
                generation,
                movie_id,
                result,
            }
        });
    }

    /// Applies one mailbox event.
    pub fn handle_event(&mut self, event: DetailEvent) {
        let DetailEvent {
            generation,
            movie_id,
            result,
        } = event;
        if generation != self.generation {
            debug!(movie_id, "stale details response discarded");
            return;
        }

        match result {
            Ok(movie) => {
                debug!(movie_id, title = %movie.title, "movie details loaded");
                self.movie = Some(movie);
            }
            Err(err) => {
                error!(movie_id, "failed to fetch movie details: {err:#}");
                self.error = Some(ScreenError::Request(String::from(DETAIL_FETCH_FAILED)));
            }
        }
        self.is_loading = false;
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
}
