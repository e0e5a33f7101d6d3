//! Render-ready projections of controller state.
//!
//! These types decide *what* a screen shows; drawing them is left to the UI.

use cinecat_api::tmdb::{MovieDetails, MovieSummary};

use crate::error::ScreenError;
use crate::format::{format_release_date, format_vote_average, image_url, movie_page_url};

/// Catalog screen header.
pub const CATALOG_TITLE: &str = "Catálogo de Filmes";
/// Search box placeholder.
pub const SEARCH_PLACEHOLDER: &str = "Buscar filmes...";
/// Shown while the first page loads.
pub const LOADING_MOVIES: &str = "Carregando filmes...";
/// Shown when a load finished with no movies.
pub const NO_MOVIES_FOUND: &str = "Nenhum filme encontrado.";
/// Retry action label.
pub const RETRY_LABEL: &str = "Tentar novamente";
/// Poster placeholder.
pub const NO_IMAGE: &str = "Sem imagem";
/// Card text for a movie without overview.
pub const NO_DESCRIPTION: &str = "Sem descrição disponível.";
/// Detail screen title before the movie is known.
pub const DETAIL_TITLE_FALLBACK: &str = "Detalhes do filme";
/// Shown while details load.
pub const LOADING_DETAILS: &str = "Carregando detalhes...";
/// Shown when no movie could be shown and no error was reported.
pub const MOVIE_NOT_FOUND: &str = "Filme não encontrado.";
/// Synopsis placeholder on the detail screen.
pub const NO_SYNOPSIS: &str = "Nenhuma sinopse disponível para este filme.";
/// Release date caption.
pub const RELEASE_LABEL: &str = "Lançamento:";
/// Vote average caption.
pub const VOTE_LABEL: &str = "Nota média:";
/// Synopsis heading.
pub const SYNOPSIS_LABEL: &str = "Sinopse";
/// Back action label.
pub const BACK_LABEL: &str = "Voltar";

/// One entry of the catalog list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    /// Movie identifier.
    pub id: u64,
    /// Identifier as passed to the detail screen.
    pub route_id: String,
    /// Title.
    pub title: String,
    /// Overview, or [`NO_DESCRIPTION`].
    pub overview: String,
    /// Poster URL, absent when the movie has no poster.
    pub poster_url: Option<String>,
}

impl MovieCard {
    /// Builds the card for a list entry.
    #[must_use]
    pub fn from_summary(movie: &MovieSummary) -> Self {
        let overview = if movie.overview.is_empty() {
            String::from(NO_DESCRIPTION)
        } else {
            movie.overview.clone()
        };
        Self {
            id: movie.id,
            route_id: movie.id.to_string(),
            title: movie.title.clone(),
            overview,
            poster_url: image_url(movie.poster_path.as_deref()),
        }
    }

    /// Poster URL or [`NO_IMAGE`].
    #[must_use]
    pub fn poster_label(&self) -> &str {
        self.poster_url.as_deref().unwrap_or(NO_IMAGE)
    }
}

/// What the catalog list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    /// Nothing listed yet and a first page is loading.
    Loading,
    /// Nothing listed and nothing loading.
    Empty,
    /// The list, with a footer spinner while the next page loads.
    List {
        /// Cards in list order.
        cards: Vec<MovieCard>,
        /// Whether the next page is loading.
        loading_more: bool,
    },
}

impl CatalogView {
    /// Chooses the view for the given list state.
    #[must_use]
    pub fn new(movies: &[MovieSummary], is_loading: bool, is_loading_more: bool) -> Self {
        if movies.is_empty() {
            return if is_loading { Self::Loading } else { Self::Empty };
        }
        Self::List {
            cards: movies.iter().map(MovieCard::from_summary).collect(),
            loading_more: is_loading_more,
        }
    }
}

/// Error line shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    /// User-facing message.
    pub message: String,
    /// Whether to offer [`RETRY_LABEL`].
    pub retry: bool,
}

impl ErrorBanner {
    /// Builds the banner for an error.
    #[must_use]
    pub fn from_error(error: &ScreenError) -> Self {
        Self {
            message: String::from(error.message()),
            retry: error.is_retryable(),
        }
    }
}

/// Fully formatted movie for the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetailsCard {
    /// Movie identifier.
    pub id: u64,
    /// Title.
    pub title: String,
    /// `DD/MM/YYYY` or "Indisponível".
    pub release_date: String,
    /// `X.Y/10`.
    pub vote_average: String,
    /// Overview, or [`NO_SYNOPSIS`].
    pub overview: String,
    /// Poster URL.
    pub poster_url: Option<String>,
    /// Backdrop URL.
    pub backdrop_url: Option<String>,
    /// Public TMDB page.
    pub page_url: String,
}

impl MovieDetailsCard {
    /// Formats a details response.
    #[must_use]
    pub fn from_details(movie: &MovieDetails) -> Self {
        let overview = if movie.overview.is_empty() {
            String::from(NO_SYNOPSIS)
        } else {
            movie.overview.clone()
        };
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_date: format_release_date(&movie.release_date),
            vote_average: format_vote_average(movie.vote_average),
            overview,
            poster_url: image_url(movie.poster_path.as_deref()),
            backdrop_url: image_url(movie.backdrop_path.as_deref()),
            page_url: movie_page_url(movie.id),
        }
    }
}

/// What the detail screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// Request pending.
    Loading,
    /// Request failed or no credential; carries the message.
    Failed(String),
    /// Finished without a movie.
    NotFound,
    /// The movie.
    Loaded(MovieDetailsCard),
}

impl DetailView {
    /// Chooses the view for the given detail state.
    #[must_use]
    pub fn new(movie: Option<&MovieDetails>, is_loading: bool, error: Option<&ScreenError>) -> Self {
        if is_loading {
            return Self::Loading;
        }
        if let Some(error) = error {
            return Self::Failed(String::from(error.message()));
        }
        movie.map_or(Self::NotFound, |movie| {
            Self::Loaded(MovieDetailsCard::from_details(movie))
        })
    }
}

/// Detail screen title: the movie title once known.
#[must_use]
pub fn detail_title(movie: Option<&MovieDetails>) -> &str {
    movie.map_or(DETAIL_TITLE_FALLBACK, |movie| movie.title.as_str())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;
    use crate::error::{CATALOG_FETCH_FAILED, MISSING_CREDENTIAL_MESSAGE};
    use crate::format::UNAVAILABLE_LABEL;
    use crate::testing::{details, movie};

    #[test]
    fn test_catalog_view_states() {
        // Arrange
        let movies = vec![movie(1), movie(2)];

        // Act & Assert
        assert_eq!(CatalogView::new(&[], true, false), CatalogView::Loading);
        assert_eq!(CatalogView::new(&[], false, false), CatalogView::Empty);
        let CatalogView::List {
            cards,
            loading_more,
        } = CatalogView::new(&movies, true, true)
        else {
            panic!("expected list view");
        };
        assert_eq!(cards.len(), 2);
        assert!(loading_more);
    }

    #[test]
    fn test_movie_card_fallbacks() {
        // Arrange
        let summary = movie(1241982);

        // Act
        let card = MovieCard::from_summary(&summary);

        // Assert
        assert_eq!(card.route_id, "1241982");
        assert_eq!(card.overview, NO_DESCRIPTION);
        assert_eq!(card.poster_label(), NO_IMAGE);
    }

    #[test]
    fn test_whitespace_overview_is_kept() {
        // Arrange
        let mut summary = movie(5);
        summary.overview = String::from("  ");
        let mut full = details(5);
        full.overview = String::from(" ");

        // Act
        let card = MovieCard::from_summary(&summary);
        let details_card = MovieDetailsCard::from_details(&full);

        // Assert
        assert_eq!(card.overview, "  ");
        assert_eq!(details_card.overview, " ");
    }

    #[test]
    fn test_error_banner_retry_flag() {
        // Arrange
        let config = ScreenError::MissingCredential;
        let request = ScreenError::Request(String::from(CATALOG_FETCH_FAILED));

        // Act
        let config_banner = ErrorBanner::from_error(&config);
        let request_banner = ErrorBanner::from_error(&request);

        // Assert
        assert_eq!(config_banner.message, MISSING_CREDENTIAL_MESSAGE);
        assert!(!config_banner.retry);
        assert!(request_banner.retry);
    }

    #[test]
    fn test_detail_view_loaded_is_formatted() {
        // Arrange
        let movie = details(603);

        // Act
        let view = DetailView::new(Some(&movie), false, None);

        // Assert
        let DetailView::Loaded(card) = view else {
            panic!("expected loaded view");
        };
        assert_eq!(card.release_date, "15/01/2024");
        assert_eq!(card.vote_average, "8.6/10");
        assert_eq!(card.poster_url.as_deref(), Some("https://image.tmdb.org/t/p/w500/poster.jpg"));
        assert_eq!(card.backdrop_url, None);
        assert_eq!(card.page_url, "https://www.themoviedb.org/movie/603");
    }

    #[test]
    fn test_detail_view_precedence() {
        // Arrange
        let movie = details(603);
        let error = ScreenError::MissingCredential;

        // Act & Assert
        assert_eq!(DetailView::new(Some(&movie), true, None), DetailView::Loading);
        assert_eq!(
            DetailView::new(None, false, Some(&error)),
            DetailView::Failed(String::from(MISSING_CREDENTIAL_MESSAGE))
        );
        assert_eq!(DetailView::new(None, false, None), DetailView::NotFound);
    }

    #[test]
    fn test_detail_card_placeholders() {
        // Arrange
        let mut movie = details(7);
        movie.overview = String::new();
        movie.release_date = String::new();

        // Act
        let card = MovieDetailsCard::from_details(&movie);

        // Assert
        assert_eq!(card.overview, NO_SYNOPSIS);
        assert_eq!(card.release_date, UNAVAILABLE_LABEL);
        assert_eq!(detail_title(Some(&movie)), "Filme 7");
        assert_eq!(detail_title(None), DETAIL_TITLE_FALLBACK);
    }
}
