//! TMDB API response types and request parameters.

use serde::{Deserialize, Deserializer};

/// Response language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// Decodes a string field that TMDB may send as `null` or omit.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// --- List pages ---

/// One page from `movie/popular` or `search/movie`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoviePage {
    /// Page number as reported by the server.
    pub page: u32,
    /// Movies on this page, in server order.
    pub results: Vec<MovieSummary>,
    /// Total number of pages (0 when a search has no hits).
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie as it appears in list and search results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Synopsis (may be empty).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Movie details ---

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Synopsis (may be empty).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (`YYYY-MM-DD`, possibly empty).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    /// Vote average on a 0-10 scale.
    #[serde(default)]
    pub vote_average: f64,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for `movie/popular`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularMoviesParams {
    /// Response language (default: "pt-BR").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl PopularMoviesParams {
    /// Creates params for the given page in the default language.
    #[must_use]
    pub fn new(page: u32) -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            page,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Parameters for `search/movie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "pt-BR").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content (always false for the catalog).
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}
