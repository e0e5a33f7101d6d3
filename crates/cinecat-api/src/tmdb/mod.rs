//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! and decodes list pages and movie details.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{Credential, TmdbClient, TmdbClientBuilder};
pub use types::{
    DEFAULT_LANGUAGE, MovieDetails, MoviePage, MovieSummary, PopularMoviesParams,
    SearchMovieParams,
};

/// Base URL for poster and backdrop images (w500 rendition).
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Base URL for the public movie pages on themoviedb.org.
pub const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";
