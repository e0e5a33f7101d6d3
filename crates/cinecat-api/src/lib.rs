//! TMDB client library for cinecat.
//!
//! Wraps the three TMDB v3 endpoints the catalog browser consumes:
//! the popular listing, movie search, and movie details.

/// TMDB API client.
pub mod tmdb;
