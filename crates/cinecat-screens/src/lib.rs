//! Screen controllers for the cinecat movie browser.
//!
//! Two independent controllers drive the UI: [`CatalogController`] owns the
//! paginated, searchable movie list and [`DetailController`] owns the fetch
//! of a single movie. Both post request completions into a private mailbox
//! that the UI loop drains between input polls, so every state change happens
//! on the caller's task.

/// Paginated list with debounced search.
pub mod catalog;
/// Credential and language settings shared by both screens.
pub mod config;
/// Cancelable delayed delivery of search queries.
pub mod debounce;
/// Single-movie fetch.
pub mod detail;
/// User-facing error states.
pub mod error;
/// Display formatting for dates, votes, and image URLs.
pub mod format;
mod mailbox;
/// Render-ready projections of controller state.
pub mod view;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogController, CatalogEvent, DEFAULT_DEBOUNCE, FetchMode};
pub use config::ApiConfig;
pub use detail::{DetailController, DetailEvent};
pub use error::ScreenError;
