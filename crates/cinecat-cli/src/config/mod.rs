//! Application configuration module.
//!
//! Manages the TOML config file holding the TMDB credential and response
//! language, and resolves the effective settings against the environment.

#[allow(clippy::module_inception)]
mod config;
mod credentials;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use credentials::resolve_credential;
pub use paths::{resolve_config_dir, resolve_config_path, resolve_log_path};
