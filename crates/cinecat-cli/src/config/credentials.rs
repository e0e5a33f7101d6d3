//! Effective TMDB credential: environment first, then the config file.

use cinecat_api::tmdb::Credential;

use super::config::TmdbConfig;

/// Environment variable holding a v3 API key.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";
/// Environment variable holding a v4 read access token.
pub const API_TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Picks the credential to use, or `None` when nothing is configured.
///
/// Order: `TMDB_API_KEY`, `TMDB_API_TOKEN`, config `api_key`, config
/// `api_token`. Blank values are skipped.
pub fn resolve_credential<F>(config: &TmdbConfig, env: F) -> Option<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    non_blank(env(API_KEY_ENV))
        .map(Credential::ApiKey)
        .or_else(|| non_blank(env(API_TOKEN_ENV)).map(Credential::BearerToken))
        .or_else(|| non_blank(config.api_key.clone()).map(Credential::ApiKey))
        .or_else(|| non_blank(config.api_token.clone()).map(Credential::BearerToken))
}
