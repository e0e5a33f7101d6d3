//! Errors surfaced on screen.

use std::fmt;

/// Shown when no TMDB credential is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "Chave da API TMDB não configurada. Defina TMDB_API_KEY para continuar.";

/// Shown when a catalog page request fails.
pub const CATALOG_FETCH_FAILED: &str = "Erro ao buscar filmes. Tente novamente mais tarde.";

/// Shown when a movie details request fails.
pub const DETAIL_FETCH_FAILED: &str = "Erro ao carregar detalhes do filme.";

/// Screen-level error state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ScreenError {
    /// No API credential; retrying cannot help.
    MissingCredential,
    /// The request failed (HTTP status, network, or decoding).
    Request(String),
}

impl ScreenError {
    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MissingCredential => MISSING_CREDENTIAL_MESSAGE,
            Self::Request(message) => message,
        }
    }

    /// Returns whether a retry action should be offered.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
