//! `ApiConfig` - the explicit connection settings handed to each controller.

use std::fmt;
use std::sync::Arc;

use cinecat_api::tmdb::DEFAULT_LANGUAGE;

use crate::error::ScreenError;

/// Connection settings for the screen controllers.
///
/// A missing credential is represented by the absence of a client; every
/// fetch attempt then resolves to [`ScreenError::MissingCredential`]
/// without touching the network.
pub struct ApiConfig<A> {
    /// API client, present only when a credential was configured.
    client: Option<Arc<A>>,
    /// Response language sent with every request.
    language: String,
}

impl<A> ApiConfig<A> {
    /// Creates a configuration around a ready client.
    pub fn new(client: A) -> Self {
        Self::from_shared(Arc::new(client))
    }

    /// Creates a configuration around a client shared with other screens.
    #[must_use]
    pub fn from_shared(client: Arc<A>) -> Self {
        Self {
            client: Some(client),
            language: String::from(DEFAULT_LANGUAGE),
        }
    }

    /// Creates a configuration for when no API credential is available.
    #[must_use]
    pub fn missing_credential() -> Self {
        Self {
            client: None,
            language: String::from(DEFAULT_LANGUAGE),
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns the response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns whether a credential (and therefore a client) is present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Returns a handle to the client.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::MissingCredential`] when no client is configured.
    pub fn client(&self) -> Result<Arc<A>, ScreenError> {
        self.client.clone().ok_or(ScreenError::MissingCredential)
    }
}

impl<A> Clone for ApiConfig<A> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            language: self.language.clone(),
        }
    }
}

impl<A> fmt::Debug for ApiConfig<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("configured", &self.is_configured())
            .field("language", &self.language)
            .finish()
    }
}
