//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::AdminClient;
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: AdminClient,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let backend = AdminClient::new(
            config.backend_api_url.clone(),
            config.backend_api_token.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the privileged backend client.
    #[must_use]
    pub fn backend(&self) -> &AdminClient {
        &self.inner.backend
    }
}
