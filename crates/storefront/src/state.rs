//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::StorefrontConfig;
use crate::services::CepClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the two
/// outbound clients (shop backend, postal lookup).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    postal: CepClient,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(config.backend_api_url.clone());
        let postal = CepClient::new(config.cep_lookup_url.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                postal,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the postal-code lookup client.
    #[must_use]
    pub fn postal(&self) -> &CepClient {
        &self.inner.postal
    }
}
