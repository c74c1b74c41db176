//! REST client for the shop's backend.
//!
//! All durable state (catalogue, accounts, orders) lives behind this API;
//! the storefront only renders it. Failures are surfaced to the caller
//! unchanged - no retries, no timeouts beyond the transport defaults.

pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use mangaba_core::{Cep, Page, ProductId, UserId};

use types::{
    ApiMessage, LoginRequest, OrderConfirmation, OrderRequest, OrderSummary, Product, Profile,
    RegisterRequest, ShippingQuote,
};

/// Fixed sort order for catalogue listings (newest first).
const PRODUCT_SORT: &str = "id,desc";

/// Errors returned by the backend client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether this is a 404 from the backend.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        )
    }

    /// A message suitable for showing to the user.
    ///
    /// Backend-supplied messages pass through; transport and decode failures
    /// collapse to a generic line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Client for the shop's REST backend.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Build a full URL for an endpoint path.
    fn url(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url.path_segments_mut().unwrap_or_else(|()| {
                unreachable!("backend base URL is validated as an HTTP URL at config load")
            });
            segments.pop_if_empty();
            segments.extend(path.split('/'));
        }
        url
    }

    /// Read the response body, turning non-success statuses into
    /// [`BackendError::Status`] with the backend's `message` when present.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(BackendError::Status { status, message });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`Self::decode`] but for endpoints with empty success bodies.
    async fn check(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|m| m.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(BackendError::Status { status, message })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Fetch one page of the catalogue (zero-based page index, fixed sort).
    pub async fn list_products(&self, page: u32, size: u32) -> Result<Page<Product>, BackendError> {
        let mut url = self.url("products");
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string())
            .append_pair("sort", PRODUCT_SORT);
        self.get_json(url).await
    }

    /// Fetch a single product by ID.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, BackendError> {
        self.get_json(self.url(&format!("products/{id}"))).await
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Authenticate and return the account profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, BackendError> {
        self.post_json(self.url("auth/login"), &LoginRequest { email, password })
            .await
    }

    /// Register a new customer account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("users"))
            .json(request)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Fetch a user's order history.
    pub async fn list_orders(&self, user: UserId) -> Result<Vec<OrderSummary>, BackendError> {
        self.get_json(self.url(&format!("users/{user}/orders")))
            .await
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Fetch the delivery price for a postal code.
    pub async fn shipping_quote(&self, cep: &Cep) -> Result<ShippingQuote, BackendError> {
        self.get_json(self.url(&format!("shipping/{}", cep.as_str())))
            .await
    }

    /// Submit a completed order.
    pub async fn submit_order(
        &self,
        order: &OrderRequest,
    ) -> Result<OrderConfirmation, BackendError> {
        self.post_json(self.url("orders"), order).await
    }
}
