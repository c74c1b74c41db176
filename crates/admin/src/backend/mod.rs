//! Privileged REST client for the backend's admin endpoints.
//!
//! Every request carries the admin API token as a bearer credential. As in
//! the rest of the system there are no retries and no timeouts beyond the
//! transport defaults; a failure surfaces to the caller immediately.

pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use mangaba_core::{Page, ProductId, UserId};

use types::{
    ApiMessage, ImageUpload, LoginRequest, NewProduct, Product, ProductUpdate, Profile, User,
    UserUpdate,
};

/// Fixed sort order for admin listings (newest first).
const LIST_SORT: &str = "id,desc";

/// Errors returned by the admin backend client.
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

/// Client for the backend's admin endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl AdminClient {
    /// Create a new admin client.
    #[must_use]
    pub fn new(base_url: Url, token: SecretString) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url,
                token,
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
            return Err(BackendError::Status {
                status,
                message: error_message(status, &body),
            });
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
        Err(BackendError::Status {
            status,
            message: error_message(status, &body),
        })
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .get(url)
            .bearer_auth(self.inner.token.expose_secret())
    }

    fn put(&self, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .put(url)
            .bearer_auth(self.inner.token.expose_secret())
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .post(url)
            .bearer_auth(self.inner.token.expose_secret())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = self.get(url).send().await?;
        Self::decode(response).await
    }

    fn list_url(&self, path: &str, page: u32, size: u32) -> Url {
        let mut url = self.url(path);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string())
            .append_pair("sort", LIST_SORT);
        url
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Authenticate a staff member and return the profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, BackendError> {
        let response = self
            .post(self.url("auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch one page of products (zero-based page index, fixed sort).
    pub async fn list_products(&self, page: u32, size: u32) -> Result<Page<Product>, BackendError> {
        self.get_json(self.list_url("products", page, size)).await
    }

    /// Fetch a single product.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, BackendError> {
        self.get_json(self.url(&format!("products/{id}"))).await
    }

    /// Create a product.
    pub async fn create_product(&self, product: &NewProduct) -> Result<(), BackendError> {
        let response = self
            .post(self.url("products"))
            .json(product)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Edit a product.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<(), BackendError> {
        let response = self
            .put(self.url(&format!("products/{id}")))
            .json(update)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Toggle a product's active status.
    pub async fn toggle_product_status(&self, id: ProductId) -> Result<(), BackendError> {
        let response = self
            .put(self.url(&format!("products/{id}/status")))
            .send()
            .await?;
        Self::check(response).await
    }

    /// Upload product images (multipart pass-through).
    pub async fn upload_product_images(
        &self,
        id: ProductId,
        images: Vec<ImageUpload>,
    ) -> Result<(), BackendError> {
        let mut form = reqwest::multipart::Form::new();
        for image in images {
            let part = reqwest::multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(BackendError::Transport)?;
            form = form.part("images", part);
        }

        let response = self
            .post(self.url(&format!("products/{id}/images")))
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Fetch one page of users (zero-based page index, fixed sort).
    pub async fn list_users(&self, page: u32, size: u32) -> Result<Page<User>, BackendError> {
        self.get_json(self.list_url("users", page, size)).await
    }

    /// Fetch a single user.
    pub async fn get_user(&self, id: UserId) -> Result<User, BackendError> {
        self.get_json(self.url(&format!("users/{id}"))).await
    }

    /// Edit a user.
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<(), BackendError> {
        let response = self
            .put(self.url(&format!("users/{id}")))
            .json(update)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Toggle a user's active status.
    pub async fn toggle_user_status(&self, id: UserId) -> Result<(), BackendError> {
        let response = self
            .put(self.url(&format!("users/{id}/status")))
            .send()
            .await?;
        Self::check(response).await
    }
}

/// Extract the backend's `message` field from an error body, falling back
/// to the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> AdminClient {
        AdminClient::new(
            Url::parse("http://localhost:8080/api").unwrap(),
            SecretString::from("kJ8#mP2$vN5@qR7!wT4^xZ9&cF3*bG6"),
        )
    }

    #[test]
    fn test_list_url_carries_fixed_sort() {
        let url = client().list_url("products", 2, 10);
        let query = url.query().unwrap();
        assert!(query.contains("page=2"));
        assert!(query.contains("size=10"));
        assert!(query.contains("sort=id%2Cdesc"));
    }

    #[test]
    fn test_error_message_prefers_backend_body() {
        let message = error_message(StatusCode::CONFLICT, r#"{"message":"name already taken"}"#);
        assert_eq!(message, "name already taken");
    }

    #[test]
    fn test_error_message_falls_back_to_status_line() {
        let message = error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(message, "Bad Gateway");
    }
}
