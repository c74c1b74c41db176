//! Cart persistence.
//!
//! The cart is one serialized text value under a fixed key. [`CartStore`]
//! abstracts where that value lives: the session in production,
//! [`MemoryCartStore`] in tests. Change notification is not part of the
//! store - interested fragments re-render off the `cart-updated` HTMX
//! trigger emitted by the cart routes.

use tokio::sync::Mutex;
use tower_sessions::Session;

use crate::models::session_keys;

/// Errors from reading or writing the cart store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying session store failed.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The line list could not be serialized.
    #[error("cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage for the serialized cart text.
pub trait CartStore {
    /// Read the stored text, if any.
    async fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored text.
    async fn write(&self, text: &str) -> Result<(), StoreError>;
}

/// Session-backed cart store (production).
pub struct SessionCartStore<'a> {
    session: &'a Session,
}

impl<'a> SessionCartStore<'a> {
    /// Bind the store to a request's session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl CartStore for SessionCartStore<'_> {
    async fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.session.get::<String>(session_keys::CART).await?)
    }

    async fn write(&self, text: &str) -> Result<(), StoreError> {
        self.session.insert(session_keys::CART, text).await?;
        Ok(())
    }
}

/// In-memory cart store for unit tests.
#[derive(Default)]
pub struct MemoryCartStore {
    cell: Mutex<Option<String>>,
}

impl CartStore for MemoryCartStore {
    async fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.cell.lock().await.clone())
    }

    async fn write(&self, text: &str) -> Result<(), StoreError> {
        *self.cell.lock().await = Some(text.to_string());
        Ok(())
    }
}
