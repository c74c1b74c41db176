//! Wire types for the shop's REST backend.
//!
//! These mirror the backend's JSON payloads; domain views are built from
//! them in the route modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mangaba_core::{Money, OrderId, OrderStatus, ProductId, UserId, UserRole};

use crate::cart::CartLine;
use crate::checkout::{Address, Payment};

/// A catalogue product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

const fn default_active() -> bool {
    true
}

/// Profile returned by the backend on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

/// Login request payload.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration request payload.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A priced delivery option for a postal code.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingQuote {
    pub price: Money,
}

/// Order submission payload.
///
/// The draft is flattened into the explicit wire shape so the contract with
/// the backend stays visible in one place.
#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub items: Vec<CartLine>,
    pub address: Address,
    pub payment: Payment,
    pub shipping: Money,
}

/// Response to a submitted order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfirmation {
    pub id: OrderId,
}

/// One entry in a user's order history.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total: Money,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Error body shape the backend uses for non-success responses.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
