//! Wire types for the backend's admin endpoints.

use serde::{Deserialize, Serialize};

use mangaba_core::{Money, ProductId, UserId, UserRole};

/// A product as the admin panel sees it.
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
    pub active: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A user account as the admin panel sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
}

/// Payload for creating a product.
#[derive(Debug, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: u32,
}

/// Payload for editing a product.
#[derive(Debug, Serialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: u32,
}

/// Payload for editing a user.
#[derive(Debug, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Login request payload.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Profile returned by the backend on successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

/// One image file to upload for a product.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Error body shape the backend uses for non-success responses.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
