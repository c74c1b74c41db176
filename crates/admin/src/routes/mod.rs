//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /login                   - Login page
//! POST /login                   - Login action (staff roles only)
//! POST /logout                  - Logout action
//!
//! # Products (staff)
//! GET  /products                - Paginated table (?page, ?q narrows the loaded page)
//! GET  /products/new            - Creation form
//! POST /products                - Create product
//! GET  /products/{id}/edit      - Edit form
//! POST /products/{id}           - Update product
//! POST /products/{id}/toggle    - Toggle active status (HTMX rows fragment)
//! POST /products/{id}/images    - Upload images (multipart pass-through)
//!
//! # Users (admins only)
//! GET  /users                   - Paginated table (?page, ?q narrows the loaded page)
//! GET  /users/{id}/edit         - Edit form
//! POST /users/{id}              - Update user
//! POST /users/{id}/toggle       - Toggle active status (HTMX rows fragment)
//! ```

pub mod auth;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Entities shown per table page.
pub const PAGE_SIZE: u32 = 10;

/// Narrow an already-fetched page by a case-insensitive substring on the
/// name column. The backend query is never changed by the filter.
pub fn filter_page_by_name<T>(items: Vec<T>, query: &str, name: impl Fn(&T) -> String) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| name(item).to_lowercase().contains(&needle))
        .collect()
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_page))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}", post(products::update))
        .route("/{id}/toggle", post(products::toggle_status))
        .route("/{id}/images", post(products::upload_images))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}/edit", get(users::edit_page))
        .route("/{id}", post(users::update))
        .route("/{id}/toggle", post(users::toggle_status))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/products", product_routes())
        .nest("/users", user_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let items = vec!["Ceramic Vase", "Wooden Tray", "Linen Cushion"];
        let filtered = filter_page_by_name(items, "VASE", |s| (*s).to_string());
        assert_eq!(filtered, vec!["Ceramic Vase"]);
    }

    #[test]
    fn test_blank_filter_keeps_page_intact() {
        let items = vec!["a", "b"];
        assert_eq!(
            filter_page_by_name(items, "  ", |s| (*s).to_string()).len(),
            2
        );
    }

    #[test]
    fn test_filter_can_empty_the_page() {
        let items = vec!["Ceramic Vase"];
        assert!(filter_page_by_name(items, "lamp", |s| (*s).to_string()).is_empty());
    }
}
