//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (product grid, paginated)
//! GET  /health                  - Health check (wired in main)
//!
//! # Products
//! GET  /products/{id}           - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add product (returns count badge, triggers cart-updated)
//! POST /cart/increment          - Increase quantity (returns cart_items fragment)
//! POST /cart/decrement          - Decrease quantity (returns cart_items fragment)
//! POST /cart/remove             - Remove line (returns cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                - Seed draft from cart, redirect to address step
//! GET  /checkout/address        - Address step
//! POST /checkout/address/lookup - CEP lookup (fragment)
//! POST /checkout/address        - Submit address, fetch shipping quote
//! GET  /checkout/payment        - Payment step
//! POST /checkout/payment        - Submit payment method
//! GET  /checkout/summary        - Order summary
//! POST /checkout/confirm        - Submit the order to the backend
//! GET  /checkout/confirmed      - Confirmation page
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Account (requires auth)
//! GET  /account/orders          - Order history
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::start))
        .route(
            "/address",
            get(checkout::address_page).post(checkout::submit_address),
        )
        .route("/address/lookup", post(checkout::lookup_cep))
        .route(
            "/payment",
            get(checkout::payment_page).post(checkout::submit_payment),
        )
        .route("/summary", get(checkout::summary_page))
        .route("/confirm", post(checkout::confirm))
        .route("/confirmed", get(checkout::confirmed))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
}
