//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Mutations answer with a fragment plus an `HX-Trigger: cart-updated`
//! header; the header badge listens for that event and re-fetches itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use mangaba_core::{Money, ProductId};

use crate::cart::{self, CartLine, CartService, SessionCartStore};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    pub count: u32,
}

impl CartView {
    /// Build the view from the stored lines.
    #[must_use]
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        let subtotal = cart::subtotal(&items);
        let count = cart::item_count(&items);
        Self {
            items,
            subtotal,
            count,
        }
    }

}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
}

/// Form data for line-level operations.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub product_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub user: Option<CurrentUser>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(session, user))]
pub async fn show(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let service = CartService::new(SessionCartStore::new(&session));
    let items = service.items().await?;

    Ok(CartShowTemplate {
        cart: CartView::from_lines(items),
        user,
    })
}

/// Add a product to the cart (HTMX).
///
/// Fetches the product from the backend so the stored line carries the
/// authoritative price, then returns the count badge with a `cart-updated`
/// trigger.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = match state
        .backend()
        .get_product(ProductId::new(form.product_id))
        .await
    {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product for cart add: {e}");
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"text-red-500\">Error adding to cart</span>"),
            )
                .into_response());
        }
    };

    let service = CartService::new(SessionCartStore::new(&session));
    let items = service.add_item(&product).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart::item_count(&items),
        },
    )
        .into_response())
}

/// Increase a line's quantity (HTMX).
#[instrument(skip(session))]
pub async fn increment(session: Session, Form(form): Form<LineForm>) -> Result<Response> {
    let service = CartService::new(SessionCartStore::new(&session));
    let items = service.increment(ProductId::new(form.product_id)).await?;
    Ok(items_fragment(items))
}

/// Decrease a line's quantity, removing the line at zero (HTMX).
#[instrument(skip(session))]
pub async fn decrement(session: Session, Form(form): Form<LineForm>) -> Result<Response> {
    let service = CartService::new(SessionCartStore::new(&session));
    let items = service.decrement(ProductId::new(form.product_id)).await?;
    Ok(items_fragment(items))
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<LineForm>) -> Result<Response> {
    let service = CartService::new(SessionCartStore::new(&session));
    let items = service.remove_item(ProductId::new(form.product_id)).await?;
    Ok(items_fragment(items))
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let service = CartService::new(SessionCartStore::new(&session));
    let count = service.item_count().await?;
    Ok(CartCountTemplate { count })
}

/// Items fragment with the `cart-updated` trigger attached.
fn items_fragment(items: Vec<CartLine>) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_lines(items),
        },
    )
        .into_response()
}
