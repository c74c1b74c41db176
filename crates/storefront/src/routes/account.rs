//! Account pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::backend::types::OrderSummary;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderSummary>,
    pub error: Option<String>,
    pub user: Option<CurrentUser>,
}

/// Display the logged-in user's order history.
#[instrument(skip(state, current))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let (orders, error) = match state.backend().list_orders(current.id).await {
        Ok(orders) => (orders, None),
        Err(e) => {
            tracing::error!("Failed to fetch order history: {e}");
            (Vec::new(), Some(e.user_message()))
        }
    };

    Ok(OrdersTemplate {
        orders,
        error,
        user: Some(current),
    })
}
