//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tracing::instrument;

use mangaba_core::ProductId;

use crate::backend::types::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub user: Option<CurrentUser>,
}

/// Display a single product.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let product = state
        .backend()
        .get_product(ProductId::new(id))
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound(format!("product {id}"))
            } else {
                AppError::Backend(e)
            }
        })?;

    Ok(ProductShowTemplate { product, user })
}
