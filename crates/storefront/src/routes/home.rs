//! Home page: the product grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use crate::backend::types::Product;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Products shown per page.
const PAGE_SIZE: u32 = 12;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub error: Option<String>,
    pub user: Option<CurrentUser>,
}

/// Display the product grid.
///
/// A backend failure renders an empty grid with a banner; the rest of the
/// page stays usable.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let page = query.page.unwrap_or(0);

    let (products, total_pages, error) = match state.backend().list_products(page, PAGE_SIZE).await
    {
        Ok(listing) => {
            let visible = listing
                .content
                .into_iter()
                .filter(|p| p.active)
                .collect::<Vec<_>>();
            (visible, listing.total_pages, None)
        }
        Err(e) => {
            tracing::error!("Failed to list products: {e}");
            (Vec::new(), 0, Some(e.user_message()))
        }
    };

    HomeTemplate {
        products,
        page,
        total_pages,
        error,
        user,
    }
}
