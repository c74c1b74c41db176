//! Product table and mutation routes.
//!
//! The table shows one backend page at a time; the `q` filter narrows the
//! rows already fetched for that page and never changes the backend query.
//! Mutations call the backend and then re-fetch the current page, so the
//! table always reflects backend truth (no optimistic updates).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use mangaba_core::{Money, Page, ProductId};

use crate::backend::types::{ImageUpload, NewProduct, Product, ProductUpdate};
use crate::components::data_table::{DataTableConfig, products_table_config};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::models::CurrentAdmin;
use crate::routes::{PAGE_SIZE, filter_page_by_name};
use crate::state::AppState;

/// Table query parameters.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Hidden fields carried by row-level mutation forms so the fragment can
/// re-fetch the same page with the same filter.
#[derive(Debug, Deserialize)]
pub struct RowActionForm {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub q: String,
}

/// Product form fields (create and edit share the shape).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Parse and validate the form into the update payload.
    fn parse(&self) -> std::result::Result<ProductUpdate, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required");
        }

        let price = self
            .price
            .trim()
            .replace(',', ".")
            .parse::<Decimal>()
            .map_err(|_| "Price must be a number")?;
        if price.is_sign_negative() {
            return Err("Price cannot be negative");
        }

        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|_| "Stock must be a whole number")?;

        let description = self.description.trim();
        Ok(ProductUpdate {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            price: Money::new(price),
            stock,
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Products table page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin: CurrentAdmin,
    pub current_path: String,
    pub table: DataTableConfig,
    pub rows: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub q: String,
    pub empty_title: String,
    pub error: Option<String>,
}

/// Product rows fragment template (HTMX target for toggles).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_rows.html")]
pub struct ProductRowsTemplate {
    pub rows: Vec<Product>,
    pub page: u32,
    pub q: String,
    pub empty_title: String,
}

/// Product form page template (create and edit).
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin: CurrentAdmin,
    pub current_path: String,
    pub form: ProductForm,
    pub editing: Option<i64>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

// =============================================================================
// Listing
// =============================================================================

/// Fetch one backend page and apply the post-fetch name filter.
async fn fetch_rows(
    state: &AppState,
    page: u32,
    q: &str,
) -> (Vec<Product>, u32, Option<String>) {
    match state.backend().list_products(page, PAGE_SIZE).await {
        Ok(Page {
            content,
            total_pages,
        }) => {
            let rows = filter_page_by_name(content, q, |p: &Product| p.name.clone());
            (rows, total_pages, None)
        }
        Err(e) => {
            tracing::error!("Failed to list products: {e}");
            (Vec::new(), 0, Some(e.user_message()))
        }
    }
}

/// Products table page.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(0);
    let q = query.q.unwrap_or_default();

    let (rows, total_pages, error) = fetch_rows(&state, page, &q).await;

    let table = products_table_config();
    Ok(ProductsIndexTemplate {
        admin,
        current_path: "/products".to_string(),
        empty_title: table.empty_title.clone(),
        table,
        rows,
        page,
        total_pages,
        q,
        error,
    })
}

/// Toggle a product's active status, then re-fetch the current page and
/// return the refreshed rows fragment (HTMX).
#[instrument(skip(state))]
pub async fn toggle_status(
    RequireStaff(_admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<RowActionForm>,
) -> Result<Response> {
    if let Err(e) = state
        .backend()
        .toggle_product_status(ProductId::new(id))
        .await
    {
        tracing::error!("Failed to toggle product {id}: {e}");
    }

    let (rows, _, _) = fetch_rows(&state, form.page, &form.q).await;

    Ok(ProductRowsTemplate {
        rows,
        page: form.page,
        q: form.q,
        empty_title: products_table_config().empty_title,
    }
    .into_response())
}

// =============================================================================
// Create / edit
// =============================================================================

/// Product creation form.
#[instrument(skip(admin))]
pub async fn new_page(RequireStaff(admin): RequireStaff) -> impl IntoResponse {
    ProductFormTemplate {
        admin,
        current_path: "/products".to_string(),
        form: ProductForm::default(),
        editing: None,
        error: None,
        notice: None,
    }
}

/// Create a product and return to the table.
#[instrument(skip(state, admin, form))]
pub async fn create(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let parsed = match form.parse() {
        Ok(update) => update,
        Err(message) => {
            return Ok(ProductFormTemplate {
                admin,
                current_path: "/products".to_string(),
                form,
                editing: None,
                error: Some(message.to_string()),
                notice: None,
            }
            .into_response());
        }
    };

    let new_product = NewProduct {
        name: parsed.name,
        description: parsed.description,
        price: parsed.price,
        stock: parsed.stock,
    };

    match state.backend().create_product(&new_product).await {
        Ok(()) => Ok(Redirect::to("/products").into_response()),
        Err(e) => Ok(ProductFormTemplate {
            admin,
            current_path: "/products".to_string(),
            form,
            editing: None,
            error: Some(e.user_message()),
            notice: None,
        }
        .into_response()),
    }
}

/// Query parameters for the edit page notices.
#[derive(Debug, Deserialize)]
pub struct EditQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Product edit form, pre-filled from the backend.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EditQuery>,
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

    Ok(ProductFormTemplate {
        admin,
        current_path: "/products".to_string(),
        form: ProductForm::from_product(&product),
        editing: Some(id),
        error: query.error,
        notice: query.notice,
    })
}

/// Update a product and return to the table.
#[instrument(skip(state, admin, form))]
pub async fn update(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let parsed = match form.parse() {
        Ok(update) => update,
        Err(message) => {
            return Ok(ProductFormTemplate {
                admin,
                current_path: "/products".to_string(),
                form,
                editing: Some(id),
                error: Some(message.to_string()),
                notice: None,
            }
            .into_response());
        }
    };

    match state
        .backend()
        .update_product(ProductId::new(id), &parsed)
        .await
    {
        Ok(()) => Ok(Redirect::to("/products").into_response()),
        Err(e) => Ok(ProductFormTemplate {
            admin,
            current_path: "/products".to_string(),
            form,
            editing: Some(id),
            error: Some(e.user_message()),
            notice: None,
        }
        .into_response()),
    }
}

// =============================================================================
// Image upload
// =============================================================================

/// Forward uploaded image files to the backend (multipart pass-through).
#[instrument(skip(state, multipart))]
pub async fn upload_images(
    RequireStaff(_admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("images") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            continue;
        }
        images.push(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if images.is_empty() {
        return Ok(Redirect::to(&format!(
            "/products/{id}/edit?error=No+images+selected"
        )));
    }

    match state
        .backend()
        .upload_product_images(ProductId::new(id), images)
        .await
    {
        Ok(()) => Ok(Redirect::to(&format!(
            "/products/{id}/edit?notice=Images+uploaded"
        ))),
        Err(e) => {
            tracing::error!("Image upload failed for product {id}: {e}");
            Ok(Redirect::to(&format!(
                "/products/{id}/edit?error=Image+upload+failed"
            )))
        }
    }
}
