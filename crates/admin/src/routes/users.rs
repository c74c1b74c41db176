//! User table and mutation routes (admins only).
//!
//! Same shape as the product table: one backend page per request, the `q`
//! filter narrows the fetched rows only, mutations re-fetch the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use mangaba_core::{Email, Page, UserId, UserRole};

use crate::backend::types::{User, UserUpdate};
use crate::components::data_table::{DataTableConfig, users_table_config};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::routes::products::RowActionForm;
use crate::routes::{PAGE_SIZE, filter_page_by_name};
use crate::state::AppState;

/// Table query parameters.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// User form fields for editing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserForm {
    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: match user.role {
                UserRole::Customer => "CUSTOMER".to_string(),
                UserRole::Stockist => "STOCKIST".to_string(),
                UserRole::Admin => "ADMIN".to_string(),
            },
        }
    }

    /// Parse and validate the form into the update payload.
    fn parse(&self) -> std::result::Result<UserUpdate, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let email = Email::parse(self.email.trim()).map_err(|e| e.to_string())?;
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|_| "Select a valid role".to_string())?;

        Ok(UserUpdate {
            name: name.to_string(),
            email: email.into_inner(),
            role,
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Users table page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin: CurrentAdmin,
    pub current_path: String,
    pub table: DataTableConfig,
    pub rows: Vec<User>,
    pub page: u32,
    pub total_pages: u32,
    pub q: String,
    pub empty_title: String,
    pub error: Option<String>,
}

/// User rows fragment template (HTMX target for toggles).
#[derive(Template, WebTemplate)]
#[template(path = "partials/user_rows.html")]
pub struct UserRowsTemplate {
    pub rows: Vec<User>,
    pub page: u32,
    pub q: String,
    pub empty_title: String,
}

/// User edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub admin: CurrentAdmin,
    pub current_path: String,
    pub form: UserForm,
    pub editing: i64,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Fetch one backend page and apply the post-fetch name filter.
async fn fetch_rows(state: &AppState, page: u32, q: &str) -> (Vec<User>, u32, Option<String>) {
    match state.backend().list_users(page, PAGE_SIZE).await {
        Ok(Page {
            content,
            total_pages,
        }) => {
            let rows = filter_page_by_name(content, q, |u: &User| u.name.clone());
            (rows, total_pages, None)
        }
        Err(e) => {
            tracing::error!("Failed to list users: {e}");
            (Vec::new(), 0, Some(e.user_message()))
        }
    }
}

/// Users table page.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(0);
    let q = query.q.unwrap_or_default();

    let (rows, total_pages, error) = fetch_rows(&state, page, &q).await;

    let table = users_table_config();
    Ok(UsersIndexTemplate {
        admin,
        current_path: "/users".to_string(),
        empty_title: table.empty_title.clone(),
        table,
        rows,
        page,
        total_pages,
        q,
        error,
    })
}

/// Toggle a user's active status, then re-fetch the current page and
/// return the refreshed rows fragment (HTMX).
#[instrument(skip(state))]
pub async fn toggle_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<RowActionForm>,
) -> Result<Response> {
    if let Err(e) = state.backend().toggle_user_status(UserId::new(id)).await {
        tracing::error!("Failed to toggle user {id}: {e}");
    }

    let (rows, _, _) = fetch_rows(&state, form.page, &form.q).await;

    Ok(UserRowsTemplate {
        rows,
        page: form.page,
        q: form.q,
        empty_title: users_table_config().empty_title,
    }
    .into_response())
}

/// User edit form, pre-filled from the backend.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user = state
        .backend()
        .get_user(UserId::new(id))
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound(format!("user {id}"))
            } else {
                AppError::Backend(e)
            }
        })?;

    Ok(UserEditTemplate {
        admin,
        current_path: "/users".to_string(),
        form: UserForm::from_user(&user),
        editing: id,
        error: None,
    })
}

/// Update a user and return to the table.
#[instrument(skip(state, admin, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let parsed = match form.parse() {
        Ok(update) => update,
        Err(message) => {
            return Ok(UserEditTemplate {
                admin,
                current_path: "/users".to_string(),
                form,
                editing: id,
                error: Some(message),
            }
            .into_response());
        }
    };

    match state.backend().update_user(UserId::new(id), &parsed).await {
        Ok(()) => Ok(Redirect::to("/users").into_response()),
        Err(e) => Ok(UserEditTemplate {
            admin,
            current_path: "/users".to_string(),
            form,
            editing: id,
            error: Some(e.user_message()),
        }
        .into_response()),
    }
}
