//! Admin authentication routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use mangaba_core::Email;

use crate::error::Result;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

/// Root: send staff to the products table, everyone else to login.
#[instrument]
pub async fn root() -> Redirect {
    Redirect::to("/products")
}

/// Display the login page.
#[instrument]
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        error: query.error,
    }
}

/// Handle login form submission.
///
/// The backend authenticates; the panel additionally requires a staff
/// role before storing the profile in the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            return Ok(LoginTemplate {
                email: form.email,
                error: Some(e.to_string()),
            }
            .into_response());
        }
    };

    match state.backend().login(email.as_str(), &form.password).await {
        Ok(profile) => {
            let admin = CurrentAdmin::from(profile);
            if !admin.role.is_staff() {
                return Ok(LoginTemplate {
                    email: form.email,
                    error: Some("This account has no access to the admin panel".to_string()),
                }
                .into_response());
            }
            set_current_admin(&session, &admin).await?;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            Ok(LoginTemplate {
                email: form.email,
                error: Some(e.user_message()),
            }
            .into_response())
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    Ok(Redirect::to("/login"))
}
