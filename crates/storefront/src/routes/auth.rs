//! Authentication route handlers.
//!
//! Login and registration are thin pass-throughs to the backend: it owns
//! credentials, we only keep the returned profile in the session.

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

use crate::backend::types::RegisterRequest;
use crate::error::Result;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub user: Option<CurrentUser>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub form: RegisterFormView,
    pub error: Option<String>,
    pub user: Option<CurrentUser>,
}

/// Registration fields echoed back on validation failure.
#[derive(Debug, Clone, Default)]
pub struct RegisterFormView {
    pub name: String,
    pub email: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument]
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        error: query.error,
        success: query.success,
        user: None,
    }
}

/// Handle login form submission.
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
                success: None,
                user: None,
            }
            .into_response());
        }
    };

    match state.backend().login(email.as_str(), &form.password).await {
        Ok(profile) => {
            let user = CurrentUser::from(profile);
            set_current_user(&session, &user).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Ok(LoginTemplate {
                email: form.email,
                error: Some(e.user_message()),
                success: None,
                user: None,
            }
            .into_response())
        }
    }
}

/// Display the registration page.
#[instrument]
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        form: RegisterFormView::default(),
        error: None,
        user: None,
    }
}

/// Handle registration form submission.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let echo = RegisterFormView {
        name: form.name.clone(),
        email: form.email.clone(),
    };

    let render_error = |message: String| {
        RegisterTemplate {
            form: echo.clone(),
            error: Some(message),
            user: None,
        }
        .into_response()
    };

    if form.name.trim().is_empty() {
        return Ok(render_error("Name is required".to_string()));
    }
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => return Ok(render_error(e.to_string())),
    };
    if form.password.len() < MIN_PASSWORD_LENGTH {
        return Ok(render_error(format!(
            "Password must have at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if form.password != form.password_confirm {
        return Ok(render_error("Passwords do not match".to_string()));
    }

    let request = RegisterRequest {
        name: form.name.trim().to_string(),
        email: email.into_inner(),
        password: form.password,
    };

    match state.backend().register(&request).await {
        Ok(()) => Ok(Redirect::to("/auth/login?success=Account+created,+sign+in").into_response()),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            Ok(render_error(e.user_message()))
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    Ok(Redirect::to("/"))
}
