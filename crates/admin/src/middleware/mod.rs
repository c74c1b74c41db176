//! Middleware: sessions and staff authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireStaff, clear_current_admin, set_current_admin};
pub use session::create_session_layer;
