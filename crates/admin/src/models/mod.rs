//! Domain models for the admin panel.

use serde::{Deserialize, Serialize};

use mangaba_core::{UserId, UserRole};

use crate::backend::types::Profile;

/// Session keys used by the admin panel.
pub mod session_keys {
    /// Logged-in staff profile.
    pub const CURRENT_ADMIN: &str = "mangaba.admin";
}

/// Session-resident profile of the logged-in staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

impl CurrentAdmin {
    /// Whether this staff member may manage user accounts.
    #[must_use]
    pub fn can_manage_users(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<Profile> for CurrentAdmin {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            role: profile.role,
        }
    }
}
