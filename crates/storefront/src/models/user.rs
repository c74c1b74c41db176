//! The logged-in user as stored in the session.

use serde::{Deserialize, Serialize};

use mangaba_core::{UserId, UserRole};

use crate::backend::types::Profile;

/// Session-resident profile of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// First name, for the header greeting.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

impl From<Profile> for CurrentUser {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            role: profile.role,
        }
    }
}
