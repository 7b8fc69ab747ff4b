use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_MANAGER, ROLE_USER};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    /// Email claim, used to find the local user record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Upper-case role names without the `ROLE_` prefix
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(ROLE_MANAGER)
    }

    pub fn is_user(&self) -> bool {
        self.has_role(ROLE_USER)
    }

    /// Regions are shared between administrators and managers
    pub fn can_manage_regions(&self) -> bool {
        self.is_admin() || self.is_manager()
    }
}

/// Normalize a role name: strip a `ROLE_` prefix and upper-case the rest.
pub fn normalize_role(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.strip_prefix("ROLE_") {
        Some(stripped) => stripped.to_string(),
        None => upper,
    }
}
