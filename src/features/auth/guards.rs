//! Role-based authorization guards.
//!
//! Each guard extracts the authenticated user placed in the request
//! extensions by the bearer token middleware and checks its roles:
//! - ADMIN: users and regions
//! - MANAGER: regions and provinces
//! - USER: own profile

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for user administration, requires ADMIN.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user))
    }
}

/// Guard for region management, allows ADMIN or MANAGER.
pub struct RequireRegionManager(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireRegionManager
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.can_manage_regions() {
            return Err(AppError::Forbidden(
                "Admin or manager access required".to_string(),
            ));
        }

        Ok(RequireRegionManager(user))
    }
}

/// Guard for province management, requires MANAGER.
pub struct RequireManager(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireManager
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_manager() {
            return Err(AppError::Forbidden("Manager access required".to_string()));
        }

        Ok(RequireManager(user))
    }
}

/// Guard for the profile editor, requires USER.
pub struct RequireUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_user() {
            return Err(AppError::Forbidden("User access required".to_string()));
        }

        Ok(RequireUser(user))
    }
}
