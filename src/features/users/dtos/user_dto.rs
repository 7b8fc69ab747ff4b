use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::ProfileResponseDto;
use crate::features::users::models::{Role, User, UserFields, UserProfile};

fn default_true() -> bool {
    true
}

/// Request DTO for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    /// Unique, case-insensitive
    #[validate(
        email(message = "Email must be a valid email address"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: String,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default = "default_true")]
    pub account_non_locked: bool,

    #[serde(default)]
    #[validate(range(min = 0, message = "Failed login attempts must not be negative"))]
    pub failed_login_attempts: i32,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub must_change_password: bool,

    /// Role ids to grant, every id must exist
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

impl CreateUserDto {
    pub fn fields(&self) -> UserFields {
        UserFields {
            email: self.email.trim().to_string(),
            active: self.active,
            account_non_locked: self.account_non_locked,
            failed_login_attempts: self.failed_login_attempts,
            email_verified: self.email_verified,
            must_change_password: self.must_change_password,
        }
    }
}

/// Request DTO for updating a user, replaces the role set
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(
        email(message = "Email must be a valid email address"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: String,

    pub active: bool,

    pub account_non_locked: bool,

    #[validate(range(min = 0, message = "Failed login attempts must not be negative"))]
    pub failed_login_attempts: i32,

    pub email_verified: bool,

    pub must_change_password: bool,

    #[validate(length(min = 1, message = "At least one role is required"))]
    pub role_ids: Vec<i64>,
}

impl UpdateUserDto {
    pub fn fields(&self) -> UserFields {
        UserFields {
            email: self.email.trim().to_string(),
            active: self.active,
            account_non_locked: self.account_non_locked,
            failed_login_attempts: self.failed_login_attempts,
            email_verified: self.email_verified,
            must_change_password: self.must_change_password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}

/// Response DTO for user data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: i64,
    pub email: String,
    pub active: bool,
    pub account_non_locked: bool,
    pub failed_login_attempts: i32,
    pub email_verified: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            active: user.active,
            account_non_locked: user.account_non_locked,
            failed_login_attempts: user.failed_login_attempts,
            email_verified: user.email_verified,
            must_change_password: user.must_change_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User with its roles and profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailDto {
    #[serde(flatten)]
    pub user: UserResponseDto,
    pub roles: Vec<RoleDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileResponseDto>,
}

impl UserDetailDto {
    pub fn new(user: User, roles: Vec<Role>, profile: Option<UserProfile>) -> Self {
        Self {
            user: user.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            profile: profile.map(Into::into),
        }
    }
}

/// Prefilled edit form of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserEditDto {
    pub id: i64,
    pub email: String,
    pub active: bool,
    pub account_non_locked: bool,
    pub failed_login_attempts: i32,
    pub email_verified: bool,
    pub must_change_password: bool,
    pub role_ids: Vec<i64>,
}

impl UserEditDto {
    pub fn new(user: User, roles: &[Role]) -> Self {
        Self {
            id: user.id,
            email: user.email,
            active: user.active,
            account_non_locked: user.account_non_locked,
            failed_login_attempts: user.failed_login_attempts,
            email_verified: user.email_verified,
            must_change_password: user.must_change_password,
            role_ids: roles.iter().map(|r| r.id).collect(),
        }
    }
}

/// User form data: the user being edited (absent for a new one) and the
/// role catalogue to choose from
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFormDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserEditDto>,
    pub roles: Vec<RoleDto>,
}
