use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Application user. Credentials live in the identity provider.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
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

/// Writable user columns shared by insert and update
#[derive(Debug, Clone)]
pub struct UserFields {
    pub email: String,
    pub active: bool,
    pub account_non_locked: bool,
    pub failed_login_attempts: i32,
    pub email_verified: bool,
    pub must_change_password: bool,
}
