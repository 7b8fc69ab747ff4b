use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One-to-one profile of a user, keyed by the user id
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// Web path of the stored image, e.g. `/uploads/<uuid>.png`
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub locale: Option<String>,
}
