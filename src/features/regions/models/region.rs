use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Top level administrative region
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
