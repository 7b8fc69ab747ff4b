use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Province row joined with the name of its owning region
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Province {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub region_id: i64,
    /// From `regions.name`, not stored on the province
    pub region_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
