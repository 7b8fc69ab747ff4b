use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::models::Role;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Role catalogue ordered by name
    async fn find_all(&self) -> Result<Vec<Role>>;

    /// Roles matching the given ids, unknown ids are skipped
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Role>>;
}

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_all(&self) -> Result<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch roles: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name FROM roles WHERE id = ANY($1) ORDER BY name ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch roles {:?}: {:?}", ids, e);
            AppError::Database(e)
        })
    }
}
