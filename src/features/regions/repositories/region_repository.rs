use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::Region;
use crate::shared::pagination::{PageRequest, SortField, SortWhitelist};

/// Sortable region fields
pub static REGION_SORT: SortWhitelist = SortWhitelist {
    entity: "region",
    fields: &[
        SortField {
            name: "id",
            column: "id",
        },
        SortField {
            name: "code",
            column: "code",
        },
        SortField {
            name: "name",
            column: "name",
        },
    ],
    default_field: "name",
    id_column: "id",
};

#[async_trait]
pub trait RegionRepository: Send + Sync {
    async fn count(&self) -> Result<i64>;

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Region>>;

    /// All regions ordered by name
    async fn find_all(&self) -> Result<Vec<Region>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Region>>;

    /// Case-insensitive code lookup, optionally ignoring one region
    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>) -> Result<bool>;

    async fn insert(&self, code: &str, name: &str) -> Result<Region>;

    async fn update(&self, id: i64, code: &str, name: &str) -> Result<Option<Region>>;

    /// Returns false when no region had this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct PgRegionRepository {
    pool: PgPool,
}

impl PgRegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegionRepository for PgRegionRepository {
    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM regions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count regions: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Region>> {
        // ORDER BY comes from the whitelist, never from raw input
        let sql = format!(
            r#"
            SELECT id, code, name, created_at, updated_at
            FROM regions
            ORDER BY {}
            LIMIT $1 OFFSET $2
            "#,
            request.order_by()
        );

        sqlx::query_as::<_, Region>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch regions page: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_all(&self) -> Result<Vec<Region>> {
        sqlx::query_as::<_, Region>(
            r#"
            SELECT id, code, name, created_at, updated_at
            FROM regions
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch regions: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Region>> {
        sqlx::query_as::<_, Region>(
            r#"
            SELECT id, code, name, created_at, updated_at
            FROM regions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch region {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM regions
                WHERE LOWER(code) = LOWER($1)
                  AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check region code {}: {:?}", code, e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, code: &str, name: &str) -> Result<Region> {
        sqlx::query_as::<_, Region>(
            r#"
            INSERT INTO regions (code, name)
            VALUES ($1, $2)
            RETURNING id, code, name, created_at, updated_at
            "#,
        )
        .bind(code)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "region", "code", code))
    }

    async fn update(&self, id: i64, code: &str, name: &str) -> Result<Option<Region>> {
        sqlx::query_as::<_, Region>(
            r#"
            UPDATE regions
            SET code = $2, name = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "region", "code", code))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM regions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "region", "id", id))?;

        Ok(result.rows_affected() > 0)
    }
}
