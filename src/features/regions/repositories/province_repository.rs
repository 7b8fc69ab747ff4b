use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::Province;
use crate::shared::pagination::{PageRequest, SortField, SortWhitelist};

/// Sortable province fields, `regionName` sorts on the joined region
pub static PROVINCE_SORT: SortWhitelist = SortWhitelist {
    entity: "province",
    fields: &[
        SortField {
            name: "id",
            column: "p.id",
        },
        SortField {
            name: "code",
            column: "p.code",
        },
        SortField {
            name: "name",
            column: "p.name",
        },
        SortField {
            name: "regionName",
            column: "r.name",
        },
    ],
    default_field: "name",
    id_column: "p.id",
};

const SELECT_PROVINCE: &str = r#"
    SELECT p.id, p.code, p.name, p.region_id, r.name AS region_name,
           p.created_at, p.updated_at
    FROM provinces p
    JOIN regions r ON r.id = p.region_id
"#;

#[async_trait]
pub trait ProvinceRepository: Send + Sync {
    async fn count(&self) -> Result<i64>;

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Province>>;

    /// All provinces ordered by name
    async fn find_all(&self) -> Result<Vec<Province>>;

    /// Provinces of one region ordered by name
    async fn find_by_region(&self, region_id: i64) -> Result<Vec<Province>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Province>>;

    /// Case-insensitive code lookup, optionally ignoring one province
    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>) -> Result<bool>;

    async fn insert(&self, code: &str, name: &str, region_id: i64) -> Result<Province>;

    async fn update(
        &self,
        id: i64,
        code: &str,
        name: &str,
        region_id: i64,
    ) -> Result<Option<Province>>;

    /// Returns false when no province had this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct PgProvinceRepository {
    pool: PgPool,
}

impl PgProvinceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProvinceRepository for PgProvinceRepository {
    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM provinces")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count provinces: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Province>> {
        let sql = format!(
            "{} ORDER BY {} LIMIT $1 OFFSET $2",
            SELECT_PROVINCE,
            request.order_by()
        );

        sqlx::query_as::<_, Province>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch provinces page: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_all(&self) -> Result<Vec<Province>> {
        let sql = format!("{} ORDER BY p.name ASC, p.id ASC", SELECT_PROVINCE);

        sqlx::query_as::<_, Province>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch provinces: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_region(&self, region_id: i64) -> Result<Vec<Province>> {
        let sql = format!(
            "{} WHERE p.region_id = $1 ORDER BY p.name ASC, p.id ASC",
            SELECT_PROVINCE
        );

        sqlx::query_as::<_, Province>(&sql)
            .bind(region_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch provinces of region {}: {:?}",
                    region_id,
                    e
                );
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Province>> {
        let sql = format!("{} WHERE p.id = $1", SELECT_PROVINCE);

        sqlx::query_as::<_, Province>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch province {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM provinces
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
            tracing::error!("Failed to check province code {}: {:?}", code, e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, code: &str, name: &str, region_id: i64) -> Result<Province> {
        sqlx::query_as::<_, Province>(
            r#"
            WITH inserted AS (
                INSERT INTO provinces (code, name, region_id)
                VALUES ($1, $2, $3)
                RETURNING id, code, name, region_id, created_at, updated_at
            )
            SELECT i.id, i.code, i.name, i.region_id, r.name AS region_name,
                   i.created_at, i.updated_at
            FROM inserted i
            JOIN regions r ON r.id = i.region_id
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(region_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "province", "code", code))
    }

    async fn update(
        &self,
        id: i64,
        code: &str,
        name: &str,
        region_id: i64,
    ) -> Result<Option<Province>> {
        sqlx::query_as::<_, Province>(
            r#"
            WITH updated AS (
                UPDATE provinces
                SET code = $2, name = $3, region_id = $4, updated_at = NOW()
                WHERE id = $1
                RETURNING id, code, name, region_id, created_at, updated_at
            )
            SELECT u.id, u.code, u.name, u.region_id, r.name AS region_name,
                   u.created_at, u.updated_at
            FROM updated u
            JOIN regions r ON r.id = u.region_id
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .bind(region_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "province", "code", code))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM provinces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "province", "id", id))?;

        Ok(result.rows_affected() > 0)
    }
}
