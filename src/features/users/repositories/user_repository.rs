use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{Role, User, UserFields};
use crate::shared::pagination::{PageRequest, SortField, SortWhitelist};

/// Sortable user fields
pub static USER_SORT: SortWhitelist = SortWhitelist {
    entity: "user",
    fields: &[
        SortField {
            name: "id",
            column: "id",
        },
        SortField {
            name: "email",
            column: "email",
        },
        SortField {
            name: "active",
            column: "active",
        },
    ],
    default_field: "email",
    id_column: "id",
};

const USER_COLUMNS: &str = "id, email, active, account_non_locked, failed_login_attempts, \
     email_verified, must_change_password, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> Result<i64>;

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<User>>;

    /// All users ordered by email
    async fn find_all(&self) -> Result<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Case-insensitive email lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn exists_by_email(&self, email: &str, exclude_id: Option<i64>) -> Result<bool>;

    /// Roles granted to a user, ordered by name
    async fn find_roles(&self, user_id: i64) -> Result<Vec<Role>>;

    /// Insert a user together with its role links
    async fn insert(&self, fields: &UserFields, role_ids: &[i64]) -> Result<User>;

    /// Update a user and replace its role links
    async fn update(&self, id: i64, fields: &UserFields, role_ids: &[i64]) -> Result<Option<User>>;

    /// Returns false when no user had this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY {} LIMIT $1 OFFSET $2",
            USER_COLUMNS,
            request.order_by()
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch users page: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY email ASC, id ASC", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch users: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user by email: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn exists_by_email(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1)
                  AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check user email: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_roles(&self, user_id: i64) -> Result<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch roles of user {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, fields: &UserFields, role_ids: &[i64]) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO users (email, active, account_non_locked, failed_login_attempts,
                               email_verified, must_change_password)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&fields.email)
            .bind(fields.active)
            .bind(fields.account_non_locked)
            .bind(fields.failed_login_attempts)
            .bind(fields.email_verified)
            .bind(fields.must_change_password)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, "user", "email", &fields.email))?;

        link_roles(&mut tx, user.id, role_ids).await?;
        tx.commit().await?;

        Ok(user)
    }

    async fn update(&self, id: i64, fields: &UserFields, role_ids: &[i64]) -> Result<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE users
            SET email = $2, active = $3, account_non_locked = $4, failed_login_attempts = $5,
                email_verified = $6, must_change_password = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&fields.email)
            .bind(fields.active)
            .bind(fields.account_non_locked)
            .bind(fields.failed_login_attempts)
            .bind(fields.email_verified)
            .bind(fields.must_change_password)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, "user", "email", &fields.email))?;

        let Some(user) = user else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, "user", "id", id))?;
        link_roles(&mut tx, id, role_ids).await?;
        tx.commit().await?;

        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "user", "id", id))?;

        Ok(result.rows_affected() > 0)
    }
}

async fn link_roles(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: i64,
    role_ids: &[i64],
) -> Result<()> {
    if role_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(role_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::from_write(e, "user role", "user_id", user_id))?;

    Ok(())
}
