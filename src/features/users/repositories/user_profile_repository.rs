use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{ProfileFields, UserProfile};

#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>>;

    /// Create the profile or overwrite every field of the existing one
    async fn upsert(&self, user_id: i64, fields: &ProfileFields) -> Result<UserProfile>;
}

pub struct PgUserProfileRepository {
    pool: PgPool,
}

impl PgUserProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserProfileRepository for PgUserProfileRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, first_name, last_name, phone_number, profile_image,
                   bio, locale, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch profile of user {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }

    async fn upsert(&self, user_id: i64, fields: &ProfileFields) -> Result<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id, first_name, last_name, phone_number,
                                       profile_image, bio, locale)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone_number = EXCLUDED.phone_number,
                profile_image = EXCLUDED.profile_image,
                bio = EXCLUDED.bio,
                locale = EXCLUDED.locale,
                updated_at = NOW()
            RETURNING user_id, first_name, last_name, phone_number, profile_image,
                      bio, locale, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.phone_number)
        .bind(&fields.profile_image)
        .bind(&fields.bio)
        .bind(&fields.locale)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "user profile", "user_id", user_id))
    }
}
