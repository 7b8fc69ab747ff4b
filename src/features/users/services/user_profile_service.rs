use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{ProfileFormDto, ProfileImageUpload, UpdateProfileDto};
use crate::features::users::models::{ProfileFields, User};
use crate::features::users::repositories::{UserProfileRepository, UserRepository};
use crate::modules::storage::FileStorage;
use crate::shared::constants::MAX_PROFILE_IMAGE_SIZE;

/// Service behind the profile editor of the signed-in user
pub struct UserProfileService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn UserProfileRepository>,
    storage: Arc<dyn FileStorage>,
}

impl UserProfileService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn UserProfileRepository>,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            users,
            profiles,
            storage,
        }
    }

    pub async fn get_form(&self, email: &str) -> Result<ProfileFormDto> {
        let user = self.user_by_email(email).await?;
        let profile = self.profiles.find_by_user_id(user.id).await?;
        Ok(ProfileFormDto::new(&user, profile))
    }

    /// Save the profile form and, when given, replace the profile image.
    ///
    /// The image is checked before anything is written. The previous image
    /// is removed only once the new one is stored and the profile row points
    /// at it; if the row cannot be written the new file is removed instead.
    pub async fn update_profile(
        &self,
        email: &str,
        dto: UpdateProfileDto,
        image: Option<ProfileImageUpload>,
    ) -> Result<ProfileFormDto> {
        // An empty file part means no new image
        let image = image.filter(|i| !i.data.is_empty());
        if let Some(image) = &image {
            validate_image(image)?;
        }

        let user = self.user_by_email(email).await?;
        let existing = self.profiles.find_by_user_id(user.id).await?;
        let old_image = existing.and_then(|p| p.profile_image);

        let new_image = match image {
            Some(image) => Some(
                self.storage
                    .save(image.data, image.file_name.as_deref(), &image.content_type)
                    .await?,
            ),
            None => None,
        };

        let fields = ProfileFields {
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: dto.phone_number,
            profile_image: new_image.clone().or_else(|| old_image.clone()),
            bio: dto.bio,
            locale: dto.locale,
        };

        let profile = match self.profiles.upsert(user.id, &fields).await {
            Ok(profile) => profile,
            Err(e) => {
                if let Some(path) = &new_image {
                    self.remove_quietly(path).await;
                }
                return Err(e);
            }
        };

        if let (Some(new_path), Some(old_path)) = (&new_image, &old_image) {
            if new_path != old_path {
                self.remove_quietly(old_path).await;
            }
        }

        tracing::info!(
            "Updated profile of user {} (new image: {})",
            user.id,
            new_image.is_some()
        );
        Ok(ProfileFormDto::new(&user, Some(profile)))
    }

    async fn user_by_email(&self, email: &str) -> Result<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("user", "email", email))
    }

    async fn remove_quietly(&self, web_path: &str) {
        if let Err(e) = self.storage.delete(web_path).await {
            tracing::warn!("Failed to delete profile image {}: {}", web_path, e);
        }
    }
}

fn validate_image(image: &ProfileImageUpload) -> Result<()> {
    if !image.content_type.starts_with("image/") {
        return Err(AppError::InvalidFile(format!(
            "Profile image must be an image, got {}",
            image.content_type
        )));
    }

    if image.data.len() > MAX_PROFILE_IMAGE_SIZE {
        return Err(AppError::InvalidFile(format!(
            "Profile image exceeds maximum size of {} MB",
            MAX_PROFILE_IMAGE_SIZE / 1024 / 1024
        )));
    }

    Ok(())
}
