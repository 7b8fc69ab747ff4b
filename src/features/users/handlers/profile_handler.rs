use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireUser;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    ProfileFormDto, ProfileImageUpload, ProfileUploadDto, UpdateProfileDto,
};
use crate::features::users::services::UserProfileService;
use crate::shared::types::ApiResponse;

/// Multipart name of the image part
const IMAGE_FIELD: &str = "profileImageFile";

fn token_email(user: &AuthenticatedUser) -> Result<&str> {
    user.email
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Token carries no email claim".to_string()))
}

/// Get the profile form of the signed-in user
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile form", body = ApiResponse<ProfileFormDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User role required"),
        (status = 404, description = "No user with the token email")
    ),
    tag = "profile",
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    RequireUser(user): RequireUser,
    State(service): State<Arc<UserProfileService>>,
) -> Result<Json<ApiResponse<ProfileFormDto>>> {
    let form = service.get_form(token_email(&user)?).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Update the profile of the signed-in user
///
/// Accepts multipart/form-data with:
/// - `firstName`, `lastName`: required
/// - `phoneNumber`, `bio`, `locale`: optional
/// - `profileImageFile`: optional image, replaces the current one
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body(
        content = ProfileUploadDto,
        content_type = "multipart/form-data",
        description = "Profile fields with an optional image",
    ),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileFormDto>),
        (status = 400, description = "Validation error or invalid image"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User role required"),
        (status = 404, description = "No user with the token email"),
        (status = 413, description = "Request too large")
    ),
    tag = "profile",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    RequireUser(user): RequireUser,
    State(service): State<Arc<UserProfileService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ProfileFormDto>>> {
    let email = token_email(&user)?;
    let mut dto = UpdateProfileDto::default();
    let mut image: Option<ProfileImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == IMAGE_FIELD {
            let file_name = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            image = Some(ProfileImageUpload {
                file_name,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field {}: {}", field_name, e))
            })?;
            if !dto.set_field(&field_name, value) {
                debug!("Ignoring unknown profile field: {}", field_name);
            }
        }
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let form = service.update_profile(email, dto, image).await?;
    Ok(Json(ApiResponse::success(
        Some(form),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}
