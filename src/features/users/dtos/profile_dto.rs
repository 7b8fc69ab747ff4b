use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{User, UserProfile};

/// Profile fields submitted by the profile editor
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(length(max = 30, message = "Phone number must not exceed 30 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[validate(length(max = 500, message = "Bio must not exceed 500 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[validate(length(max = 10, message = "Locale must not exceed 10 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl UpdateProfileDto {
    /// Set a form field by its multipart name. Blank optional fields are
    /// stored as absent. Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let value = value.trim().to_string();
        let optional = if value.is_empty() {
            None
        } else {
            Some(value.clone())
        };

        match name {
            "firstName" => self.first_name = value,
            "lastName" => self.last_name = value,
            "phoneNumber" => self.phone_number = optional,
            "bio" => self.bio = optional,
            "locale" => self.locale = optional,
            _ => return false,
        }
        true
    }
}

/// Multipart body of the profile editor, for Swagger UI only.
/// The handler reads the fields from axum's `Multipart` directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ProfileUploadDto {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub locale: Option<String>,
    /// Optional image, `image/*` up to 2 MiB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub profile_image_file: Option<String>,
}

/// Image part of a profile submission
#[derive(Debug, Clone)]
pub struct ProfileImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Profile fields as embedded in user details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseDto {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub locale: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponseDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone_number: profile.phone_number,
            profile_image: profile.profile_image,
            bio: profile.bio,
            locale: profile.locale,
            updated_at: profile.updated_at,
        }
    }
}

/// Profile editor form of the signed-in user. Text fields are empty
/// until a profile has been saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFormDto {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub locale: Option<String>,
}

impl ProfileFormDto {
    pub fn new(user: &User, profile: Option<UserProfile>) -> Self {
        match profile {
            Some(profile) => Self {
                user_id: user.id,
                email: user.email.clone(),
                first_name: profile.first_name,
                last_name: profile.last_name,
                phone_number: profile.phone_number,
                profile_image: profile.profile_image,
                bio: profile.bio,
                locale: profile.locale,
            },
            None => Self {
                user_id: user.id,
                email: user.email.clone(),
                first_name: String::new(),
                last_name: String::new(),
                phone_number: None,
                profile_image: None,
                bio: None,
                locale: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> UpdateProfileDto {
        UpdateProfileDto {
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            ..UpdateProfileDto::default()
        }
    }

    #[test]
    fn test_names_are_required() {
        assert!(valid_dto().validate().is_ok());
        assert!(UpdateProfileDto::default().validate().is_err());
    }

    #[test]
    fn test_optional_field_limits() {
        let mut dto = valid_dto();
        dto.phone_number = Some("6".repeat(31));
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.bio = Some("b".repeat(501));
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.locale = Some("es-ES".to_string());
        dto.bio = Some("b".repeat(500));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_set_field_maps_multipart_names() {
        let mut dto = UpdateProfileDto::default();
        assert!(dto.set_field("firstName", " Ana ".to_string()));
        assert!(dto.set_field("phoneNumber", "   ".to_string()));
        assert!(dto.set_field("locale", "es".to_string()));
        assert!(!dto.set_field("nickname", "x".to_string()));

        assert_eq!(dto.first_name, "Ana");
        assert_eq!(dto.phone_number, None);
        assert_eq!(dto.locale.as_deref(), Some("es"));
    }
}
