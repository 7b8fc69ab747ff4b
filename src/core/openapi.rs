use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::handlers as files_handlers;
use crate::features::regions::{dtos as regions_dtos, handlers as regions_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::pagination::SortDirection;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Regions
        regions_handlers::list_regions,
        regions_handlers::list_all_regions,
        regions_handlers::get_region,
        regions_handlers::edit_region,
        regions_handlers::create_region,
        regions_handlers::update_region,
        regions_handlers::delete_region,
        // Provinces
        regions_handlers::list_provinces,
        regions_handlers::list_all_provinces,
        regions_handlers::new_province_form,
        regions_handlers::get_province,
        regions_handlers::edit_province,
        regions_handlers::create_province,
        regions_handlers::update_province,
        regions_handlers::delete_province,
        // Users
        users_handlers::list_users,
        users_handlers::list_all_users,
        users_handlers::new_user_form,
        users_handlers::get_user,
        users_handlers::edit_user,
        users_handlers::create_user,
        users_handlers::update_user,
        users_handlers::delete_user,
        users_handlers::list_roles,
        // Profile
        users_handlers::get_profile,
        users_handlers::update_profile,
        // Files
        files_handlers::serve_upload,
    ),
    components(
        schemas(
            // Shared
            Meta,
            SortDirection,
            auth::model::AuthenticatedUser,
            // Regions
            regions_dtos::CreateRegionDto,
            regions_dtos::UpdateRegionDto,
            regions_dtos::RegionEditDto,
            regions_dtos::RegionResponseDto,
            regions_dtos::RegionDetailDto,
            ApiResponse<Vec<regions_dtos::RegionResponseDto>>,
            ApiResponse<regions_dtos::RegionResponseDto>,
            ApiResponse<regions_dtos::RegionDetailDto>,
            ApiResponse<regions_dtos::RegionEditDto>,
            // Provinces
            regions_dtos::CreateProvinceDto,
            regions_dtos::UpdateProvinceDto,
            regions_dtos::ProvinceEditDto,
            regions_dtos::ProvinceFormDto,
            regions_dtos::ProvinceResponseDto,
            ApiResponse<Vec<regions_dtos::ProvinceResponseDto>>,
            ApiResponse<regions_dtos::ProvinceResponseDto>,
            ApiResponse<regions_dtos::ProvinceFormDto>,
            // Users
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            users_dtos::RoleDto,
            users_dtos::UserResponseDto,
            users_dtos::UserDetailDto,
            users_dtos::UserEditDto,
            users_dtos::UserFormDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<users_dtos::UserDetailDto>,
            ApiResponse<users_dtos::UserFormDto>,
            ApiResponse<Vec<users_dtos::RoleDto>>,
            // Profile
            users_dtos::UpdateProfileDto,
            users_dtos::ProfileUploadDto,
            users_dtos::ProfileResponseDto,
            users_dtos::ProfileFormDto,
            ApiResponse<users_dtos::ProfileFormDto>,
        )
    ),
    tags(
        (name = "regions", description = "Regions (admin or manager)"),
        (name = "provinces", description = "Provinces of a region (manager)"),
        (name = "users", description = "Users and roles (admin)"),
        (name = "profile", description = "Profile editor of the signed-in user"),
        (name = "files", description = "Stored uploads"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Ticket Logger API",
        version = "0.1.0",
        description = "Administration API for regions, provinces, users and profiles",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/regions",
            "/api/provinces/{id}/edit",
            "/api/users/{id}",
            "/api/roles",
            "/api/profile",
            "/uploads/{file}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Admin".to_string(),
            version: "2.0.0".to_string(),
            description: "Staging".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Admin");
        assert_eq!(doc.info.description.as_deref(), Some("Staging"));
    }
}
