use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{
    CreateUserDto, RoleDto, UpdateUserDto, UserDetailDto, UserFormDto, UserResponseDto,
};
use crate::features::users::services::UserService;
use crate::shared::pagination::ListQuery;
use crate::shared::types::ApiResponse;

/// List users page by page
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let page = service.list_page(&query).await?.map(UserResponseDto::from);
    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(page.meta),
    )))
}

/// List every user ordered by email
#[utoipa::path(
    get,
    path = "/api/users/all",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_all_users(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service.list_all().await?;
    let dtos: Vec<UserResponseDto> = users.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Empty user form with the role catalogue
#[utoipa::path(
    get,
    path = "/api/users/new",
    responses(
        (status = 200, description = "New user form", body = ApiResponse<UserFormDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn new_user_form(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserFormDto>>> {
    let form = service.new_form().await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Get a user with roles and profile
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserDetailDto>>> {
    let detail = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Get the prefilled edit form of a user
#[utoipa::path(
    get,
    path = "/api/users/{id}/edit",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User edit form", body = ApiResponse<UserFormDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn edit_user(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserFormDto>>> {
    let form = service.get_for_edit(id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(user.into()),
            Some("User created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a user and replace its roles
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User or role not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user.into()),
        Some("User updated successfully".to_string()),
        None,
    )))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted successfully".to_string()),
        None,
    )))
}

/// List the role catalogue
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "All roles", body = ApiResponse<Vec<RoleDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    _guard: RequireAdmin,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<RoleDto>>>> {
    let roles = service.list_roles().await?;
    Ok(Json(ApiResponse::success(Some(roles), None, None)))
}
