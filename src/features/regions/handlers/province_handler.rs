use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireManager;
use crate::features::regions::dtos::{
    CreateProvinceDto, ProvinceFormDto, ProvinceResponseDto, UpdateProvinceDto,
};
use crate::features::regions::services::ProvinceService;
use crate::shared::pagination::ListQuery;
use crate::shared::types::ApiResponse;

/// List provinces page by page
#[utoipa::path(
    get,
    path = "/api/provinces",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of provinces", body = ApiResponse<Vec<ProvinceResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn list_provinces(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ProvinceResponseDto>>>> {
    let page = service
        .list_page(&query)
        .await?
        .map(ProvinceResponseDto::from);
    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(page.meta),
    )))
}

/// List every province ordered by name
#[utoipa::path(
    get,
    path = "/api/provinces/all",
    responses(
        (status = 200, description = "All provinces", body = ApiResponse<Vec<ProvinceResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn list_all_provinces(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
) -> Result<Json<ApiResponse<Vec<ProvinceResponseDto>>>> {
    let provinces = service.list_all().await?;
    let dtos: Vec<ProvinceResponseDto> = provinces.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Empty province form with the region selector
#[utoipa::path(
    get,
    path = "/api/provinces/new",
    responses(
        (status = 200, description = "New province form", body = ApiResponse<ProvinceFormDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn new_province_form(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
) -> Result<Json<ApiResponse<ProvinceFormDto>>> {
    let form = service.new_form().await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Get a province
#[utoipa::path(
    get,
    path = "/api/provinces/{id}",
    params(
        ("id" = i64, Path, description = "Province ID")
    ),
    responses(
        (status = 200, description = "Province details", body = ApiResponse<ProvinceResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Province not found")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn get_province(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProvinceResponseDto>>> {
    let province = service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success(
        Some(province.into()),
        None,
        None,
    )))
}

/// Get the prefilled edit form of a province
#[utoipa::path(
    get,
    path = "/api/provinces/{id}/edit",
    params(
        ("id" = i64, Path, description = "Province ID")
    ),
    responses(
        (status = 200, description = "Province edit form", body = ApiResponse<ProvinceFormDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Province not found")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn edit_province(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProvinceFormDto>>> {
    let form = service.get_for_edit(id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Create a province
#[utoipa::path(
    post,
    path = "/api/provinces",
    request_body = CreateProvinceDto,
    responses(
        (status = 201, description = "Province created", body = ApiResponse<ProvinceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Province code already exists")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn create_province(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
    AppJson(dto): AppJson<CreateProvinceDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProvinceResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let province = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(province.into()),
            Some("Province created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a province
#[utoipa::path(
    put,
    path = "/api/provinces/{id}",
    params(
        ("id" = i64, Path, description = "Province ID")
    ),
    request_body = UpdateProvinceDto,
    responses(
        (status = 200, description = "Province updated", body = ApiResponse<ProvinceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Province or region not found"),
        (status = 409, description = "Province code already exists")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn update_province(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateProvinceDto>,
) -> Result<Json<ApiResponse<ProvinceResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let province = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(province.into()),
        Some("Province updated successfully".to_string()),
        None,
    )))
}

/// Delete a province
#[utoipa::path(
    delete,
    path = "/api/provinces/{id}",
    params(
        ("id" = i64, Path, description = "Province ID")
    ),
    responses(
        (status = 200, description = "Province deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Province not found")
    ),
    tag = "provinces",
    security(("bearer_auth" = []))
)]
pub async fn delete_province(
    _guard: RequireManager,
    State(service): State<Arc<ProvinceService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Province deleted successfully".to_string()),
        None,
    )))
}
