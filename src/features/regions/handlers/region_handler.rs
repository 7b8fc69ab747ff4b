use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireRegionManager;
use crate::features::regions::dtos::{
    CreateRegionDto, RegionDetailDto, RegionEditDto, RegionResponseDto, UpdateRegionDto,
};
use crate::features::regions::services::RegionService;
use crate::shared::pagination::ListQuery;
use crate::shared::types::ApiResponse;

/// List regions page by page
#[utoipa::path(
    get,
    path = "/api/regions",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of regions", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn list_regions(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let page = service.list_page(&query).await?.map(RegionResponseDto::from);
    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(page.meta),
    )))
}

/// List every region ordered by name
#[utoipa::path(
    get,
    path = "/api/regions/all",
    responses(
        (status = 200, description = "All regions", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn list_all_regions(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let regions = service.list_all().await?;
    let dtos: Vec<RegionResponseDto> = regions.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get a region with its provinces
#[utoipa::path(
    get,
    path = "/api/regions/{id}",
    params(
        ("id" = i64, Path, description = "Region ID")
    ),
    responses(
        (status = 200, description = "Region details", body = ApiResponse<RegionDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn get_region(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<RegionDetailDto>>> {
    let detail = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Get the prefilled edit form of a region
#[utoipa::path(
    get,
    path = "/api/regions/{id}/edit",
    params(
        ("id" = i64, Path, description = "Region ID")
    ),
    responses(
        (status = 200, description = "Region edit form", body = ApiResponse<RegionEditDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn edit_region(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<RegionEditDto>>> {
    let form = service.get_for_edit(id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Create a region
#[utoipa::path(
    post,
    path = "/api/regions",
    request_body = CreateRegionDto,
    responses(
        (status = 201, description = "Region created", body = ApiResponse<RegionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required"),
        (status = 409, description = "Region code already exists")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn create_region(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
    AppJson(dto): AppJson<CreateRegionDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let region = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(region.into()),
            Some("Region created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a region
#[utoipa::path(
    put,
    path = "/api/regions/{id}",
    params(
        ("id" = i64, Path, description = "Region ID")
    ),
    request_body = UpdateRegionDto,
    responses(
        (status = 200, description = "Region updated", body = ApiResponse<RegionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Region code already exists")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn update_region(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateRegionDto>,
) -> Result<Json<ApiResponse<RegionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let region = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(region.into()),
        Some("Region updated successfully".to_string()),
        None,
    )))
}

/// Delete a region
#[utoipa::path(
    delete,
    path = "/api/regions/{id}",
    params(
        ("id" = i64, Path, description = "Region ID")
    ),
    responses(
        (status = 200, description = "Region deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Region still has provinces")
    ),
    tag = "regions",
    security(("bearer_auth" = []))
)]
pub async fn delete_region(
    _guard: RequireRegionManager,
    State(service): State<Arc<RegionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Region deleted successfully".to_string()),
        None,
    )))
}
