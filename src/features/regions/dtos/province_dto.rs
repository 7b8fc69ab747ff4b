use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::regions::dtos::RegionResponseDto;
use crate::features::regions::models::Province;

/// Request DTO for creating a province
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvinceDto {
    /// Short code, up to two characters (unique, case-insensitive)
    #[validate(length(min = 1, max = 2, message = "Code must be 1-2 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Owning region
    #[validate(range(min = 1, message = "Region is required"))]
    pub region_id: i64,
}

/// Request DTO for updating a province
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProvinceDto {
    #[validate(length(min = 1, max = 2, message = "Code must be 1-2 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "Region is required"))]
    pub region_id: i64,
}

/// Response DTO for province data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceResponseDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub region_id: i64,
    pub region_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Province> for ProvinceResponseDto {
    fn from(province: Province) -> Self {
        Self {
            id: province.id,
            code: province.code,
            name: province.name,
            region_id: province.region_id,
            region_name: province.region_name,
            created_at: province.created_at,
            updated_at: province.updated_at,
        }
    }
}

/// Prefilled edit values for a province
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceEditDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub region_id: i64,
}

impl From<Province> for ProvinceEditDto {
    fn from(province: Province) -> Self {
        Self {
            id: province.id,
            code: province.code,
            name: province.name,
            region_id: province.region_id,
        }
    }
}

/// Province form: the values to edit (absent for a new province) plus the
/// regions available in the selector
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceFormDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<ProvinceEditDto>,
    pub regions: Vec<RegionResponseDto>,
}
