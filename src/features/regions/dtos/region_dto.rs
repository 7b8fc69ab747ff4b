use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::regions::dtos::ProvinceResponseDto;
use crate::features::regions::models::{Province, Region};

/// Request DTO for creating a region
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionDto {
    /// Short code, up to two characters (unique, case-insensitive)
    #[validate(length(min = 1, max = 2, message = "Code must be 1-2 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Request DTO for updating a region
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegionDto {
    #[validate(length(min = 1, max = 2, message = "Code must be 1-2 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Prefilled edit form for a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionEditDto {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<Region> for RegionEditDto {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
        }
    }
}

/// Response DTO for region data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponseDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Region> for RegionResponseDto {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            created_at: region.created_at,
            updated_at: region.updated_at,
        }
    }
}

/// Region together with the provinces it owns
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetailDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub provinces: Vec<ProvinceResponseDto>,
}

impl RegionDetailDto {
    pub fn new(region: Region, provinces: Vec<Province>) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            created_at: region.created_at,
            updated_at: region.updated_at,
            provinces: provinces.into_iter().map(Into::into).collect(),
        }
    }
}
