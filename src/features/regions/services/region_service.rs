use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::{
    CreateRegionDto, RegionDetailDto, RegionEditDto, UpdateRegionDto,
};
use crate::features::regions::models::Region;
use crate::features::regions::repositories::{
    ProvinceRepository, RegionRepository, REGION_SORT,
};
use crate::shared::pagination::{ListQuery, Page, PageRequest};

/// Service for managing regions
pub struct RegionService {
    regions: Arc<dyn RegionRepository>,
    provinces: Arc<dyn ProvinceRepository>,
}

impl RegionService {
    pub fn new(regions: Arc<dyn RegionRepository>, provinces: Arc<dyn ProvinceRepository>) -> Self {
        Self { regions, provinces }
    }

    /// One page of regions, see [`PageRequest`] for the paging rules
    pub async fn list_page(&self, query: &ListQuery) -> Result<Page<Region>> {
        let request = PageRequest::from_query(query, &REGION_SORT);
        let total = self.regions.count().await?;
        let request = request.clamp_to(total);
        let items = self.regions.find_page(&request).await?;
        Ok(Page::new(items, request.meta(total)))
    }

    pub async fn list_all(&self) -> Result<Vec<Region>> {
        self.regions.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Region> {
        self.regions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("region", "id", id))
    }

    pub async fn get_for_edit(&self, id: i64) -> Result<RegionEditDto> {
        self.find_by_id(id).await.map(Into::into)
    }

    pub async fn get_detail(&self, id: i64) -> Result<RegionDetailDto> {
        let region = self.find_by_id(id).await?;
        let provinces = self.provinces.find_by_region(id).await?;
        Ok(RegionDetailDto::new(region, provinces))
    }

    /// Case-insensitive code existence check
    pub async fn exist_region_by_code(&self, code: &str) -> Result<bool> {
        self.regions.exists_by_code(code, None).await
    }

    pub async fn create(&self, dto: CreateRegionDto) -> Result<Region> {
        if self.exist_region_by_code(&dto.code).await? {
            tracing::warn!("Rejected duplicate region code {}", dto.code);
            return Err(AppError::duplicate("region", "code", &dto.code));
        }

        let region = self.regions.insert(&dto.code, &dto.name).await?;
        tracing::info!("Created region {} ({})", region.id, region.code);
        Ok(region)
    }

    pub async fn update(&self, id: i64, dto: UpdateRegionDto) -> Result<Region> {
        self.find_by_id(id).await?;

        if self.regions.exists_by_code(&dto.code, Some(id)).await? {
            tracing::warn!("Rejected duplicate region code {} on update", dto.code);
            return Err(AppError::duplicate("region", "code", &dto.code));
        }

        let region = self
            .regions
            .update(id, &dto.code, &dto.name)
            .await?
            .ok_or_else(|| AppError::not_found("region", "id", id))?;
        tracing::info!("Updated region {}", id);
        Ok(region)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.regions.delete(id).await? {
            return Err(AppError::not_found("region", "id", id));
        }
        tracing::info!("Deleted region {}", id);
        Ok(())
    }
}
