use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::{CreateProvinceDto, ProvinceFormDto, UpdateProvinceDto};
use crate::features::regions::models::Province;
use crate::features::regions::repositories::{
    ProvinceRepository, RegionRepository, PROVINCE_SORT,
};
use crate::shared::pagination::{ListQuery, Page, PageRequest};

/// Service for managing provinces
pub struct ProvinceService {
    provinces: Arc<dyn ProvinceRepository>,
    regions: Arc<dyn RegionRepository>,
}

impl ProvinceService {
    pub fn new(
        provinces: Arc<dyn ProvinceRepository>,
        regions: Arc<dyn RegionRepository>,
    ) -> Self {
        Self { provinces, regions }
    }

    /// One page of provinces with their region names
    pub async fn list_page(&self, query: &ListQuery) -> Result<Page<Province>> {
        let request = PageRequest::from_query(query, &PROVINCE_SORT);
        let total = self.provinces.count().await?;
        let request = request.clamp_to(total);
        let items = self.provinces.find_page(&request).await?;
        Ok(Page::new(items, request.meta(total)))
    }

    pub async fn list_all(&self) -> Result<Vec<Province>> {
        self.provinces.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Province> {
        self.provinces
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("province", "id", id))
    }

    /// Empty form with the region selector
    pub async fn new_form(&self) -> Result<ProvinceFormDto> {
        let regions = self.regions.find_all().await?;
        Ok(ProvinceFormDto {
            province: None,
            regions: regions.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn get_for_edit(&self, id: i64) -> Result<ProvinceFormDto> {
        let province = self.find_by_id(id).await?;
        let regions = self.regions.find_all().await?;
        Ok(ProvinceFormDto {
            province: Some(province.into()),
            regions: regions.into_iter().map(Into::into).collect(),
        })
    }

    /// Case-insensitive code existence check
    pub async fn exist_province_by_code(&self, code: &str) -> Result<bool> {
        self.provinces.exists_by_code(code, None).await
    }

    async fn ensure_region_exists(&self, region_id: i64) -> Result<()> {
        match self.regions.find_by_id(region_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("region", "id", region_id)),
        }
    }

    pub async fn create(&self, dto: CreateProvinceDto) -> Result<Province> {
        if self.exist_province_by_code(&dto.code).await? {
            tracing::warn!("Rejected duplicate province code {}", dto.code);
            return Err(AppError::duplicate("province", "code", &dto.code));
        }
        self.ensure_region_exists(dto.region_id).await?;

        let province = self
            .provinces
            .insert(&dto.code, &dto.name, dto.region_id)
            .await?;
        tracing::info!(
            "Created province {} ({}) in region {}",
            province.id,
            province.code,
            province.region_id
        );
        Ok(province)
    }

    pub async fn update(&self, id: i64, dto: UpdateProvinceDto) -> Result<Province> {
        self.find_by_id(id).await?;

        if self.provinces.exists_by_code(&dto.code, Some(id)).await? {
            tracing::warn!("Rejected duplicate province code {} on update", dto.code);
            return Err(AppError::duplicate("province", "code", &dto.code));
        }
        self.ensure_region_exists(dto.region_id).await?;

        let province = self
            .provinces
            .update(id, &dto.code, &dto.name, dto.region_id)
            .await?
            .ok_or_else(|| AppError::not_found("province", "id", id))?;
        tracing::info!("Updated province {}", id);
        Ok(province)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.provinces.delete(id).await? {
            return Err(AppError::not_found("province", "id", id));
        }
        tracing::info!("Deleted province {}", id);
        Ok(())
    }
}
