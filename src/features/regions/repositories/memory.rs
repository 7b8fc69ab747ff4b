//! In-memory region and province store used by service and handler tests.
//! Mirrors the database constraints that matter to the services: codes
//! unique case-insensitively and regions undeletable while referenced.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Mutex;

use super::{ProvinceRepository, RegionRepository};
use crate::core::error::{AppError, Result};
use crate::features::regions::models::{Province, Region};
use crate::shared::pagination::{page_slice, PageRequest};

#[derive(Default)]
struct State {
    next_id: i64,
    regions: Vec<Region>,
    provinces: Vec<Province>,
}

#[derive(Default)]
pub struct MemoryRegionStore {
    state: Mutex<State>,
}

impl MemoryRegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(state: &mut State) -> i64 {
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl RegionRepository for MemoryRegionStore {
    async fn count(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().regions.len() as i64)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Region>> {
        let regions = self.state.lock().unwrap().regions.clone();
        Ok(page_slice(regions, request, |a, b| {
            let by_field = match request.sort.name {
                "code" => a.code.cmp(&b.code),
                "name" => a.name.cmp(&b.name),
                _ => Ordering::Equal,
            };
            by_field.then(a.id.cmp(&b.id))
        }))
    }

    async fn find_all(&self) -> Result<Vec<Region>> {
        let mut regions = self.state.lock().unwrap().regions.clone();
        regions.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(regions)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Region>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .regions
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .regions
            .iter()
            .any(|r| r.code.eq_ignore_ascii_case(code) && Some(r.id) != exclude_id))
    }

    async fn insert(&self, code: &str, name: &str) -> Result<Region> {
        let mut state = self.state.lock().unwrap();
        if state.regions.iter().any(|r| r.code.eq_ignore_ascii_case(code)) {
            return Err(AppError::duplicate("region", "code", code));
        }
        let now = Utc::now();
        let region = Region {
            id: Self::next_id(&mut state),
            code: code.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.regions.push(region.clone());
        Ok(region)
    }

    async fn update(&self, id: i64, code: &str, name: &str) -> Result<Option<Region>> {
        let mut state = self.state.lock().unwrap();
        if state
            .regions
            .iter()
            .any(|r| r.id != id && r.code.eq_ignore_ascii_case(code))
        {
            return Err(AppError::duplicate("region", "code", code));
        }
        let Some(region) = state.regions.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        region.code = code.to_string();
        region.name = name.to_string();
        region.updated_at = Utc::now();
        let region = region.clone();

        for province in state.provinces.iter_mut().filter(|p| p.region_id == id) {
            province.region_name = region.name.clone();
        }
        Ok(Some(region))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.provinces.iter().any(|p| p.region_id == id) {
            return Err(AppError::Conflict(
                "region is still referenced by other records".to_string(),
            ));
        }
        let before = state.regions.len();
        state.regions.retain(|r| r.id != id);
        Ok(state.regions.len() < before)
    }
}

#[async_trait]
impl ProvinceRepository for MemoryRegionStore {
    async fn count(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().provinces.len() as i64)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Province>> {
        let provinces = self.state.lock().unwrap().provinces.clone();
        Ok(page_slice(provinces, request, |a, b| {
            let by_field = match request.sort.name {
                "code" => a.code.cmp(&b.code),
                "name" => a.name.cmp(&b.name),
                "regionName" => a.region_name.cmp(&b.region_name),
                _ => Ordering::Equal,
            };
            by_field.then(a.id.cmp(&b.id))
        }))
    }

    async fn find_all(&self) -> Result<Vec<Province>> {
        let mut provinces = self.state.lock().unwrap().provinces.clone();
        provinces.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(provinces)
    }

    async fn find_by_region(&self, region_id: i64) -> Result<Vec<Province>> {
        let mut provinces: Vec<Province> = self
            .state
            .lock()
            .unwrap()
            .provinces
            .iter()
            .filter(|p| p.region_id == region_id)
            .cloned()
            .collect();
        provinces.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(provinces)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Province>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .provinces
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .provinces
            .iter()
            .any(|p| p.code.eq_ignore_ascii_case(code) && Some(p.id) != exclude_id))
    }

    async fn insert(&self, code: &str, name: &str, region_id: i64) -> Result<Province> {
        let mut state = self.state.lock().unwrap();
        if state
            .provinces
            .iter()
            .any(|p| p.code.eq_ignore_ascii_case(code))
        {
            return Err(AppError::duplicate("province", "code", code));
        }
        let region_name = state
            .regions
            .iter()
            .find(|r| r.id == region_id)
            .map(|r| r.name.clone())
            .ok_or_else(|| AppError::Conflict("province references a missing region".to_string()))?;
        let now = Utc::now();
        let province = Province {
            id: Self::next_id(&mut state),
            code: code.to_string(),
            name: name.to_string(),
            region_id,
            region_name,
            created_at: now,
            updated_at: now,
        };
        state.provinces.push(province.clone());
        Ok(province)
    }

    async fn update(
        &self,
        id: i64,
        code: &str,
        name: &str,
        region_id: i64,
    ) -> Result<Option<Province>> {
        let mut state = self.state.lock().unwrap();
        if state
            .provinces
            .iter()
            .any(|p| p.id != id && p.code.eq_ignore_ascii_case(code))
        {
            return Err(AppError::duplicate("province", "code", code));
        }
        let region_name = state
            .regions
            .iter()
            .find(|r| r.id == region_id)
            .map(|r| r.name.clone());
        let Some(province) = state.provinces.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let Some(region_name) = region_name else {
            return Err(AppError::Conflict(
                "province references a missing region".to_string(),
            ));
        };
        province.code = code.to_string();
        province.name = name.to_string();
        province.region_id = region_id;
        province.region_name = region_name;
        province.updated_at = Utc::now();
        Ok(Some(province.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.provinces.len();
        state.provinces.retain(|p| p.id != id);
        Ok(state.provinces.len() < before)
    }
}
