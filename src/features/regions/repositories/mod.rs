#[cfg(test)]
pub mod memory;
mod province_repository;
mod region_repository;

pub use province_repository::{PgProvinceRepository, ProvinceRepository, PROVINCE_SORT};
pub use region_repository::{PgRegionRepository, RegionRepository, REGION_SORT};
