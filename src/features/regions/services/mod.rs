mod province_service;
mod region_service;

pub use province_service::ProvinceService;
pub use region_service::RegionService;
