mod province_dto;
mod region_dto;

pub use province_dto::*;
pub use region_dto::*;
