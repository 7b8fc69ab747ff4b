mod province_handler;
mod region_handler;

pub use province_handler::*;
pub use region_handler::*;
