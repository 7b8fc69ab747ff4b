mod province;
mod region;

pub use province::Province;
pub use region::Region;
