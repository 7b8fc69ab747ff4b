mod profile_dto;
mod user_dto;

pub use profile_dto::*;
pub use user_dto::*;
