pub mod auth;
pub mod files;
pub mod regions;
pub mod users;
