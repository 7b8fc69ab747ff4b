//! Regions and the provinces they own.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Role |
//! |--------|----------|------|
//! | GET, POST | `/api/regions` | ADMIN or MANAGER |
//! | GET | `/api/regions/all` | ADMIN or MANAGER |
//! | GET, PUT, DELETE | `/api/regions/{id}` | ADMIN or MANAGER |
//! | GET | `/api/regions/{id}/edit` | ADMIN or MANAGER |
//! | GET, POST | `/api/provinces` | MANAGER |
//! | GET | `/api/provinces/all`, `/api/provinces/new` | MANAGER |
//! | GET, PUT, DELETE | `/api/provinces/{id}` | MANAGER |
//! | GET | `/api/provinces/{id}/edit` | MANAGER |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::{ProvinceService, RegionService};
