//! Users with their roles, and the profile editor of the signed-in user.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Role |
//! |--------|----------|------|
//! | GET, POST | `/api/users` | ADMIN |
//! | GET | `/api/users/all`, `/api/users/new` | ADMIN |
//! | GET, PUT, DELETE | `/api/users/{id}` | ADMIN |
//! | GET | `/api/users/{id}/edit` | ADMIN |
//! | GET | `/api/roles` | ADMIN |
//! | GET, POST | `/api/profile` | USER |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::{UserProfileService, UserService};
