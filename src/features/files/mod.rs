//! Public serving of stored uploads at `GET /uploads/{file}`.

pub mod handlers;
pub mod routes;

pub use routes::routes;
