mod role_repository;
mod user_profile_repository;
mod user_repository;

#[cfg(test)]
pub mod memory;

pub use role_repository::{PgRoleRepository, RoleRepository};
pub use user_profile_repository::{PgUserProfileRepository, UserProfileRepository};
pub use user_repository::{PgUserRepository, UserRepository, USER_SORT};
