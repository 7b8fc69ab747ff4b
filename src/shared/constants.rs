/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Smallest page size accepted, smaller requests are raised to it
pub const MIN_PAGE_SIZE: i64 = 1;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound for uploaded profile images (2 MiB)
pub const MAX_PROFILE_IMAGE_SIZE: usize = 2 * 1024 * 1024;

/// Web path prefix under which stored files are served
pub const UPLOADS_WEB_PREFIX: &str = "/uploads/";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Administrator - manages users and regions
pub const ROLE_ADMIN: &str = "ADMIN";

/// Manager - manages regions and provinces
pub const ROLE_MANAGER: &str = "MANAGER";

/// Regular user - edits their own profile
pub const ROLE_USER: &str = "USER";
