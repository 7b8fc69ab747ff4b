mod role;
mod user;
mod user_profile;

pub use role::Role;
pub use user::{User, UserFields};
pub use user_profile::{ProfileFields, UserProfile};
