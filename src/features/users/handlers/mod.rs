mod profile_handler;
mod user_handler;

pub use profile_handler::*;
pub use user_handler::*;
