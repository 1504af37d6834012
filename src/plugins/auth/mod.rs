pub mod handlers;
pub mod models;
pub mod plugin;
pub mod repo;

pub use handlers::{issue_token, AuthUser};
pub use plugin::AuthPlugin;
