pub mod handlers;
pub mod models;
pub mod plugin;
pub mod policy;
pub mod repo;
pub mod service;
pub mod status;

pub use models::*;
pub use plugin::StoriesPlugin;
pub use repo::{Page, PgStoriesRepository, StoriesRepository, StoryFilter};
pub use service::{DefaultStoriesService, StoriesService};
pub use status::DbStatus;
