use axum::{Router, routing::get, Extension};
use crate::kernel::Plugin;
use crate::plugins::stories::handlers::*;
use crate::plugins::stories::repo::PgStoriesRepository;
use crate::plugins::stories::service::DefaultStoriesService;
use sqlx::PgPool;
use std::sync::Arc;

pub struct StoriesPlugin { service: SharedStoriesService }

impl StoriesPlugin {
    pub fn new(pool: PgPool) -> Self {
        let repo = Arc::new(PgStoriesRepository::new(pool));
        Self::with_service(Arc::new(DefaultStoriesService::new(repo)))
    }

    pub fn with_service(service: SharedStoriesService) -> Self { Self { service } }
}

#[async_trait::async_trait]
impl Plugin for StoriesPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", get(list_stories).post(create_story))
            .route("/user/:user_id", get(list_user_stories))
            .route("/:id", get(get_story).put(update_story).delete(delete_story))
            .layer(Extension(self.service.clone()))
    }

    fn name(&self) -> &'static str { "stories" }
}
