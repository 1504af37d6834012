use axum::{Router, routing::{post, get}, Extension};
use crate::kernel::Plugin;
use async_trait::async_trait;
use sqlx::PgPool;
use crate::plugins::auth::handlers;

pub struct AuthPlugin {
    pool: PgPool,
}

impl AuthPlugin {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl Plugin for AuthPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/login", post(handlers::login))
            .route("/whoami", get(handlers::whoami))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str { "auth" }
}
