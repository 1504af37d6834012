use axum::{Router, routing::{post, get}, Extension};
use sqlx::PgPool;
use crate::kernel::Plugin;
use crate::plugins::users::handlers::{create_user, get_user};

pub struct UsersPlugin {
    pub pool: PgPool,
}

impl UsersPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Plugin for UsersPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_user))
            .route("/:id", get(get_user))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "users"
    }
}
