use crate::kernel::Plugin;
use axum::{Extension, Json, Router, routing::get};
use axum::http::StatusCode;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    database: &'static str,
}

/// Liveness plus a round-trip to the database.
pub struct HealthPlugin {
    pool: PgPool,
}

impl HealthPlugin {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[axum::debug_handler]
async fn health_handler(Extension(pool): Extension<PgPool>) -> (StatusCode, Json<Health>) {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => (StatusCode::OK, Json(Health { status: "ok", database: "up" })),
        Err(e) => {
            tracing::warn!("database ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(Health { status: "degraded", database: "down" }))
        }
    }
}

#[async_trait::async_trait]
impl Plugin for HealthPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", get(health_handler))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "health"
    }

    async fn on_start(&self) {
        tracing::info!("health plugin started");
    }
}
