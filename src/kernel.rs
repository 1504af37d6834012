use axum::Router;
use async_trait::async_trait;
use tower_http::trace::TraceLayer;
use tracing::info;

/// A mountable slice of the API.
#[async_trait]
pub trait Plugin: Send + Sync {
    async fn router(&self) -> Router;

    /// Mount point, without the leading slash.
    fn name(&self) -> &'static str;

    async fn on_start(&self) {}

    async fn on_shutdown(&self) {}
}

/// Builds the application router by mounting each plugin under `/{plugin.name()}`.
pub async fn build_app(plugins: &[Box<dyn Plugin>]) -> Router {
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;
        let router = plugin.router().await;
        app = app.nest(&format!("/{}", plugin.name()), router);
    }

    app.layer(TraceLayer::new_for_http())
}
