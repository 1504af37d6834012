use axum::Router;
use std::net::SocketAddr;
use storyblog::config::AppConfig;
use storyblog::kernel::{build_app, Plugin};
use storyblog::plugins::auth::AuthPlugin;
use storyblog::plugins::health::HealthPlugin;
use storyblog::plugins::stories::StoriesPlugin;
use storyblog::plugins::users::UsersPlugin;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "storyblog=info,tower_http=info".into()),
        )
        .init();

    let pool = storyblog::db::init_db(&config.database_url, config.max_connections).await?;

    let plugins_vec: Vec<Box<dyn Plugin>> = vec![
        Box::new(HealthPlugin::new(pool.clone())),
        Box::new(UsersPlugin::new(pool.clone())),
        Box::new(AuthPlugin::new(pool.clone())),
        Box::new(StoriesPlugin::new(pool.clone())),
    ];

    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    let app: Router = build_app(&plugins_vec).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
