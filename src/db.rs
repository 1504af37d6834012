use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Connects to PostgreSQL and applies the embedded migrations.
pub async fn init_db(database_url: &str, max_connections: u32) -> anyhow::Result<DbPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}
