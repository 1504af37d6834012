use sqlx::PgPool;
use sqlx::Row;
use crate::http_error::AppError;

/// Returns `(id, password_hash)` for the given username.
pub async fn find_credentials(pool: &PgPool, username: &str) -> Result<Option<(String, String)>, AppError> {
    let row = sqlx::query("SELECT id, password_hash FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(|r| (r.get("id"), r.get("password_hash"))))
}
