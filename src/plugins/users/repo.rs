use sqlx::PgPool;
use sqlx::Row;
use crate::http_error::AppError;
use crate::plugins::users::models::UserDto;

pub async fn insert_user(pool: &PgPool, username: &str, email: &str, password_hash: &str) -> Result<UserDto, AppError> {
    let row = sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id, username, email")
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(UserDto { id: row.get("id"), username: row.get("username"), email: row.get("email") })
}

pub async fn get_user(pool: &PgPool, id: &str) -> Result<UserDto, AppError> {
    let row = sqlx::query("SELECT id, username, email FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(UserDto { id: row.get("id"), username: row.get("username"), email: row.get("email") })
}
