use axum::{Json, Extension, extract::Path};
use axum::http::StatusCode;
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;
use crate::http_error::AppError;
use crate::plugins::users::models::{CreateUser, UserDto};
use crate::plugins::users::repo;

pub async fn create_user(Extension(pool): Extension<PgPool>, Json(payload): Json<CreateUser>) -> Result<(StatusCode, Json<UserDto>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::bad_request(e.to_string()).with_code("validation"))?;

    let password_hash = hash(&payload.password, DEFAULT_COST).map_err(|e| AppError::internal(e.to_string()))?;
    let user = repo::insert_user(&pool, &payload.username, &payload.email, &password_hash).await?;
    tracing::info!(user_id = %user.id, "registered user");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(Extension(pool): Extension<PgPool>, Path(id): Path<String>) -> Result<Json<UserDto>, AppError> {
    Ok(Json(repo::get_user(&pool, &id).await?))
}
