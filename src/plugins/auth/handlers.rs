use axum::{Json, Extension};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use async_trait::async_trait;
use bcrypt::verify;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use std::env;
use crate::http_error::AppError;
use crate::plugins::auth::models::{Claims, LoginRequest, LoginResponse};
use crate::plugins::auth::repo;
use crate::plugins::users::models::UserDto;

const TOKEN_TTL_HOURS: i64 = 24;

fn jwt_secret() -> Result<String, AppError> {
    env::var("JWT_SECRET").map_err(|_| AppError::internal("jwtSecretNotConfigured").with_code("config_error"))
}

/// The acting user, taken from the `Authorization: Bearer` token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_hdr = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "missing authorization").with_code("missing_token"))?;

        let token = auth_hdr
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "invalid authorization header").with_code("invalid_token"))?;

        let secret = jwt_secret()?;
        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
            .map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, "invalid token").with_code("invalid_token"))?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalid token subject").with_code("invalid_token"));
        }
        Ok(AuthUser { user_id: token_data.claims.sub })
    }
}

/// Signs a bearer token for `user_id` with the configured secret.
pub fn issue_token(user_id: &str) -> Result<String, AppError> {
    let secret = jwt_secret()?;
    let exp = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
    let claims = Claims { sub: user_id.to_string(), exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(e.to_string()))
}

pub async fn login(Extension(pool): Extension<PgPool>, Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("usernameAndPasswordRequired").with_code("invalid_credentials"));
    }

    let invalid = || AppError::new(StatusCode::UNAUTHORIZED, "invalidUsernameOrPassword").with_code("invalid_credentials");

    let (id, password_hash) = repo::find_credentials(&pool, &payload.username).await?.ok_or_else(invalid)?;

    let valid = verify(&payload.password, &password_hash).map_err(|e| AppError::internal(e.to_string()))?;
    if !valid {
        tracing::info!(username = %payload.username, "rejected login");
        return Err(invalid());
    }

    let token = issue_token(&id)?;
    Ok(Json(LoginResponse { token }))
}

pub async fn whoami(Extension(pool): Extension<PgPool>, auth: AuthUser) -> Result<Json<UserDto>, AppError> {
    let user = crate::plugins::users::repo::get_user(&pool, &auth.user_id).await?;
    Ok(Json(user))
}
