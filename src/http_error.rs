use axum::response::{IntoResponse, Response};
use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use sqlx::Error as SqlxError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

/// Unexpected or request-level failure rendered as `{ "error", "code" }`.
///
/// Expected story outcomes travel as `DbStatus` instead; this type covers
/// everything else (bad input, auth, store faults).
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message).with_code("bad_request")
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "notFound").with_code("not_found")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "request failed: {}", self.message);
        }
        let body = ErrorBody { error: self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<(StatusCode, String)> for AppError {
    fn from((status, msg): (StatusCode, String)) -> Self {
        AppError::new(status, msg)
    }
}

fn duplicate_code(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("username") => "duplicate_username",
        Some(c) if c.contains("email") => "duplicate_email",
        Some(c) if c.contains("pkey") => "duplicate_id",
        _ => "duplicate_key",
    }
}

impl From<SqlxError> for AppError {
    fn from(e: SqlxError) -> Self {
        match e {
            SqlxError::RowNotFound => AppError::not_found(),
            SqlxError::Database(db) => match db.code().as_deref() {
                // unique_violation
                Some("23505") => AppError::new(StatusCode::CONFLICT, "duplicateKey")
                    .with_code(duplicate_code(db.constraint())),
                // foreign_key_violation
                Some("23503") => AppError::new(StatusCode::CONFLICT, "referenceMissing")
                    .with_code("foreign_key_violation"),
                _ => AppError::internal(db.message().to_string()),
            },
            other => AppError::internal(other.to_string()),
        }
    }
}
