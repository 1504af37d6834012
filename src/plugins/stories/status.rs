use axum::http::StatusCode;
use serde::Serialize;
use std::fmt;

/// Outcome of a story write. Expected business results are reported here, never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DbStatus {
    Added,
    Modified,
    NotModified,
    Deleted,
    NotDeleted,
    Failed,
    NotFound,
    Forbidden,
}

impl DbStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DbStatus::Added => "Added",
            DbStatus::Modified => "Modified",
            DbStatus::NotModified => "NotModified",
            DbStatus::Deleted => "Deleted",
            DbStatus::NotDeleted => "NotDeleted",
            DbStatus::Failed => "Failed",
            DbStatus::NotFound => "NotFound",
            DbStatus::Forbidden => "Forbidden",
        }
    }

    /// `NotModified` counts as success: the story exists, is owned, and already holds the values.
    pub fn is_success(self) -> bool {
        matches!(self, DbStatus::Added | DbStatus::Modified | DbStatus::NotModified | DbStatus::Deleted)
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            DbStatus::Added => StatusCode::CREATED,
            DbStatus::Modified | DbStatus::NotModified | DbStatus::Deleted => StatusCode::OK,
            DbStatus::Failed => StatusCode::BAD_REQUEST,
            DbStatus::NotDeleted => StatusCode::CONFLICT,
            DbStatus::NotFound => StatusCode::NOT_FOUND,
            DbStatus::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Zero affected rows on a write is a soft outcome, not a fault.
    pub(crate) fn from_rows(rows_affected: u64, done: DbStatus, noop: DbStatus) -> DbStatus {
        if rows_affected == 0 { noop } else { done }
    }
}

impl fmt::Display for DbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
