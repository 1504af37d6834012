use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::http_error::AppError;
use crate::plugins::auth::AuthUser;
use crate::plugins::stories::models::{BadResponseDto, CreatedStoryDto, RequestStoryDto, ResponseStatusDto, ResponseStoryDto, StoriesWithCountDto};
use crate::plugins::stories::service::StoriesService;
use crate::plugins::stories::status::DbStatus;

pub type SharedStoriesService = Arc<dyn StoriesService>;

const DEFAULT_TOP: i64 = 20;
const MAX_TOP: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
    pub skip: Option<i64>,
    pub top: Option<i64>,
}

impl ListQuery {
    fn window(&self) -> (i64, i64) {
        (self.skip.unwrap_or(0), self.top.unwrap_or(DEFAULT_TOP).min(MAX_TOP))
    }
}

/// Turns a write outcome into the HTTP reply.
pub fn status_response(status: DbStatus, story_id: Uuid) -> Response {
    let code = status.http_status();
    match status {
        DbStatus::Added => (
            code,
            [(header::LOCATION, format!("/stories/{}", story_id))],
            Json(CreatedStoryDto { story_id }),
        )
            .into_response(),
        DbStatus::Failed => (code, Json(BadResponseDto::new(vec!["storyNotSaved".to_string()]))).into_response(),
        DbStatus::Modified | DbStatus::NotModified | DbStatus::Deleted => (code, Json(ResponseStatusDto::from(status))).into_response(),
        DbStatus::NotDeleted => AppError::new(code, "storyNotDeleted").with_code("not_deleted").into_response(),
        DbStatus::NotFound => AppError::not_found().into_response(),
        DbStatus::Forbidden => AppError::new(code, "forbidden").with_code("forbidden").into_response(),
    }
}

/// Unreadable or invalid story bodies both answer 400 with a `BadResponseDto`.
fn accept(payload: Result<Json<RequestStoryDto>, JsonRejection>) -> Result<RequestStoryDto, Response> {
    let Json(story) = payload
        .map_err(|rej| (StatusCode::BAD_REQUEST, Json(BadResponseDto::new(vec![rej.body_text()]))).into_response())?;
    story
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(BadResponseDto::from_validation(&e))).into_response())?;
    Ok(story)
}

pub async fn create_story(
    Extension(service): Extension<SharedStoriesService>,
    auth: AuthUser,
    payload: Result<Json<RequestStoryDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut payload = match accept(payload) {
        Ok(story) => story,
        Err(resp) => return Ok(resp),
    };
    if payload.story_id.is_nil() {
        payload.story_id = Uuid::new_v4();
    }
    let story_id = payload.story_id;
    let status = service.create_story(payload, &auth.user_id).await?;
    Ok(status_response(status, story_id))
}

pub async fn list_stories(
    Extension(service): Extension<SharedStoriesService>,
    Query(q): Query<ListQuery>,
) -> Result<Json<StoriesWithCountDto>, AppError> {
    let (skip, top) = q.window();
    let stories = service.get_stories(q.query.as_deref().unwrap_or(""), skip, top).await?;
    Ok(Json(stories))
}

pub async fn list_user_stories(
    Extension(service): Extension<SharedStoriesService>,
    Path(user_id): Path<String>,
    Query(q): Query<ListQuery>,
) -> Result<Json<StoriesWithCountDto>, AppError> {
    let (skip, top) = q.window();
    let stories = service
        .get_user_stories(&user_id, q.query.as_deref().unwrap_or(""), skip, top)
        .await?;
    Ok(Json(stories))
}

pub async fn get_story(
    Extension(service): Extension<SharedStoriesService>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResponseStoryDto>, AppError> {
    service.get_story(id).await?.map(Json).ok_or_else(AppError::not_found)
}

/// The id in the path wins over any id in the body.
pub async fn update_story(
    Extension(service): Extension<SharedStoriesService>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<RequestStoryDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut payload = match accept(payload) {
        Ok(story) => story,
        Err(resp) => return Ok(resp),
    };
    payload.story_id = id;
    let status = service.replace_story(payload, &auth.user_id).await?;
    Ok(status_response(status, id))
}

pub async fn delete_story(
    Extension(service): Extension<SharedStoriesService>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let status = service.remove_story(id, &auth.user_id).await?;
    Ok(status_response(status, id))
}
