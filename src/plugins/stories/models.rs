use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::plugins::stories::status::DbStatus;

/// A row of `stories`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Story {
    pub story_id: Uuid,
    pub title: String,
    pub body: String,
    pub published_date: NaiveDate,
    pub author_id: String,
    pub last_modified: DateTime<Utc>,
}

impl Story {
    /// Maps a request onto a new entity. The author always comes from the caller, never the payload.
    pub fn from_request(dto: &RequestStoryDto, author_id: &str) -> Self {
        Self {
            story_id: dto.story_id,
            title: dto.title.clone(),
            body: dto.body.clone(),
            published_date: dto.published_date,
            author_id: author_id.to_string(),
            last_modified: Utc::now(),
        }
    }
}

/// A story joined with its author, as read for responses.
#[derive(Debug, Clone, FromRow)]
pub struct StoryWithAuthorRow {
    pub story_id: Uuid,
    pub title: String,
    pub body: String,
    pub published_date: NaiveDate,
    pub last_modified: DateTime<Utc>,
    pub author_id: String,
    pub author_username: String,
    pub author_email: String,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestStoryDto {
    /// Nil when the caller did not supply one.
    #[serde(default)]
    pub story_id: Uuid,
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "today")]
    pub published_date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStoryDto {
    pub story_id: Uuid,
    pub title: String,
    pub body: String,
    pub published_date: NaiveDate,
    pub last_modified: DateTime<Utc>,
    pub author: AuthorDto,
}

impl From<StoryWithAuthorRow> for ResponseStoryDto {
    fn from(row: StoryWithAuthorRow) -> Self {
        Self {
            story_id: row.story_id,
            title: row.title,
            body: row.body,
            published_date: row.published_date,
            last_modified: row.last_modified,
            author: AuthorDto {
                user_id: row.author_id,
                username: row.author_username,
                email: row.author_email,
            },
        }
    }
}

/// One page of stories plus the size of the whole matching set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoriesWithCountDto {
    pub stories: Vec<ResponseStoryDto>,
    pub total: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedStoryDto {
    pub story_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseStatusDto {
    pub message: String,
}

impl From<DbStatus> for ResponseStatusDto {
    fn from(status: DbStatus) -> Self {
        Self { message: status.as_str().to_string() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BadResponseDto {
    pub status: u8,
    pub errors: Vec<String>,
}

impl BadResponseDto {
    pub fn new(errors: Vec<String>) -> Self {
        Self { status: 1, errors }
    }

    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| errs.iter().map(move |e| format!("{}: {}", field, e.code)))
            .collect();
        messages.sort();
        Self::new(messages)
    }
}
