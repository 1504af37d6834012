use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::stories::models::{RequestStoryDto, ResponseStoryDto, Story, StoryWithAuthorRow};
use crate::plugins::stories::policy::can_modify;
use crate::plugins::stories::status::DbStatus;

/// Offset/limit window over the ordered story list. Only constructible with `skip >= 0` and `top > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: i64,
    top: i64,
}

impl Page {
    pub fn new(skip: i64, top: i64) -> Result<Self, AppError> {
        if skip < 0 {
            return Err(AppError::bad_request("skip must not be negative").with_code("invalid_pagination"));
        }
        if top < 1 {
            return Err(AppError::bad_request("top must be positive").with_code("invalid_pagination"));
        }
        Ok(Self { skip, top })
    }

    pub fn skip(&self) -> i64 { self.skip }

    pub fn top(&self) -> i64 { self.top }
}

/// Narrows a listing. `query` is a case-insensitive substring of title or body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryFilter {
    pub query: Option<String>,
    pub author_id: Option<String>,
}

impl StoryFilter {
    pub fn new(query: &str, author_id: Option<&str>) -> Self {
        let query = query.trim();
        Self {
            query: (!query.is_empty()).then(|| query.to_string()),
            author_id: author_id.map(str::to_string),
        }
    }

    fn like_pattern(&self) -> Option<String> {
        self.query.as_deref().map(|q| {
            let mut pattern = String::with_capacity(q.len() + 2);
            pattern.push('%');
            for c in q.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }
}

#[async_trait]
pub trait StoriesRepository: Send + Sync {
    async fn add_story(&self, story: &RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError>;

    /// Stories matching `filter`, newest first; `None` reads the whole set.
    async fn find_stories(&self, filter: &StoryFilter, page: Option<Page>) -> Result<Vec<ResponseStoryDto>, AppError>;

    async fn count_stories(&self, filter: &StoryFilter) -> Result<i64, AppError>;

    async fn get_story(&self, story_id: Uuid) -> Result<Option<ResponseStoryDto>, AppError>;

    async fn replace_story(&self, story: &RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError>;

    async fn remove_story(&self, story_id: Uuid, user_id: &str) -> Result<DbStatus, AppError>;

    async fn get_stories(&self) -> Result<Vec<ResponseStoryDto>, AppError> {
        self.find_stories(&StoryFilter::default(), None).await
    }

    async fn get_stories_page(&self, page: Page) -> Result<Vec<ResponseStoryDto>, AppError> {
        self.find_stories(&StoryFilter::default(), Some(page)).await
    }
}

const SELECT_WITH_AUTHOR: &str = "SELECT s.story_id, s.title, s.body, s.published_date, s.last_modified, s.author_id, u.username AS author_username, u.email AS author_email FROM stories s JOIN users u ON u.id = s.author_id";

const FILTER_WHERE: &str = "WHERE ($1::text IS NULL OR s.title ILIKE $1 OR s.body ILIKE $1) AND ($2::text IS NULL OR s.author_id = $2)";

pub struct PgStoriesRepository {
    pool: PgPool,
}

impl PgStoriesRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    async fn load(&self, story_id: Uuid) -> Result<Option<Story>, AppError> {
        sqlx::query_as::<_, Story>("SELECT story_id, title, body, published_date, author_id, last_modified FROM stories WHERE story_id = $1")
            .bind(story_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Loads the story and applies the ownership rule; `Err(status)` short-circuits the write.
    async fn load_owned(&self, story_id: Uuid, user_id: &str) -> Result<Result<Story, DbStatus>, AppError> {
        let Some(story) = self.load(story_id).await? else {
            return Ok(Err(DbStatus::NotFound));
        };
        if !can_modify(user_id, &story) {
            tracing::warn!(%story_id, user_id, author_id = %story.author_id, "story write by non-owner refused");
            return Ok(Err(DbStatus::Forbidden));
        }
        Ok(Ok(story))
    }
}

#[async_trait]
impl StoriesRepository for PgStoriesRepository {
    async fn add_story(&self, story: &RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError> {
        let entity = Story::from_request(story, user_id);
        // the author must exist; a missing author or a taken id inserts nothing
        let result = sqlx::query("INSERT INTO stories (story_id, title, body, published_date, author_id, last_modified) SELECT $1, $2, $3, $4, u.id, $6 FROM users u WHERE u.id = $5 ON CONFLICT (story_id) DO NOTHING")
            .bind(entity.story_id)
            .bind(&entity.title)
            .bind(&entity.body)
            .bind(entity.published_date)
            .bind(&entity.author_id)
            .bind(entity.last_modified)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        let status = DbStatus::from_rows(result.rows_affected(), DbStatus::Added, DbStatus::Failed);
        tracing::debug!(story_id = %entity.story_id, user_id, %status, "add story");
        Ok(status)
    }

    async fn find_stories(&self, filter: &StoryFilter, page: Option<Page>) -> Result<Vec<ResponseStoryDto>, AppError> {
        let sql = format!("{} {} ORDER BY s.published_date DESC, s.story_id ASC OFFSET $3 LIMIT $4", SELECT_WITH_AUTHOR, FILTER_WHERE);
        // LIMIT NULL reads everything
        let rows: Vec<StoryWithAuthorRow> = sqlx::query_as::<_, StoryWithAuthorRow>(&sql)
            .bind(filter.like_pattern())
            .bind(filter.author_id.as_deref())
            .bind(page.map(|p| p.skip()).unwrap_or(0))
            .bind(page.map(|p| p.top()))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(ResponseStoryDto::from).collect())
    }

    async fn count_stories(&self, filter: &StoryFilter) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM stories s {}", FILTER_WHERE);
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.like_pattern())
            .bind(filter.author_id.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_story(&self, story_id: Uuid) -> Result<Option<ResponseStoryDto>, AppError> {
        let sql = format!("{} WHERE s.story_id = $1", SELECT_WITH_AUTHOR);
        let row = sqlx::query_as::<_, StoryWithAuthorRow>(&sql)
            .bind(story_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(ResponseStoryDto::from))
    }

    async fn replace_story(&self, story: &RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError> {
        let current = match self.load_owned(story.story_id, user_id).await? {
            Ok(current) => current,
            Err(status) => return Ok(status),
        };

        // author and id are never written; an update that changes nothing touches no row
        let result = sqlx::query("UPDATE stories SET title = $2, body = $3, published_date = $4, last_modified = now() WHERE story_id = $1 AND author_id = $5 AND (title IS DISTINCT FROM $2 OR body IS DISTINCT FROM $3 OR published_date IS DISTINCT FROM $4)")
            .bind(current.story_id)
            .bind(&story.title)
            .bind(&story.body)
            .bind(story.published_date)
            .bind(&current.author_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        let status = DbStatus::from_rows(result.rows_affected(), DbStatus::Modified, DbStatus::NotModified);
        tracing::debug!(story_id = %current.story_id, user_id, %status, "replace story");
        Ok(status)
    }

    async fn remove_story(&self, story_id: Uuid, user_id: &str) -> Result<DbStatus, AppError> {
        let current = match self.load_owned(story_id, user_id).await? {
            Ok(current) => current,
            Err(status) => return Ok(status),
        };

        let result = sqlx::query("DELETE FROM stories WHERE story_id = $1 AND author_id = $2")
            .bind(current.story_id)
            .bind(&current.author_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        let status = DbStatus::from_rows(result.rows_affected(), DbStatus::Deleted, DbStatus::NotDeleted);
        tracing::debug!(%story_id, user_id, %status, "remove story");
        Ok(status)
    }
}
