use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::stories::models::{RequestStoryDto, ResponseStoryDto, StoriesWithCountDto};
use crate::plugins::stories::repo::{Page, StoriesRepository, StoryFilter};
use crate::plugins::stories::status::DbStatus;

/// Operations the stories routes are written against.
#[async_trait]
pub trait StoriesService: Send + Sync {
    async fn create_story(&self, story: RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError>;

    async fn get_stories(&self, query: &str, skip: i64, top: i64) -> Result<StoriesWithCountDto, AppError>;

    /// Like `get_stories`, restricted to one author.
    async fn get_user_stories(&self, user_id: &str, query: &str, skip: i64, top: i64) -> Result<StoriesWithCountDto, AppError>;

    async fn get_story(&self, story_id: Uuid) -> Result<Option<ResponseStoryDto>, AppError>;

    async fn replace_story(&self, story: RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError>;

    async fn remove_story(&self, story_id: Uuid, user_id: &str) -> Result<DbStatus, AppError>;
}

pub struct DefaultStoriesService {
    repo: Arc<dyn StoriesRepository>,
}

impl DefaultStoriesService {
    pub fn new(repo: Arc<dyn StoriesRepository>) -> Self {
        Self { repo }
    }

    async fn list(&self, filter: StoryFilter, skip: i64, top: i64) -> Result<StoriesWithCountDto, AppError> {
        let page = Page::new(skip, top)?;
        let (stories, total) = tokio::try_join!(
            self.repo.find_stories(&filter, Some(page)),
            self.repo.count_stories(&filter)
        )?;
        Ok(StoriesWithCountDto { stories, total })
    }
}

#[async_trait]
impl StoriesService for DefaultStoriesService {
    async fn create_story(&self, story: RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError> {
        self.repo.add_story(&story, user_id).await
    }

    async fn get_stories(&self, query: &str, skip: i64, top: i64) -> Result<StoriesWithCountDto, AppError> {
        self.list(StoryFilter::new(query, None), skip, top).await
    }

    async fn get_user_stories(&self, user_id: &str, query: &str, skip: i64, top: i64) -> Result<StoriesWithCountDto, AppError> {
        self.list(StoryFilter::new(query, Some(user_id)), skip, top).await
    }

    async fn get_story(&self, story_id: Uuid) -> Result<Option<ResponseStoryDto>, AppError> {
        self.repo.get_story(story_id).await
    }

    async fn replace_story(&self, story: RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError> {
        self.repo.replace_story(&story, user_id).await
    }

    async fn remove_story(&self, story_id: Uuid, user_id: &str) -> Result<DbStatus, AppError> {
        self.repo.remove_story(story_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::stories::models::AuthorDto;
    use chrono::{NaiveDate, Utc};
    use std::sync::Mutex;

    /// Records what the service asks for and answers from a fixed list.
    #[derive(Default)]
    struct RecordingRepo {
        stories: Vec<ResponseStoryDto>,
        finds: Mutex<Vec<(StoryFilter, Option<Page>)>>,
        writes: Mutex<Vec<(Uuid, String)>>,
    }

    fn response(title: &str, author: &str) -> ResponseStoryDto {
        ResponseStoryDto {
            story_id: Uuid::new_v4(),
            title: title.to_string(),
            body: String::new(),
            published_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            last_modified: Utc::now(),
            author: AuthorDto { user_id: author.to_string(), username: author.to_string(), email: format!("{}@example.com", author) },
        }
    }

    #[async_trait]
    impl StoriesRepository for RecordingRepo {
        async fn add_story(&self, story: &RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError> {
            self.writes.lock().unwrap().push((story.story_id, user_id.to_string()));
            Ok(DbStatus::Added)
        }

        async fn find_stories(&self, filter: &StoryFilter, page: Option<Page>) -> Result<Vec<ResponseStoryDto>, AppError> {
            self.finds.lock().unwrap().push((filter.clone(), page));
            let matching = self.stories.iter().filter(|s| filter.author_id.as_deref().map_or(true, |a| s.author.user_id == a));
            let skip = page.map(|p| p.skip()).unwrap_or(0) as usize;
            let top = page.map(|p| p.top() as usize).unwrap_or(usize::MAX);
            Ok(matching.skip(skip).take(top).cloned().collect())
        }

        async fn count_stories(&self, filter: &StoryFilter) -> Result<i64, AppError> {
            Ok(self.stories.iter().filter(|s| filter.author_id.as_deref().map_or(true, |a| s.author.user_id == a)).count() as i64)
        }

        async fn get_story(&self, story_id: Uuid) -> Result<Option<ResponseStoryDto>, AppError> {
            Ok(self.stories.iter().find(|s| s.story_id == story_id).cloned())
        }

        async fn replace_story(&self, story: &RequestStoryDto, user_id: &str) -> Result<DbStatus, AppError> {
            self.writes.lock().unwrap().push((story.story_id, user_id.to_string()));
            Ok(DbStatus::Forbidden)
        }

        async fn remove_story(&self, story_id: Uuid, user_id: &str) -> Result<DbStatus, AppError> {
            self.writes.lock().unwrap().push((story_id, user_id.to_string()));
            Ok(DbStatus::NotFound)
        }
    }

    fn service_over(repo: Arc<RecordingRepo>) -> DefaultStoriesService {
        DefaultStoriesService::new(repo)
    }

    #[tokio::test]
    async fn get_stories_wraps_page_with_total() {
        let repo = Arc::new(RecordingRepo {
            stories: vec![response("LoremIpsum", "akash")],
            ..Default::default()
        });
        let svc = service_over(repo.clone());

        let result = svc.get_stories("", 0, 20).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.stories.len(), 1);
        assert_eq!(result.stories[0].title, "LoremIpsum");

        let finds = repo.finds.lock().unwrap();
        assert_eq!(finds[0].0, StoryFilter::default());
        assert_eq!(finds[0].1, Some(Page::new(0, 20).unwrap()));
    }

    #[tokio::test]
    async fn total_ignores_the_page_window() {
        let repo = Arc::new(RecordingRepo {
            stories: (0..5).map(|i| response(&format!("s{}", i), "akash")).collect(),
            ..Default::default()
        });
        let svc = service_over(repo);

        let result = svc.get_stories("", 3, 10).await.unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(result.stories.len(), 2);
        assert_eq!(result.stories[0].title, "s3");
    }

    #[tokio::test]
    async fn user_stories_filter_by_author_and_query() {
        let repo = Arc::new(RecordingRepo {
            stories: vec![response("a", "akash"), response("b", "bob"), response("c", "akash")],
            ..Default::default()
        });
        let svc = service_over(repo.clone());

        let result = svc.get_user_stories("akash", " rust ", 0, 10).await.unwrap();
        assert_eq!(result.total, 2);
        assert!(result.stories.iter().all(|s| s.author.user_id == "akash"));

        let finds = repo.finds.lock().unwrap();
        assert_eq!(finds[0].0.author_id.as_deref(), Some("akash"));
        assert_eq!(finds[0].0.query.as_deref(), Some("rust"));
    }

    #[tokio::test]
    async fn invalid_pagination_never_reaches_the_store() {
        let repo = Arc::new(RecordingRepo::default());
        let svc = service_over(repo.clone());

        let err = svc.get_stories("", -1, 10).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(svc.get_user_stories("akash", "", 0, 0).await.is_err());
        assert!(repo.finds.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_pass_through_statuses_and_acting_user() {
        let repo = Arc::new(RecordingRepo::default());
        let svc = service_over(repo.clone());
        let dto = RequestStoryDto {
            story_id: Uuid::new_v4(),
            title: "t".into(),
            body: "b".into(),
            published_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        assert_eq!(svc.create_story(dto.clone(), "akash").await.unwrap(), DbStatus::Added);
        assert_eq!(svc.replace_story(dto.clone(), "bob").await.unwrap(), DbStatus::Forbidden);
        assert_eq!(svc.remove_story(dto.story_id, "carol").await.unwrap(), DbStatus::NotFound);

        let writes = repo.writes.lock().unwrap();
        let users: Vec<&str> = writes.iter().map(|(_, u)| u.as_str()).collect();
        assert_eq!(users, vec!["akash", "bob", "carol"]);
        assert!(writes.iter().all(|(id, _)| *id == dto.story_id));
    }

    #[tokio::test]
    async fn missing_story_is_none() {
        let svc = service_over(Arc::new(RecordingRepo::default()));
        assert!(svc.get_story(Uuid::new_v4()).await.unwrap().is_none());
    }
}
