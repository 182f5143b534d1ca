use alumni_database::{non_blank, NewNewsPost, NewsPost, NewsRepository};
use sqlx::SqlitePool;

use crate::types::{ContentError, ContentResult, CreateNewsPostRequest, NewsQuery};

const EXCERPT_CHARS: usize = 200;

#[derive(Clone)]
pub struct NewsService {
    posts: NewsRepository,
}

impl NewsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            posts: NewsRepository::new(pool),
        }
    }

    pub async fn create_post(&self, request: CreateNewsPostRequest) -> ContentResult<NewsPost> {
        let title = non_blank(&request.title)
            .ok_or_else(|| ContentError::validation("Title is required"))?;
        let content = non_blank(&request.content)
            .ok_or_else(|| ContentError::validation("Content is required"))?;
        let excerpt = request
            .excerpt
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| excerpt_of(&content));
        let author = non_blank(&request.author).unwrap_or_else(|| "ICAA Admin".to_string());

        let post = self
            .posts
            .create(&NewNewsPost {
                title,
                content,
                excerpt,
                author,
            })
            .await?;
        Ok(post)
    }

    pub async fn list_posts(&self, query: &NewsQuery) -> ContentResult<Vec<NewsPost>> {
        let (limit, skip) = query.bounds();
        Ok(self.posts.list(limit, skip).await?)
    }

    pub async fn get_post(&self, id: &str) -> ContentResult<NewsPost> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ContentError::not_found("News post", id))
    }
}

fn excerpt_of(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::excerpt_of;

    #[test]
    fn long_content_is_truncated_on_char_boundaries() {
        let content = "é".repeat(250);
        let excerpt = excerpt_of(&content);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 203);
        assert_eq!(excerpt_of("short"), "short");
    }
}
