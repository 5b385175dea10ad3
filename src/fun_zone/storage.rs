//! Fun zone content storage

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::models::*;
use crate::analytics::rank_by_popularity;
use crate::store::{Collection, DocumentStore, Filter, Result, StorageError};

pub const MAX_POPULAR_LIMIT: usize = 50;

const POPULAR_WINDOW_DAYS: i64 = 7;

fn content_not_found() -> StorageError {
    StorageError::NotFound("Content not found".to_string())
}

#[derive(Clone)]
pub struct FunZoneStorage {
    contents: Collection<FunContent>,
    likes: Collection<FunLike>,
}

impl FunZoneStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            contents: Collection::new(Arc::clone(&store)),
            likes: Collection::new(store),
        }
    }

    fn visible_to(user_id: Uuid) -> Filter {
        Filter::new().any_of(vec![
            Filter::new().eq("user_id", user_id),
            Filter::new().eq("is_public", true),
        ])
    }

    pub async fn create(&self, user_id: Uuid, request: CreateFunContentRequest) -> Result<FunContent> {
        let now = Utc::now();
        let content = FunContent {
            id: Uuid::new_v4(),
            user_id,
            title: request.title,
            content: request.content,
            content_type: request.content_type,
            category: request.category,
            tags: request.tags,
            is_public: request.is_public,
            likes: 0,
            views: 0,
            comments_count: 0,
            metadata: request.metadata,
            created_at: now,
            updated_at: now,
        };
        self.contents.insert(&content).await?;
        Ok(content)
    }

    /// Own content, plus public content unless `include_public` is off
    pub async fn list(&self, user_id: Uuid, query: &FunContentQuery) -> Result<Vec<FunContent>> {
        let mut filter = if query.include_public {
            Self::visible_to(user_id)
        } else {
            Filter::new().eq("user_id", user_id)
        };
        filter = filter
            .eq_opt("type", query.content_type)
            .eq_opt("category", query.category.as_deref())
            .eq_opt("is_public", query.is_public);
        if let Some(tag) = &query.tag {
            filter = filter.contains("tags", tag);
        }

        let mut contents = self.contents.find(&filter).await?;
        contents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contents)
    }

    async fn visible(&self, user_id: Uuid, content_id: Uuid) -> Result<FunContent> {
        self.contents
            .find_one(&Self::visible_to(user_id).eq("id", content_id))
            .await?
            .ok_or_else(content_not_found)
    }

    async fn owned(&self, user_id: Uuid, content_id: Uuid) -> Result<FunContent> {
        self.contents
            .find_one(&Filter::new().eq("id", content_id).eq("user_id", user_id))
            .await?
            .ok_or_else(|| {
                StorageError::NotFound("Content not found or you don't have permission".to_string())
            })
    }

    /// Read a piece of content, counting the view
    pub async fn get(&self, user_id: Uuid, content_id: Uuid) -> Result<FunContent> {
        let mut content = self.visible(user_id, content_id).await?;
        content.views += 1;
        self.contents.replace(&content).await?;
        Ok(content)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        request: UpdateFunContentRequest,
    ) -> Result<FunContent> {
        let mut content = self.owned(user_id, content_id).await?;
        if let Some(title) = request.title {
            content.title = title;
        }
        if let Some(body) = request.content {
            content.content = body;
        }
        if let Some(content_type) = request.content_type {
            content.content_type = content_type;
        }
        if let Some(category) = request.category {
            content.category = Some(category);
        }
        if let Some(tags) = request.tags {
            content.tags = tags;
        }
        if let Some(is_public) = request.is_public {
            content.is_public = is_public;
        }
        if let Some(metadata) = request.metadata {
            content.metadata = Some(metadata);
        }
        content.updated_at = Utc::now();
        self.contents.replace(&content).await?;
        Ok(content)
    }

    /// Delete content and every like recorded on it
    pub async fn delete(&self, user_id: Uuid, content_id: Uuid) -> Result<()> {
        let content = self.owned(user_id, content_id).await?;
        self.contents.delete_by_id(content.id).await?;
        self.likes
            .delete(&Filter::new().eq("content_id", content.id))
            .await?;
        Ok(())
    }

    /// Like the content, or remove the account's existing like
    pub async fn toggle_like(&self, user_id: Uuid, content_id: Uuid) -> Result<LikeStatus> {
        let mut content = self.visible(user_id, content_id).await?;
        let mine = Filter::new()
            .eq("user_id", user_id)
            .eq("content_id", content.id);

        let liked = if self.likes.delete(&mine).await? > 0 {
            content.likes = content.likes.saturating_sub(1);
            false
        } else {
            let like = FunLike {
                id: Uuid::new_v4(),
                user_id,
                content_id: content.id,
                created_at: Utc::now(),
            };
            self.likes.insert(&like).await?;
            content.likes += 1;
            true
        };

        self.contents.replace(&content).await?;
        Ok(LikeStatus {
            liked,
            likes: content.likes,
        })
    }

    /// Most popular public content created in the seven days before `now`
    pub async fn popular_week(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<FunContent>> {
        if !(1..=MAX_POPULAR_LIMIT).contains(&limit) {
            return Err(StorageError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_POPULAR_LIMIT
            )));
        }

        let since = now - Duration::days(POPULAR_WINDOW_DAYS);
        let recent: Vec<FunContent> = self
            .contents
            .find(&Filter::new().eq("is_public", true))
            .await?
            .into_iter()
            .filter(|c| c.created_at >= since)
            .collect();
        Ok(rank_by_popularity(recent, limit))
    }
}
