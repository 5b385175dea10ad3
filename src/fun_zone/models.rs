//! Data models for fun zone content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analytics::Popular;
use crate::store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Poem,
    Joke,
    Story,
    Quote,
    Thought,
    Other,
}

/// A short piece of creative content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunContent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for FunContent {
    const COLLECTION: &'static str = "fun_content";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Popular for FunContent {
    fn likes(&self) -> u64 {
        self.likes
    }

    fn views(&self) -> u64 {
        self.views
    }
}

/// One account's like on one piece of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunLike {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Record for FunLike {
    const COLLECTION: &'static str = "fun_likes";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFunContentRequest {
    pub title: String,
    pub content: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFunContentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "type")]
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunContentQuery {
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub is_public: Option<bool>,
    #[serde(default = "default_include_public")]
    pub include_public: bool,
}

fn default_include_public() -> bool {
    true
}

impl Default for FunContentQuery {
    fn default() -> Self {
        Self {
            content_type: None,
            category: None,
            tag: None,
            is_public: None,
            include_public: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_popular_limit")]
    pub limit: usize,
}

fn default_popular_limit() -> usize {
    10
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub likes: u64,
}
