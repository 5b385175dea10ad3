//! Data models for diary entries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// Five point mood scale. Input also accepts the front-end's mood names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    #[serde(alias = "angry")]
    VeryBad,
    #[serde(alias = "sad")]
    Bad,
    Neutral,
    #[serde(alias = "happy")]
    Good,
    #[serde(alias = "amazing")]
    Excellent,
}

/// One entry per account per calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub mood: Option<MoodLevel>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub accomplishments: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub gratitude: Vec<String>,
    #[serde(default)]
    pub tomorrow_goals: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default = "default_private")]
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_private() -> bool {
    true
}

impl Record for DiaryEntry {
    const COLLECTION: &'static str = "diary_entries";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiaryEntryRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub mood: Option<MoodLevel>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub accomplishments: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default, alias = "gratitude_list")]
    pub gratitude: Vec<String>,
    #[serde(default)]
    pub tomorrow_goals: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default = "default_private")]
    pub is_private: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDiaryEntryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<MoodLevel>,
    pub activities: Option<Vec<String>>,
    pub accomplishments: Option<Vec<String>>,
    pub challenges: Option<Vec<String>>,
    #[serde(alias = "gratitude_list")]
    pub gratitude: Option<Vec<String>>,
    pub tomorrow_goals: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub weather: Option<String>,
    pub location: Option<String>,
    pub photos: Option<Vec<String>>,
    pub is_private: Option<bool>,
}

/// Filters for listing entries. Timestamps are unix seconds, compared
/// by their UTC calendar date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiaryQuery {
    pub start_timestamp: Option<i64>,
    pub end_timestamp: Option<i64>,
    pub mood: Option<MoodLevel>,
    pub tag: Option<String>,
}
