//! Data models for the improvement log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

pub const MIN_IMPACT_LEVEL: u8 = 1;
pub const MAX_IMPACT_LEVEL: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Improvement,
    Distraction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressNote {
    pub note: String,
    #[serde(default)]
    pub progress_percentage: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// Something to improve on or a recurring distraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 1 to 5
    #[serde(default = "default_impact_level")]
    pub impact_level: u8,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub progress_notes: Vec<ProgressNote>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_impact_level() -> u8 {
    3
}

impl Record for ImprovementLog {
    const COLLECTION: &'static str = "improvement_logs";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLogRequest {
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_impact_level")]
    pub impact_level: u8,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub impact_level: Option<u8>,
    pub frequency: Option<String>,
    pub trigger: Option<String>,
    pub solution: Option<String>,
    pub is_resolved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddProgressRequest {
    pub note: String,
    #[serde(default)]
    pub progress_percentage: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    pub log_type: Option<LogType>,
    pub category: Option<String>,
    pub is_resolved: Option<bool>,
}
