//! Data models for projects and skills

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{ProjectStats, SkillStats};
use crate::store::Record;
use crate::timestamps;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    /// UI display colour
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub target_hours: Option<f64>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Project {
    pub fn new(user_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description: None,
            status: ProjectStatus::default(),
            color: None,
            target_hours: None,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A project together with the hours logged against it
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithStats {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub stats: ProjectStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub target_hours: Option<f64>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    pub target_hours: Option<f64>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
}

/// Something the account is practising
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// e.g. "Programming", "Language"
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub target_level: Option<String>,
    #[serde(default)]
    pub current_level: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Emoji or icon identifier
    #[serde(default)]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Skill {
    const COLLECTION: &'static str = "skills";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Skill {
    pub fn new(user_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description: None,
            category: None,
            target_level: None,
            current_level: None,
            color: None,
            icon: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillWithStats {
    #[serde(flatten)]
    pub skill: Skill,
    #[serde(flatten)]
    pub stats: SkillStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub target_level: Option<String>,
    #[serde(default)]
    pub current_level: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_level: Option<String>,
    pub current_level: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillQuery {
    pub category: Option<String>,
}
