//! Data models for learning materials

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    #[default]
    Note,
    Article,
    Tutorial,
    Reference,
}

/// Who besides the owner may read a material
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Public,
    /// Readable by the accounts in `shared_with`
    Shared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningMaterial {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "type", default)]
    pub material_type: MaterialType,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub shared_with: Vec<Uuid>,
    #[serde(default)]
    pub attachments: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for LearningMaterial {
    const COLLECTION: &'static str = "learning_materials";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaterialRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "type", default)]
    pub material_type: MaterialType,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "type")]
    pub material_type: Option<MaterialType>,
    pub subject: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
    pub references: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareMaterialRequest {
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialQuery {
    #[serde(rename = "type")]
    pub material_type: Option<MaterialType>,
    pub subject: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default = "default_include_public")]
    pub include_public: bool,
}

fn default_include_public() -> bool {
    true
}

impl Default for MaterialQuery {
    fn default() -> Self {
        Self {
            material_type: None,
            subject: None,
            category: None,
            tag: None,
            is_archived: false,
            include_public: true,
        }
    }
}
