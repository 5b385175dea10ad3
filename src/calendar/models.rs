//! Data models for calendar events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::store::Record;
use crate::timestamps;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Lifecycle of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
    Cancelled,
}

impl EventStatus {
    /// Statuses whose time counts as practice
    pub const TRACKED: [EventStatus; 2] = [EventStatus::Completed, EventStatus::InProgress];

    pub fn is_tracked(self) -> bool {
        Self::TRACKED.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub recurrence_type: RecurrenceType,
    #[serde(default = "default_recurrence_interval")]
    pub interval: u32,
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
    #[serde(default)]
    pub day_of_month: Option<u8>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub occurrences: Option<u32>,
}

fn default_recurrence_interval() -> u32 {
    1
}

/// A block of time on the calendar, optionally tied to a skill or project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "reference")]
    pub project_id: Option<Uuid>,
    #[serde(default, deserialize_with = "reference")]
    pub skill_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_rule: Option<RecurrenceRule>,
    #[serde(default)]
    pub parent_event_id: Option<Uuid>,
    /// Minutes before start
    #[serde(default)]
    pub reminders: Vec<i32>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skipped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skip_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for CalendarEvent {
    const COLLECTION: &'static str = "calendar_events";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl CalendarEvent {
    pub fn new(
        user_id: Uuid,
        title: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description: None,
            start_time,
            end_time,
            priority: Priority::default(),
            status: EventStatus::Pending,
            category: None,
            project_id: None,
            skill_id: None,
            tags: Vec::new(),
            location: None,
            is_recurring: false,
            recurrence_rule: None,
            parent_event_id: None,
            reminders: Vec::new(),
            completed_at: None,
            skipped_at: None,
            skip_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Length of the event in hours
    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 3_600_000.0
    }
}

/// Skill or project id; `null` and `""` both mean no reference
fn reference<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid reference {}: {}", raw, e))),
        None => Ok(None),
    }
}

/// Only called when the field is present, so a sent `null` becomes `Some(None)`
fn reference_change<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    reference(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub skill_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_rule: Option<RecurrenceRule>,
    #[serde(default)]
    pub reminders: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub status: Option<EventStatus>,
    pub category: Option<String>,
    /// `Some(None)` unlinks the project
    #[serde(default, deserialize_with = "reference_change")]
    pub project_id: Option<Option<Uuid>>,
    /// `Some(None)` unlinks the skill
    #[serde(default, deserialize_with = "reference_change")]
    pub skill_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub reminders: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteEventRequest {
    #[serde(default = "default_completed")]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_completed() -> bool {
    true
}

impl Default for CompleteEventRequest {
    fn default() -> Self {
        Self {
            completed: true,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkipEventRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Filters for listing events
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::option::deserialize")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
    pub category: Option<String>,
}
