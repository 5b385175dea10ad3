//! Result shapes for analytics queries

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diary::MoodLevel;
use crate::store::{self, StorageError};
use crate::timestamps;

/// Inclusive time range. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    #[serde(default, rename = "start_date", deserialize_with = "timestamps::option::deserialize")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, rename = "end_date", deserialize_with = "timestamps::option::deserialize")]
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Window spanning every instant
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Window from unix second bounds. A bound chrono cannot represent is
    /// rejected rather than dropped.
    pub fn from_unix(start: Option<i64>, end: Option<i64>) -> store::Result<Self> {
        fn bound(secs: Option<i64>) -> store::Result<Option<DateTime<Utc>>> {
            secs.map(|s| {
                DateTime::from_timestamp(s, 0)
                    .ok_or_else(|| StorageError::InvalidInput(format!("Invalid timestamp: {}", s)))
            })
            .transpose()
        }
        Ok(Self {
            start: bound(start)?,
            end: bound(end)?,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| instant >= s) && self.end.map_or(true, |e| instant <= e)
    }

    /// Compare a calendar date against the UTC dates of the bounds
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s.date_naive())
            && self.end.map_or(true, |e| date <= e.date_naive())
    }
}

/// Hours logged against one skill or project
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTime {
    pub id: Uuid,
    pub name: String,
    pub total_hours: f64,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTime {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub total_hours: f64,
    pub task_count: usize,
}

impl From<GroupTime> for SkillTime {
    fn from(group: GroupTime) -> Self {
        Self {
            skill_id: group.id,
            skill_name: group.name,
            total_hours: group.total_hours,
            task_count: group.task_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTime {
    pub project_id: Uuid,
    pub project_name: String,
    pub total_hours: f64,
    pub task_count: usize,
}

impl From<GroupTime> for ProjectTime {
    fn from(group: GroupTime) -> Self {
        Self {
            project_id: group.id,
            project_name: group.name,
            total_hours: group.total_hours,
            task_count: group.task_count,
        }
    }
}

/// The UTC day with the most logged hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductiveDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub hours: f64,
    pub tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityOverview {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage, 0 when there are no tasks
    pub completion_rate: f64,
    pub total_hours: f64,
    pub average_hours_per_task: f64,
    pub most_productive_day: Option<ProductiveDay>,
}

/// Diary entry count per mood. Moods with no entries are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodSummary(pub BTreeMap<MoodLevel, usize>);

impl MoodSummary {
    pub fn get(&self, mood: MoodLevel) -> Option<usize> {
        self.0.get(&mood).copied()
    }
}

/// Which aggregation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationKind {
    TimeBySkill,
    TimeByProject,
    ProductivityOverview,
    MoodSummary,
}

/// Output of [`super::Analytics::aggregate`], matching the requested kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Aggregation {
    TimeBySkill(Vec<SkillTime>),
    TimeByProject(Vec<ProjectTime>),
    ProductivityOverview(ProductivityOverview),
    MoodSummary(MoodSummary),
}

/// Totals shown alongside a single skill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillStats {
    pub total_hours: f64,
    pub tasks_completed: usize,
    pub last_practiced: Option<DateTime<Utc>>,
}

/// Totals shown alongside a single project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_hours: f64,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unix_bounds() {
        let window = TimeWindow::from_unix(Some(0), None).unwrap();
        assert_eq!(window.start, DateTime::from_timestamp(0, 0));
        assert_eq!(window.end, None);

        let err = TimeWindow::from_unix(None, Some(i64::MAX)).unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
    }
}
