//! Read-only analytics over an account's records
//!
//! This module provides:
//! - Time spent per skill and per project
//! - A productivity overview
//! - Mood summaries over diary entries
//! - Popularity ranking for shared content

pub mod aggregator;
mod models;

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

pub use aggregator::{rank_by_popularity, Popular};
pub use models::*;

use crate::calendar::CalendarStorage;
use crate::diary::DiaryStorage;
use crate::projects::{ProjectStorage, SkillStorage};
use crate::store::{DocumentStore, Result};

/// Loads an account's records and runs the aggregations over them
#[derive(Clone)]
pub struct Analytics {
    events: CalendarStorage,
    skills: SkillStorage,
    projects: ProjectStorage,
    diary: DiaryStorage,
}

impl Analytics {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            events: CalendarStorage::new(Arc::clone(&store)),
            skills: SkillStorage::new(Arc::clone(&store)),
            projects: ProjectStorage::new(Arc::clone(&store)),
            diary: DiaryStorage::new(store),
        }
    }

    pub async fn aggregate(
        &self,
        user_id: Uuid,
        window: &TimeWindow,
        kind: AggregationKind,
    ) -> Result<Aggregation> {
        let aggregation = match kind {
            AggregationKind::TimeBySkill => {
                let names: HashMap<Uuid, String> = self
                    .skills
                    .all_for_user(user_id)
                    .await?
                    .into_iter()
                    .map(|s| (s.id, s.name))
                    .collect();
                let events = self.events.all_for_user(user_id).await?;
                let groups = aggregator::time_by_group(&events, &names, window, |e| e.skill_id);
                Aggregation::TimeBySkill(groups.into_iter().map(SkillTime::from).collect())
            }
            AggregationKind::TimeByProject => {
                let names: HashMap<Uuid, String> = self
                    .projects
                    .all_for_user(user_id)
                    .await?
                    .into_iter()
                    .map(|p| (p.id, p.name))
                    .collect();
                let events = self.events.all_for_user(user_id).await?;
                let groups = aggregator::time_by_group(&events, &names, window, |e| e.project_id);
                Aggregation::TimeByProject(groups.into_iter().map(ProjectTime::from).collect())
            }
            AggregationKind::ProductivityOverview => {
                let events = self.events.all_for_user(user_id).await?;
                Aggregation::ProductivityOverview(aggregator::productivity_overview(&events, window))
            }
            AggregationKind::MoodSummary => {
                let entries = self.diary.all_for_user(user_id).await?;
                Aggregation::MoodSummary(aggregator::mood_summary(&entries, window))
            }
        };
        Ok(aggregation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CompleteEventRequest, CreateEventRequest, Priority};
    use crate::projects::CreateSkillRequest;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test]
    async fn test_aggregate_time_by_skill_scoped_to_account() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let analytics = Analytics::new(Arc::clone(&store));
        let skills = SkillStorage::new(Arc::clone(&store));
        let calendar = CalendarStorage::new(store);

        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let skill = skills
            .create(
                user,
                CreateSkillRequest {
                    name: "Piano".to_string(),
                    description: None,
                    category: None,
                    target_level: None,
                    current_level: None,
                    color: None,
                    icon: None,
                },
            )
            .await
            .unwrap();

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        for owner in [user, other] {
            let event = calendar
                .create(
                    owner,
                    CreateEventRequest {
                        title: "practice".to_string(),
                        description: None,
                        start_time: start,
                        end_time: start + Duration::minutes(45),
                        priority: Priority::Low,
                        category: None,
                        project_id: None,
                        skill_id: Some(skill.id),
                        tags: vec![],
                        location: None,
                        is_recurring: false,
                        recurrence_rule: None,
                        reminders: vec![],
                    },
                )
                .await
                .unwrap();
            calendar
                .complete(owner, event.id, CompleteEventRequest::default())
                .await
                .unwrap();
        }

        let result = analytics
            .aggregate(user, &TimeWindow::unbounded(), AggregationKind::TimeBySkill)
            .await
            .unwrap();
        let rows = match result {
            Aggregation::TimeBySkill(rows) => rows,
            other => panic!("unexpected aggregation {:?}", other),
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].skill_name, "Piano");
        assert_eq!(rows[0].total_hours, 0.75);
        assert_eq!(rows[0].task_count, 1);

        let other_rows = analytics
            .aggregate(other, &TimeWindow::unbounded(), AggregationKind::TimeBySkill)
            .await
            .unwrap();
        assert_eq!(other_rows, Aggregation::TimeBySkill(vec![]));
    }

    #[tokio::test]
    async fn test_aggregate_empty_account() {
        let analytics = Analytics::new(Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();

        let overview = analytics
            .aggregate(user, &TimeWindow::unbounded(), AggregationKind::ProductivityOverview)
            .await
            .unwrap();
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["total_tasks"], 0);
        assert_eq!(json["completion_rate"], 0.0);
        assert!(json["most_productive_day"].is_null());

        let moods = analytics
            .aggregate(user, &TimeWindow::unbounded(), AggregationKind::MoodSummary)
            .await
            .unwrap();
        assert_eq!(serde_json::to_value(&moods).unwrap(), serde_json::json!({}));
    }
}
