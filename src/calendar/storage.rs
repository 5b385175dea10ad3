//! Calendar event storage

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::*;
use crate::store::{Collection, DocumentStore, Filter, Result, StorageError};

fn event_not_found() -> StorageError {
    StorageError::NotFound("Event not found".to_string())
}

fn check_times(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(StorageError::InvalidInput(
            "end_time must not be before start_time".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CalendarStorage {
    events: Collection<CalendarEvent>,
}

impl CalendarStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            events: Collection::new(store),
        }
    }

    fn owned(user_id: Uuid) -> Filter {
        Filter::new().eq("user_id", user_id)
    }

    /// Create a pending event
    pub async fn create(&self, user_id: Uuid, request: CreateEventRequest) -> Result<CalendarEvent> {
        check_times(request.start_time, request.end_time)?;

        let mut event = CalendarEvent::new(
            user_id,
            request.title,
            request.start_time,
            request.end_time,
        );
        event.description = request.description;
        event.priority = request.priority;
        event.category = request.category;
        event.project_id = request.project_id;
        event.skill_id = request.skill_id;
        event.tags = request.tags;
        event.location = request.location;
        event.is_recurring = request.is_recurring;
        event.recurrence_rule = request.recurrence_rule;
        event.reminders = request.reminders;

        self.events.insert(&event).await?;
        Ok(event)
    }

    /// Events of an account, earliest start first
    pub async fn list(&self, user_id: Uuid, query: &EventQuery) -> Result<Vec<CalendarEvent>> {
        let filter = Self::owned(user_id)
            .eq_opt("status", query.status)
            .eq_opt("category", query.category.as_deref());

        let mut events: Vec<CalendarEvent> = self
            .events
            .find(&filter)
            .await?
            .into_iter()
            .filter(|e| query.start_date.map_or(true, |start| e.start_time >= start))
            .filter(|e| query.end_date.map_or(true, |end| e.start_time <= end))
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    /// Every event of an account, unsorted
    pub async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<CalendarEvent>> {
        self.events.find(&Self::owned(user_id)).await
    }

    /// Events of an account referencing a skill
    pub async fn for_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<Vec<CalendarEvent>> {
        self.events
            .find(&Self::owned(user_id).eq("skill_id", skill_id))
            .await
    }

    /// Events of an account referencing a project
    pub async fn for_project(&self, user_id: Uuid, project_id: Uuid) -> Result<Vec<CalendarEvent>> {
        self.events
            .find(&Self::owned(user_id).eq("project_id", project_id))
            .await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<CalendarEvent> {
        self.events
            .find_one(&Self::owned(user_id).eq("id", id))
            .await?
            .ok_or_else(event_not_found)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<CalendarEvent> {
        let mut event = self.get(user_id, id).await?;

        if let Some(title) = request.title {
            event.title = title;
        }
        if let Some(description) = request.description {
            event.description = Some(description);
        }
        if let Some(start_time) = request.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            event.end_time = end_time;
        }
        if let Some(priority) = request.priority {
            event.priority = priority;
        }
        if let Some(status) = request.status {
            event.status = status;
        }
        if let Some(category) = request.category {
            event.category = Some(category);
        }
        if let Some(project_id) = request.project_id {
            event.project_id = project_id;
        }
        if let Some(skill_id) = request.skill_id {
            event.skill_id = skill_id;
        }
        if let Some(tags) = request.tags {
            event.tags = tags;
        }
        if let Some(location) = request.location {
            event.location = Some(location);
        }
        if let Some(is_recurring) = request.is_recurring {
            event.is_recurring = is_recurring;
        }
        if let Some(rule) = request.recurrence_rule {
            event.recurrence_rule = Some(rule);
        }
        if let Some(reminders) = request.reminders {
            event.reminders = reminders;
        }
        check_times(event.start_time, event.end_time)?;

        event.updated_at = Utc::now();
        self.events.replace(&event).await?;
        Ok(event)
    }

    /// Mark an event completed, or reopen it when `completed` is false
    pub async fn complete(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: CompleteEventRequest,
    ) -> Result<CalendarEvent> {
        let mut event = self.get(user_id, id).await?;
        let now = Utc::now();
        if request.completed {
            event.status = EventStatus::Completed;
            event.completed_at = Some(now);
        } else {
            event.status = EventStatus::Pending;
            event.completed_at = None;
        }
        event.updated_at = now;
        self.events.replace(&event).await?;
        Ok(event)
    }

    pub async fn skip(&self, user_id: Uuid, id: Uuid, request: SkipEventRequest) -> Result<CalendarEvent> {
        let mut event = self.get(user_id, id).await?;
        let now = Utc::now();
        event.status = EventStatus::Skipped;
        event.skipped_at = Some(now);
        event.skip_reason = request.reason;
        event.updated_at = now;
        self.events.replace(&event).await?;
        Ok(event)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let removed = self.events.delete(&Self::owned(user_id).eq("id", id)).await?;
        if removed == 0 {
            return Err(event_not_found());
        }
        Ok(())
    }

    pub async fn count_all(&self) -> Result<usize> {
        self.events.count(&Filter::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn create_test_storage() -> CalendarStorage {
        CalendarStorage::new(Arc::new(MemoryStore::new()))
    }

    fn request(title: &str, day: u32, hours: i64) -> CreateEventRequest {
        let start = Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap();
        CreateEventRequest {
            title: title.to_string(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(hours),
            priority: Priority::High,
            category: Some("work".to_string()),
            project_id: None,
            skill_id: None,
            tags: vec![],
            location: None,
            is_recurring: false,
            recurrence_rule: None,
            reminders: vec![15],
        }
    }

    #[tokio::test]
    async fn test_create_forces_pending() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let event = storage.create(user, request("Standup", 15, 1)).await.unwrap();

        assert_eq!(event.status, EventStatus::Pending);
        assert_eq!(event.priority, Priority::High);
        assert_eq!(event.reminders, vec![15]);
        assert!((event.duration_hours() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let storage = create_test_storage();
        let mut req = request("Backwards", 15, 1);
        std::mem::swap(&mut req.start_time, &mut req.end_time);
        let err = storage.create(Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_list_sorted_and_filtered() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        storage.create(user, request("Later", 20, 1)).await.unwrap();
        storage.create(user, request("Earlier", 10, 1)).await.unwrap();
        storage
            .create(Uuid::new_v4(), request("Someone else", 12, 1))
            .await
            .unwrap();

        let all = storage.list(user, &EventQuery::default()).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Earlier", "Later"]);

        let window = EventQuery {
            start_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let later = storage.list(user, &window).await.unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].title, "Later");

        let pending = EventQuery {
            status: Some(EventStatus::Completed),
            ..Default::default()
        };
        assert!(storage.list(user, &pending).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_and_skip() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let event = storage.create(user, request("Read", 15, 2)).await.unwrap();

        let done = storage
            .complete(user, event.id, CompleteEventRequest::default())
            .await
            .unwrap();
        assert_eq!(done.status, EventStatus::Completed);
        assert!(done.completed_at.is_some());

        let skipped = storage
            .skip(
                user,
                event.id,
                SkipEventRequest {
                    reason: Some("sick".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(skipped.status, EventStatus::Skipped);
        assert_eq!(skipped.skip_reason.as_deref(), Some("sick"));
    }

    #[tokio::test]
    async fn test_other_accounts_cannot_touch_event() {
        let storage = create_test_storage();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let event = storage.create(owner, request("Private", 15, 1)).await.unwrap();

        assert!(matches!(
            storage.get(intruder, event.id).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(storage.delete(intruder, event.id).await.is_err());
        storage.delete(owner, event.id).await.unwrap();
        assert!(storage.get(owner, event.id).await.is_err());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let event = storage.create(user, request("Draft", 15, 1)).await.unwrap();

        let updated = storage
            .update(
                user,
                event.id,
                UpdateEventRequest {
                    title: Some("Final".to_string()),
                    status: Some(EventStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.status, EventStatus::InProgress);
        assert_eq!(updated.category.as_deref(), Some("work"));
    }

    #[tokio::test]
    async fn test_update_clears_references() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let skill = Uuid::new_v4();
        let mut linked = request("Practice", 15, 1);
        linked.skill_id = Some(skill);
        linked.project_id = Some(Uuid::new_v4());
        let event = storage.create(user, linked).await.unwrap();

        let untouched = storage
            .update(user, event.id, UpdateEventRequest::default())
            .await
            .unwrap();
        assert_eq!(untouched.skill_id, Some(skill));

        let cleared = storage
            .update(
                user,
                event.id,
                UpdateEventRequest {
                    skill_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.skill_id, None);
        assert!(cleared.project_id.is_some());
    }

    #[test]
    fn test_reference_fields_from_json() {
        let create: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Read",
            "start_time": "2024-01-15T09:00:00",
            "end_time": "2024-01-15T10:00:00",
            "skill_id": "",
            "project_id": null,
        }))
        .unwrap();
        assert_eq!(create.skill_id, None);
        assert_eq!(create.project_id, None);

        let absent: UpdateEventRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(absent.skill_id, None);

        let nulled: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "skill_id": null, "project_id": "" })).unwrap();
        assert_eq!(nulled.skill_id, Some(None));
        assert_eq!(nulled.project_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "skill_id": id.to_string() })).unwrap();
        assert_eq!(set.skill_id, Some(Some(id)));

        assert!(serde_json::from_value::<UpdateEventRequest>(serde_json::json!({ "skill_id": "nope" })).is_err());
    }
}
