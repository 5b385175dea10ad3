//! Diary entry storage

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::models::*;
use crate::analytics::aggregator::mood_summary;
use crate::analytics::{MoodSummary, TimeWindow};
use crate::store::{Collection, DocumentStore, Filter, Result, StorageError};

fn entry_not_found() -> StorageError {
    StorageError::NotFound("Entry not found".to_string())
}

#[derive(Clone)]
pub struct DiaryStorage {
    entries: Collection<DiaryEntry>,
}

impl DiaryStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            entries: Collection::new(store),
        }
    }

    fn owned(user_id: Uuid) -> Filter {
        Filter::new().eq("user_id", user_id)
    }

    fn on_date(user_id: Uuid, date: NaiveDate) -> Filter {
        Self::owned(user_id).eq("date", date)
    }

    /// Create the entry for a date. Each date holds at most one entry.
    pub async fn create(&self, user_id: Uuid, request: CreateDiaryEntryRequest) -> Result<DiaryEntry> {
        if self.entries.count(&Self::on_date(user_id, request.date)).await? > 0 {
            return Err(StorageError::Conflict(
                "Entry already exists for this date".to_string(),
            ));
        }

        let now = Utc::now();
        let entry = DiaryEntry {
            id: Uuid::new_v4(),
            user_id,
            date: request.date,
            title: request.title,
            content: request.content,
            mood: request.mood,
            activities: request.activities,
            accomplishments: request.accomplishments,
            challenges: request.challenges,
            gratitude: request.gratitude,
            tomorrow_goals: request.tomorrow_goals,
            tags: request.tags,
            weather: request.weather,
            location: request.location,
            photos: request.photos,
            is_private: request.is_private,
            created_at: now,
            updated_at: now,
        };
        self.entries.insert(&entry).await?;
        Ok(entry)
    }

    /// Entries of an account, newest date first
    pub async fn list(&self, user_id: Uuid, query: &DiaryQuery) -> Result<Vec<DiaryEntry>> {
        let mut filter = Self::owned(user_id).eq_opt("mood", query.mood);
        if let Some(tag) = &query.tag {
            filter = filter.contains("tags", tag);
        }
        let window = TimeWindow::from_unix(query.start_timestamp, query.end_timestamp)?;

        let mut entries: Vec<DiaryEntry> = self
            .entries
            .find(&filter)
            .await?
            .into_iter()
            .filter(|e| window.contains_date(e.date))
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    pub async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<DiaryEntry>> {
        self.entries.find(&Self::owned(user_id)).await
    }

    pub async fn get(&self, user_id: Uuid, date: NaiveDate) -> Result<DiaryEntry> {
        self.entries
            .find_one(&Self::on_date(user_id, date))
            .await?
            .ok_or_else(entry_not_found)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        request: UpdateDiaryEntryRequest,
    ) -> Result<DiaryEntry> {
        let mut entry = self.get(user_id, date).await?;
        if let Some(title) = request.title {
            entry.title = Some(title);
        }
        if let Some(content) = request.content {
            entry.content = content;
        }
        if let Some(mood) = request.mood {
            entry.mood = Some(mood);
        }
        if let Some(activities) = request.activities {
            entry.activities = activities;
        }
        if let Some(accomplishments) = request.accomplishments {
            entry.accomplishments = accomplishments;
        }
        if let Some(challenges) = request.challenges {
            entry.challenges = challenges;
        }
        if let Some(gratitude) = request.gratitude {
            entry.gratitude = gratitude;
        }
        if let Some(goals) = request.tomorrow_goals {
            entry.tomorrow_goals = goals;
        }
        if let Some(tags) = request.tags {
            entry.tags = tags;
        }
        if let Some(weather) = request.weather {
            entry.weather = Some(weather);
        }
        if let Some(location) = request.location {
            entry.location = Some(location);
        }
        if let Some(photos) = request.photos {
            entry.photos = photos;
        }
        if let Some(is_private) = request.is_private {
            entry.is_private = is_private;
        }
        entry.updated_at = Utc::now();
        self.entries.replace(&entry).await?;
        Ok(entry)
    }

    pub async fn delete(&self, user_id: Uuid, date: NaiveDate) -> Result<()> {
        if self.entries.delete(&Self::on_date(user_id, date)).await? == 0 {
            return Err(entry_not_found());
        }
        Ok(())
    }

    pub async fn mood_summary(&self, user_id: Uuid, window: &TimeWindow) -> Result<MoodSummary> {
        let entries = self.all_for_user(user_id).await?;
        Ok(mood_summary(&entries, window))
    }

    pub async fn count_all(&self) -> Result<usize> {
        self.entries.count(&Filter::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn create_test_storage() -> DiaryStorage {
        DiaryStorage::new(Arc::new(MemoryStore::new()))
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn request(day: u32, mood: Option<MoodLevel>, tags: &[&str]) -> CreateDiaryEntryRequest {
        serde_json::from_value(serde_json::json!({
            "date": date(day),
            "content": format!("Day {}", day),
            "mood": mood,
            "tags": tags,
        }))
        .unwrap()
    }

    #[test]
    fn test_mood_aliases() {
        let parse = |s: &str| serde_json::from_value::<MoodLevel>(serde_json::json!(s)).unwrap();
        assert_eq!(parse("amazing"), MoodLevel::Excellent);
        assert_eq!(parse("happy"), MoodLevel::Good);
        assert_eq!(parse("neutral"), MoodLevel::Neutral);
        assert_eq!(parse("sad"), MoodLevel::Bad);
        assert_eq!(parse("angry"), MoodLevel::VeryBad);
        assert_eq!(parse("very_bad"), MoodLevel::VeryBad);
        assert_eq!(
            serde_json::to_value(MoodLevel::VeryBad).unwrap(),
            serde_json::json!("very_bad")
        );
    }

    #[test]
    fn test_gratitude_list_alias_and_private_default() {
        let req: CreateDiaryEntryRequest = serde_json::from_value(serde_json::json!({
            "date": "2024-06-01",
            "content": "ok",
            "gratitude_list": ["coffee"],
        }))
        .unwrap();
        assert_eq!(req.gratitude, vec!["coffee".to_string()]);
        assert!(req.is_private);
    }

    #[tokio::test]
    async fn test_one_entry_per_date() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        storage.create(user, request(1, None, &[])).await.unwrap();

        let err = storage.create(user, request(1, None, &[])).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        // Another account may use the same date
        storage
            .create(Uuid::new_v4(), request(1, None, &[]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        storage
            .create(user, request(1, Some(MoodLevel::Good), &["work"]))
            .await
            .unwrap();
        storage
            .create(user, request(3, Some(MoodLevel::Bad), &["home"]))
            .await
            .unwrap();
        storage
            .create(user, request(2, Some(MoodLevel::Good), &["work", "gym"]))
            .await
            .unwrap();

        let all = storage.list(user, &DiaryQuery::default()).await.unwrap();
        let dates: Vec<NaiveDate> = all.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(3), date(2), date(1)]);

        let work = storage
            .list(
                user,
                &DiaryQuery {
                    tag: Some("work".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(work.len(), 2);

        let good = storage
            .list(
                user,
                &DiaryQuery {
                    mood: Some(MoodLevel::Good),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(good.len(), 2);

        // 2024-06-02T12:00:00Z onwards
        let recent = storage
            .list(
                user,
                &DiaryQuery {
                    start_timestamp: Some(1_717_329_600),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn test_update_delete_and_summary() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        storage
            .create(user, request(1, Some(MoodLevel::Good), &[]))
            .await
            .unwrap();
        storage
            .create(user, request(2, Some(MoodLevel::Good), &[]))
            .await
            .unwrap();
        storage.create(user, request(3, None, &[])).await.unwrap();

        let updated = storage
            .update(
                user,
                date(3),
                UpdateDiaryEntryRequest {
                    mood: Some(MoodLevel::Bad),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.mood, Some(MoodLevel::Bad));

        let summary = storage
            .mood_summary(user, &TimeWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(summary.get(MoodLevel::Good), Some(2));
        assert_eq!(summary.get(MoodLevel::Bad), Some(1));
        assert_eq!(summary.get(MoodLevel::Neutral), None);

        storage.delete(user, date(1)).await.unwrap();
        assert!(matches!(
            storage.get(user, date(1)).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_rejects_unrepresentable_timestamp() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        storage.create(user, request(1, None, &[])).await.unwrap();

        let query = DiaryQuery {
            end_timestamp: Some(i64::MAX),
            ..DiaryQuery::default()
        };
        assert!(matches!(
            storage.list(user, &query).await,
            Err(StorageError::InvalidInput(_))
        ));
    }
}
