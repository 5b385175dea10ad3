//! Improvement log storage

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::models::*;
use crate::store::{Collection, DocumentStore, Filter, Result, StorageError};

fn log_not_found() -> StorageError {
    StorageError::NotFound("Log not found".to_string())
}

fn check_impact_level(level: u8) -> Result<()> {
    if (MIN_IMPACT_LEVEL..=MAX_IMPACT_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(StorageError::InvalidInput(format!(
            "impact_level must be between {} and {}",
            MIN_IMPACT_LEVEL, MAX_IMPACT_LEVEL
        )))
    }
}

#[derive(Clone)]
pub struct ImprovementStorage {
    logs: Collection<ImprovementLog>,
}

impl ImprovementStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            logs: Collection::new(store),
        }
    }

    fn owned(user_id: Uuid) -> Filter {
        Filter::new().eq("user_id", user_id)
    }

    pub async fn create(&self, user_id: Uuid, request: CreateLogRequest) -> Result<ImprovementLog> {
        check_impact_level(request.impact_level)?;

        let now = Utc::now();
        let log = ImprovementLog {
            id: Uuid::new_v4(),
            user_id,
            log_type: request.log_type,
            title: request.title,
            description: request.description,
            category: request.category,
            tags: request.tags,
            impact_level: request.impact_level,
            frequency: request.frequency,
            trigger: request.trigger,
            solution: request.solution,
            progress_notes: Vec::new(),
            is_resolved: false,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        };
        self.logs.insert(&log).await?;
        Ok(log)
    }

    /// Logs of an account, newest first
    pub async fn list(&self, user_id: Uuid, query: &LogQuery) -> Result<Vec<ImprovementLog>> {
        let filter = Self::owned(user_id)
            .eq_opt("type", query.log_type)
            .eq_opt("category", query.category.as_deref())
            .eq_opt("is_resolved", query.is_resolved);
        let mut logs = self.logs.find(&filter).await?;
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    pub async fn get(&self, user_id: Uuid, log_id: Uuid) -> Result<ImprovementLog> {
        self.logs
            .find_one(&Self::owned(user_id).eq("id", log_id))
            .await?
            .ok_or_else(log_not_found)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        request: UpdateLogRequest,
    ) -> Result<ImprovementLog> {
        let mut log = self.get(user_id, log_id).await?;
        let now = Utc::now();

        if let Some(level) = request.impact_level {
            check_impact_level(level)?;
            log.impact_level = level;
        }
        if let Some(title) = request.title {
            log.title = title;
        }
        if let Some(description) = request.description {
            log.description = description;
        }
        if let Some(category) = request.category {
            log.category = Some(category);
        }
        if let Some(tags) = request.tags {
            log.tags = tags;
        }
        if let Some(frequency) = request.frequency {
            log.frequency = Some(frequency);
        }
        if let Some(trigger) = request.trigger {
            log.trigger = Some(trigger);
        }
        if let Some(solution) = request.solution {
            log.solution = Some(solution);
        }
        match request.is_resolved {
            Some(true) => {
                log.is_resolved = true;
                log.resolved_at = Some(now);
            }
            Some(false) => {
                log.is_resolved = false;
                log.resolved_at = None;
            }
            None => {}
        }
        log.updated_at = now;
        self.logs.replace(&log).await?;
        Ok(log)
    }

    pub async fn add_progress(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        request: AddProgressRequest,
    ) -> Result<ImprovementLog> {
        if request.progress_percentage.map_or(false, |p| p > 100) {
            return Err(StorageError::InvalidInput(
                "progress_percentage must be between 0 and 100".to_string(),
            ));
        }

        let mut log = self.get(user_id, log_id).await?;
        let now = Utc::now();
        log.progress_notes.push(ProgressNote {
            note: request.note,
            progress_percentage: request.progress_percentage,
            created_at: now,
        });
        log.updated_at = now;
        self.logs.replace(&log).await?;
        Ok(log)
    }

    pub async fn delete(&self, user_id: Uuid, log_id: Uuid) -> Result<()> {
        let log = self.get(user_id, log_id).await?;
        self.logs.delete_by_id(log.id).await?;
        Ok(())
    }

    pub async fn count_all(&self) -> Result<usize> {
        self.logs.count(&Filter::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn create_test_storage() -> ImprovementStorage {
        ImprovementStorage::new(Arc::new(MemoryStore::new()))
    }

    fn distraction(title: &str) -> CreateLogRequest {
        CreateLogRequest {
            log_type: LogType::Distraction,
            title: title.to_string(),
            description: "Checking the phone during focus time".to_string(),
            category: Some("focus".to_string()),
            tags: vec![],
            impact_level: 3,
            frequency: Some("daily".to_string()),
            trigger: None,
            solution: None,
        }
    }

    #[tokio::test]
    async fn test_create_validates_impact_level() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();

        let mut request = distraction("phone");
        request.impact_level = 6;
        assert!(matches!(
            storage.create(user, request).await,
            Err(StorageError::InvalidInput(_))
        ));

        let log = storage.create(user, distraction("phone")).await.unwrap();
        assert_eq!(log.impact_level, 3);
        assert!(!log.is_resolved);
        assert!(log.progress_notes.is_empty());
    }

    #[tokio::test]
    async fn test_resolving_sets_timestamp() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let log = storage.create(user, distraction("phone")).await.unwrap();

        let resolve = UpdateLogRequest {
            is_resolved: Some(true),
            ..UpdateLogRequest::default()
        };
        let resolved = storage.update(user, log.id, resolve).await.unwrap();
        assert!(resolved.is_resolved);
        assert!(resolved.resolved_at.is_some());

        let reopen = UpdateLogRequest {
            is_resolved: Some(false),
            ..UpdateLogRequest::default()
        };
        let reopened = storage.update(user, log.id, reopen).await.unwrap();
        assert!(!reopened.is_resolved);
        assert!(reopened.resolved_at.is_none());
    }

    #[tokio::test]
    async fn test_progress_notes_append() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let log = storage.create(user, distraction("phone")).await.unwrap();

        for (note, pct) in [("started", Some(10)), ("better", Some(60))] {
            storage
                .add_progress(
                    user,
                    log.id,
                    AddProgressRequest {
                        note: note.to_string(),
                        progress_percentage: pct,
                    },
                )
                .await
                .unwrap();
        }
        let stored = storage.get(user, log.id).await.unwrap();
        assert_eq!(stored.progress_notes.len(), 2);
        assert_eq!(stored.progress_notes[1].note, "better");

        let too_much = AddProgressRequest {
            note: "overachiever".to_string(),
            progress_percentage: Some(150),
        };
        assert!(storage.add_progress(user, log.id, too_much).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_and_ownership() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        storage.create(user, distraction("phone")).await.unwrap();
        let mut improvement = distraction("sleep earlier");
        improvement.log_type = LogType::Improvement;
        storage.create(user, improvement).await.unwrap();
        storage.create(Uuid::new_v4(), distraction("not mine")).await.unwrap();

        assert_eq!(storage.list(user, &LogQuery::default()).await.unwrap().len(), 2);
        let query = LogQuery {
            log_type: Some(LogType::Improvement),
            ..LogQuery::default()
        };
        let improvements = storage.list(user, &query).await.unwrap();
        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].title, "sleep earlier");
        assert_eq!(storage.count_all().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_other_accounts_get_not_found() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let log = storage.create(user, distraction("phone")).await.unwrap();

        let other = Uuid::new_v4();
        assert!(matches!(storage.get(other, log.id).await, Err(StorageError::NotFound(_))));
        assert!(storage.delete(other, log.id).await.is_err());
        storage.delete(user, log.id).await.unwrap();
        assert!(storage.get(user, log.id).await.is_err());
    }
}
