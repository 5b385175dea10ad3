//! Project and skill storage

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::models::*;
use crate::analytics::aggregator::{project_stats, skill_stats};
use crate::calendar::CalendarStorage;
use crate::store::{Collection, DocumentStore, Filter, Result, StorageError};

fn owned(user_id: Uuid) -> Filter {
    Filter::new().eq("user_id", user_id)
}

#[derive(Clone)]
pub struct ProjectStorage {
    projects: Collection<Project>,
    events: CalendarStorage,
}

impl ProjectStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            projects: Collection::new(Arc::clone(&store)),
            events: CalendarStorage::new(store),
        }
    }

    pub async fn create(&self, user_id: Uuid, request: CreateProjectRequest) -> Result<Project> {
        let mut project = Project::new(user_id, request.name);
        project.description = request.description;
        project.status = request.status;
        project.color = request.color;
        project.target_hours = request.target_hours;
        project.start_date = request.start_date;
        project.end_date = request.end_date;
        self.projects.insert(&project).await?;
        Ok(project)
    }

    /// Projects of an account, newest first
    pub async fn list(&self, user_id: Uuid, query: &ProjectQuery) -> Result<Vec<Project>> {
        let filter = owned(user_id).eq_opt("status", query.status);
        let mut projects = self.projects.find(&filter).await?;
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Project> {
        self.projects
            .find_one(&owned(user_id).eq("id", id))
            .await?
            .ok_or_else(|| StorageError::NotFound("Project not found".to_string()))
    }

    pub async fn get_with_stats(&self, user_id: Uuid, id: Uuid) -> Result<ProjectWithStats> {
        let project = self.get(user_id, id).await?;
        let events = self.events.for_project(user_id, id).await?;
        Ok(ProjectWithStats {
            stats: project_stats(&events, id),
            project,
        })
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateProjectRequest,
    ) -> Result<Project> {
        let mut project = self.get(user_id, id).await?;
        if let Some(name) = request.name {
            project.name = name;
        }
        if let Some(description) = request.description {
            project.description = Some(description);
        }
        if let Some(status) = request.status {
            project.status = status;
        }
        if let Some(color) = request.color {
            project.color = Some(color);
        }
        if let Some(target_hours) = request.target_hours {
            project.target_hours = Some(target_hours);
        }
        if let Some(start_date) = request.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = request.end_date {
            project.end_date = Some(end_date);
        }
        project.updated_at = Utc::now();
        self.projects.replace(&project).await?;
        Ok(project)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.projects.delete(&owned(user_id).eq("id", id)).await? == 0 {
            return Err(StorageError::NotFound("Project not found".to_string()));
        }
        Ok(())
    }

    pub async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<Project>> {
        self.projects.find(&owned(user_id)).await
    }
}

#[derive(Clone)]
pub struct SkillStorage {
    skills: Collection<Skill>,
    events: CalendarStorage,
}

impl SkillStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            skills: Collection::new(Arc::clone(&store)),
            events: CalendarStorage::new(store),
        }
    }

    pub async fn create(&self, user_id: Uuid, request: CreateSkillRequest) -> Result<Skill> {
        let mut skill = Skill::new(user_id, request.name);
        skill.description = request.description;
        skill.category = request.category;
        skill.target_level = request.target_level;
        skill.current_level = request.current_level;
        skill.color = request.color;
        skill.icon = request.icon;
        self.skills.insert(&skill).await?;
        Ok(skill)
    }

    /// Skills of an account, by name
    pub async fn list(&self, user_id: Uuid, query: &SkillQuery) -> Result<Vec<Skill>> {
        let filter = owned(user_id).eq_opt("category", query.category.as_deref());
        let mut skills = self.skills.find(&filter).await?;
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    /// Distinct non-empty categories, sorted
    pub async fn categories(&self, user_id: Uuid) -> Result<Vec<String>> {
        let categories: BTreeSet<String> = self
            .skills
            .find(&owned(user_id))
            .await?
            .into_iter()
            .filter_map(|s| s.category)
            .filter(|c| !c.trim().is_empty())
            .collect();
        Ok(categories.into_iter().collect())
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Skill> {
        self.skills
            .find_one(&owned(user_id).eq("id", id))
            .await?
            .ok_or_else(|| StorageError::NotFound("Skill not found".to_string()))
    }

    pub async fn get_with_stats(&self, user_id: Uuid, id: Uuid) -> Result<SkillWithStats> {
        let skill = self.get(user_id, id).await?;
        let events = self.events.for_skill(user_id, id).await?;
        Ok(SkillWithStats {
            stats: skill_stats(&events, id),
            skill,
        })
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, request: UpdateSkillRequest) -> Result<Skill> {
        let mut skill = self.get(user_id, id).await?;
        if let Some(name) = request.name {
            skill.name = name;
        }
        if let Some(description) = request.description {
            skill.description = Some(description);
        }
        if let Some(category) = request.category {
            skill.category = Some(category);
        }
        if let Some(target_level) = request.target_level {
            skill.target_level = Some(target_level);
        }
        if let Some(current_level) = request.current_level {
            skill.current_level = Some(current_level);
        }
        if let Some(color) = request.color {
            skill.color = Some(color);
        }
        if let Some(icon) = request.icon {
            skill.icon = Some(icon);
        }
        skill.updated_at = Utc::now();
        self.skills.replace(&skill).await?;
        Ok(skill)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.skills.delete(&owned(user_id).eq("id", id)).await? == 0 {
            return Err(StorageError::NotFound("Skill not found".to_string()));
        }
        Ok(())
    }

    pub async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<Skill>> {
        self.skills.find(&owned(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CompleteEventRequest, CreateEventRequest, Priority};
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn skill_request(name: &str, category: Option<&str>) -> CreateSkillRequest {
        CreateSkillRequest {
            name: name.to_string(),
            description: None,
            category: category.map(str::to_string),
            target_level: None,
            current_level: None,
            color: None,
            icon: None,
        }
    }

    fn event_request(skill_id: Option<Uuid>, project_id: Option<Uuid>, hours: i64) -> CreateEventRequest {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        CreateEventRequest {
            title: "practice".to_string(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(hours),
            priority: Priority::Medium,
            category: None,
            project_id,
            skill_id,
            tags: vec![],
            location: None,
            is_recurring: false,
            recurrence_rule: None,
            reminders: vec![],
        }
    }

    #[tokio::test]
    async fn test_skill_listing_and_categories() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let skills = SkillStorage::new(store);
        let user = Uuid::new_v4();

        skills.create(user, skill_request("Rust", Some("Programming"))).await.unwrap();
        skills.create(user, skill_request("German", Some("Language"))).await.unwrap();
        skills.create(user, skill_request("Chess", None)).await.unwrap();
        skills.create(user, skill_request("Go", Some("Programming"))).await.unwrap();

        let all = skills.list(user, &SkillQuery::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Chess", "German", "Go", "Rust"]);

        let programming = skills
            .list(
                user,
                &SkillQuery {
                    category: Some("Programming".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(programming.len(), 2);

        assert_eq!(
            skills.categories(user).await.unwrap(),
            vec!["Language".to_string(), "Programming".to_string()]
        );
    }

    #[tokio::test]
    async fn test_skill_stats_from_events() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let skills = SkillStorage::new(Arc::clone(&store));
        let calendar = CalendarStorage::new(store);
        let user = Uuid::new_v4();

        let skill = skills.create(user, skill_request("Rust", None)).await.unwrap();
        let event = calendar
            .create(user, event_request(Some(skill.id), None, 2))
            .await
            .unwrap();
        calendar
            .create(user, event_request(Some(skill.id), None, 5))
            .await
            .unwrap();
        calendar
            .complete(user, event.id, CompleteEventRequest::default())
            .await
            .unwrap();

        let with_stats = skills.get_with_stats(user, skill.id).await.unwrap();
        assert_eq!(with_stats.stats.total_hours, 2.0);
        assert_eq!(with_stats.stats.tasks_completed, 1);
        assert_eq!(with_stats.stats.last_practiced, Some(event.end_time));

        let json = serde_json::to_value(&with_stats).unwrap();
        assert_eq!(json["name"], "Rust");
        assert_eq!(json["total_hours"], 2.0);
    }

    #[tokio::test]
    async fn test_project_lifecycle() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let projects = ProjectStorage::new(store);
        let user = Uuid::new_v4();

        let project = projects
            .create(
                user,
                CreateProjectRequest {
                    name: "Tracker".to_string(),
                    description: None,
                    status: ProjectStatus::Active,
                    color: Some("#ff0000".to_string()),
                    target_hours: Some(40.0),
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap();

        let updated = projects
            .update(
                user,
                project.id,
                UpdateProjectRequest {
                    status: Some(ProjectStatus::OnHold),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::OnHold);

        let on_hold = projects
            .list(
                user,
                &ProjectQuery {
                    status: Some(ProjectStatus::OnHold),
                },
            )
            .await
            .unwrap();
        assert_eq!(on_hold.len(), 1);

        let stats = projects.get_with_stats(user, project.id).await.unwrap();
        assert_eq!(stats.stats.total_tasks, 0);

        assert!(projects.get(Uuid::new_v4(), project.id).await.is_err());
        projects.delete(user, project.id).await.unwrap();
        assert!(projects.delete(user, project.id).await.is_err());
    }
}
