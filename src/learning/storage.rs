//! Learning material storage

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::models::*;
use crate::store::{Collection, DocumentStore, Filter, Result, StorageError};

fn not_permitted() -> StorageError {
    StorageError::NotFound("Material not found or you don't have permission".to_string())
}

#[derive(Clone)]
pub struct LearningStorage {
    materials: Collection<LearningMaterial>,
}

impl LearningStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            materials: Collection::new(store),
        }
    }

    /// Owned by, shared with, or (optionally) public to the account
    fn readable_by(user_id: Uuid, include_public: bool) -> Filter {
        let mut branches = vec![
            Filter::new().eq("user_id", user_id),
            Filter::new().contains("shared_with", user_id),
        ];
        if include_public {
            branches.push(Filter::new().eq("visibility", Visibility::Public));
        }
        Filter::new().any_of(branches)
    }

    pub async fn create(&self, user_id: Uuid, request: CreateMaterialRequest) -> Result<LearningMaterial> {
        let now = Utc::now();
        let material = LearningMaterial {
            id: Uuid::new_v4(),
            user_id,
            title: request.title,
            content: request.content,
            summary: request.summary,
            material_type: request.material_type,
            subject: request.subject,
            category: request.category,
            tags: request.tags,
            visibility: request.visibility,
            shared_with: Vec::new(),
            attachments: Vec::new(),
            references: request.references,
            view_count: 0,
            like_count: 0,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        self.materials.insert(&material).await?;
        Ok(material)
    }

    /// Readable materials, newest first
    pub async fn list(&self, user_id: Uuid, query: &MaterialQuery) -> Result<Vec<LearningMaterial>> {
        let mut filter = Self::readable_by(user_id, query.include_public)
            .eq_opt("type", query.material_type)
            .eq_opt("subject", query.subject.as_deref())
            .eq_opt("category", query.category.as_deref())
            .eq("is_archived", query.is_archived);
        if let Some(tag) = &query.tag {
            filter = filter.contains("tags", tag);
        }

        let mut materials = self.materials.find(&filter).await?;
        materials.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(materials)
    }

    /// Read a material, counting the view
    pub async fn get(&self, user_id: Uuid, material_id: Uuid) -> Result<LearningMaterial> {
        let mut material = self
            .materials
            .find_one(&Self::readable_by(user_id, true).eq("id", material_id))
            .await?
            .ok_or_else(|| StorageError::NotFound("Material not found".to_string()))?;
        material.view_count += 1;
        self.materials.replace(&material).await?;
        Ok(material)
    }

    async fn owned(&self, user_id: Uuid, material_id: Uuid) -> Result<LearningMaterial> {
        self.materials
            .find_one(&Filter::new().eq("id", material_id).eq("user_id", user_id))
            .await?
            .ok_or_else(not_permitted)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        material_id: Uuid,
        request: UpdateMaterialRequest,
    ) -> Result<LearningMaterial> {
        let mut material = self.owned(user_id, material_id).await?;
        if let Some(title) = request.title {
            material.title = title;
        }
        if let Some(content) = request.content {
            material.content = content;
        }
        if let Some(summary) = request.summary {
            material.summary = Some(summary);
        }
        if let Some(material_type) = request.material_type {
            material.material_type = material_type;
        }
        if let Some(subject) = request.subject {
            material.subject = Some(subject);
        }
        if let Some(category) = request.category {
            material.category = Some(category);
        }
        if let Some(tags) = request.tags {
            material.tags = tags;
        }
        if let Some(visibility) = request.visibility {
            material.visibility = visibility;
        }
        if let Some(references) = request.references {
            material.references = references;
        }
        material.updated_at = Utc::now();
        self.materials.replace(&material).await?;
        Ok(material)
    }

    /// Share with more accounts. Ids already present are not repeated.
    pub async fn share(
        &self,
        user_id: Uuid,
        material_id: Uuid,
        request: ShareMaterialRequest,
    ) -> Result<LearningMaterial> {
        let mut material = self.owned(user_id, material_id).await?;
        for id in request.user_ids {
            if !material.shared_with.contains(&id) {
                material.shared_with.push(id);
            }
        }
        material.visibility = Visibility::Shared;
        material.updated_at = Utc::now();
        self.materials.replace(&material).await?;
        Ok(material)
    }

    pub async fn archive(&self, user_id: Uuid, material_id: Uuid) -> Result<LearningMaterial> {
        let mut material = self.owned(user_id, material_id).await?;
        material.is_archived = true;
        material.updated_at = Utc::now();
        self.materials.replace(&material).await?;
        Ok(material)
    }

    pub async fn delete(&self, user_id: Uuid, material_id: Uuid) -> Result<()> {
        let material = self.owned(user_id, material_id).await?;
        self.materials.delete_by_id(material.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn create_test_storage() -> LearningStorage {
        LearningStorage::new(Arc::new(MemoryStore::new()))
    }

    fn note(title: &str, visibility: Visibility) -> CreateMaterialRequest {
        CreateMaterialRequest {
            title: title.to_string(),
            content: "Ownership moves values.".to_string(),
            summary: None,
            material_type: MaterialType::Note,
            subject: Some("rust".to_string()),
            category: None,
            tags: vec!["ownership".to_string()],
            visibility,
            references: vec![],
        }
    }

    #[tokio::test]
    async fn test_visibility_rules() {
        let storage = create_test_storage();
        let owner = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let private = storage.create(owner, note("private", Visibility::Private)).await.unwrap();
        storage.create(owner, note("public", Visibility::Public)).await.unwrap();

        let seen = storage.list(reader, &MaterialQuery::default()).await.unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "public");

        let no_public = MaterialQuery {
            include_public: false,
            ..MaterialQuery::default()
        };
        assert!(storage.list(reader, &no_public).await.unwrap().is_empty());

        assert!(storage.get(reader, private.id).await.is_err());
        storage
            .share(owner, private.id, ShareMaterialRequest { user_ids: vec![reader] })
            .await
            .unwrap();
        let shared = storage.get(reader, private.id).await.unwrap();
        assert_eq!(shared.visibility, Visibility::Shared);
        assert_eq!(shared.view_count, 1);
    }

    #[tokio::test]
    async fn test_share_deduplicates() {
        let storage = create_test_storage();
        let owner = Uuid::new_v4();
        let friend = Uuid::new_v4();
        let material = storage.create(owner, note("notes", Visibility::Private)).await.unwrap();

        storage
            .share(owner, material.id, ShareMaterialRequest { user_ids: vec![friend, friend] })
            .await
            .unwrap();
        let shared = storage
            .share(owner, material.id, ShareMaterialRequest { user_ids: vec![friend] })
            .await
            .unwrap();
        assert_eq!(shared.shared_with, vec![friend]);

        // Only the owner may share
        assert!(storage
            .share(friend, material.id, ShareMaterialRequest { user_ids: vec![] })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_archive_hides_from_default_list() {
        let storage = create_test_storage();
        let owner = Uuid::new_v4();
        let material = storage.create(owner, note("old", Visibility::Private)).await.unwrap();
        storage.create(owner, note("current", Visibility::Private)).await.unwrap();

        let archived = storage.archive(owner, material.id).await.unwrap();
        assert!(archived.is_archived);

        let active = storage.list(owner, &MaterialQuery::default()).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "current");

        let query = MaterialQuery {
            is_archived: true,
            ..MaterialQuery::default()
        };
        assert_eq!(storage.list(owner, &query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_require_owner() {
        let storage = create_test_storage();
        let owner = Uuid::new_v4();
        let material = storage.create(owner, note("mine", Visibility::Public)).await.unwrap();
        let other = Uuid::new_v4();

        let request = UpdateMaterialRequest {
            title: Some("stolen".to_string()),
            ..UpdateMaterialRequest::default()
        };
        assert!(matches!(
            storage.update(other, material.id, request.clone()).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(storage.delete(other, material.id).await.is_err());

        let updated = storage.update(owner, material.id, request).await.unwrap();
        assert_eq!(updated.title, "stolen");
        storage.delete(owner, material.id).await.unwrap();
        assert!(storage.get(owner, material.id).await.is_err());
    }
}
