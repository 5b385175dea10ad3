//! Typed access to a collection

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, Result, StorageError, ID_FIELD};

/// A record type stored in its own collection
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Collection name in the document store
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Converts between `T` and the store's wire documents
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    fn to_document(record: &T) -> Result<Document> {
        match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(StorageError::InvalidInput(format!(
                "{} records must serialize to objects",
                T::COLLECTION
            ))),
        }
    }

    fn from_document(doc: Document) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(doc))?)
    }

    pub async fn insert(&self, record: &T) -> Result<()> {
        self.store
            .insert(T::COLLECTION, Self::to_document(record)?)
            .await
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(Self::from_document)
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(Self::from_document)
            .transpose()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<T>> {
        self.find_one(&Filter::new().eq(ID_FIELD, id)).await
    }

    /// Overwrite the stored record with the same id
    pub async fn replace(&self, record: &T) -> Result<()> {
        let id = record.id().to_string();
        let replaced = self
            .store
            .replace(T::COLLECTION, &id, Self::to_document(record)?)
            .await?;
        if replaced {
            Ok(())
        } else {
            Err(StorageError::NotFound(format!(
                "{} record {} not found",
                T::COLLECTION,
                id
            )))
        }
    }

    pub async fn delete(&self, filter: &Filter) -> Result<usize> {
        self.store.delete(T::COLLECTION, filter).await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        Ok(self.delete(&Filter::new().eq(ID_FIELD, id)).await? > 0)
    }

    pub async fn count(&self, filter: &Filter) -> Result<usize> {
        self.store.count(T::COLLECTION, filter).await
    }
}
