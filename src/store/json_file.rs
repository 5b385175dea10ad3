//! File-backed document store
//!
//! Directory structure:
//! ```text
//! {root}/
//! ├── calendar_events.json   # Array of every event document
//! ├── flashcards.json
//! └── ...
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::{document_id, Document, DocumentStore, Filter, Result, StorageError};

/// One pretty-printed JSON array per collection. All file access goes
/// through a single lock so each call is a complete read-modify-write.
pub struct JsonFileStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        log::info!("Document store opened at {:?}", root);
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidInput(format!(
                "Invalid collection name: {}",
                collection
            )));
        }
        Ok(self.root.join(format!("{}.json", collection)))
    }

    async fn load(&self, path: &Path) -> Result<Vec<Document>> {
        if !fs::try_exists(path).await? {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, path: &Path, docs: &[Document]) -> Result<()> {
        let content = serde_json::to_string_pretty(docs)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn insert(&self, collection: &str, doc: Document) -> Result<()> {
        let path = self.collection_path(collection)?;
        let _guard = self.lock.lock().await;
        let mut docs = self.load(&path).await?;
        docs.push(doc);
        self.save(&path, &docs).await
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let path = self.collection_path(collection)?;
        let _guard = self.lock.lock().await;
        let docs = self.load(&path).await?;
        Ok(docs.into_iter().filter(|d| filter.matches(d)).collect())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Document) -> Result<bool> {
        let path = self.collection_path(collection)?;
        let _guard = self.lock.lock().await;
        let mut docs = self.load(&path).await?;
        let Some(pos) = docs.iter().position(|d| document_id(d) == Some(id)) else {
            return Ok(false);
        };
        docs[pos] = doc;
        self.save(&path, &docs).await?;
        Ok(true)
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<usize> {
        let path = self.collection_path(collection)?;
        let _guard = self.lock.lock().await;
        let mut docs = self.load(&path).await?;
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        let removed = before - docs.len();
        if removed > 0 {
            self.save(&path, &docs).await?;
        }
        Ok(removed)
    }
}
