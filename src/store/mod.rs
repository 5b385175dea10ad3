//! Document storage for devtrack
//!
//! Every resource lives in a named collection of JSON documents. Each
//! document carries a string `id` field. Backends implement
//! [`DocumentStore`]; resource code talks to them through the typed
//! [`Collection`] wrapper.

mod collection;
mod filter;
mod json_file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use collection::{Collection, Record};
pub use filter::{Clause, Filter};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Wire representation of a stored record
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Field every document is keyed by
pub const ID_FIELD: &str = "id";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a document to a collection
    async fn insert(&self, collection: &str, doc: Document) -> Result<()>;

    /// All documents matching the filter, in insertion order
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    /// Replace the document with the given id. Returns false if absent.
    async fn replace(&self, collection: &str, id: &str, doc: Document) -> Result<bool>;

    /// Delete every matching document, returning how many were removed
    async fn delete(&self, collection: &str, filter: &Filter) -> Result<usize>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<usize> {
        Ok(self.find(collection, filter).await?.len())
    }
}

/// Reads the `id` field of a document, if it is a string
pub(crate) fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(|v| v.as_str())
}
