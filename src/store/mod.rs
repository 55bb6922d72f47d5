//! DocumentStore - the persistence primitives a repository is built on.

mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::query::StoreQuery;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Abstract document storage, shared by every repository and entity kind.
///
/// Implementations must be safe for concurrent use. Each call acquires whatever
/// connection it needs and releases it before returning. Single-document writes
/// are atomic: a failed or cancelled upsert never leaves a partial document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` matching the query, each paired with its id.
    ///
    /// Sort, skip and limit are applied in that order; when `query.fields` is
    /// set, only those fields are returned.
    async fn find(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Insert or replace the document stored under `id`.
    async fn upsert(&self, collection: &str, id: &str, document: Document)
        -> Result<(), StoreError>;

    /// Insert or replace the document under `id`, keeping the currently stored
    /// values of the `preserved` root fields. On insert, preserved fields are left absent.
    async fn upsert_preserving(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        preserved: &[String],
    ) -> Result<(), StoreError>;

    /// Remove the document stored under `id`. Returns true if it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// A shared handle is a store, so `Arc<dyn DocumentStore>` can back any repository.
#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn find(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        (**self).find(collection, query).await
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<(), StoreError> {
        (**self).upsert(collection, id, document).await
    }

    async fn upsert_preserving(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        preserved: &[String],
    ) -> Result<(), StoreError> {
        (**self)
            .upsert_preserving(collection, id, document, preserved)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        (**self).delete(collection, id).await
    }
}

pub use in_memory::InMemoryDocumentStore;
