//! DocumentStore doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use repobase::{Document, DocumentStore, InMemoryDocumentStore, StoreError, StoreQuery};

/// Fails every call with the configured error and counts the attempts.
#[derive(Clone)]
pub struct FailingStore {
    pub calls: Arc<AtomicUsize>,
    error: fn() -> StoreError,
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::with_error(|| StoreError::Unavailable("connection refused".into()))
    }
}

impl FailingStore {
    pub fn with_error(error: fn() -> StoreError) -> Self {
        Self {
            calls: Arc::default(),
            error,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.error)()
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find(
        &self,
        _collection: &str,
        _query: &StoreQuery,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        Err(self.fail())
    }

    async fn upsert(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
        Err(self.fail())
    }

    async fn upsert_preserving(
        &self,
        _: &str,
        _: &str,
        _: Document,
        _: &[String],
    ) -> Result<(), StoreError> {
        Err(self.fail())
    }

    async fn delete(&self, _: &str, _: &str) -> Result<bool, StoreError> {
        Err(self.fail())
    }
}

/// Wraps an in-memory store but returns every found document twice, as a
/// corrupted store holding duplicate ids would.
#[derive(Clone, Default)]
pub struct DuplicatingStore {
    pub inner: InMemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for DuplicatingStore {
    async fn find(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let found = self.inner.find(collection, query).await?;
        Ok(found.iter().cloned().chain(found.iter().cloned()).collect())
    }

    async fn upsert(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError> {
        self.inner.upsert(collection, id, document).await
    }

    async fn upsert_preserving(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        preserved: &[String],
    ) -> Result<(), StoreError> {
        self.inner
            .upsert_preserving(collection, id, document, preserved)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(collection, id).await
    }
}

/// Wraps an in-memory store and waits before every write reaches it.
#[derive(Clone)]
pub struct SlowStore {
    pub inner: InMemoryDocumentStore,
    pub delay: Duration,
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn find(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        self.inner.find(collection, query).await
    }

    async fn upsert(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.upsert(collection, id, document).await
    }

    async fn upsert_preserving(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        preserved: &[String],
    ) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner
            .upsert_preserving(collection, id, document, preserved)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(collection, id).await
    }
}
