//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use super::{Document, DocumentStore};
use crate::error::StoreError;
use crate::query::{lookup, StoreQuery};

type Collection = BTreeMap<String, Document>;

/// In-memory document store.
///
/// Collections are kept ordered by id, which is the natural order of an
/// unsorted find. Clone-friendly via Arc: clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(collections.get(collection).map_or(0, BTreeMap::len))
    }

    /// Raw copy of the document stored under `id`.
    pub fn document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<(&String, &Document)> = documents
            .iter()
            .filter(|(id, document)| query.filter.matches(id, document))
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|(_, a), (_, b)| {
                sort.compare(lookup(a, &sort.field), lookup(b, &sort.field))
            });
        }

        let limit = if query.limit == 0 {
            usize::MAX
        } else {
            query.limit
        };

        let results: Vec<(String, Document)> = matched
            .into_iter()
            .skip(query.skip)
            .take(limit)
            .map(|(id, document)| {
                let document = match &query.fields {
                    Some(fields) => project(document, fields),
                    None => document.clone(),
                };
                (id.clone(), document)
            })
            .collect();

        trace!(
            collection,
            translatable = query.filter.is_translatable(),
            returned = results.len(),
            "find"
        );
        Ok(results)
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);

        trace!(collection, id, "upsert");
        Ok(())
    }

    async fn upsert_preserving(
        &self,
        collection: &str,
        id: &str,
        mut document: Document,
        preserved: &[String],
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let documents = collections.entry(collection.to_string()).or_default();
        let existing = documents.get(id);

        for field in preserved {
            match existing.and_then(|current| current.get(field)) {
                Some(value) => {
                    document.insert(field.clone(), value.clone());
                }
                None => {
                    document.remove(field);
                }
            }
        }

        trace!(collection, id, preserved = preserved.len(), "upsert preserving");
        documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let removed = collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some();

        trace!(collection, id, removed, "delete");
        Ok(removed)
    }
}

/// Copy only the listed field paths, keeping nested paths nested.
fn project(document: &Document, fields: &[String]) -> Document {
    let mut projected = Document::new();
    for path in fields {
        if let Some(value) = lookup(document, path) {
            let segments: Vec<&str> = path.split('.').collect();
            insert_path(&mut projected, &segments, value.clone());
        }
    }
    projected
}

fn insert_path(target: &mut Document, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            target.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Document::new()));
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}
