//! Repository - typed access to one entity kind in a document store.

use std::marker::PhantomData;

use tracing::{debug, warn};

use super::config::RepositoryConfig;
use crate::entity::{self, Entity};
use crate::error::{RepositoryError, Result};
use crate::query::{Filter, FindOptions, Projection, StoreQuery};
use crate::store::{Document, DocumentStore};

/// Typed repository over a [`DocumentStore`] for entities of type `E`.
///
/// Stateless between calls: every operation is one store call and all state
/// lives in the store. Cloning is as cheap as cloning the store handle.
pub struct Repository<E, S> {
    store: S,
    config: RepositoryConfig,
    _marker: PhantomData<fn() -> E>,
}

impl<E, S: Clone> Clone for Repository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity, S: DocumentStore> Repository<E, S> {
    /// Repository over `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    /// Repository over `store` using `config` for the collection and id generation.
    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        Self {
            store,
            config,
            _marker: PhantomData,
        }
    }

    /// The collection this repository reads and writes.
    pub fn collection(&self) -> &str {
        self.config.collection.as_deref().unwrap_or(E::COLLECTION)
    }

    /// The configuration this repository was built with.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The underlying store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    // FIND

    /// Find an entity by id. `Ok(None)` if no document has this id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<E>> {
        let documents = self.execute(StoreQuery::new(Filter::id(id))).await?;
        match self.single(id, documents)? {
            Some(document) => Ok(Some(entity::from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Find an entity by id and return its projection.
    pub async fn find_by_id_projected<R>(
        &self,
        id: &str,
        projection: &Projection<E, R>,
    ) -> Result<Option<R>> {
        let query = StoreQuery::new(Filter::id(id)).project(projection.field_list());
        let documents = self.execute(query).await?;
        match self.single(id, documents)? {
            Some(document) => Ok(Some(projection.apply(document)?)),
            None => Ok(None),
        }
    }

    /// All entities matching the filter, in the store's natural order.
    pub async fn find(&self, filter: Filter) -> Result<Vec<E>> {
        self.find_with(filter, &FindOptions::default()).await
    }

    /// All entities for which the predicate holds. Documents that no longer
    /// deserialize as `E` do not match.
    pub async fn find_where(
        &self,
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<E>> {
        let filter = Filter::custom(move |document: &Document| {
            entity::from_document::<E>(document.clone()).is_ok_and(|entity| predicate(&entity))
        });
        self.find(filter).await
    }

    /// Entities matching the filter, sorted and windowed per `options`.
    pub async fn find_with(&self, filter: Filter, options: &FindOptions) -> Result<Vec<E>> {
        let query = StoreQuery::with_options(filter, options);
        self.execute(query)
            .await?
            .into_iter()
            .map(|(_, document)| entity::from_document(document).map_err(RepositoryError::from))
            .collect()
    }

    /// Projections of the entities matching the filter, sorted and windowed per `options`.
    pub async fn find_projected<R>(
        &self,
        filter: Filter,
        projection: &Projection<E, R>,
        options: &FindOptions,
    ) -> Result<Vec<R>> {
        let query = StoreQuery::with_options(filter, options).project(projection.field_list());
        self.execute(query)
            .await?
            .into_iter()
            .map(|(_, document)| projection.apply(document).map_err(RepositoryError::from))
            .collect()
    }

    // SAVE

    /// Insert or replace the entity's document. An entity without an id gets
    /// one assigned first. Returns the id.
    pub async fn save(&self, entity: &mut E) -> Result<String> {
        let id = self.ensure_id(entity)?;
        let document = entity::to_document(entity)?;
        self.store.upsert(self.collection(), &id, document).await?;

        debug!(collection = self.collection(), id = %id, "saved");
        Ok(id)
    }

    /// Insert or replace the entity's document while keeping the stored values
    /// of the `preserved` root fields. Returns the id.
    ///
    /// Nested paths, unknown fields and the id field are rejected before
    /// anything is written.
    pub async fn save_preserving(&self, entity: &mut E, preserved: &[&str]) -> Result<String> {
        let preserved = self.validate_preserved(entity, preserved)?;
        let id = self.ensure_id(entity)?;
        let document = entity::to_document(entity)?;
        self.store
            .upsert_preserving(self.collection(), &id, document, &preserved)
            .await?;

        debug!(
            collection = self.collection(),
            id = %id,
            preserved = ?preserved,
            "saved preserving"
        );
        Ok(id)
    }

    // DELETE

    /// Delete the entity stored under `id`. Deleting a missing id is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = self.store.delete(self.collection(), id).await?;
        debug!(collection = self.collection(), id, removed, "deleted");
        Ok(())
    }

    /// Delete the stored entity with the same id as `entity`.
    pub async fn delete_entity(&self, entity: &E) -> Result<()> {
        self.delete(entity.id()).await
    }

    // Every read goes through here.
    async fn execute(&self, query: StoreQuery) -> Result<Vec<(String, Document)>> {
        debug!(
            collection = self.collection(),
            filter = ?query.filter,
            sort = ?query.sort,
            skip = query.skip,
            limit = query.limit,
            "find"
        );
        Ok(self.store.find(self.collection(), &query).await?)
    }

    fn single(&self, id: &str, mut documents: Vec<(String, Document)>) -> Result<Option<Document>> {
        if documents.len() > 1 {
            warn!(
                collection = self.collection(),
                id,
                count = documents.len(),
                "multiple documents share one id"
            );
            return Err(RepositoryError::Consistency {
                collection: self.collection().to_string(),
                id: id.to_string(),
                count: documents.len(),
            });
        }
        Ok(documents.pop().map(|(_, document)| document))
    }

    fn ensure_id(&self, entity: &mut E) -> Result<String> {
        if !entity.id().is_empty() {
            return Ok(entity.id().to_string());
        }
        let id = self
            .config
            .id_generation
            .generate()
            .ok_or_else(|| RepositoryError::MissingId {
                collection: self.collection().to_string(),
            })?;
        entity.set_id(id.clone());
        Ok(id)
    }

    fn validate_preserved(&self, entity: &E, preserved: &[&str]) -> Result<Vec<String>> {
        // Without a static field list, fall back to the keys this instance serializes.
        let instance_keys = match E::FIELDS {
            Some(_) => None,
            None => Some(entity::to_document(entity)?),
        };
        let known = |field: &str| match (E::FIELDS, &instance_keys) {
            (Some(fields), _) => fields.contains(&field),
            (None, Some(document)) => document.contains_key(field),
            (None, None) => false,
        };
        let mut fields = Vec::with_capacity(preserved.len());

        for &field in preserved {
            let reason = if field.is_empty() {
                Some("field name is empty")
            } else if field.contains('.') {
                Some("only root level fields can be preserved")
            } else if field == E::ID_FIELD {
                Some("the id field cannot be preserved")
            } else if !known(field) {
                Some("no such field on the entity")
            } else {
                None
            };

            if let Some(reason) = reason {
                warn!(collection = self.collection(), field, reason, "rejected preservation");
                return Err(RepositoryError::configuration(field, reason));
            }
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }

        Ok(fields)
    }
}
