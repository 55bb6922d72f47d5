//! Blocking access: each call runs the async operation to completion on the
//! calling thread.

use futures::executor::block_on;

use super::repository::Repository;
use crate::entity::Entity;
use crate::error::Result;
use crate::query::{Filter, FindOptions, Projection};
use crate::store::DocumentStore;

/// Blocking view of a [`Repository`], obtained with [`Repository::blocking`].
///
/// Do not use from inside an async task whose store needs that task's runtime
/// to make progress.
pub struct BlockingRepository<'r, E, S> {
    inner: &'r Repository<E, S>,
}

impl<E: Entity, S: DocumentStore> Repository<E, S> {
    pub fn blocking(&self) -> BlockingRepository<'_, E, S> {
        BlockingRepository { inner: self }
    }
}

impl<E: Entity, S: DocumentStore> BlockingRepository<'_, E, S> {
    pub fn find_by_id(&self, id: &str) -> Result<Option<E>> {
        block_on(self.inner.find_by_id(id))
    }

    pub fn find_by_id_projected<R>(
        &self,
        id: &str,
        projection: &Projection<E, R>,
    ) -> Result<Option<R>> {
        block_on(self.inner.find_by_id_projected(id, projection))
    }

    pub fn find(&self, filter: Filter) -> Result<Vec<E>> {
        block_on(self.inner.find(filter))
    }

    pub fn find_where(
        &self,
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<E>> {
        block_on(self.inner.find_where(predicate))
    }

    pub fn find_with(&self, filter: Filter, options: &FindOptions) -> Result<Vec<E>> {
        block_on(self.inner.find_with(filter, options))
    }

    pub fn find_projected<R>(
        &self,
        filter: Filter,
        projection: &Projection<E, R>,
        options: &FindOptions,
    ) -> Result<Vec<R>> {
        block_on(self.inner.find_projected(filter, projection, options))
    }

    pub fn save(&self, entity: &mut E) -> Result<String> {
        block_on(self.inner.save(entity))
    }

    pub fn save_preserving(&self, entity: &mut E, preserved: &[&str]) -> Result<String> {
        block_on(self.inner.save_preserving(entity, preserved))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        block_on(self.inner.delete(id))
    }

    pub fn delete_entity(&self, entity: &E) -> Result<()> {
        block_on(self.inner.delete_entity(entity))
    }
}
