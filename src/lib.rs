//! Generic typed repositories over document stores.
//!
//! One [`Repository`] per entity kind exposes find-by-id, filtered finds with
//! optional projection, sort and paging, full and field-preserving upserts,
//! and idempotent deletes. Every operation is async; with the `blocking`
//! feature, [`Repository::blocking`] runs the same operations to completion on
//! the calling thread.

// Lets `#[derive(Entity)]` expand to `repobase::Entity` inside this crate.
extern crate self as repobase;

mod entity;
mod error;
mod query;
mod repository;
mod store;

pub use entity::{from_document, to_document, Entity};
pub use error::{RepositoryError, Result, StoreError};
pub use query::{
    compare_values, lookup, DocumentPredicate, FieldFilter, Filter, FindOptions, Projection, Sort,
    SortOrder, StoreQuery,
};
#[cfg(feature = "blocking")]
pub use repository::BlockingRepository;
pub use repository::{IdGeneration, RepositoriesExt, Repository, RepositoryConfig};
pub use store::{Document, DocumentStore, InMemoryDocumentStore};

// Re-export the derive macro alongside the trait.
pub use repobase_macros::Entity;
