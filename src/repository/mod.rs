//! Repositories - one typed facade per entity kind over a shared document store.
//!
//! ## Example
//!
//! ```ignore
//! use repobase::{Filter, FindOptions, InMemoryDocumentStore, RepositoriesExt, SortOrder};
//!
//! let store = InMemoryDocumentStore::new();
//! let accounts = store.repository::<Account>();
//!
//! let id = accounts.save(&mut account).await?;
//! let loaded = accounts.find_by_id(&id).await?;
//! let top = accounts
//!     .find_with(
//!         Filter::field("score").gt(0),
//!         &FindOptions::new().sort_by("score", SortOrder::Descending).take(10),
//!     )
//!     .await?;
//! ```

#[cfg(feature = "blocking")]
mod blocking;
mod config;
#[allow(clippy::module_inception)]
mod repository;

use crate::entity::Entity;
use crate::store::DocumentStore;

#[cfg(feature = "blocking")]
pub use blocking::BlockingRepository;
pub use config::{IdGeneration, RepositoryConfig};
pub use repository::Repository;

/// Extension trait for typed repository access on any cloneable store.
pub trait RepositoriesExt: DocumentStore + Clone + Sized {
    /// Get a repository for entities of type `E`.
    fn repository<E: Entity>(&self) -> Repository<E, Self> {
        Repository::new(self.clone())
    }

    /// Get a repository for entities of type `E` with explicit settings.
    fn repository_with<E: Entity>(&self, config: RepositoryConfig) -> Repository<E, Self> {
        Repository::with_config(self.clone(), config)
    }
}

impl<S: DocumentStore + Clone> RepositoriesExt for S {}
