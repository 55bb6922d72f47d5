use thiserror::Error;

/// Failure raised by a document store while serving a call.
///
/// Repositories surface these unchanged inside [`RepositoryError::Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the call.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store call timed out")]
    Timeout,

    #[error("document store call was cancelled")]
    Cancelled,

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// The store rejected or failed to execute a query.
    #[error("query failed: {0}")]
    Query(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type for repository operations.
///
/// Not-found is never an error: lookups return `Ok(None)` or an empty `Vec`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid preservation request, raised before any store call.
    #[error("invalid preserved field `{field}`: {reason}")]
    Configuration { field: String, reason: String },

    /// More than one document shares an identifier.
    #[error("{count} documents share id {id} in collection {collection}")]
    Consistency {
        collection: String,
        id: String,
        count: usize,
    },

    /// Save was asked to persist an entity without an id while id generation is disabled.
    #[error("entity in collection {collection} has no id and id generation is disabled")]
    MissingId { collection: String },
}

impl RepositoryError {
    pub(crate) fn configuration(field: &str, reason: impl Into<String>) -> Self {
        RepositoryError::Configuration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Store(StoreError::Serialization(err))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
