//! Entities - typed records persisted as documents.
//!
//! ## Example
//!
//! ```ignore
//! use repobase::Entity;
//!
//! #[derive(Serialize, Deserialize, Entity)]
//! #[entity(collection = "accounts")]
//! struct Account {
//!     #[entity(id)]
//!     pub id: String,
//!     pub email: String,
//! }
//! ```

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::store::Document;

/// Trait for types that can be persisted through a [`Repository`](crate::Repository).
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection name for this entity type (e.g., "accounts", "user_profiles").
    /// Maps to a collection in MongoDB, a table in SQL, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Document key holding the identifier.
    const ID_FIELD: &'static str = "id";

    /// Root document keys the type can serialize, or `None` when they are not
    /// known statically (flattened fields, hand written `Serialize` impls).
    const FIELDS: Option<&'static [&'static str]> = None;

    /// Returns the unique identifier. Empty until assigned.
    fn id(&self) -> &str;

    /// Assigns the identifier. Only called by a repository for entities saved without one.
    fn set_id(&mut self, id: String);
}

/// Serialize an entity into a document. Entities must serialize to a JSON object.
pub fn to_document<E: Entity>(entity: &E) -> Result<Document, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "entity in collection {} serialized to {} instead of an object",
            E::COLLECTION,
            kind_of(&other)
        )))),
    }
}

pub fn from_document<E: Entity>(document: Document) -> Result<E, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
