use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::entity::{self, Entity};
use crate::error::StoreError;
use crate::store::Document;

type Shape<R> = Arc<dyn Fn(Document) -> Result<R, StoreError> + Send + Sync>;

/// Maps a stored entity of type `E` to a result shape `R`.
///
/// A field projection lets the store return only the listed fields; a mapped
/// projection fetches the whole document and applies a typed transform. Either
/// way the result equals applying the projection to the full entity.
pub struct Projection<E, R> {
    fields: Option<Vec<String>>,
    shape: Shape<R>,
    _marker: PhantomData<fn(E) -> R>,
}

impl<E: Entity, R: DeserializeOwned + 'static> Projection<E, R> {
    /// Project onto the listed root or dotted fields and deserialize `R` from them.
    pub fn fields<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            shape: Arc::new(|document: Document| -> Result<R, StoreError> {
                Ok(serde_json::from_value(Value::Object(document))?)
            }),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity, R: 'static> Projection<E, R> {
    /// Project through a transform over the full entity.
    pub fn map(transform: impl Fn(E) -> R + Send + Sync + 'static) -> Self {
        Self {
            fields: None,
            shape: Arc::new(move |document: Document| -> Result<R, StoreError> {
                Ok(transform(entity::from_document::<E>(document)?))
            }),
            _marker: PhantomData,
        }
    }
}

impl<E, R> Projection<E, R> {
    /// Fields the store needs to return, or `None` for the whole document.
    pub fn field_list(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub(crate) fn apply(&self, document: Document) -> Result<R, StoreError> {
        (self.shape)(document)
    }
}

impl<E, R> Clone for Projection<E, R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            shape: Arc::clone(&self.shape),
            _marker: PhantomData,
        }
    }
}

impl<E, R> fmt::Debug for Projection<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
