use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::sort::{compare_values, type_rank};
use crate::store::Document;

/// Opaque predicate over a raw document.
pub type DocumentPredicate = Arc<dyn Fn(&Document) -> bool + Send + Sync>;

/// Selection criteria for a find.
///
/// Every variant except `Custom` is plain data a store adapter can translate
/// into its native query language. `Custom` carries a Rust closure and can only
/// be evaluated in process.
#[derive(Clone, Default)]
pub enum Filter {
    #[default]
    All,
    /// Matches the document stored under this identifier.
    Id(String),
    Eq(String, Value),
    Ne(String, Value),
    Gt(String, Value),
    Gte(String, Value),
    Lt(String, Value),
    Lte(String, Value),
    In(String, Vec<Value>),
    Exists(String, bool),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Custom(DocumentPredicate),
}

/// Builder for comparisons on one field path (`"address.city"` reaches into nested objects).
pub struct FieldFilter {
    path: String,
}

impl Filter {
    pub fn all() -> Self {
        Filter::All
    }

    pub fn id(id: impl Into<String>) -> Self {
        Filter::Id(id.into())
    }

    pub fn field(path: impl Into<String>) -> FieldFilter {
        FieldFilter { path: path.into() }
    }

    pub fn custom(predicate: impl Fn(&Document) -> bool + Send + Sync + 'static) -> Self {
        Filter::Custom(Arc::new(predicate))
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// True if this filter carries no in-process closure.
    pub fn is_translatable(&self) -> bool {
        match self {
            Filter::Custom(_) => false,
            Filter::And(filters) | Filter::Or(filters) => {
                filters.iter().all(Filter::is_translatable)
            }
            Filter::Not(inner) => inner.is_translatable(),
            _ => true,
        }
    }

    /// Evaluate against the document stored under `id`.
    pub fn matches(&self, id: &str, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(expected) => id == expected,
            Filter::Eq(path, value) => lookup(document, path)
                .is_some_and(|actual| compare_values(Some(actual), Some(value)) == Ordering::Equal),
            Filter::Ne(path, value) => !lookup(document, path)
                .is_some_and(|actual| compare_values(Some(actual), Some(value)) == Ordering::Equal),
            Filter::Gt(path, value) => ordered(document, path, value, |o| o == Ordering::Greater),
            Filter::Gte(path, value) => ordered(document, path, value, |o| o != Ordering::Less),
            Filter::Lt(path, value) => ordered(document, path, value, |o| o == Ordering::Less),
            Filter::Lte(path, value) => ordered(document, path, value, |o| o != Ordering::Greater),
            Filter::In(path, values) => lookup(document, path).is_some_and(|actual| {
                values
                    .iter()
                    .any(|v| compare_values(Some(actual), Some(v)) == Ordering::Equal)
            }),
            Filter::Exists(path, expected) => lookup(document, path).is_some() == *expected,
            Filter::And(filters) => filters.iter().all(|f| f.matches(id, document)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(id, document)),
            Filter::Not(inner) => !inner.matches(id, document),
            Filter::Custom(predicate) => predicate(document),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "All"),
            Filter::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Filter::Eq(p, v) => f.debug_tuple("Eq").field(p).field(v).finish(),
            Filter::Ne(p, v) => f.debug_tuple("Ne").field(p).field(v).finish(),
            Filter::Gt(p, v) => f.debug_tuple("Gt").field(p).field(v).finish(),
            Filter::Gte(p, v) => f.debug_tuple("Gte").field(p).field(v).finish(),
            Filter::Lt(p, v) => f.debug_tuple("Lt").field(p).field(v).finish(),
            Filter::Lte(p, v) => f.debug_tuple("Lte").field(p).field(v).finish(),
            Filter::In(p, v) => f.debug_tuple("In").field(p).field(v).finish(),
            Filter::Exists(p, e) => f.debug_tuple("Exists").field(p).field(e).finish(),
            Filter::And(filters) => f.debug_tuple("And").field(filters).finish(),
            Filter::Or(filters) => f.debug_tuple("Or").field(filters).finish(),
            Filter::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Filter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FieldFilter {
    pub fn eq(self, value: impl Into<Value>) -> Filter {
        Filter::Eq(self.path, value.into())
    }

    pub fn ne(self, value: impl Into<Value>) -> Filter {
        Filter::Ne(self.path, value.into())
    }

    pub fn gt(self, value: impl Into<Value>) -> Filter {
        Filter::Gt(self.path, value.into())
    }

    pub fn gte(self, value: impl Into<Value>) -> Filter {
        Filter::Gte(self.path, value.into())
    }

    pub fn lt(self, value: impl Into<Value>) -> Filter {
        Filter::Lt(self.path, value.into())
    }

    pub fn lte(self, value: impl Into<Value>) -> Filter {
        Filter::Lte(self.path, value.into())
    }

    pub fn is_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Filter {
        Filter::In(self.path, values.into_iter().map(Into::into).collect())
    }

    pub fn exists(self) -> Filter {
        Filter::Exists(self.path, true)
    }

    pub fn missing(self) -> Filter {
        Filter::Exists(self.path, false)
    }
}

/// Resolve a dot-separated path inside a document.
pub fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

// Range comparisons only match values of the same type.
fn ordered(
    document: &Document,
    path: &str,
    value: &Value,
    accept: impl Fn(Ordering) -> bool,
) -> bool {
    match lookup(document, path) {
        Some(actual) if type_rank(Some(actual)) == type_rank(Some(value)) => {
            accept(compare_values(Some(actual), Some(value)))
        }
        _ => false,
    }
}
