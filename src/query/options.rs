use serde::Deserialize;

use super::filter::Filter;
use super::sort::{Sort, SortOrder};

/// Ordering and paging for a find.
///
/// `skip = 0` and `take = 0` mean no windowing. A sort is only applied when
/// both a field and a direction other than [`SortOrder::None`] are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    pub skip: usize,
    pub take: usize,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = take;
        self
    }

    /// The sort in effect, if any.
    pub fn sort(&self) -> Option<Sort> {
        match (&self.sort_field, self.sort_order) {
            (_, SortOrder::None) | (None, _) => None,
            (Some(field), SortOrder::Ascending) => Some(Sort::ascending(field.clone())),
            (Some(field), SortOrder::Descending) => Some(Sort::descending(field.clone())),
        }
    }
}

/// A fully resolved find, as handed to a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    pub filter: Filter,
    /// Fields to return; `None` returns whole documents.
    pub fields: Option<Vec<String>>,
    pub sort: Option<Sort>,
    pub skip: usize,
    /// Maximum documents to return; `0` is unbounded.
    pub limit: usize,
}

impl StoreQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn with_options(filter: Filter, options: &FindOptions) -> Self {
        Self {
            filter,
            fields: None,
            sort: options.sort(),
            skip: options.skip,
            limit: options.take,
        }
    }

    pub fn project(mut self, fields: Option<&[String]>) -> Self {
        self.fields = fields.map(<[String]>::to_vec);
        self
    }
}
