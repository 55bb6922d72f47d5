//! Query values: filters, sorts, projections and paging options.

mod filter;
mod options;
mod projection;
mod sort;

pub use filter::{lookup, DocumentPredicate, FieldFilter, Filter};
pub use options::{FindOptions, StoreQuery};
pub use projection::Projection;
pub use sort::{compare_values, Sort, SortOrder};
