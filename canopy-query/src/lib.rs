//! # canopy-query
//!
//! Query composition for hierarchical content stores.
//!
//! This crate turns fluent builder calls into store-agnostic query
//! descriptors, including:
//! - Field filters (`int`, `bool`, `string`) with value coercion and user input
//! - Structural filters on node and object properties
//! - Nested AND/OR filter trees and sub-queries
//! - Page-number pagination with named page sizes
//! - Named sort choices resolved from properties or query parameters
//! - Memoized results, with copy-on-write snapshots
//!
//! The store itself is behind [`ContentStore`]; this crate never talks to
//! a database.
//!
//! ## Query sets
//!
//! ```rust
//! use canopy_query::prelude::*;
//!
//! struct Empty;
//!
//! impl ContentStore for Empty {
//!     type Item = u64;
//!
//!     fn count(&self, _query: &CountQuery) -> QueryResult<u64> {
//!         Ok(0)
//!     }
//!
//!     fn fetch(&self, _query: &ItemQuery) -> QueryResult<Option<Vec<u64>>> {
//!         Ok(Some(Vec::new()))
//!     }
//! }
//!
//! # fn main() -> QueryResult<()> {
//! let mut set = QuerySet::new(Empty);
//! set.classes(["article", "folder"])
//!     .parent_node(43u64)
//!     .depth(Some(1))
//!     .filter("section", 1)
//!     .sort_by_field(Some("-a-z"))
//!     .page(1);
//!
//! assert!(set.result()?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Nested filters
//!
//! Sub-queries group filters under a condition:
//!
//! ```rust
//! use canopy_query::{NestedItem, QueryFilter};
//!
//! # fn main() -> canopy_query::QueryResult<()> {
//! let mut filter = QueryFilter::new();
//! filter.sub_query("or", |or| {
//!     or.filter("priority:>", 5).filter("section", 3);
//!     Ok(())
//! })?;
//!
//! assert!(matches!(filter.object_filters()[0], NestedItem::Composite(_)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Sorting
//!
//! ```rust
//! use canopy_query::{SortDirection, SortField, SortOrder, default_sort_choices};
//!
//! let mut order = SortOrder::new(default_sort_choices(), Some("newest".into()));
//! order.resolve_query(Some("unknown"));
//! assert_eq!(order.identifier(), Some("newest"));
//! assert_eq!(order.ordering(), Some(&[SortField::desc("published")][..]));
//! ```

pub mod config;
pub mod content;
pub mod content_filter;
pub mod error;
pub mod field_filter;
pub mod filter_values;
pub mod iterator;
pub mod logging;
pub mod pagination;
pub mod params;
pub mod query_filter;
pub mod query_set;
pub mod result;
pub mod snapshot;
pub mod sort;
pub mod store;
pub mod structural;
pub mod traits;
pub mod value;

pub use config::{
    AttributeFiltersConfig, CONFIG_FILE_NAME, CanopyConfig, ConfiguredAttributeMapper,
    DEFAULT_PAGE_LIMIT, FiltersConfig, PaginationConfig, ScopeConfig, SettingsPageSize,
    SortingConfig,
};
pub use content::{ClassRef, ContentRef, DEFAULT_PARENT_NODE_ID, NodeRef, NodeTarget, ObjectRef};
pub use content_filter::{
    CompositeFilter, Condition, ContentFilter, ContentFilterIncrement, ExtendedFilter, FilterLeaf,
    FilterNode, Modifiers, NESTED_FILTER_SET_ID, NestedEntry, NestedItem, NodeCondition,
};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use field_filter::{
    BoolFieldFilter, FieldFilter, FilterKind, FilterMode, FilterSpec, FilterType,
    IntegerFieldFilter, StringFieldFilter,
};
pub use filter_values::{FilterValues, LabelledValue};
pub use iterator::QuerySetIterator;
pub use pagination::{Page, PageLimit, PageNumPagination, PageParams, Paginator};
pub use params::QueryParams;
pub use query_filter::{FilterPayload, QueryFilter};
pub use query_set::QuerySet;
pub use result::ResultSet;
pub use snapshot::QuerySnapshot;
pub use sort::{
    SortChoice, SortChoices, SortDirection, SortField, SortMode, SortOrder, default_sort_choices,
};
pub use store::{ClassFilterMode, CountQuery, DepthOperator, ItemQuery, QueryScope, RoleScope};
pub use structural::{FilterTarget, StructuralField, StructuralFilter};
pub use traits::{
    AttributeFilterMapper, BuiltinAttributeMapper, ClassAttribute, ClassCatalog, ContentStore,
    ContentFilterFactory, DefaultContentFilterFactory, DefaultSortOrderFactory, IdentifierResolver,
    NameLookup, PageNumPaginatorFactory, PageSizeProvider, PaginatorFactory, QueryServices,
    SortOrderFactory, StaticClassCatalog,
};
pub use value::FilterValue;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::content::{ContentRef, NodeTarget};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::field_filter::{FieldFilter, FilterMode, FilterType};
    pub use crate::pagination::{PageLimit, PageParams};
    pub use crate::params::QueryParams;
    pub use crate::query_filter::QueryFilter;
    pub use crate::query_set::QuerySet;
    pub use crate::result::ResultSet;
    pub use crate::snapshot::QuerySnapshot;
    pub use crate::sort::{SortChoice, SortChoices, SortField};
    pub use crate::store::{CountQuery, ItemQuery};
    pub use crate::traits::{ContentStore, QueryServices};
    pub use crate::value::FilterValue;
}
