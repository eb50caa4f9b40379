//! Collaborator seams.
//!
//! The engine never talks to a content backend, a settings store or a class
//! registry directly. Each of those is a trait here, and the component
//! implementations that used to be picked by configured class name are
//! injected through factory traits instead.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::content_filter::ContentFilter;
use crate::error::QueryResult;
use crate::field_filter::FilterType;
use crate::filter_values::FilterValues;
use crate::pagination::{PageNumPagination, PageParams, Paginator};
use crate::sort::{SortChoices, SortOrder};
use crate::store::{CountQuery, ItemQuery};

/// The hierarchical content store that executes assembled queries.
pub trait ContentStore: Send + Sync {
    /// Item type returned by the store.
    type Item: Clone + fmt::Debug + Send + Sync;

    /// Count the items matching the query.
    fn count(&self, query: &CountQuery) -> QueryResult<u64>;

    /// Fetch one window of items.
    ///
    /// `Ok(None)` means the store produced no result at all, which is
    /// distinct from an empty page.
    fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<Self::Item>>>;
}

impl<S: ContentStore + ?Sized> ContentStore for Arc<S> {
    type Item = S::Item;

    fn count(&self, query: &CountQuery) -> QueryResult<u64> {
        (**self).count(query)
    }

    fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<Self::Item>>> {
        (**self).fetch(query)
    }
}

/// Supplies page sizes stored under external settings keys.
pub trait PageSizeProvider: Send + Sync {
    /// Look up the page size for a settings key.
    fn page_size(&self, key: &str) -> Option<u64>;
}

/// An attribute of a content class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAttribute {
    /// Attribute identifier, e.g. `title`.
    pub identifier: String,
    /// Attribute data type name, e.g. `ezstring`.
    pub data_type: String,
}

impl ClassAttribute {
    /// Create an attribute description.
    pub fn new(identifier: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            data_type: data_type.into(),
        }
    }
}

/// Registry of content classes and their attributes.
pub trait ClassCatalog: Send + Sync {
    /// Attributes of a class, or `None` if the class is unknown.
    fn attributes(&self, class_identifier: &str) -> Option<Vec<ClassAttribute>>;
}

/// Maps attribute data types to filter kinds.
pub trait AttributeFilterMapper: Send + Sync {
    /// Filter to use for an attribute. `None` falls back to the built-in
    /// mapping by data type.
    fn filter_for(&self, class_identifier: &str, attribute: &ClassAttribute) -> Option<FilterType>;
}

/// Mapper that always defers to the built-in data type mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAttributeMapper;

impl AttributeFilterMapper for BuiltinAttributeMapper {
    fn filter_for(&self, _class_identifier: &str, _attribute: &ClassAttribute) -> Option<FilterType> {
        None
    }
}

/// Looks up display names for content object ids.
pub trait NameLookup {
    /// Names keyed by object id. Unknown ids are left out.
    fn names(&self, object_ids: &[u64]) -> IndexMap<u64, String>;
}

impl<F> NameLookup for F
where
    F: Fn(&[u64]) -> IndexMap<u64, String>,
{
    fn names(&self, object_ids: &[u64]) -> IndexMap<u64, String> {
        self(object_ids)
    }
}

/// Resolves symbolic identifiers (e.g. remote ids) into labelled values.
pub trait IdentifierResolver {
    /// Resolve identifiers. `None` when nothing could be resolved.
    fn resolve(&self, identifiers: &[String]) -> Option<FilterValues>;
}

impl<F> IdentifierResolver for F
where
    F: Fn(&[String]) -> Option<FilterValues>,
{
    fn resolve(&self, identifiers: &[String]) -> Option<FilterValues> {
        self(identifiers)
    }
}

/// Creates paginators for a build.
pub trait PaginatorFactory: Send + Sync {
    /// Create a paginator over `total` items.
    fn create(&self, total: u64, page_size: u64, params: Option<&PageParams>) -> Box<dyn Paginator>;
}

/// Default factory producing [`PageNumPagination`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PageNumPaginatorFactory;

impl PaginatorFactory for PageNumPaginatorFactory {
    fn create(&self, total: u64, page_size: u64, params: Option<&PageParams>) -> Box<dyn Paginator> {
        let mut paginator = PageNumPagination::new(total, page_size);
        if let Some(params) = params {
            paginator = paginator.with_params(params.clone());
        }
        Box::new(paginator)
    }
}

/// Creates the content filter a build starts from.
pub trait ContentFilterFactory: Send + Sync {
    /// Create an empty filter for the given classes.
    fn create(&self, classes: &[String], include_classes: bool) -> ContentFilter;
}

/// Default factory producing a plain [`ContentFilter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContentFilterFactory;

impl ContentFilterFactory for DefaultContentFilterFactory {
    fn create(&self, classes: &[String], include_classes: bool) -> ContentFilter {
        ContentFilter::new(classes.iter().cloned()).include_classes(include_classes)
    }
}

/// Creates sort orders for a build.
pub trait SortOrderFactory: Send + Sync {
    /// Create a sort order over a choice table.
    fn create(&self, choices: SortChoices, default_choice: Option<String>) -> SortOrder;
}

/// Default factory producing a plain [`SortOrder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSortOrderFactory;

impl SortOrderFactory for DefaultSortOrderFactory {
    fn create(&self, choices: SortChoices, default_choice: Option<String>) -> SortOrder {
        SortOrder::new(choices, default_choice)
    }
}

/// The set of collaborators a query set builds with.
#[derive(Clone)]
pub struct QueryServices {
    /// Page size lookup for settings keys.
    pub page_sizes: Option<Arc<dyn PageSizeProvider>>,
    /// Class registry used by `load_filters`.
    pub class_catalog: Option<Arc<dyn ClassCatalog>>,
    /// Attribute type to filter kind mapping.
    pub attribute_mapper: Arc<dyn AttributeFilterMapper>,
    /// Paginator factory.
    pub paginators: Arc<dyn PaginatorFactory>,
    /// Content filter factory.
    pub content_filters: Arc<dyn ContentFilterFactory>,
    /// Sort order factory.
    pub sort_orders: Arc<dyn SortOrderFactory>,
}

impl Default for QueryServices {
    fn default() -> Self {
        Self {
            page_sizes: None,
            class_catalog: None,
            attribute_mapper: Arc::new(BuiltinAttributeMapper),
            paginators: Arc::new(PageNumPaginatorFactory),
            content_filters: Arc::new(DefaultContentFilterFactory),
            sort_orders: Arc::new(DefaultSortOrderFactory),
        }
    }
}

impl QueryServices {
    /// Set the page size provider.
    pub fn with_page_sizes(mut self, provider: Arc<dyn PageSizeProvider>) -> Self {
        self.page_sizes = Some(provider);
        self
    }

    /// Set the class catalog.
    pub fn with_class_catalog(mut self, catalog: Arc<dyn ClassCatalog>) -> Self {
        self.class_catalog = Some(catalog);
        self
    }

    /// Set the attribute mapper.
    pub fn with_attribute_mapper(mut self, mapper: Arc<dyn AttributeFilterMapper>) -> Self {
        self.attribute_mapper = mapper;
        self
    }

    /// Set the paginator factory.
    pub fn with_paginators(mut self, factory: Arc<dyn PaginatorFactory>) -> Self {
        self.paginators = factory;
        self
    }

    /// Set the content filter factory.
    pub fn with_content_filters(mut self, factory: Arc<dyn ContentFilterFactory>) -> Self {
        self.content_filters = factory;
        self
    }

    /// Set the sort order factory.
    pub fn with_sort_orders(mut self, factory: Arc<dyn SortOrderFactory>) -> Self {
        self.sort_orders = factory;
        self
    }
}

impl fmt::Debug for QueryServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryServices")
            .field("page_sizes", &self.page_sizes.is_some())
            .field("class_catalog", &self.class_catalog.is_some())
            .finish_non_exhaustive()
    }
}

/// Static class catalog, mostly useful in tests and small setups.
#[derive(Debug, Clone, Default)]
pub struct StaticClassCatalog {
    classes: IndexMap<String, Vec<ClassAttribute>>,
}

impl StaticClassCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class with its attributes.
    pub fn with_class(
        mut self,
        identifier: impl Into<String>,
        attributes: impl IntoIterator<Item = ClassAttribute>,
    ) -> Self {
        self.classes
            .insert(identifier.into(), attributes.into_iter().collect());
        self
    }
}

impl ClassCatalog for StaticClassCatalog {
    fn attributes(&self, class_identifier: &str) -> Option<Vec<ClassAttribute>> {
        self.classes.get(class_identifier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog() {
        let catalog = StaticClassCatalog::new().with_class(
            "article",
            [ClassAttribute::new("title", "ezstring")],
        );
        assert_eq!(catalog.attributes("article").map(|a| a.len()), Some(1));
        assert!(catalog.attributes("folder").is_none());
    }

    #[test]
    fn test_closure_name_lookup() {
        let lookup = |ids: &[u64]| -> IndexMap<u64, String> {
            ids.iter().map(|id| (*id, format!("#{}", id))).collect()
        };
        let names = lookup.names(&[1, 2]);
        assert_eq!(names.get(&2).map(String::as_str), Some("#2"));
    }

    #[test]
    fn test_default_paginator_factory() {
        let paginator = PageNumPaginatorFactory.create(95, 10, None);
        assert_eq!(paginator.page_count(), 10);
    }
}
