//! Query sets: filter building, pagination and sorting against a content
//! store.
//!
//! A [`QuerySet`] is a mutable builder. Every builder call marks it dirty;
//! the next access to [`QuerySet::result`], [`QuerySet::count`] or
//! [`QuerySet::content_filter`] rebuilds from scratch. A failed build
//! commits nothing, so the next access retries.
//!
//! ```rust
//! use canopy_query::{ContentStore, CountQuery, ItemQuery, QueryResult, QuerySet};
//!
//! struct Titles;
//!
//! impl ContentStore for Titles {
//!     type Item = String;
//!
//!     fn count(&self, _query: &CountQuery) -> QueryResult<u64> {
//!         Ok(12)
//!     }
//!
//!     fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<String>>> {
//!         Ok(Some((query.offset..query.offset + query.limit).map(|i| format!("#{}", i)).collect()))
//!     }
//! }
//!
//! # fn main() -> QueryResult<()> {
//! let mut set = QuerySet::new(Titles);
//! set.classes(["article"])
//!     .define_filter("title", "string", None)?
//!     .filter("title", "foo")
//!     .page(2)
//!     .page_limit(5);
//!
//! let result = set.result()?;
//! assert_eq!(result.total(), Some(12));
//! assert_eq!(result.items()[0], "#5");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::config::{CanopyConfig, DEFAULT_PAGE_LIMIT};
use crate::content::{DEFAULT_PARENT_NODE_ID, NodeTarget};
use crate::content_filter::{ContentFilter, ContentFilterIncrement};
use crate::error::{QueryError, QueryResult};
use crate::field_filter::{FieldFilter, FilterMode, FilterType};
use crate::iterator::QuerySetIterator;
use crate::pagination::{Page, PageLimit, PageParams};
use crate::params::QueryParams;
use crate::query_filter::{FilterPayload, QueryFilter};
use crate::result::ResultSet;
use crate::snapshot::QuerySnapshot;
use crate::sort::{SortChoices, SortField, SortMode, SortOrder, default_sort_choices};
use crate::store::{CountQuery, DepthOperator, ItemQuery, QueryScope, RoleScope};
use crate::traits::{ContentStore, QueryServices};
use crate::value::FilterValue;

/// Sort choice used when nothing else is configured.
pub const DEFAULT_SORT_CHOICE: &str = "newest";

/// Query parameter read in [`SortMode::Query`].
pub const DEFAULT_SORT_QUERY_NAME: &str = "sort";

struct BuildCache<T> {
    content_filter: Option<ContentFilter>,
    total: Option<u64>,
    result: Option<ResultSet<T>>,
}

impl<T> Default for BuildCache<T> {
    fn default() -> Self {
        Self {
            content_filter: None,
            total: None,
            result: None,
        }
    }
}

impl<T> BuildCache<T> {
    /// Everything but the result, which would need `T: Clone`.
    fn fork(&self) -> Self {
        Self {
            content_filter: self.content_filter.clone(),
            total: self.total,
            result: None,
        }
    }
}

/// Builder for one query against a content store.
pub struct QuerySet<S: ContentStore> {
    store: Arc<S>,
    services: QueryServices,
    filter: QueryFilter,
    scope: QueryScope,
    include_classes: bool,
    filter_mode: FilterMode,
    allow_user_input: bool,
    query: QueryParams,
    paginate: bool,
    page_number: Option<i64>,
    page_params: Option<PageParams>,
    page_limit: Option<PageLimit>,
    default_page_limit: Option<u64>,
    limit_setting: Option<String>,
    sort_mode: SortMode,
    sort_field: Option<String>,
    sort_query_name: Option<String>,
    sort_array: Option<Vec<SortField>>,
    sort_choices: SortChoices,
    sort_choice_names: Option<IndexSet<String>>,
    default_sort: Option<String>,
    dirty: bool,
    cache: BuildCache<S::Item>,
}

impl<S: ContentStore> QuerySet<S> {
    /// Create a query set over a store.
    pub fn new(store: S) -> Self {
        Self::shared(Arc::new(store))
    }

    /// Create a query set over a shared store.
    pub fn shared(store: Arc<S>) -> Self {
        Self {
            store,
            services: QueryServices::default(),
            filter: QueryFilter::new(),
            scope: QueryScope::default(),
            include_classes: true,
            filter_mode: FilterMode::default(),
            allow_user_input: false,
            query: QueryParams::new(),
            paginate: false,
            page_number: None,
            page_params: None,
            page_limit: None,
            default_page_limit: None,
            limit_setting: None,
            sort_mode: SortMode::default(),
            sort_field: None,
            sort_query_name: Some(DEFAULT_SORT_QUERY_NAME.to_string()),
            sort_array: None,
            sort_choices: default_sort_choices(),
            sort_choice_names: None,
            default_sort: Some(DEFAULT_SORT_CHOICE.to_string()),
            dirty: false,
            cache: BuildCache::default(),
        }
    }

    /// Create a query set configured from `config`.
    pub fn with_config(store: Arc<S>, config: &CanopyConfig) -> QueryResult<Self> {
        let mut set = Self::shared(store);
        set.apply_config(config)?;
        Ok(set)
    }

    /// Replace the collaborators.
    pub fn with_services(mut self, services: QueryServices) -> Self {
        self.services = services;
        self.dirty = true;
        self
    }

    /// Apply configuration. Nothing changes if a value is invalid.
    pub fn apply_config(&mut self, config: &CanopyConfig) -> QueryResult<&mut Self> {
        let sort_mode = config.sorting.sort_mode()?;
        let filter_mode = config.filters.filter_mode()?;
        let scope = config.scope.query_scope()?;
        let mapper = config.attribute_filters.mapper()?;

        self.default_page_limit = Some(config.pagination.default_page_limit);
        self.limit_setting = config.pagination.limit_setting.clone();
        self.page_params = config.pagination.page_params();
        self.sort_mode = sort_mode;
        self.default_sort = Some(config.sorting.default_choice.clone());
        self.sort_query_name = Some(config.sorting.query_name.clone());
        self.sort_choice_names = config
            .sorting
            .choice_names
            .as_ref()
            .map(|names| names.iter().cloned().collect());
        self.filter_mode = filter_mode;
        self.allow_user_input = config.filters.allow_user_input;
        self.scope = QueryScope {
            role_scope: self.scope.role_scope.clone(),
            ..scope
        };
        self.services.attribute_mapper = Arc::new(mapper);
        Ok(self.touch())
    }

    fn touch(&mut self) -> &mut Self {
        self.dirty = true;
        self
    }

    // ==================== Accessors ====================

    /// The content store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The collaborators.
    pub fn services(&self) -> &QueryServices {
        &self.services
    }

    /// Filter definitions, values and nested entries.
    pub fn query_filter(&self) -> &QueryFilter {
        &self.filter
    }

    /// Query parameters used for user input, paging and sorting.
    pub fn params(&self) -> &QueryParams {
        &self.query
    }

    /// Whether a builder call happened since the last build.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether results are paginated.
    pub fn is_paginated(&self) -> bool {
        self.paginate
    }

    // ==================== Scope ====================

    /// Add content classes.
    pub fn classes(&mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.filter.add_classes(classes);
        self.touch()
    }

    /// Remove all content classes.
    pub fn clear_classes(&mut self) -> &mut Self {
        self.filter.clear_classes();
        self.touch()
    }

    /// Return everything except the listed classes.
    pub fn exclude_classes(&mut self) -> &mut Self {
        self.include_classes = false;
        self.touch()
    }

    /// Return only the listed classes (the default).
    pub fn include_classes(&mut self) -> &mut Self {
        self.include_classes = true;
        self.touch()
    }

    /// Search below a node. References without a node fall back to the
    /// content root.
    pub fn parent_node(&mut self, node: impl Into<NodeTarget>) -> &mut Self {
        self.scope.parent_node_id = match node.into().node_id() {
            Some(id) => id,
            None => {
                warn!("Parent reference has no node, using the content root");
                DEFAULT_PARENT_NODE_ID
            }
        };
        self.touch()
    }

    /// Search below the content root again.
    pub fn reset_parent_node(&mut self) -> &mut Self {
        self.scope.parent_node_id = DEFAULT_PARENT_NODE_ID;
        self.touch()
    }

    /// Limit the depth; `None` searches the whole sub-tree.
    pub fn depth(&mut self, depth: Option<u32>) -> &mut Self {
        self.scope.depth = depth;
        self.touch()
    }

    /// Set the depth comparison (`eq`, `lt`, `le`, `gt`, `ge` or symbols).
    pub fn depth_operator(&mut self, operator: &str) -> QueryResult<&mut Self> {
        self.scope.depth_operator = operator.parse::<DepthOperator>()?;
        Ok(self.touch())
    }

    /// Only return main node placements.
    pub fn main_node_only(&mut self, main_node_only: bool) -> &mut Self {
        self.scope.main_node_only = main_node_only;
        self.touch()
    }

    /// Skip the default visibility rules.
    pub fn ignore_visibility(&mut self, ignore: bool) -> &mut Self {
        self.scope.ignore_visibility = ignore;
        self.touch()
    }

    /// Set whose permissions limit the result.
    pub fn role_scope(&mut self, role_scope: RoleScope) -> &mut Self {
        self.scope.role_scope = role_scope;
        self.touch()
    }

    // ==================== Filters ====================

    /// Define (or replace) a filter. See [`QueryFilter::define_filter`].
    pub fn define_filter(
        &mut self,
        name: impl Into<String>,
        filter_type: impl Into<FilterType>,
        attribute: Option<&str>,
    ) -> QueryResult<&mut Self> {
        self.filter.define_filter(name, filter_type, attribute)?;
        Ok(self.touch())
    }

    /// Set a filter value. See [`QueryFilter::filter`].
    pub fn filter(&mut self, name: &str, value: impl Into<FilterValue>) -> &mut Self {
        self.filter.filter(name, value);
        self.touch()
    }

    /// Set several filter values in order.
    pub fn filters<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FilterValue>,
    {
        self.filter.filters(values);
        self.touch()
    }

    /// Group filters under a condition. See [`QueryFilter::sub_query`].
    pub fn sub_query<F>(&mut self, condition: impl Into<SmolStr>, build: F) -> QueryResult<&mut Self>
    where
        F: FnOnce(&mut QueryFilter) -> QueryResult<()>,
    {
        self.filter.sub_query(condition, build)?;
        Ok(self.touch())
    }

    /// Append nested entries. See [`QueryFilter::add_filter`].
    pub fn add_filter(&mut self, payload: impl Into<FilterPayload>) -> QueryResult<&mut Self> {
        self.filter.add_filter(payload)?;
        Ok(self.touch())
    }

    /// Define filters for every attribute of the query set's classes.
    pub fn load_filters(&mut self) -> QueryResult<&mut Self> {
        self.load_class_filters(None)
    }

    /// Define filters for every attribute of the given classes.
    pub fn load_filters_for(&mut self, classes: &[String]) -> QueryResult<&mut Self> {
        self.load_class_filters(Some(classes))
    }

    fn load_class_filters(&mut self, classes: Option<&[String]>) -> QueryResult<&mut Self> {
        let catalog = self
            .services
            .class_catalog
            .clone()
            .ok_or_else(|| QueryError::missing_configuration("class_catalog"))?;
        let mapper = Arc::clone(&self.services.attribute_mapper);
        self.filter
            .load_filters(classes, catalog.as_ref(), mapper.as_ref())?;
        Ok(self.touch())
    }

    /// Clear a defined filter's selection and raw value.
    pub fn reset_filter(&mut self, name: &str) -> &mut Self {
        self.filter.reset_filter(name);
        self.touch()
    }

    /// How defined filters are emitted: `attribute` or `nested`.
    pub fn filter_mode(&mut self, mode: &str) -> QueryResult<&mut Self> {
        self.filter_mode = mode.parse()?;
        Ok(self.touch())
    }

    /// Resolve filter selections from the query parameters.
    pub fn allow_user_input(&mut self, allow: bool) -> &mut Self {
        self.allow_user_input = allow;
        self.touch()
    }

    /// Set the query parameters.
    pub fn query(&mut self, params: QueryParams) -> &mut Self {
        self.query = params;
        self.touch()
    }

    // ==================== Pagination ====================

    /// Paginate and fetch page `num`.
    ///
    /// Numbers past either end resolve to the last page.
    pub fn page(&mut self, num: i64) -> &mut Self {
        self.paginate = true;
        self.page_number = Some(num);
        self.touch()
    }

    /// Paginate and take the page from the query parameters.
    ///
    /// `params` enables named page sizes; `None` keeps the current ones.
    pub fn page_from_query(&mut self, params: Option<PageParams>) -> &mut Self {
        self.paginate = true;
        self.page_number = None;
        if params.is_some() {
            self.page_params = params;
        }
        self.touch()
    }

    /// Turn pagination off.
    pub fn unpaginated(&mut self) -> &mut Self {
        self.paginate = false;
        self.page_number = None;
        self.touch()
    }

    /// Set the page size.
    pub fn page_limit(&mut self, limit: impl Into<PageLimit>) -> &mut Self {
        self.page_limit = Some(limit.into());
        self.touch()
    }

    /// Set the configured default page size.
    pub fn default_page_limit(&mut self, limit: u64) -> &mut Self {
        self.default_page_limit = Some(limit);
        self.touch()
    }

    /// Look the default page size up under a settings key.
    pub fn limit_setting(&mut self, key: impl Into<String>) -> &mut Self {
        self.limit_setting = Some(key.into());
        self.touch()
    }

    /// Default page size: settings key through the page size provider,
    /// then the configured default, then 10.
    pub fn resolved_default_page_limit(&self) -> u64 {
        let from_settings = self.limit_setting.as_deref().and_then(|key| {
            let size = self.services.page_sizes.as_ref()?.page_size(key);
            if size.is_none() {
                debug!(setting = key, "No page size for settings key");
            }
            size
        });
        from_settings
            .or(self.default_page_limit)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    fn page_size(&self) -> u64 {
        match self.page_limit {
            Some(PageLimit::Fixed(size)) => size,
            Some(PageLimit::Default) | None => self.resolved_default_page_limit(),
        }
    }

    fn resolve_page(&self, total: u64) -> Page {
        let mut paginator =
            self.services
                .paginators
                .create(total, self.page_size(), self.page_params.as_ref());
        paginator.resolve_query(&self.query);
        let num = self
            .page_number
            .unwrap_or_else(|| paginator.query_page(&self.query));
        match paginator.page(num) {
            Some(page) => page,
            None => {
                warn!(page = num, "Page number below 1, using the last page");
                paginator.last_page()
            }
        }
    }

    // ==================== Sorting ====================

    /// Sort by a choice token set here; `None` uses the default choice.
    pub fn sort_by_field(&mut self, field: Option<&str>) -> &mut Self {
        self.sort_mode = SortMode::Property;
        self.sort_field = field.map(str::to_string);
        self.touch()
    }

    /// Sort by the token in a query parameter; `None` uses the default
    /// choice.
    pub fn sort_by_query(&mut self, query_name: Option<&str>) -> &mut Self {
        self.sort_mode = SortMode::Query;
        self.sort_query_name = query_name.map(str::to_string);
        self.touch()
    }

    /// Set the sort mode by name: `property` or `query`.
    pub fn sort_mode(&mut self, mode: &str) -> QueryResult<&mut Self> {
        self.sort_mode = mode.parse()?;
        Ok(self.touch())
    }

    /// Use this ordering regardless of the choice table; `None` removes
    /// the override.
    pub fn sort_array(&mut self, ordering: Option<Vec<SortField>>) -> &mut Self {
        self.sort_array = ordering;
        self.touch()
    }

    /// Add sort choices; `None` restores the defaults.
    pub fn sort_choices(&mut self, choices: Option<SortChoices>) -> &mut Self {
        match choices {
            Some(choices) => self.sort_choices.extend(choices),
            None => self.sort_choices = default_sort_choices(),
        }
        self.touch()
    }

    /// Restrict the choice table to these names (accumulates).
    pub fn sort_choice_names(&mut self, names: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.sort_choice_names
            .get_or_insert_with(IndexSet::new)
            .extend(names.into_iter().map(Into::into));
        self.touch()
    }

    /// Lift the choice restriction.
    pub fn clear_sort_choice_names(&mut self) -> &mut Self {
        self.sort_choice_names = None;
        self.touch()
    }

    /// Set the default choice; `None` leaves ordering to the store when no
    /// token decodes.
    pub fn default_sort(&mut self, choice: Option<&str>) -> &mut Self {
        self.default_sort = choice.map(str::to_string);
        self.touch()
    }

    fn resolve_sort_order(&self) -> SortOrder {
        let mut choices = self.sort_choices.clone();
        if let Some(names) = &self.sort_choice_names {
            choices.retain(|name, _| names.contains(name));
        }
        let mut order = self.services.sort_orders.create(choices, self.default_sort.clone());
        let token = match self.sort_mode {
            SortMode::Property => self.sort_field.as_deref(),
            SortMode::Query => self
                .sort_query_name
                .as_deref()
                .and_then(|name| self.query.get_str(name)),
        };
        order.resolve_query(token);
        if self.sort_array.is_some() {
            order.resolve_array(self.sort_array.clone());
        }
        order
    }

    // ==================== Building ====================

    fn query_scope(&self) -> QueryScope {
        let mut scope = self.scope.clone();
        scope.ignore_visibility |= self.filter.ignores_visibility();
        scope
    }

    fn build_content_filter(&self) -> QueryResult<ContentFilter> {
        let classes: Vec<String> = self.filter.classes().iter().cloned().collect();
        let mut content = self
            .services
            .content_filters
            .create(&classes, self.include_classes);
        let objects = self.filter.object_filters();
        if !objects.is_empty() {
            content.merge(ContentFilterIncrement::nested(objects.to_vec()))?;
        }
        let query = self.allow_user_input.then_some(&self.query);
        let definitions = self.filter.resolve_definitions(query);
        content.set_filters(
            definitions.iter().map(|f| f.as_ref() as &dyn FieldFilter),
            self.filter_mode,
        )?;
        trace!(
            classes = classes.len(),
            attributes = content.attributes().len(),
            nested = content.nested_entries().len(),
            "Built content filter"
        );
        Ok(content)
    }

    fn count_with(&self, content: &ContentFilter) -> QueryResult<u64> {
        let query = CountQuery::new(content, self.query_scope());
        debug!(
            parent_node_id = query.scope.parent_node_id,
            classes = query.classes.len(),
            "Dispatching count query"
        );
        self.store.count(&query)
    }

    /// Run a full build without touching the cache, reusing a known
    /// content filter and total when given.
    pub(crate) fn execute(
        &self,
        content: Option<&ContentFilter>,
        total: Option<u64>,
    ) -> QueryResult<ResultSet<S::Item>> {
        let content = match content {
            Some(content) => content.clone(),
            None => self.build_content_filter()?,
        };
        let (total, page) = if self.paginate {
            let total = match total {
                Some(total) => total,
                None => self.count_with(&content)?,
            };
            (Some(total), Some(self.resolve_page(total)))
        } else {
            (None, None)
        };
        let sort_order = self.resolve_sort_order();
        let (offset, limit) = match page {
            Some(page) => (page.offset, page.size),
            None => (0, self.resolved_default_page_limit()),
        };
        let query = ItemQuery::new(CountQuery::new(&content, self.query_scope()), offset, limit)
            .with_sort(sort_order.ordering().map(<[SortField]>::to_vec));
        debug!(
            parent_node_id = query.base.scope.parent_node_id,
            offset,
            limit,
            sort = ?sort_order.identifier(),
            "Dispatching item query"
        );
        let items = self.store.fetch(&query)?.ok_or_else(|| {
            warn!("Content store returned no item list");
            QueryError::empty_store_result()
        })?;
        Ok(ResultSet::new(items, total, page, sort_order, content))
    }

    /// Count matches without a cached value.
    pub(crate) fn execute_count(&self, content: Option<&ContentFilter>) -> QueryResult<u64> {
        match content {
            Some(content) => self.count_with(content),
            None => self.count_with(&self.build_content_filter()?),
        }
    }

    fn refresh(&mut self) {
        if self.dirty {
            trace!("Discarding stale build state");
            self.cache = BuildCache::default();
            self.dirty = false;
        }
    }

    /// The content filter for the current state.
    pub fn content_filter(&mut self) -> QueryResult<&ContentFilter> {
        self.refresh();
        let content = match self.cache.content_filter.take() {
            Some(content) => content,
            None => self.build_content_filter()?,
        };
        Ok(self.cache.content_filter.insert(content))
    }

    /// Total number of matches.
    pub fn count(&mut self) -> QueryResult<u64> {
        self.refresh();
        if let Some(total) = self.cache.total {
            return Ok(total);
        }
        let total = match &self.cache.content_filter {
            Some(content) => self.count_with(content)?,
            None => {
                let content = self.build_content_filter()?;
                let total = self.count_with(&content)?;
                self.cache.content_filter = Some(content);
                total
            }
        };
        self.cache.total = Some(total);
        Ok(total)
    }

    /// The result for the current state, built on first access.
    pub fn result(&mut self) -> QueryResult<&ResultSet<S::Item>> {
        self.refresh();
        let result = match self.cache.result.take() {
            Some(result) => result,
            None => {
                let result = self.execute(self.cache.content_filter.as_ref(), self.cache.total)?;
                self.cache.content_filter = Some(result.content_filter().clone());
                if let Some(total) = result.total() {
                    self.cache.total = Some(total);
                }
                result
            }
        };
        Ok(self.cache.result.insert(result))
    }

    /// Items of the result.
    pub fn items(&mut self) -> QueryResult<&[S::Item]> {
        Ok(self.result()?.items())
    }

    /// Iterate over every match, one page at a time.
    ///
    /// Counts once; the page size follows the page limit settings.
    pub fn iter(&mut self) -> QueryResult<QuerySetIterator<S>> {
        let total = self.count()?;
        let scope = self.query_scope();
        let base = CountQuery::new(self.content_filter()?, scope);
        Ok(self.iterator_over(base, total))
    }

    pub(crate) fn iterator_over(&self, base: CountQuery, total: u64) -> QuerySetIterator<S> {
        let sort = self.resolve_sort_order().ordering().map(<[SortField]>::to_vec);
        let paginator = self.services.paginators.create(total, self.page_size(), None);
        QuerySetIterator::new(Arc::clone(&self.store), base, sort, paginator)
    }

    pub(crate) fn scope_for_iteration(&self) -> QueryScope {
        self.query_scope()
    }

    pub(crate) fn build_filter(&self) -> QueryResult<ContentFilter> {
        self.build_content_filter()
    }

    /// Switch to copy-on-write snapshots.
    pub fn freeze(self) -> QuerySnapshot<S> {
        QuerySnapshot::new(self)
    }
}

impl<S: ContentStore> Clone for QuerySet<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            services: self.services.clone(),
            filter: self.filter.clone(),
            scope: self.scope.clone(),
            include_classes: self.include_classes,
            filter_mode: self.filter_mode,
            allow_user_input: self.allow_user_input,
            query: self.query.clone(),
            paginate: self.paginate,
            page_number: self.page_number,
            page_params: self.page_params.clone(),
            page_limit: self.page_limit,
            default_page_limit: self.default_page_limit,
            limit_setting: self.limit_setting.clone(),
            sort_mode: self.sort_mode,
            sort_field: self.sort_field.clone(),
            sort_query_name: self.sort_query_name.clone(),
            sort_array: self.sort_array.clone(),
            sort_choices: self.sort_choices.clone(),
            sort_choice_names: self.sort_choice_names.clone(),
            default_sort: self.default_sort.clone(),
            dirty: self.dirty,
            cache: self.cache.fork(),
        }
    }
}

impl<S: ContentStore> fmt::Debug for QuerySet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("filter", &self.filter)
            .field("scope", &self.scope)
            .field("include_classes", &self.include_classes)
            .field("filter_mode", &self.filter_mode)
            .field("paginate", &self.paginate)
            .field("page_number", &self.page_number)
            .field("page_limit", &self.page_limit)
            .field("sort_mode", &self.sort_mode)
            .field("sort_field", &self.sort_field)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
