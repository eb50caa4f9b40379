//! The filter builder.
//!
//! A [`QueryFilter`] collects filter definitions, raw values for them and
//! structural entries. Sub-queries group entries under their own condition.
//!
//! ```rust
//! use canopy_query::{NestedItem, QueryFilter};
//!
//! let mut filter = QueryFilter::new();
//! filter.define_filter("title", "string", None).unwrap();
//! filter.filter("title", "Hello").filter("section", 3);
//! filter
//!     .sub_query("or", |sub| {
//!         sub.filter("priority:<", 1000).filter("folder/menu", true);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! // Two object filters plus the resolved `title` leaf.
//! assert_eq!(filter.nested().len(), 3);
//! assert!(matches!(filter.nested()[2], NestedItem::Leaf(_)));
//! ```

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::content_filter::{CompositeFilter, NestedItem};
use crate::error::{QueryError, QueryResult};
use crate::field_filter::{FieldFilter, FilterKind, FilterType};
use crate::params::QueryParams;
use crate::structural::FilterTarget;
use crate::traits::{AttributeFilterMapper, ClassCatalog};
use crate::value::FilterValue;

/// Something that can be added to the nested entries with
/// [`QueryFilter::add_filter`].
#[derive(Debug, Clone)]
pub enum FilterPayload {
    /// A single entry.
    Item(NestedItem),
    /// Several entries, appended in order.
    Items(Vec<NestedItem>),
    /// JSON form of one entry or a list of entries.
    Json(Value),
    /// A complete builder, added as a composite under its condition.
    Query(QueryFilter),
}

impl From<NestedItem> for FilterPayload {
    fn from(item: NestedItem) -> Self {
        Self::Item(item)
    }
}

impl From<Vec<NestedItem>> for FilterPayload {
    fn from(items: Vec<NestedItem>) -> Self {
        Self::Items(items)
    }
}

impl From<Value> for FilterPayload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<QueryFilter> for FilterPayload {
    fn from(query: QueryFilter) -> Self {
        Self::Query(query)
    }
}

impl From<CompositeFilter> for FilterPayload {
    fn from(composite: CompositeFilter) -> Self {
        Self::Item(NestedItem::Composite(composite))
    }
}

/// Builder for filter definitions, raw values and nested entries.
///
/// Cloning duplicates every filter definition, so clones never share
/// selection state.
#[derive(Debug, Clone)]
pub struct QueryFilter {
    condition: SmolStr,
    classes: IndexSet<String>,
    definitions: IndexMap<String, Box<dyn FieldFilter>>,
    raw_values: IndexMap<String, FilterValue>,
    object_filters: Vec<NestedItem>,
    ignore_visibility: bool,
    nested: OnceLock<Vec<NestedItem>>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::with_condition("and")
    }
}

impl QueryFilter {
    /// Create an empty builder joining its entries with `and`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with a condition (`and`, `or` or `merge`).
    pub fn with_condition(condition: impl Into<SmolStr>) -> Self {
        Self {
            condition: condition.into(),
            classes: IndexSet::new(),
            definitions: IndexMap::new(),
            raw_values: IndexMap::new(),
            object_filters: Vec::new(),
            ignore_visibility: false,
            nested: OnceLock::new(),
        }
    }

    /// Condition joining the entries of this builder.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Content classes.
    pub fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }

    /// Add content classes, skipping duplicates.
    pub fn add_classes(&mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.classes.extend(classes.into_iter().map(Into::into));
        self.invalidate();
        self
    }

    /// Remove all content classes.
    pub fn clear_classes(&mut self) -> &mut Self {
        self.classes.clear();
        self.invalidate();
        self
    }

    /// Defined filters by name, in definition order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &dyn FieldFilter)> {
        self.definitions.iter().map(|(name, f)| (name.as_str(), f.as_ref()))
    }

    /// A defined filter.
    pub fn definition(&self, name: &str) -> Option<&dyn FieldFilter> {
        self.definitions.get(name).map(|f| f.as_ref())
    }

    /// Raw values waiting for resolution, by filter name.
    pub fn raw_values(&self) -> &IndexMap<String, FilterValue> {
        &self.raw_values
    }

    /// Structural entries, sub-queries and added filters, in order.
    pub fn object_filters(&self) -> &[NestedItem] {
        &self.object_filters
    }

    /// Whether a visibility filter switched off the default visibility rules.
    pub fn ignores_visibility(&self) -> bool {
        self.ignore_visibility
    }

    /// Define (or replace) a filter.
    ///
    /// `attribute` defaults to `name` and may carry an operator and
    /// modifiers, e.g. `title:lower:like`. Symbolic kinds other than
    /// `int`, `bool` and `string` fail.
    pub fn define_filter(
        &mut self,
        name: impl Into<String>,
        filter_type: impl Into<FilterType>,
        attribute: Option<&str>,
    ) -> QueryResult<&mut Self> {
        let name = name.into();
        let identifier = attribute.filter(|a| !a.is_empty()).unwrap_or(name.as_str());
        let filter = filter_type.into().into_filter(identifier)?;
        trace!(filter = %name, kind = filter.kind().as_str(), "Defined filter");
        self.definitions.insert(name, filter);
        self.invalidate();
        Ok(self)
    }

    /// Set a filter value.
    ///
    /// Defined names store the raw value for resolution at build time.
    /// Structural names (`path`, `section`, `depth`, `node_id`, ...) and
    /// `class/attribute` names become object filters. Anything else is
    /// kept as a raw value for a filter defined later.
    pub fn filter(&mut self, name: &str, value: impl Into<FilterValue>) -> &mut Self {
        let value = value.into();
        if self.definitions.contains_key(name) {
            self.raw_values.insert(name.to_string(), value);
        } else {
            match FilterTarget::classify(name, value) {
                FilterTarget::Structural { filter, visibility } => {
                    if visibility {
                        self.ignore_visibility = true;
                    }
                    self.object_filters.push(NestedItem::Structural(filter));
                }
                FilterTarget::AttributePath(filter) => {
                    self.object_filters.push(NestedItem::Structural(filter));
                }
                FilterTarget::Raw { name, value } => {
                    self.raw_values.insert(name, value);
                }
            }
        }
        self.invalidate();
        self
    }

    /// Set several filter values in order.
    pub fn filters<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FilterValue>,
    {
        for (name, value) in values {
            self.filter(name.as_ref(), value);
        }
        self
    }

    /// Group entries under `condition`.
    ///
    /// The closure receives a child builder that knows this builder's
    /// filter definitions (with empty selections). When it returns, the
    /// child is appended as one composite entry. A failing closure leaves
    /// this builder unchanged.
    pub fn sub_query<F>(&mut self, condition: impl Into<SmolStr>, build: F) -> QueryResult<&mut Self>
    where
        F: FnOnce(&mut QueryFilter) -> QueryResult<()>,
    {
        let mut child = self.child(condition.into());
        build(&mut child)?;
        if child.ignore_visibility {
            self.ignore_visibility = true;
        }
        let composite = child.into_composite();
        trace!(
            condition = %composite.condition,
            children = composite.children.len(),
            "Added sub-query"
        );
        self.object_filters.push(NestedItem::Composite(composite));
        self.invalidate();
        Ok(self)
    }

    fn child(&self, condition: SmolStr) -> QueryFilter {
        let mut child = QueryFilter::with_condition(condition);
        child.definitions = self
            .definitions
            .iter()
            .map(|(name, filter)| {
                let mut filter = filter.clone();
                filter.reset();
                (name.clone(), filter)
            })
            .collect();
        child
    }

    /// Append nested entries directly.
    ///
    /// JSON payloads are read with [`NestedItem::from_json`]; a JSON array
    /// of arrays or objects is a list of entries. Nothing is added if any
    /// entry is rejected.
    pub fn add_filter(&mut self, payload: impl Into<FilterPayload>) -> QueryResult<&mut Self> {
        let items = match payload.into() {
            FilterPayload::Item(item) => vec![item],
            FilterPayload::Items(items) => items,
            FilterPayload::Json(value) => Self::items_from_json(&value)?,
            FilterPayload::Query(query) => {
                if query.ignore_visibility {
                    self.ignore_visibility = true;
                }
                vec![NestedItem::Composite(query.into_composite())]
            }
        };
        self.object_filters.extend(items);
        self.invalidate();
        Ok(self)
    }

    fn items_from_json(value: &Value) -> QueryResult<Vec<NestedItem>> {
        match value {
            Value::Array(entries)
                if !entries.is_empty() && entries.iter().all(|e| e.is_array() || e.is_object()) =>
            {
                entries.iter().map(NestedItem::from_json).collect()
            }
            Value::Array(_) | Value::Object(_) => Ok(vec![NestedItem::from_json(value)?]),
            other => Err(QueryError::unsupported_filter_type(other.to_string())),
        }
    }

    /// Define one filter per attribute of each class, named `class/attribute`.
    ///
    /// `None` uses this builder's classes; an empty list defines nothing.
    /// The mapper picks the filter type; unmapped attributes fall back to
    /// their data type. Unknown classes fail and nothing is defined.
    pub fn load_filters(
        &mut self,
        classes: Option<&[String]>,
        catalog: &dyn ClassCatalog,
        mapper: &dyn AttributeFilterMapper,
    ) -> QueryResult<&mut Self> {
        let classes: Vec<String> = match classes {
            Some(classes) => classes.to_vec(),
            None => self.classes.iter().cloned().collect(),
        };
        let mut loaded = Vec::new();
        for class in &classes {
            let attributes = catalog
                .attributes(class)
                .ok_or_else(|| QueryError::unknown_content_class(class.as_str()))?;
            for attribute in attributes {
                let name = format!("{}/{}", class, attribute.identifier);
                let filter_type = mapper
                    .filter_for(class, &attribute)
                    .unwrap_or_else(|| FilterKind::for_data_type(&attribute.data_type).into());
                let filter = filter_type.into_filter(&name)?;
                loaded.push((name, filter));
            }
        }
        debug!(classes = classes.len(), filters = loaded.len(), "Loaded class filters");
        self.definitions.extend(loaded);
        self.invalidate();
        Ok(self)
    }

    /// Clear a defined filter's selection and its raw value.
    pub fn reset_filter(&mut self, name: &str) -> &mut Self {
        if let Some(filter) = self.definitions.get_mut(name) {
            filter.reset();
        }
        self.raw_values.shift_remove(name);
        self.invalidate();
        self
    }

    /// Copies of the defined filters with raw values applied, then user
    /// input from `query` when given.
    pub fn resolve_definitions(&self, query: Option<&QueryParams>) -> Vec<Box<dyn FieldFilter>> {
        for name in self.raw_values.keys() {
            if !self.definitions.contains_key(name) {
                warn!(filter = %name, "Raw filter value has no matching definition");
            }
        }
        self.definitions
            .iter()
            .map(|(name, filter)| {
                let mut filter = filter.clone();
                if let Some(raw) = self.raw_values.get(name) {
                    if !filter.resolve_input(raw) {
                        trace!(filter = %name, "Raw filter value coerced to nothing");
                    }
                }
                if let Some(query) = query {
                    filter.resolve_query(query);
                }
                filter
            })
            .collect()
    }

    /// Entries this builder contributes to a nested tree: object filters
    /// followed by a leaf for every defined filter with a selection.
    ///
    /// Memoized until the next change.
    pub fn nested(&self) -> &[NestedItem] {
        self.nested.get_or_init(|| {
            let mut items = self.object_filters.clone();
            items.extend(
                self.resolve_definitions(None)
                    .iter()
                    .filter_map(|filter| filter.leaf())
                    .map(NestedItem::Leaf),
            );
            items
        })
    }

    /// Turn the builder into a composite entry.
    pub fn into_composite(self) -> CompositeFilter {
        let children = self.nested().to_vec();
        CompositeFilter::new(self.condition, children)
    }

    fn invalidate(&mut self) {
        self.nested.take();
    }
}
