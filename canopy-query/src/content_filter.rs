//! Content filter aggregation and the nested filter merge.
//!
//! A [`ContentFilter`] collects everything a build contributes: class
//! restrictions, flat attribute leaves, nested filter entries and the legacy
//! single-slot extended filter. Increments are folded in with
//! [`ContentFilter::merge`].
//!
//! ```rust
//! use canopy_query::{
//!     CompositeFilter, ContentFilter, ContentFilterIncrement, FilterLeaf, NestedItem,
//!     StructuralFilter,
//! };
//!
//! let mut filter = ContentFilter::new(["article"]);
//! filter
//!     .merge(ContentFilterIncrement::nested(vec![
//!         NestedItem::Structural(StructuralFilter::new("section", 1)),
//!         NestedItem::Composite(CompositeFilter::new(
//!             "or",
//!             vec![
//!                 NestedItem::Leaf(FilterLeaf::new("title", "=", vec!["a".into()])),
//!                 NestedItem::Leaf(FilterLeaf::new("title", "=", vec!["b".into()])),
//!             ],
//!         )),
//!     ]))
//!     .unwrap();
//!
//! let tree = filter.nested_tree().unwrap();
//! assert_eq!(tree.children.len(), 2);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;
use tracing::trace;

use crate::error::{QueryError, QueryResult};
use crate::field_filter::{DEFAULT_OPERATOR, FieldFilter, FilterMode};
use crate::structural::StructuralFilter;
use crate::value::FilterValue;

/// Identifier of the extended filter that carries the nested tree.
pub const NESTED_FILTER_SET_ID: &str = "NestedFilterSet";

/// Field and value modifiers of a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Applied to the field before comparison.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub pre: SmallVec<[SmolStr; 2]>,
    /// Applied to the value before comparison.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub post: SmallVec<[SmolStr; 2]>,
}

impl Modifiers {
    /// `None` when both lists are empty.
    pub fn new(pre: SmallVec<[SmolStr; 2]>, post: SmallVec<[SmolStr; 2]>) -> Option<Self> {
        if pre.is_empty() && post.is_empty() {
            None
        } else {
            Some(Self { pre, post })
        }
    }
}

/// A single attribute comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterLeaf {
    /// Attribute identifier.
    pub attribute: String,
    /// Relational operator.
    pub operator: SmolStr,
    /// Values compared against, in selection order.
    pub values: Vec<FilterValue>,
    /// Modifiers, `None` when there are none.
    pub modifiers: Option<Modifiers>,
}

impl FilterLeaf {
    /// Create a leaf without modifiers.
    pub fn new(
        attribute: impl Into<String>,
        operator: impl Into<SmolStr>,
        values: Vec<FilterValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator: operator.into(),
            values,
            modifiers: None,
        }
    }

    /// Attach modifiers.
    pub fn with_modifiers(mut self, modifiers: Option<Modifiers>) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Condition tag of a composite entry, including `merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    /// All children must match.
    #[default]
    And,
    /// Any child must match.
    Or,
    /// Children are spliced into the parent.
    Merge,
}

impl Condition {
    /// Condition name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Merge => "merge",
        }
    }
}

impl FromStr for Condition {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            "merge" => Ok(Self::Merge),
            _ => Err(QueryError::unknown_filter_condition(s)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition of a materialized node. `merge` never reaches this far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeCondition {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

/// A composite entry as added by builders: a condition tag and children.
///
/// The condition is kept as given and validated when the entry is merged
/// into a content filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeFilter {
    /// Condition tag: `and`, `or` or `merge`.
    pub condition: SmolStr,
    /// Child entries.
    pub children: Vec<NestedItem>,
}

impl CompositeFilter {
    /// Create a composite entry.
    pub fn new(condition: impl Into<SmolStr>, children: Vec<NestedItem>) -> Self {
        Self {
            condition: condition.into(),
            children,
        }
    }
}

/// An entry contributed to the nested filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedItem {
    /// Attribute comparison.
    Leaf(FilterLeaf),
    /// Structural pair.
    Structural(StructuralFilter),
    /// Group of entries under a condition.
    Composite(CompositeFilter),
}

impl NestedItem {
    /// Read an entry from its JSON form.
    ///
    /// - `[field, value]` is a structural pair,
    /// - `[attribute, values, operator?, modifiers?]` is a leaf,
    /// - `{"condition": .., "nested": [..]}` is a composite (condition
    ///   defaults to `and`).
    pub fn from_json(value: &serde_json::Value) -> QueryResult<Self> {
        use serde_json::Value;

        match value {
            Value::Array(parts) => match parts.as_slice() {
                [Value::String(field), value] => Ok(Self::Structural(StructuralFilter::new(
                    field.clone(),
                    FilterValue::from(value.clone()),
                ))),
                [Value::String(attribute), values, rest @ ..] if rest.len() <= 2 => {
                    let values = match FilterValue::from(values.clone()) {
                        FilterValue::List(items) => items,
                        FilterValue::Null => Vec::new(),
                        scalar => vec![scalar],
                    };
                    let operator = match rest.first() {
                        None | Some(Value::Null) => SmolStr::new_static(DEFAULT_OPERATOR),
                        Some(Value::String(op)) => SmolStr::new(op),
                        Some(other) => {
                            return Err(QueryError::unsupported_filter_type(format!(
                                "operator must be a string, got {}",
                                other
                            )));
                        }
                    };
                    let modifiers = match rest.get(1) {
                        None | Some(Value::Null) => None,
                        Some(raw) => serde_json::from_value::<Modifiers>(raw.clone())
                            .map_err(|e| {
                                QueryError::unsupported_filter_type(format!(
                                    "invalid modifiers {}",
                                    raw
                                ))
                                .with_source(e)
                            })
                            .map(|m| Modifiers::new(m.pre, m.post))?,
                    };
                    Ok(Self::Leaf(FilterLeaf {
                        attribute: attribute.clone(),
                        operator,
                        values,
                        modifiers,
                    }))
                }
                _ => Err(QueryError::unsupported_filter_type(value.to_string())),
            },
            Value::Object(map) => {
                let Some(Value::Array(children)) = map.get("nested") else {
                    return Err(QueryError::unsupported_filter_type(value.to_string()));
                };
                let condition = match map.get("condition") {
                    None | Some(Value::Null) => SmolStr::new_static("and"),
                    Some(Value::String(c)) => SmolStr::new(c),
                    Some(other) => return Err(QueryError::unknown_filter_condition(other.to_string())),
                };
                let children = children
                    .iter()
                    .map(Self::from_json)
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(Self::Composite(CompositeFilter {
                    condition,
                    children,
                }))
            }
            other => Err(QueryError::unsupported_filter_type(other.to_string())),
        }
    }
}

impl From<FilterLeaf> for NestedItem {
    fn from(leaf: FilterLeaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<StructuralFilter> for NestedItem {
    fn from(filter: StructuralFilter) -> Self {
        Self::Structural(filter)
    }
}

impl From<CompositeFilter> for NestedItem {
    fn from(composite: CompositeFilter) -> Self {
        Self::Composite(composite)
    }
}

/// A processed entry of the nested filter tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NestedEntry {
    /// Attribute comparison.
    Leaf(FilterLeaf),
    /// Structural pair.
    Structural(StructuralFilter),
    /// Sub-tree.
    Node(FilterNode),
}

/// A node of the nested filter tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterNode {
    /// How children combine.
    pub condition: NodeCondition,
    /// Children, in insertion order.
    pub children: Vec<NestedEntry>,
}

/// The legacy single-slot extended filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedFilter {
    /// Filter identifier.
    pub id: String,
    /// Filter parameters.
    pub params: IndexMap<String, FilterValue>,
}

impl ExtendedFilter {
    /// Create an extended filter.
    pub fn new(id: impl Into<String>, params: IndexMap<String, FilterValue>) -> Self {
        Self {
            id: id.into(),
            params,
        }
    }
}

/// A contribution to a [`ContentFilter`]. Empty parts are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilterIncrement {
    /// Classes to add.
    pub classes: Vec<String>,
    /// Extended filter to adopt or merge.
    pub extended: Option<ExtendedFilter>,
    /// Attribute leaves to append.
    pub attribute: Vec<FilterLeaf>,
    /// Nested entries to process and append.
    pub nested: Vec<NestedItem>,
}

impl ContentFilterIncrement {
    /// Increment with attribute leaves only.
    pub fn attribute(leaves: Vec<FilterLeaf>) -> Self {
        Self {
            attribute: leaves,
            ..Default::default()
        }
    }

    /// Increment with nested entries only.
    pub fn nested(items: Vec<NestedItem>) -> Self {
        Self {
            nested: items,
            ..Default::default()
        }
    }

    /// Increment with classes only.
    pub fn classes(classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Increment with an extended filter only.
    pub fn extended(filter: ExtendedFilter) -> Self {
        Self {
            extended: Some(filter),
            ..Default::default()
        }
    }
}

/// Class restrictions, attribute leaves and nested entries of one build.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    classes: IndexSet<String>,
    include_classes: bool,
    attributes: Vec<FilterLeaf>,
    nested: Vec<NestedEntry>,
    extended: Option<ExtendedFilter>,
    tree: OnceLock<Option<FilterNode>>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self {
            classes: IndexSet::new(),
            include_classes: true,
            attributes: Vec::new(),
            nested: Vec::new(),
            extended: None,
            tree: OnceLock::new(),
        }
    }
}

impl ContentFilter {
    /// Create a filter restricted to the given classes (included).
    pub fn new(classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Include (`true`) or exclude (`false`) the listed classes.
    pub fn include_classes(mut self, include: bool) -> Self {
        self.include_classes = include;
        self
    }

    /// Whether listed classes are included.
    pub fn includes_classes(&self) -> bool {
        self.include_classes
    }

    /// Listed classes.
    pub fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }

    /// Flat attribute leaves.
    pub fn attributes(&self) -> &[FilterLeaf] {
        &self.attributes
    }

    /// Processed nested entries.
    pub fn nested_entries(&self) -> &[NestedEntry] {
        &self.nested
    }

    /// Legacy extended filter.
    pub fn extended(&self) -> Option<&ExtendedFilter> {
        self.extended.as_ref()
    }

    /// Check for class restrictions.
    pub fn has_classes(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Check for attribute leaves.
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Check for nested entries or a parameterized extended filter.
    pub fn has_extended(&self) -> bool {
        !self.nested.is_empty() || self.extended.as_ref().is_some_and(|e| !e.params.is_empty())
    }

    /// Fold an increment into this filter.
    ///
    /// Fails with an extended filter conflict when the incoming extended
    /// filter has a different id than the current one, and with condition or
    /// type errors from nested processing. On failure the filter is left
    /// unchanged.
    pub fn merge(&mut self, increment: ContentFilterIncrement) -> QueryResult<()> {
        let ContentFilterIncrement {
            classes,
            extended,
            attribute,
            nested,
        } = increment;

        let extended = match (self.extended.take(), extended) {
            (current, None) => current,
            (None, Some(incoming)) => Some(incoming),
            (Some(mut current), Some(incoming)) if current.id == incoming.id => {
                current.params.extend(incoming.params);
                Some(current)
            }
            (Some(current), Some(incoming)) => {
                let err = QueryError::extended_filter_conflict(&incoming.id, &current.id);
                self.extended = Some(current);
                return Err(err);
            }
        };
        let processed = match Self::process_nested(nested) {
            Ok(processed) => processed,
            Err(err) => {
                self.extended = extended;
                return Err(err);
            }
        };

        self.extended = extended;
        self.classes.extend(classes);
        self.attributes.extend(attribute);
        if !processed.is_empty() {
            trace!(entries = processed.len(), "Merged nested filter entries");
            self.nested.extend(processed);
            self.tree = OnceLock::new();
        }
        Ok(())
    }

    /// Merge the contribution of one field filter, if it has any.
    pub fn set_filter(&mut self, filter: &dyn FieldFilter, mode: FilterMode) -> QueryResult<()> {
        match filter.emit(mode) {
            Some(increment) => self.merge(increment),
            None => Ok(()),
        }
    }

    /// Merge the contributions of several field filters.
    pub fn set_filters<'a>(
        &mut self,
        filters: impl IntoIterator<Item = &'a dyn FieldFilter>,
        mode: FilterMode,
    ) -> QueryResult<()> {
        for filter in filters {
            self.set_filter(filter, mode)?;
        }
        Ok(())
    }

    /// Flatten builder entries into tree entries.
    ///
    /// Composites with no remaining children are dropped, `merge`
    /// composites are spliced into the surrounding list.
    pub fn process_nested(items: Vec<NestedItem>) -> QueryResult<Vec<NestedEntry>> {
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            match item {
                NestedItem::Leaf(leaf) => entries.push(NestedEntry::Leaf(leaf)),
                NestedItem::Structural(pair) => entries.push(NestedEntry::Structural(pair)),
                NestedItem::Composite(CompositeFilter {
                    condition,
                    children,
                }) => {
                    let condition = condition.parse::<Condition>()?;
                    let children = Self::process_nested(children)?;
                    if children.is_empty() {
                        continue;
                    }
                    match condition {
                        Condition::Merge => entries.extend(children),
                        Condition::And => entries.push(NestedEntry::Node(FilterNode {
                            condition: NodeCondition::And,
                            children,
                        })),
                        Condition::Or => entries.push(NestedEntry::Node(FilterNode {
                            condition: NodeCondition::Or,
                            children,
                        })),
                    }
                }
            }
        }
        Ok(entries)
    }

    /// The nested tree: all entries under one top-level AND node.
    ///
    /// Built on first access and kept until the next merge.
    pub fn nested_tree(&self) -> Option<&FilterNode> {
        self.tree
            .get_or_init(|| {
                if self.nested.is_empty() {
                    None
                } else {
                    Some(FilterNode {
                        condition: NodeCondition::And,
                        children: self.nested.clone(),
                    })
                }
            })
            .as_ref()
    }

    /// The nested tree wrapped as an extended filter, as legacy stores
    /// expect it.
    pub fn nested_filter_set(&self) -> Option<ExtendedFilter> {
        let tree = self.nested_tree()?;
        let attrs = serde_json::to_value(&tree.children).unwrap_or(serde_json::Value::Null);
        let mut params = IndexMap::new();
        params.insert("cond".to_string(), FilterValue::from("AND"));
        params.insert("attrs".to_string(), FilterValue::from(attrs));
        Some(ExtendedFilter::new(NESTED_FILTER_SET_ID, params))
    }
}

impl PartialEq for ContentFilter {
    fn eq(&self, other: &Self) -> bool {
        self.classes == other.classes
            && self.include_classes == other.include_classes
            && self.attributes == other.attributes
            && self.nested == other.nested
            && self.extended == other.extended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn leaf(attribute: &str, value: &str) -> FilterLeaf {
        FilterLeaf::new(attribute, "=", vec![FilterValue::from(value)])
    }

    fn params(pairs: &[(&str, i64)]) -> IndexMap<String, FilterValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FilterValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_classes_are_unioned() {
        let mut filter = ContentFilter::new(["article", "folder"]);
        filter
            .merge(ContentFilterIncrement::classes(["folder", "image"]))
            .unwrap();
        let classes: Vec<_> = filter.classes().iter().map(String::as_str).collect();
        assert_eq!(classes, vec!["article", "folder", "image"]);
    }

    #[test]
    fn test_attributes_append() {
        let mut filter = ContentFilter::default();
        filter
            .merge(ContentFilterIncrement::attribute(vec![leaf("title", "a")]))
            .unwrap();
        filter
            .merge(ContentFilterIncrement::attribute(vec![leaf("title", "b")]))
            .unwrap();
        assert_eq!(filter.attributes().len(), 2);
        assert!(filter.has_attributes());
    }

    #[test]
    fn test_merge_condition_is_flattened() {
        let items = vec![
            NestedItem::Composite(CompositeFilter::new(
                "merge",
                vec![leaf("a", "1").into(), leaf("b", "2").into()],
            )),
            NestedItem::Composite(CompositeFilter::new("merge", vec![leaf("c", "3").into()])),
        ];
        let mut filter = ContentFilter::default();
        filter.merge(ContentFilterIncrement::nested(items)).unwrap();

        assert_eq!(
            filter.nested_entries(),
            &[
                NestedEntry::Leaf(leaf("a", "1")),
                NestedEntry::Leaf(leaf("b", "2")),
                NestedEntry::Leaf(leaf("c", "3")),
            ]
        );
    }

    #[test]
    fn test_nested_conditions_wrap() {
        let items = vec![NestedItem::Composite(CompositeFilter::new(
            "or",
            vec![
                leaf("a", "1").into(),
                NestedItem::Composite(CompositeFilter::new("and", vec![leaf("b", "2").into()])),
            ],
        ))];
        let entries = ContentFilter::process_nested(items).unwrap();
        assert_eq!(
            entries,
            vec![NestedEntry::Node(FilterNode {
                condition: NodeCondition::Or,
                children: vec![
                    NestedEntry::Leaf(leaf("a", "1")),
                    NestedEntry::Node(FilterNode {
                        condition: NodeCondition::And,
                        children: vec![NestedEntry::Leaf(leaf("b", "2"))],
                    }),
                ],
            })]
        );
    }

    #[test]
    fn test_empty_composites_are_dropped() {
        let items = vec![NestedItem::Composite(CompositeFilter::new(
            "and",
            vec![NestedItem::Composite(CompositeFilter::new("or", vec![]))],
        ))];
        assert!(ContentFilter::process_nested(items).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_condition() {
        let items = vec![NestedItem::Composite(CompositeFilter::new("xor", vec![leaf("a", "1").into()]))];
        let err = ContentFilter::process_nested(items).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownFilterCondition);
    }

    #[test]
    fn test_extended_same_id_merges_params() {
        let mut filter = ContentFilter::default();
        filter
            .merge(ContentFilterIncrement::extended(ExtendedFilter::new("geo", params(&[("lat", 1)]))))
            .unwrap();
        filter
            .merge(ContentFilterIncrement::extended(ExtendedFilter::new("geo", params(&[("lng", 2)]))))
            .unwrap();
        let extended = filter.extended().unwrap();
        assert_eq!(extended.params.len(), 2);
        assert!(filter.has_extended());
    }

    #[test]
    fn test_extended_conflict_in_both_orders() {
        for (first, second) in [("geo", "tags"), ("tags", "geo")] {
            let mut filter = ContentFilter::default();
            filter
                .merge(ContentFilterIncrement::extended(ExtendedFilter::new(first, params(&[("x", 1)]))))
                .unwrap();
            let err = filter
                .merge(ContentFilterIncrement::extended(ExtendedFilter::new(second, params(&[]))))
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ExtendedFilterConflict);
            // The existing filter survives the failed merge.
            assert_eq!(filter.extended().map(|e| e.id.as_str()), Some(first));
        }
    }

    #[test]
    fn test_failed_merge_leaves_filter_unchanged() {
        let mut filter = ContentFilter::new(["article"]);
        let before = filter.clone();
        let increment = ContentFilterIncrement {
            classes: vec!["folder".into()],
            nested: vec![NestedItem::Composite(CompositeFilter::new("nand", vec![leaf("a", "1").into()]))],
            ..Default::default()
        };
        assert!(filter.merge(increment).is_err());
        assert_eq!(filter, before);
    }

    #[test]
    fn test_tree_is_rebuilt_after_merge() {
        let mut filter = ContentFilter::default();
        assert!(filter.nested_tree().is_none());

        filter
            .merge(ContentFilterIncrement::nested(vec![leaf("a", "1").into()]))
            .unwrap();
        assert_eq!(filter.nested_tree().map(|t| t.children.len()), Some(1));

        filter
            .merge(ContentFilterIncrement::nested(vec![leaf("b", "2").into()]))
            .unwrap();
        let tree = filter.nested_tree().unwrap();
        assert_eq!(tree.condition, NodeCondition::And);
        assert_eq!(tree.children.len(), 2);
    }

    #[test]
    fn test_nested_filter_set_shape() {
        let mut filter = ContentFilter::default();
        filter
            .merge(ContentFilterIncrement::nested(vec![leaf("a", "1").into()]))
            .unwrap();
        let set = filter.nested_filter_set().unwrap();
        assert_eq!(set.id, NESTED_FILTER_SET_ID);
        assert_eq!(set.params.get("cond"), Some(&FilterValue::from("AND")));
    }

    #[test]
    fn test_from_json_shapes() {
        let item = NestedItem::from_json(&json!(["section", 3])).unwrap();
        assert_eq!(item, NestedItem::Structural(StructuralFilter::new("section", 3)));

        let item = NestedItem::from_json(&json!(["title", ["x"], "like", {"pre": ["lower"]}])).unwrap();
        match item {
            NestedItem::Leaf(leaf) => {
                assert_eq!(leaf.operator, "like");
                assert_eq!(leaf.modifiers.unwrap().pre.as_slice(), &["lower"]);
            }
            other => panic!("unexpected item: {:?}", other),
        }

        let item = NestedItem::from_json(&json!({"condition": "or", "nested": [["a", 1], ["b", 2]]})).unwrap();
        match item {
            NestedItem::Composite(c) => {
                assert_eq!(c.condition, "or");
                assert_eq!(c.children.len(), 2);
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_shapes() {
        for value in [json!(42), json!({"cond": "and"}), json!([1, 2]), json!(["a", 1, "=", null, 5])] {
            let err = NestedItem::from_json(&value).unwrap_err();
            assert_eq!(err.code, ErrorCode::UnsupportedFilterType, "{}", value);
        }
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!("AND".parse::<Condition>().unwrap(), Condition::And);
        assert!("xor".parse::<Condition>().is_err());
    }
}
