//! Typed leaf filters.
//!
//! A field filter is bound to one content attribute. It turns raw input
//! (builder values or query parameters) into a normalized selection and
//! emits a [`FilterLeaf`] once something is selected.
//!
//! ```rust
//! use canopy_query::{FieldFilter, FilterMode, FilterValue, StringFieldFilter};
//!
//! let mut filter = StringFieldFilter::new("title:like");
//! assert!(filter.emit(FilterMode::Attribute).is_none());
//!
//! filter.resolve_input(&FilterValue::from("  news "));
//! let leaf = filter.leaf().unwrap();
//! assert_eq!(leaf.attribute, "title");
//! assert_eq!(leaf.operator, "like");
//! assert_eq!(leaf.values, vec![FilterValue::from("news")]);
//! ```

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::content::ContentRef;
use crate::content_filter::{ContentFilterIncrement, FilterLeaf, Modifiers, NestedItem};
use crate::error::{QueryError, QueryResult};
use crate::filter_values::{FilterValues, LabelledValue};
use crate::params::QueryParams;
use crate::value::FilterValue;

/// Operator used when an identifier names none.
pub const DEFAULT_OPERATOR: &str = "=";

/// Tokens recognised as relational operators in filter identifiers.
pub const RELATIONAL_OPERATORS: &[&str] = &[
    "=",
    "!=",
    "<",
    "<=",
    ">",
    ">=",
    "in",
    "not_in",
    "like",
    "not_like",
    "between",
    "not_between",
    "contains",
    "starts_with",
    "ends_with",
];

/// Check whether a token is a relational operator.
pub fn is_relational_operator(token: &str) -> bool {
    RELATIONAL_OPERATORS.contains(&token)
}

/// How defined filters are handed to the content filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Flat attribute leaves.
    #[default]
    Attribute,
    /// Entries of the nested filter tree.
    Nested,
}

impl FilterMode {
    /// Mode name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Nested => "nested",
        }
    }
}

impl FromStr for FilterMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attribute" => Ok(Self::Attribute),
            "nested" => Ok(Self::Nested),
            other => Err(QueryError::unsupported_filter_mode(other)),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Integer filter.
    Int,
    /// Boolean filter.
    Bool,
    /// String filter.
    String,
}

impl FilterKind {
    /// Kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::String => "string",
        }
    }

    /// Built-in mapping from attribute data type to filter kind.
    pub fn for_data_type(data_type: &str) -> Self {
        match data_type {
            "ezinteger" | "ezselection" | "integer" | "int" | "selection" => Self::Int,
            "ezboolean" | "boolean" | "bool" => Self::Bool,
            _ => Self::String,
        }
    }

    /// Create a filter of this kind for an attribute identifier.
    pub fn instantiate(&self, identifier: &str) -> Box<dyn FieldFilter> {
        match self {
            Self::Int => Box::new(IntegerFieldFilter::new(identifier)),
            Self::Bool => Box::new(BoolFieldFilter::new(identifier)),
            Self::String => Box::new(StringFieldFilter::new(identifier)),
        }
    }
}

impl FromStr for FilterKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            other => Err(QueryError::filter_type(other)),
        }
    }
}

/// Filter type passed to `define_filter`: a symbolic kind or a ready instance.
#[derive(Debug, Clone)]
pub enum FilterType {
    /// Symbolic kind name, validated when the filter is defined.
    Kind(SmolStr),
    /// Concrete filter instance.
    Instance(Box<dyn FieldFilter>),
}

impl FilterType {
    /// Wrap a concrete filter.
    pub fn instance(filter: impl FieldFilter + 'static) -> Self {
        Self::Instance(Box::new(filter))
    }

    /// Materialize the filter, parsing `identifier` for kinds.
    pub fn into_filter(self, identifier: &str) -> QueryResult<Box<dyn FieldFilter>> {
        match self {
            Self::Kind(kind) => Ok(kind.parse::<FilterKind>()?.instantiate(identifier)),
            Self::Instance(filter) => Ok(filter),
        }
    }
}

impl From<&str> for FilterType {
    fn from(kind: &str) -> Self {
        Self::Kind(SmolStr::new(kind))
    }
}

impl From<FilterKind> for FilterType {
    fn from(kind: FilterKind) -> Self {
        Self::Kind(SmolStr::new_static(kind.as_str()))
    }
}

impl From<Box<dyn FieldFilter>> for FilterType {
    fn from(filter: Box<dyn FieldFilter>) -> Self {
        Self::Instance(filter)
    }
}

/// Result of parsing a filter identifier such as `title:lower:like`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    /// Attribute part.
    pub attribute: String,
    /// Relational operator.
    pub operator: SmolStr,
    /// Modifiers applied to the field, before the operator.
    pub pre_modifiers: SmallVec<[SmolStr; 2]>,
    /// Modifiers applied to the value, after the operator.
    pub post_modifiers: SmallVec<[SmolStr; 2]>,
}

impl ParsedIdentifier {
    /// Parse `base(:modifier)*`.
    ///
    /// Operator tokens switch from pre to post modifiers; the last one wins.
    /// Identifiers with empty segments fall back to splitting on the last
    /// colon.
    pub fn parse(identifier: &str) -> Self {
        let mut parsed = Self {
            attribute: identifier.to_string(),
            operator: SmolStr::new_static(DEFAULT_OPERATOR),
            pre_modifiers: SmallVec::new(),
            post_modifiers: SmallVec::new(),
        };

        let mut segments = identifier.split(':');
        let base = segments.next().unwrap_or_default();
        let tokens: Vec<&str> = segments.collect();

        if !base.is_empty() && tokens.iter().all(|t| !t.is_empty()) {
            parsed.attribute = base.to_string();
            let mut in_pre = true;
            for token in tokens {
                if is_relational_operator(token) {
                    parsed.operator = SmolStr::new(token);
                    in_pre = false;
                } else if in_pre {
                    parsed.pre_modifiers.push(SmolStr::new(token));
                } else {
                    parsed.post_modifiers.push(SmolStr::new(token));
                }
            }
        } else if let Some((attribute, operator)) = identifier.rsplit_once(':') {
            if !attribute.is_empty() && !operator.is_empty() {
                parsed.attribute = attribute.to_string();
                parsed.operator = SmolStr::new(operator);
            }
        }

        parsed
    }
}

/// Configuration and state shared by all field filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Content attribute; without one the filter never emits.
    pub attribute: Option<String>,
    /// Relational operator.
    pub operator: SmolStr,
    /// Field modifiers.
    pub pre_modifiers: SmallVec<[SmolStr; 2]>,
    /// Value modifiers.
    pub post_modifiers: SmallVec<[SmolStr; 2]>,
    /// Whether query parameters may set the selection.
    pub allow_input: bool,
    /// Query parameter read when input is allowed.
    pub query_param: Option<String>,
    /// Selected values, in insertion order.
    pub selected: Vec<FilterValue>,
    /// Option list for the filter, if any.
    pub items: Option<FilterValues>,
}

impl FilterSpec {
    /// Spec for an attribute identifier with optional operator and modifiers.
    pub fn parse(identifier: &str) -> Self {
        let parsed = ParsedIdentifier::parse(identifier);
        Self {
            attribute: Some(parsed.attribute),
            operator: parsed.operator,
            pre_modifiers: parsed.pre_modifiers,
            post_modifiers: parsed.post_modifiers,
            allow_input: true,
            ..Default::default()
        }
    }
}

/// A typed leaf filter.
pub trait FieldFilter: fmt::Debug + Send + Sync {
    /// Kind of the filter.
    fn kind(&self) -> FilterKind;

    /// Configuration and selection.
    fn spec(&self) -> &FilterSpec;

    /// Mutable configuration and selection.
    fn spec_mut(&mut self) -> &mut FilterSpec;

    /// Convert raw input into selected values. Empty means "no input".
    fn coerce(&self, raw: &FilterValue) -> Vec<FilterValue>;

    /// Clone into a box.
    fn clone_box(&self) -> Box<dyn FieldFilter>;

    /// Set the selection from raw input.
    ///
    /// Returns `false` and keeps the current selection when the input
    /// coerces to nothing.
    fn resolve_input(&mut self, raw: &FilterValue) -> bool {
        let values = self.coerce(raw);
        if values.is_empty() {
            return false;
        }
        self.spec_mut().selected = values;
        true
    }

    /// Set the selection from the filter's query parameter, if input is
    /// allowed and the parameter is present.
    fn resolve_query(&mut self, params: &QueryParams) -> bool {
        let spec = self.spec();
        let raw = match (spec.allow_input, spec.query_param.as_deref()) {
            (true, Some(name)) => params.get(name),
            _ => None,
        };
        match raw {
            Some(raw) => self.resolve_input(raw),
            None => false,
        }
    }

    /// Selected values.
    fn selected(&self) -> &[FilterValue] {
        &self.spec().selected
    }

    /// Check for a non-empty selection.
    fn has_selected(&self) -> bool {
        !self.spec().selected.is_empty()
    }

    /// Clear the selection.
    fn reset(&mut self) {
        self.spec_mut().selected.clear();
    }

    /// Option list.
    fn items(&self) -> Option<&FilterValues> {
        self.spec().items.as_ref()
    }

    /// Options whose identifiers are selected.
    fn selected_items(&self) -> Vec<LabelledValue<'_>> {
        match self.items() {
            Some(items) => items.selected_items(self.selected()),
            None => Vec::new(),
        }
    }

    /// The leaf for the current selection.
    fn leaf(&self) -> Option<FilterLeaf> {
        let spec = self.spec();
        let attribute = spec.attribute.as_ref()?;
        if spec.selected.is_empty() {
            return None;
        }
        Some(FilterLeaf {
            attribute: attribute.clone(),
            operator: spec.operator.clone(),
            values: spec.selected.clone(),
            modifiers: Modifiers::new(spec.pre_modifiers.clone(), spec.post_modifiers.clone()),
        })
    }

    /// Contribution to a content filter, or `None` when nothing is selected.
    fn emit(&self, mode: FilterMode) -> Option<ContentFilterIncrement> {
        let leaf = self.leaf()?;
        Some(match mode {
            FilterMode::Attribute => ContentFilterIncrement::attribute(vec![leaf]),
            FilterMode::Nested => ContentFilterIncrement::nested(vec![NestedItem::Leaf(leaf)]),
        })
    }
}

impl Clone for Box<dyn FieldFilter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

macro_rules! field_filter {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $coerce:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            spec: FilterSpec,
        }

        impl $name {
            /// Create a filter for an attribute identifier (`attr(:modifier)*`).
            pub fn new(identifier: &str) -> Self {
                Self {
                    spec: FilterSpec::parse(identifier),
                }
            }

            /// Create a filter from a prepared spec.
            pub fn from_spec(spec: FilterSpec) -> Self {
                Self { spec }
            }

            /// Read the selection from this query parameter.
            pub fn query_param(mut self, name: impl Into<String>) -> Self {
                self.spec.query_param = Some(name.into());
                self
            }

            /// Allow or forbid user input.
            pub fn allow_input(mut self, allow: bool) -> Self {
                self.spec.allow_input = allow;
                self
            }

            /// Attach an option list.
            pub fn with_items(mut self, items: FilterValues) -> Self {
                self.spec.items = Some(items);
                self
            }

            /// Preset the selection.
            pub fn with_selected(mut self, values: impl IntoIterator<Item = FilterValue>) -> Self {
                self.spec.selected = values.into_iter().collect();
                self
            }
        }

        impl FieldFilter for $name {
            fn kind(&self) -> FilterKind {
                $kind
            }

            fn spec(&self) -> &FilterSpec {
                &self.spec
            }

            fn spec_mut(&mut self) -> &mut FilterSpec {
                &mut self.spec
            }

            fn coerce(&self, raw: &FilterValue) -> Vec<FilterValue> {
                $coerce(raw)
            }

            fn clone_box(&self) -> Box<dyn FieldFilter> {
                Box::new(self.clone())
            }
        }
    };
}

field_filter!(
    /// Filter on integer attributes. Zero is never selected.
    IntegerFieldFilter,
    FilterKind::Int,
    coerce_integers
);

field_filter!(
    /// Filter on boolean attributes.
    BoolFieldFilter,
    FilterKind::Bool,
    coerce_bools
);

field_filter!(
    /// Filter on text attributes. Input is trimmed; blank input is ignored.
    StringFieldFilter,
    FilterKind::String,
    coerce_strings
);

fn coerce_integers(raw: &FilterValue) -> Vec<FilterValue> {
    raw.entries()
        .into_iter()
        .filter_map(|entry| match entry {
            FilterValue::Ref(content) => content.object_id().map(|id| id as i64),
            FilterValue::Bool(_) => None,
            other => other.as_i64(),
        })
        .filter(|v| *v != 0)
        .map(FilterValue::Int)
        .collect()
}

fn as_bool(value: &FilterValue) -> Option<bool> {
    match value {
        FilterValue::Bool(b) => Some(*b),
        other => other.as_number().map(|n| n != 0.0),
    }
}

fn coerce_bools(raw: &FilterValue) -> Vec<FilterValue> {
    match raw {
        // Lists only carry the values that are set.
        FilterValue::List(items) => items
            .iter()
            .filter_map(as_bool)
            .filter(|b| *b)
            .map(FilterValue::Bool)
            .collect(),
        scalar => as_bool(scalar).map(FilterValue::Bool).into_iter().collect(),
    }
}

fn coerce_strings(raw: &FilterValue) -> Vec<FilterValue> {
    raw.entries()
        .into_iter()
        .filter_map(|entry| match entry {
            FilterValue::Ref(ContentRef::Class(class)) => Some(class.identifier.clone()),
            other => other.to_text(),
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .map(FilterValue::String)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_identifier() {
        let parsed = ParsedIdentifier::parse("title");
        assert_eq!(parsed.attribute, "title");
        assert_eq!(parsed.operator, "=");
        assert!(parsed.pre_modifiers.is_empty());
        assert!(parsed.post_modifiers.is_empty());
    }

    #[test]
    fn test_parse_modifier_chain() {
        let parsed = ParsedIdentifier::parse("title:lower:trim:like:upper");
        assert_eq!(parsed.attribute, "title");
        assert_eq!(parsed.operator, "like");
        assert_eq!(parsed.pre_modifiers.as_slice(), &["lower", "trim"]);
        assert_eq!(parsed.post_modifiers.as_slice(), &["upper"]);
    }

    #[test]
    fn test_parse_modifiers_without_operator() {
        let parsed = ParsedIdentifier::parse("title:lower");
        assert_eq!(parsed.operator, "=");
        assert_eq!(parsed.pre_modifiers.as_slice(), &["lower"]);
    }

    #[test]
    fn test_parse_empty_segment_falls_back() {
        let parsed = ParsedIdentifier::parse("a::b");
        assert_eq!(parsed.attribute, "a:");
        assert_eq!(parsed.operator, "b");
    }

    #[test]
    fn test_integer_coercion() {
        let mut filter = IntegerFieldFilter::new("count");
        assert!(filter.resolve_input(&FilterValue::from(vec!["3", "0", "x", "7"])));
        assert_eq!(filter.selected(), &[FilterValue::Int(3), FilterValue::Int(7)]);

        // Zero and garbage leave the selection alone.
        assert!(!filter.resolve_input(&FilterValue::from("0")));
        assert!(!filter.resolve_input(&FilterValue::from("abc")));
        assert_eq!(filter.selected().len(), 2);
    }

    #[test]
    fn test_bool_coercion() {
        let mut filter = BoolFieldFilter::new("featured");
        assert!(filter.resolve_input(&FilterValue::from("0")));
        assert_eq!(filter.selected(), &[FilterValue::Bool(false)]);

        assert!(!filter.resolve_input(&FilterValue::from("yes")));
        assert_eq!(filter.selected(), &[FilterValue::Bool(false)]);

        assert!(filter.resolve_input(&FilterValue::from(vec![0, 2])));
        assert_eq!(filter.selected(), &[FilterValue::Bool(true)]);
    }

    #[test]
    fn test_string_coercion() {
        let mut filter = StringFieldFilter::new("title");
        assert!(!filter.resolve_input(&FilterValue::from("   ")));
        assert!(!filter.has_selected());

        assert!(filter.resolve_input(&FilterValue::from(vec![" a ", "", "b"])));
        assert_eq!(filter.selected(), &[FilterValue::from("a"), FilterValue::from("b")]);
    }

    #[test]
    fn test_emit_requires_selection() {
        let filter = StringFieldFilter::new("title");
        assert!(filter.emit(FilterMode::Attribute).is_none());
        assert!(filter.emit(FilterMode::Nested).is_none());
    }

    #[test]
    fn test_emit_modes() {
        let filter = IntegerFieldFilter::new("rating:>=")
            .with_selected([FilterValue::Int(4), FilterValue::Int(5)]);

        let attribute = filter.emit(FilterMode::Attribute).unwrap();
        assert_eq!(attribute.attribute.len(), 1);
        assert_eq!(attribute.attribute[0].operator, ">=");
        assert_eq!(attribute.attribute[0].values, vec![FilterValue::Int(4), FilterValue::Int(5)]);
        assert!(attribute.attribute[0].modifiers.is_none());

        let nested = filter.emit(FilterMode::Nested).unwrap();
        assert!(nested.attribute.is_empty());
        assert_eq!(nested.nested.len(), 1);
    }

    #[test]
    fn test_resolve_query() {
        let params = QueryParams::new().with("q", "hello");

        let mut filter = StringFieldFilter::new("title").query_param("q");
        assert!(filter.resolve_query(&params));
        assert_eq!(filter.selected(), &[FilterValue::from("hello")]);

        let mut locked = StringFieldFilter::new("title").query_param("q").allow_input(false);
        assert!(!locked.resolve_query(&params));
        assert!(!locked.has_selected());
    }

    #[test]
    fn test_selected_items() {
        let filter = IntegerFieldFilter::new("category")
            .with_items(FilterValues::from_pairs([(1, "News"), (2, "Sports")]))
            .with_selected([FilterValue::Int(2)]);
        let items = filter.selected_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, Some("Sports"));
    }

    #[test]
    fn test_filter_kind_parsing() {
        assert_eq!("int".parse::<FilterKind>().unwrap(), FilterKind::Int);
        let err = "float".parse::<FilterKind>().unwrap_err();
        assert!(err.is_filter_error());
        assert_eq!(FilterKind::for_data_type("ezboolean"), FilterKind::Bool);
        assert_eq!(FilterKind::for_data_type("ezxmltext"), FilterKind::String);
    }

    #[test]
    fn test_filter_mode_parsing() {
        assert_eq!("nested".parse::<FilterMode>().unwrap(), FilterMode::Nested);
        assert!("tree".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let original: Box<dyn FieldFilter> = Box::new(StringFieldFilter::new("title"));
        let mut copy = original.clone();
        copy.resolve_input(&FilterValue::from("x"));
        assert!(!original.has_selected());
        assert!(copy.has_selected());
    }
}
