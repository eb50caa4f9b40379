//! Structural filters: predicates on node and object properties.
//!
//! Structural filters bypass field filters entirely. They are `(field, value)`
//! pairs where the field may carry an operator suffix (`depth:<=`), and the
//! value has content references and dates reduced to what the store expects.
//!
//! ```rust
//! use canopy_query::{FilterValue, StructuralFilter};
//!
//! let filter = StructuralFilter::new("priority:>", 10);
//! assert_eq!(filter.name(), "priority");
//! assert_eq!(filter.operator(), Some(">"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::ContentRef;
use crate::value::FilterValue;

/// Properties outside content attributes that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralField {
    /// Path string of the node.
    Path,
    /// Section id.
    Section,
    /// Object state.
    State,
    /// Tree depth.
    Depth,
    /// Class identifier.
    ClassIdentifier,
    /// Class display name.
    ClassName,
    /// Node priority.
    Priority,
    /// Object name.
    Name,
    /// Publish date.
    Published,
    /// Last modification date.
    Modified,
    /// Last modification of the sub-tree.
    ModifiedSubnode,
    /// Node id.
    NodeId,
    /// Object id.
    ContentObjectId,
    /// Object id of any node on the path.
    PathElement,
    /// Node visibility.
    Visibility,
}

impl StructuralField {
    /// Look up a field by name. `visible` is an alias of `visibility`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "path" => Self::Path,
            "section" => Self::Section,
            "state" => Self::State,
            "depth" => Self::Depth,
            "class_identifier" => Self::ClassIdentifier,
            "class_name" => Self::ClassName,
            "priority" => Self::Priority,
            "name" => Self::Name,
            "published" => Self::Published,
            "modified" => Self::Modified,
            "modified_subnode" => Self::ModifiedSubnode,
            "node_id" => Self::NodeId,
            "contentobject_id" => Self::ContentObjectId,
            "path_element" => Self::PathElement,
            "visible" | "visibility" => Self::Visibility,
            _ => return None,
        })
    }

    /// Canonical field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Section => "section",
            Self::State => "state",
            Self::Depth => "depth",
            Self::ClassIdentifier => "class_identifier",
            Self::ClassName => "class_name",
            Self::Priority => "priority",
            Self::Name => "name",
            Self::Published => "published",
            Self::Modified => "modified",
            Self::ModifiedSubnode => "modified_subnode",
            Self::NodeId => "node_id",
            Self::ContentObjectId => "contentobject_id",
            Self::PathElement => "path_element",
            Self::Visibility => "visibility",
        }
    }

    /// Reduce references and dates to the identifier form of this field.
    ///
    /// Lists are resolved element by element. References that have no
    /// identifier of the needed kind are left as they are.
    pub fn resolve_value(&self, value: FilterValue) -> FilterValue {
        match value {
            FilterValue::List(items) => {
                FilterValue::List(items.into_iter().map(|v| self.resolve_value(v)).collect())
            }
            FilterValue::Ref(content) => self.resolve_ref(content),
            FilterValue::DateTime(dt) if self.is_date() => FilterValue::Int(dt.timestamp()),
            other => other,
        }
    }

    fn resolve_ref(&self, content: ContentRef) -> FilterValue {
        let resolved = match self {
            Self::NodeId => content.node_id().map(FilterValue::from),
            Self::ContentObjectId | Self::PathElement => content.object_id().map(FilterValue::from),
            Self::ClassIdentifier => Some(FilterValue::from(content.class_identifier())),
            Self::ClassName => Some(FilterValue::from(content.class_name())),
            _ => None,
        };
        resolved.unwrap_or(FilterValue::Ref(content))
    }

    /// Date fields accept `DateTime` values.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Published | Self::Modified | Self::ModifiedSubnode)
    }
}

impl fmt::Display for StructuralField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(field, value)` pair sent to the store as-is.
///
/// The field is either a structural field name with an optional operator
/// suffix, or a `class/attribute` path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralFilter {
    /// Field key, e.g. `depth:<=` or `article/title`.
    pub field: String,
    /// Filter value.
    pub value: FilterValue,
}

impl StructuralFilter {
    /// Create a pair without resolving the value.
    pub fn new(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Field name without the operator suffix.
    pub fn name(&self) -> &str {
        split_key(&self.field).0
    }

    /// Operator suffix, if any.
    pub fn operator(&self) -> Option<&str> {
        split_key(&self.field).1
    }
}

/// Split `name:operator` at the first colon.
pub fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once(':') {
        Some((name, operator)) => (name, Some(operator)),
        None => (key, None),
    }
}

/// Where a builder `filter(name, value)` call ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterTarget {
    /// A structural filter. `visibility` is set when the filter overrides
    /// the default visibility rules.
    Structural {
        /// The pair to add.
        filter: StructuralFilter,
        /// Whether default visibility rules must be ignored.
        visibility: bool,
    },
    /// An ad-hoc `class/attribute` filter.
    AttributePath(StructuralFilter),
    /// A raw value for a (possibly later) defined filter.
    Raw {
        /// Filter name with any operator suffix removed.
        name: String,
        /// Raw value.
        value: FilterValue,
    },
}

impl FilterTarget {
    /// Classify a filter key that is not a defined filter name.
    pub fn classify(key: &str, value: FilterValue) -> Self {
        let (name, _) = split_key(key);
        match StructuralField::from_name(name) {
            Some(StructuralField::Visibility) => {
                // `visible` is stored without its operator under the canonical key.
                let field = if name == "visible" {
                    StructuralField::Visibility.as_str().to_string()
                } else {
                    key.to_string()
                };
                Self::Structural {
                    filter: StructuralFilter { field, value },
                    visibility: true,
                }
            }
            Some(field) => Self::Structural {
                filter: StructuralFilter {
                    field: key.to_string(),
                    value: field.resolve_value(value),
                },
                visibility: false,
            },
            None if name.contains('/') => Self::AttributePath(StructuralFilter {
                field: key.to_string(),
                value,
            }),
            None => Self::Raw {
                name: name.to_string(),
                value,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("depth:<="), ("depth", Some("<=")));
        assert_eq!(split_key("path"), ("path", None));
    }

    #[test]
    fn test_node_refs_resolve_per_field() {
        let n = node(60, 58);
        assert_eq!(
            StructuralField::NodeId.resolve_value(n.clone().into()),
            FilterValue::from(60u64)
        );
        assert_eq!(
            StructuralField::ContentObjectId.resolve_value(n.clone().into()),
            FilterValue::from(58u64)
        );
        assert_eq!(
            StructuralField::PathElement.resolve_value(object(58, 60).into()),
            FilterValue::from(58u64)
        );
        assert_eq!(
            StructuralField::ClassIdentifier.resolve_value(n.into()),
            FilterValue::from("folder")
        );
        assert_eq!(
            StructuralField::ClassName.resolve_value(class("article", "Article").into()),
            FilterValue::from("Article")
        );
    }

    #[test]
    fn test_dates_become_timestamps() {
        let dt = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            StructuralField::Published.resolve_value(dt.into()),
            FilterValue::Int(dt.timestamp())
        );
        // Non-date fields keep the value.
        assert_eq!(
            StructuralField::Priority.resolve_value(dt.into()),
            FilterValue::DateTime(dt)
        );
    }

    #[test]
    fn test_classify_structural() {
        match FilterTarget::classify("node_id:in", vec![node(5, 1), node(6, 2)].into()) {
            FilterTarget::Structural { filter, visibility } => {
                assert_eq!(filter.field, "node_id:in");
                assert_eq!(filter.value, FilterValue::from(vec![5u64, 6u64]));
                assert!(!visibility);
            }
            other => panic!("unexpected target: {:?}", other),
        }
    }

    #[test]
    fn test_classify_visible_alias() {
        match FilterTarget::classify("visible:=", FilterValue::Bool(true)) {
            FilterTarget::Structural { filter, visibility } => {
                assert_eq!(filter.field, "visibility");
                assert!(visibility);
            }
            other => panic!("unexpected target: {:?}", other),
        }
    }

    #[test]
    fn test_classify_attribute_path_and_raw() {
        assert!(matches!(
            FilterTarget::classify("article/title", "x".into()),
            FilterTarget::AttributePath(_)
        ));
        assert_eq!(
            FilterTarget::classify("rating:>", 3.into()),
            FilterTarget::Raw {
                name: "rating".into(),
                value: FilterValue::Int(3)
            }
        );
    }
}
