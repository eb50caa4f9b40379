//! Query descriptors handed to the content store.
//!
//! A build produces one [`CountQuery`] (when paginating) and one
//! [`ItemQuery`]. Both are plain data; the store decides how to execute them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::DEFAULT_PARENT_NODE_ID;
use crate::content_filter::{ContentFilter, ExtendedFilter, FilterLeaf, FilterNode};
use crate::error::QueryError;
use crate::sort::SortField;

/// Whether listed classes are included or excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassFilterMode {
    /// Only the listed classes.
    #[default]
    Include,
    /// Everything but the listed classes.
    Exclude,
}

impl ClassFilterMode {
    /// Mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

/// Comparison applied to the depth limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthOperator {
    /// Exactly at the depth.
    Eq,
    /// Above the depth.
    Lt,
    /// At or above the depth.
    #[default]
    Le,
    /// Below the depth.
    Gt,
    /// At or below the depth.
    Ge,
}

impl DepthOperator {
    /// Operator name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        }
    }
}

impl FromStr for DepthOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" | "=" => Ok(Self::Eq),
            "lt" | "<" => Ok(Self::Lt),
            "le" | "<=" => Ok(Self::Le),
            "gt" | ">" => Ok(Self::Gt),
            "ge" | ">=" => Ok(Self::Ge),
            other => Err(QueryError::invalid_depth_operator(other)),
        }
    }
}

impl fmt::Display for DepthOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whose permissions limit the result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    /// Permissions of the current user.
    #[default]
    CurrentUser,
    /// No permission checks.
    Unrestricted,
    /// A named role or user, interpreted by the store.
    Custom(String),
}

/// Tree scope and visibility settings of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryScope {
    /// Node whose sub-tree is searched.
    pub parent_node_id: u64,
    /// Depth limit, `None` for the whole sub-tree.
    pub depth: Option<u32>,
    /// Comparison for the depth limit.
    pub depth_operator: DepthOperator,
    /// Skip default visibility rules.
    pub ignore_visibility: bool,
    /// Only main node placements.
    pub main_node_only: bool,
    /// Permission scope.
    pub role_scope: RoleScope,
}

impl Default for QueryScope {
    fn default() -> Self {
        Self {
            parent_node_id: DEFAULT_PARENT_NODE_ID,
            depth: None,
            depth_operator: DepthOperator::default(),
            ignore_visibility: false,
            main_node_only: false,
            role_scope: RoleScope::default(),
        }
    }
}

/// Descriptor of a count query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountQuery {
    /// Include or exclude `classes`.
    pub class_filter_mode: ClassFilterMode,
    /// Class identifiers.
    pub classes: Vec<String>,
    /// Attribute leaves; `None` when there are no attribute filters.
    pub attribute_filter: Option<Vec<FilterLeaf>>,
    /// Nested filter tree.
    pub nested_filter: Option<FilterNode>,
    /// Legacy extended filter, only when there is no nested tree.
    pub extended_filter: Option<ExtendedFilter>,
    /// Tree scope.
    #[serde(flatten)]
    pub scope: QueryScope,
}

impl CountQuery {
    /// Describe a query for a content filter within a scope.
    pub fn new(filter: &ContentFilter, scope: QueryScope) -> Self {
        let nested_filter = filter.nested_tree().cloned();
        let extended_filter = match nested_filter {
            Some(_) => None,
            None => filter.extended().filter(|e| !e.params.is_empty()).cloned(),
        };
        Self {
            class_filter_mode: if filter.includes_classes() {
                ClassFilterMode::Include
            } else {
                ClassFilterMode::Exclude
            },
            classes: filter.classes().iter().cloned().collect(),
            attribute_filter: filter
                .has_attributes()
                .then(|| filter.attributes().to_vec()),
            nested_filter,
            extended_filter,
            scope,
        }
    }
}

/// Descriptor of an item query: a count query plus a window and ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemQuery {
    /// Filter and scope.
    #[serde(flatten)]
    pub base: CountQuery,
    /// Offset of the first item.
    pub offset: u64,
    /// Maximum number of items.
    pub limit: u64,
    /// Ordering; `None` leaves it to the store.
    pub sort: Option<Vec<SortField>>,
}

impl ItemQuery {
    /// Describe a window of a count query.
    pub fn new(base: CountQuery, offset: u64, limit: u64) -> Self {
        Self {
            base,
            offset,
            limit,
            sort: None,
        }
    }

    /// Set the ordering. Empty orderings are dropped.
    pub fn with_sort(mut self, sort: Option<Vec<SortField>>) -> Self {
        self.sort = sort.filter(|s| !s.is_empty());
        self
    }
}
