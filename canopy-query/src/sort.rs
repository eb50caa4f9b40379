//! Sort order resolution.
//!
//! Sorting is chosen by name from a choice table. A leading `-` on the token
//! requests descending order; choices decide whether they honour it.
//!
//! ```rust
//! use canopy_query::{SortDirection, SortOrder, default_sort_choices};
//!
//! let mut order = SortOrder::new(default_sort_choices(), Some("newest".into()));
//! order.resolve_query(Some("a-z"));
//! assert_eq!(order.identifier(), Some("a-z"));
//! assert_eq!(order.ordering().unwrap()[0].field, "name");
//!
//! // Unknown tokens fall back to the default choice.
//! order.resolve_query(Some("bogus"));
//! assert_eq!(order.identifier(), Some("newest"));
//! assert_eq!(order.ordering().unwrap()[0].direction, SortDirection::Desc);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Numeric flag used by content stores: 1 ascending, 0 descending.
    pub fn flag(&self) -> u8 {
        match self {
            Self::Asc => 1,
            Self::Desc => 0,
        }
    }

    /// Direction for a numeric flag. Anything but 0 is ascending.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 { Self::Desc } else { Self::Asc }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(field, direction)` pair of an ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Sort field name.
    pub field: Cow<'static, str>,
    /// Direction.
    pub direction: SortDirection,
}

impl SortField {
    /// Create a sort field.
    pub fn new(field: impl Into<Cow<'static, str>>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Create a sort field with a static name (no allocation).
    pub const fn new_static(field: &'static str, direction: SortDirection) -> Self {
        Self {
            field: Cow::Borrowed(field),
            direction,
        }
    }

    /// Ascending sort on a field.
    pub fn asc(field: impl Into<Cow<'static, str>>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending sort on a field.
    pub fn desc(field: impl Into<Cow<'static, str>>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

type ResolverFn = dyn Fn(&str, SortDirection) -> Vec<SortField> + Send + Sync;

/// A choice computed from the choice name and the requested direction.
#[derive(Clone)]
pub struct SortResolver(Arc<ResolverFn>);

impl SortResolver {
    /// Wrap a resolver function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, SortDirection) -> Vec<SortField> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Resolve an ordering.
    pub fn call(&self, name: &str, direction: SortDirection) -> Vec<SortField> {
        (self.0)(name, direction)
    }
}

impl fmt::Debug for SortResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortResolver(..)")
    }
}

/// An entry of the choice table.
#[derive(Debug, Clone)]
pub enum SortChoice {
    /// Sort on one field in the requested direction.
    Field(String),
    /// Fixed ordering, direction-independent.
    Fixed(Vec<SortField>),
    /// Ordering computed from the choice name and requested direction.
    Resolver(SortResolver),
}

impl SortChoice {
    /// Shorthand for [`SortChoice::Resolver`].
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&str, SortDirection) -> Vec<SortField> + Send + Sync + 'static,
    {
        Self::Resolver(SortResolver::new(f))
    }

    fn ordering(&self, name: &str, direction: SortDirection) -> Vec<SortField> {
        match self {
            Self::Field(field) => vec![SortField::new(field.clone(), direction)],
            Self::Fixed(fields) => fields.clone(),
            Self::Resolver(resolver) => resolver.call(name, direction),
        }
    }
}

impl From<&str> for SortChoice {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<Vec<SortField>> for SortChoice {
    fn from(fields: Vec<SortField>) -> Self {
        Self::Fixed(fields)
    }
}

/// Choice table, in declaration order.
pub type SortChoices = IndexMap<String, SortChoice>;

/// The default choices: `oldest`, `newest`, `a-z` and `z-a`.
///
/// All four have a fixed direction.
pub fn default_sort_choices() -> SortChoices {
    let fixed = |field: &'static str, direction| {
        SortChoice::resolver(move |_, _| vec![SortField::new_static(field, direction)])
    };
    let mut choices = SortChoices::new();
    choices.insert("oldest".into(), fixed("published", SortDirection::Asc));
    choices.insert("newest".into(), fixed("published", SortDirection::Desc));
    choices.insert("a-z".into(), fixed("name", SortDirection::Asc));
    choices.insert("z-a".into(), fixed("name", SortDirection::Desc));
    choices
}

/// Where the sort token comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// A token set on the query set.
    #[default]
    Property,
    /// A query parameter.
    Query,
}

impl SortMode {
    /// Mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Query => "query",
        }
    }
}

impl FromStr for SortMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "property" => Ok(Self::Property),
            "query" => Ok(Self::Query),
            other => Err(QueryError::unsupported_sort_mode(other)),
        }
    }
}

/// Result of decoding a sort token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSort {
    /// Requested direction.
    pub direction: SortDirection,
    /// Choice name, prefixed with `-` when descending.
    pub identifier: String,
    /// Concrete ordering.
    pub ordering: Vec<SortField>,
}

/// Resolves sort tokens against a choice table.
#[derive(Debug, Clone)]
pub struct SortOrder {
    choices: SortChoices,
    default_choice: Option<String>,
    original_identifier: Option<String>,
    identifier: Option<String>,
    direction: SortDirection,
    ordering: Option<Vec<SortField>>,
}

impl SortOrder {
    /// Create a sort order over a choice table.
    pub fn new(choices: SortChoices, default_choice: Option<String>) -> Self {
        Self {
            choices,
            default_choice,
            original_identifier: None,
            identifier: None,
            direction: SortDirection::Asc,
            ordering: None,
        }
    }

    /// Decode a token. `None` for empty or unknown tokens.
    pub fn decode(&self, token: Option<&str>) -> Option<DecodedSort> {
        let token = token.filter(|t| !t.is_empty())?;
        let (direction, name) = match token.strip_prefix('-') {
            Some(name) => (SortDirection::Desc, name),
            None => (SortDirection::Asc, token),
        };
        let choice = self.choices.get(name)?;
        let identifier = match direction {
            SortDirection::Asc => name.to_string(),
            SortDirection::Desc => format!("-{}", name),
        };
        Some(DecodedSort {
            direction,
            identifier,
            ordering: choice.ordering(name, direction),
        })
    }

    /// Resolve a token, falling back to the default choice.
    ///
    /// When neither decodes, the previous resolution is kept.
    pub fn resolve_query(&mut self, token: Option<&str>) {
        self.original_identifier = token.map(str::to_string);
        let decoded = self
            .decode(token)
            .or_else(|| self.decode(self.default_choice.as_deref()));
        if let Some(decoded) = decoded {
            self.identifier = Some(decoded.identifier);
            self.direction = decoded.direction;
            self.ordering = Some(decoded.ordering);
        }
    }

    /// Overwrite the ordering directly, bypassing the choice table.
    pub fn resolve_array(&mut self, ordering: Option<Vec<SortField>>) {
        self.ordering = ordering;
    }

    /// Choice table.
    pub fn choices(&self) -> &SortChoices {
        &self.choices
    }

    /// Default choice name.
    pub fn default_choice(&self) -> Option<&str> {
        self.default_choice.as_deref()
    }

    /// Token passed to the last `resolve_query`.
    pub fn original_identifier(&self) -> Option<&str> {
        self.original_identifier.as_deref()
    }

    /// Resolved choice identifier.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Resolved direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Concrete ordering, if resolved.
    pub fn ordering(&self) -> Option<&[SortField]> {
        self.ordering.as_deref()
    }
}
