//! Explicit query parameters.
//!
//! Anything that reads request input (page number, sort token, user filter
//! values) takes a [`QueryParams`] argument; there is no ambient request state.
//!
//! ```rust
//! use canopy_query::{FilterValue, QueryParams};
//!
//! let params = QueryParams::parse("page=2&sort=-name&tag[]=4&tag[]=7");
//! assert_eq!(params.get("page"), Some(&FilterValue::from("2")));
//! assert_eq!(params.get_str("sort"), Some("-name"));
//! assert_eq!(params.get("tag"), Some(&FilterValue::from(vec!["4", "7"])));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::FilterValue;

/// Ordered mapping of parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    values: IndexMap<String, FilterValue>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an URL query string (without the leading `?`).
    ///
    /// Repeated keys and keys ending in `[]` collect into lists.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let (key, is_list) = match key.strip_suffix("[]") {
                Some(stripped) => (stripped.to_string(), true),
                None => (key.into_owned(), false),
            };
            params.append(key, FilterValue::String(value.into_owned()), is_list);
        }
        params
    }

    fn append(&mut self, key: String, value: FilterValue, force_list: bool) {
        match self.values.get_mut(&key) {
            Some(FilterValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, FilterValue::Null);
                *existing = FilterValue::List(vec![first, value]);
            }
            None => {
                let value = if force_list {
                    FilterValue::List(vec![value])
                } else {
                    value
                };
                self.values.insert(key, value);
            }
        }
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Get a parameter as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FilterValue::as_str)
    }

    /// Check whether a non-null parameter exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
