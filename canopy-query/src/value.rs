//! Values accepted by filters and structural predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentRef;

/// A value passed to a filter, either by the caller or from query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<FilterValue>),
    /// Reference to a node, object or class in the content tree.
    Ref(ContentRef),
    /// Point in time, stored as a Unix timestamp when sent to the store.
    DateTime(DateTime<Utc>),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null values and empty lists carry no input.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Check if this is a list value.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Scalars yield themselves, lists yield their entries.
    pub fn entries(&self) -> Vec<&FilterValue> {
        match self {
            Self::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it looks like a number.
    ///
    /// Strings are trimmed and parsed; booleans are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if f.is_finite() => Some(*f),
            Self::String(s) => parse_numeric(s),
            _ => None,
        }
    }

    /// Check whether the value looks like a number.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Integer view of the value, truncating floats and numeric strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::DateTime(dt) => Some(dt.timestamp()),
            other => other.as_number().map(|n| n.trunc() as i64),
        }
    }

    /// Text form used by string filters. Lists, nulls and references have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(true) => Some("1".to_string()),
            Self::Bool(false) => Some(String::new()),
            Self::DateTime(dt) => Some(dt.to_rfc3339()),
            Self::Null | Self::List(_) | Self::Ref(_) => None,
        }
    }

    /// Replace date values with their Unix timestamp, recursing into lists.
    pub fn into_timestamps(self) -> Self {
        match self {
            Self::DateTime(dt) => Self::Int(dt.timestamp()),
            Self::List(items) => Self::List(items.into_iter().map(Self::into_timestamps).collect()),
            other => other,
        }
    }
}

/// Parse a trimmed numeric string. Non-finite results are rejected.
pub(crate) fn parse_numeric(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FilterValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u64> for FilterValue {
    fn from(v: u64) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ContentRef> for FilterValue {
    fn from(v: ContentRef) -> Self {
        Self::Ref(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(_) => Self::String(v.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_numeric_detection() {
        assert!(FilterValue::from("42").is_numeric());
        assert!(FilterValue::from(" 4.5 ").is_numeric());
        assert!(FilterValue::from(7).is_numeric());
        assert!(!FilterValue::from("abc").is_numeric());
        assert!(!FilterValue::from("").is_numeric());
        assert!(!FilterValue::from("NaN").is_numeric());
        assert!(!FilterValue::Bool(true).is_numeric());
    }

    #[test]
    fn test_as_i64_truncates() {
        assert_eq!(FilterValue::from("12.9").as_i64(), Some(12));
        assert_eq!(FilterValue::Float(-3.7).as_i64(), Some(-3));
        assert_eq!(FilterValue::from("x").as_i64(), None);
    }

    #[test]
    fn test_absent_values() {
        assert!(FilterValue::Null.is_absent());
        assert!(FilterValue::List(vec![]).is_absent());
        assert!(!FilterValue::from("").is_absent());
        assert!(!FilterValue::from(0).is_absent());
    }

    #[test]
    fn test_entries_of_scalar_and_list() {
        let scalar = FilterValue::from(3);
        assert_eq!(scalar.entries(), vec![&FilterValue::Int(3)]);

        let list = FilterValue::from(vec![1, 2]);
        assert_eq!(list.entries().len(), 2);
    }

    #[test]
    fn test_timestamps() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let value = FilterValue::List(vec![dt.into(), FilterValue::from(5)]);
        assert_eq!(
            value.into_timestamps(),
            FilterValue::List(vec![FilterValue::Int(1_577_836_800), FilterValue::Int(5)])
        );
    }

    #[test]
    fn test_from_json() {
        let value = FilterValue::from(serde_json::json!([1, "a", true, null]));
        assert_eq!(
            value,
            FilterValue::List(vec![
                FilterValue::Int(1),
                FilterValue::from("a"),
                FilterValue::Bool(true),
                FilterValue::Null,
            ])
        );
    }
}
