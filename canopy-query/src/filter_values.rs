//! Option lists for filters: identifiers paired with display labels.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::content::ContentRef;
use crate::traits::{IdentifierResolver, NameLookup};
use crate::value::FilterValue;

/// A list of filter values with optional human-readable labels.
///
/// Labels are keyed by the text form of the identifier, so `5` and `"5"`
/// share a label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterValues {
    items: Vec<FilterValue>,
    names: IndexMap<String, String>,
}

/// An item paired with its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelledValue<'a> {
    /// Identifier.
    pub id: &'a FilterValue,
    /// Label, if one is known.
    pub label: Option<&'a str>,
}

fn key_of(value: &FilterValue) -> Option<String> {
    match value {
        FilterValue::Ref(ContentRef::Class(class)) => Some(class.identifier.clone()),
        FilterValue::Ref(content) => content.object_id().map(|id| id.to_string()),
        other => other.to_text(),
    }
}

impl FilterValues {
    /// Create a list without labels.
    pub fn new(items: impl IntoIterator<Item = FilterValue>) -> Self {
        Self {
            items: items.into_iter().collect(),
            names: IndexMap::new(),
        }
    }

    /// Create a list from `(id, label)` pairs.
    pub fn from_pairs<I, V, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<FilterValue>,
        L: Into<String>,
    {
        let mut values = Self::default();
        for (id, label) in pairs {
            values.push(id.into(), Some(label.into()));
        }
        values
    }

    /// Append an item, optionally with a label.
    pub fn push(&mut self, id: FilterValue, label: Option<String>) {
        if let (Some(key), Some(label)) = (key_of(&id), label) {
            self.names.insert(key, label);
        }
        self.items.push(id);
    }

    /// Append all items and labels of another list.
    pub fn extend(&mut self, other: FilterValues) {
        self.items.extend(other.items);
        self.names.extend(other.names);
    }

    /// The identifiers.
    pub fn items(&self) -> &[FilterValue] {
        &self.items
    }

    /// Labels keyed by identifier text.
    pub fn names(&self) -> &IndexMap<String, String> {
        &self.names
    }

    /// Label for an identifier.
    pub fn label(&self, id: &FilterValue) -> Option<&str> {
        key_of(id).and_then(|key| self.names.get(&key).map(String::as_str))
    }

    /// All items with their labels.
    pub fn labelled(&self) -> Vec<LabelledValue<'_>> {
        self.items
            .iter()
            .map(|id| LabelledValue {
                id,
                label: self.label(id),
            })
            .collect()
    }

    /// The items whose identifier is among `selected`, in item order.
    pub fn selected_items(&self, selected: &[FilterValue]) -> Vec<LabelledValue<'_>> {
        let keys: Vec<String> = selected.iter().filter_map(key_of).collect();
        self.labelled()
            .into_iter()
            .filter(|item| key_of(item.id).is_some_and(|k| keys.contains(&k)))
            .collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check for an empty list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build a list from content references, numeric ids and symbolic
    /// identifiers.
    ///
    /// References contribute their object id and name. Numeric ids get
    /// labels from `lookup`; symbolic identifiers are handed to `resolver`
    /// and whatever it returns is appended. Without a resolver, symbolic
    /// identifiers are dropped.
    pub fn from_refs(
        values: &[FilterValue],
        lookup: Option<&dyn NameLookup>,
        resolver: Option<&dyn IdentifierResolver>,
    ) -> Self {
        let mut result = Self::default();
        let mut pending_ids = Vec::new();
        let mut identifiers = Vec::new();

        for value in values.iter().flat_map(FilterValue::entries) {
            match value {
                FilterValue::Ref(content) => {
                    let id = match content {
                        ContentRef::Class(class) => FilterValue::String(class.identifier.clone()),
                        other => match other.object_id() {
                            Some(id) => FilterValue::from(id),
                            None => continue,
                        },
                    };
                    result.push(id, Some(content.name().to_string()));
                }
                FilterValue::String(text) if !value.is_numeric() => {
                    identifiers.push(text.clone());
                }
                other => {
                    if let Some(id) = other.as_number().map(|n| n as i64).filter(|id| *id > 0) {
                        pending_ids.push(id as u64);
                    }
                }
            }
        }

        if !pending_ids.is_empty() {
            let names = lookup.map(|l| l.names(&pending_ids)).unwrap_or_default();
            for id in pending_ids {
                result.push(FilterValue::from(id), names.get(&id).cloned());
            }
        }

        if !identifiers.is_empty() {
            match resolver.and_then(|r| r.resolve(&identifiers)) {
                Some(resolved) => result.extend(resolved),
                None => trace!(count = identifiers.len(), "Unresolved symbolic identifiers dropped"),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::*;

    #[test]
    fn test_labels_by_text_key() {
        let values = FilterValues::from_pairs([(1, "One"), (2, "Two")]);
        assert_eq!(values.label(&FilterValue::from(2)), Some("Two"));
        assert_eq!(values.label(&FilterValue::from("1")), Some("One"));
        assert_eq!(values.label(&FilterValue::from(3)), None);
    }

    #[test]
    fn test_selected_items_keep_item_order() {
        let values = FilterValues::from_pairs([(1, "One"), (2, "Two"), (3, "Three")]);
        let selected = values.selected_items(&[FilterValue::from(3), FilterValue::from(1)]);
        let labels: Vec<_> = selected.iter().map(|i| i.label).collect();
        assert_eq!(labels, vec![Some("One"), Some("Three")]);
    }

    #[test]
    fn test_from_refs_mixed() {
        let lookup = |ids: &[u64]| -> IndexMap<u64, String> {
            ids.iter().map(|id| (*id, format!("Object {}", id))).collect()
        };
        let resolver = |idents: &[String]| -> Option<FilterValues> {
            Some(FilterValues::from_pairs(
                idents.iter().map(|i| (format!("remote:{}", i), i.to_uppercase())),
            ))
        };
        let input = vec![
            FilterValue::from(object(12, 40)),
            FilterValue::from("7"),
            FilterValue::from("news"),
            FilterValue::from(0),
        ];

        let values = FilterValues::from_refs(&input, Some(&lookup), Some(&resolver));
        assert_eq!(values.len(), 3);
        assert_eq!(values.label(&FilterValue::from(12)), Some("Object 12"));
        assert_eq!(values.label(&FilterValue::from(7)), Some("Object 7"));
        assert_eq!(values.label(&FilterValue::from("remote:news")), Some("NEWS"));
    }

    #[test]
    fn test_from_refs_without_collaborators() {
        let input = vec![FilterValue::from(5), FilterValue::from("symbolic")];
        let values = FilterValues::from_refs(&input, None, None);
        assert_eq!(values.items(), &[FilterValue::from(5u64)]);
        assert_eq!(values.label(&FilterValue::from(5)), None);
    }
}
