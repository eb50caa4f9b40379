//! The outcome of one query execution.

use crate::content_filter::ContentFilter;
use crate::pagination::Page;
use crate::sort::SortOrder;

/// Items returned by the store plus the state that produced them.
#[derive(Debug, Clone)]
pub struct ResultSet<T> {
    items: Vec<T>,
    total: Option<u64>,
    page: Option<Page>,
    sort_order: SortOrder,
    content_filter: ContentFilter,
}

impl<T> ResultSet<T> {
    /// Assemble a result.
    pub fn new(
        items: Vec<T>,
        total: Option<u64>,
        page: Option<Page>,
        sort_order: SortOrder,
        content_filter: ContentFilter,
    ) -> Self {
        Self {
            items,
            total,
            page,
            sort_order,
            content_filter,
        }
    }

    /// Returned items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the result, keeping the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of matches; only known for paginated queries.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// The page that was fetched; only set for paginated queries.
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// The resolved sort order.
    pub fn sort_order(&self) -> &SortOrder {
        &self.sort_order
    }

    /// The content filter the query was built from.
    pub fn content_filter(&self) -> &ContentFilter {
        &self.content_filter
    }

    /// Number of returned items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether no items were returned.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
