//! Copy-on-write query sets.
//!
//! A [`QuerySnapshot`] never changes after creation. Builder calls return a
//! new snapshot and leave the receiver (and its memoized result) alone, so
//! a base query can be shared and refined in several directions.

use std::fmt;
use std::sync::OnceLock;

use smol_str::SmolStr;

use crate::content_filter::ContentFilter;
use crate::error::QueryResult;
use crate::field_filter::FilterType;
use crate::iterator::QuerySetIterator;
use crate::pagination::PageLimit;
use crate::query_filter::QueryFilter;
use crate::query_set::QuerySet;
use crate::result::ResultSet;
use crate::store::CountQuery;
use crate::traits::ContentStore;
use crate::value::FilterValue;

/// Immutable query set with memoized results.
pub struct QuerySnapshot<S: ContentStore> {
    set: QuerySet<S>,
    content_filter: OnceLock<ContentFilter>,
    count: OnceLock<u64>,
    result: OnceLock<ResultSet<S::Item>>,
}

impl<S: ContentStore> QuerySnapshot<S> {
    pub(crate) fn new(set: QuerySet<S>) -> Self {
        Self {
            set,
            content_filter: OnceLock::new(),
            count: OnceLock::new(),
            result: OnceLock::new(),
        }
    }

    /// The query set this snapshot was taken from.
    pub fn query_set(&self) -> &QuerySet<S> {
        &self.set
    }

    /// Back to a mutable query set.
    pub fn thaw(self) -> QuerySet<S> {
        self.set
    }

    /// A new snapshot with `change` applied to a copy of this one.
    pub fn with<F>(&self, change: F) -> Self
    where
        F: FnOnce(&mut QuerySet<S>),
    {
        let mut set = self.set.clone();
        change(&mut set);
        Self::new(set)
    }

    /// Like [`QuerySnapshot::with`] for fallible changes.
    pub fn try_with<F>(&self, change: F) -> QueryResult<Self>
    where
        F: FnOnce(&mut QuerySet<S>) -> QueryResult<()>,
    {
        let mut set = self.set.clone();
        change(&mut set)?;
        Ok(Self::new(set))
    }

    /// A new snapshot with more content classes.
    pub fn classes(&self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.with(|set| {
            set.classes(classes);
        })
    }

    /// A new snapshot with a filter value set.
    pub fn filter(&self, name: &str, value: impl Into<FilterValue>) -> Self {
        self.with(|set| {
            set.filter(name, value);
        })
    }

    /// A new snapshot with a filter defined.
    pub fn define_filter(
        &self,
        name: impl Into<String>,
        filter_type: impl Into<FilterType>,
        attribute: Option<&str>,
    ) -> QueryResult<Self> {
        self.try_with(|set| set.define_filter(name, filter_type, attribute).map(|_| ()))
    }

    /// A new snapshot with a sub-query appended.
    pub fn sub_query<F>(&self, condition: impl Into<SmolStr>, build: F) -> QueryResult<Self>
    where
        F: FnOnce(&mut QueryFilter) -> QueryResult<()>,
    {
        self.try_with(|set| set.sub_query(condition, build).map(|_| ()))
    }

    /// A new snapshot fetching page `num`.
    pub fn page(&self, num: i64) -> Self {
        self.with(|set| {
            set.page(num);
        })
    }

    /// A new snapshot with another page size.
    pub fn page_limit(&self, limit: impl Into<PageLimit>) -> Self {
        self.with(|set| {
            set.page_limit(limit);
        })
    }

    /// A new snapshot sorted by a choice token.
    pub fn sort_by_field(&self, field: Option<&str>) -> Self {
        self.with(|set| {
            set.sort_by_field(field);
        })
    }

    /// The content filter, built on first access.
    pub fn content_filter(&self) -> QueryResult<&ContentFilter> {
        if let Some(content) = self.content_filter.get() {
            return Ok(content);
        }
        let content = self.set.build_filter()?;
        Ok(self.content_filter.get_or_init(|| content))
    }

    /// Total number of matches, counted on first access.
    pub fn count(&self) -> QueryResult<u64> {
        if let Some(total) = self.count.get() {
            return Ok(*total);
        }
        let total = self.set.execute_count(Some(self.content_filter()?))?;
        Ok(*self.count.get_or_init(|| total))
    }

    /// The result, built on first access. Failures are not memoized.
    pub fn result(&self) -> QueryResult<&ResultSet<S::Item>> {
        if let Some(result) = self.result.get() {
            return Ok(result);
        }
        let result = self
            .set
            .execute(self.content_filter.get(), self.count.get().copied())?;
        // Already-set cells hold the same build.
        self.content_filter.set(result.content_filter().clone()).ok();
        if let Some(total) = result.total() {
            self.count.set(total).ok();
        }
        Ok(self.result.get_or_init(|| result))
    }

    /// Items of the result.
    pub fn items(&self) -> QueryResult<&[S::Item]> {
        Ok(self.result()?.items())
    }

    /// Iterate over every match, one page at a time.
    pub fn iter(&self) -> QueryResult<QuerySetIterator<S>> {
        let total = self.count()?;
        let base = CountQuery::new(self.content_filter()?, self.set.scope_for_iteration());
        Ok(self.set.iterator_over(base, total))
    }
}

impl<S: ContentStore> From<QuerySet<S>> for QuerySnapshot<S> {
    fn from(set: QuerySet<S>) -> Self {
        Self::new(set)
    }
}

impl<S: ContentStore> Clone for QuerySnapshot<S> {
    fn clone(&self) -> Self {
        let snapshot = Self::new(self.set.clone());
        // The cells are fresh, so these sets cannot fail.
        if let Some(content) = self.content_filter.get() {
            snapshot.content_filter.set(content.clone()).ok();
        }
        if let Some(total) = self.count.get() {
            snapshot.count.set(*total).ok();
        }
        snapshot
    }
}

impl<S: ContentStore> fmt::Debug for QuerySnapshot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySnapshot")
            .field("set", &self.set)
            .field("count", &self.count.get())
            .field("resolved", &self.result.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, QueryError};
    use crate::store::ItemQuery;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Store {
        total: u64,
        fail_next: AtomicBool,
        counts: AtomicUsize,
        fetches: Mutex<Vec<ItemQuery>>,
    }

    impl ContentStore for Store {
        type Item = u64;

        fn count(&self, _query: &CountQuery) -> QueryResult<u64> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            Ok(self.total)
        }

        fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<u64>>> {
            self.fetches.lock().unwrap().push(query.clone());
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(QueryError::store("timeout"));
            }
            let end = (query.offset + query.limit).min(self.total);
            Ok(Some((query.offset..end).collect()))
        }
    }

    fn snapshot(total: u64) -> (Arc<Store>, QuerySnapshot<Store>) {
        let store = Arc::new(Store {
            total,
            ..Default::default()
        });
        let set = QuerySet::shared(Arc::clone(&store));
        (store, set.freeze())
    }

    #[test]
    fn test_derived_snapshots_are_isolated() {
        let (store, base) = snapshot(8);
        let base = base.define_filter("title", "string", None).unwrap();
        let derived = base.filter("title", "news").page(1).page_limit(3);

        assert_eq!(base.items().unwrap().len(), 8);
        assert!(store.fetches.lock().unwrap()[0].base.attribute_filter.is_none());

        assert_eq!(derived.items().unwrap(), &[0, 1, 2]);
        assert!(store.fetches.lock().unwrap()[1].base.attribute_filter.is_some());

        // The base result is still memoized.
        base.result().unwrap();
        assert_eq!(store.fetches.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failures_are_not_memoized() {
        let (store, snap) = snapshot(2);
        store.fail_next.store(true, Ordering::SeqCst);
        assert_eq!(snap.result().unwrap_err().code, ErrorCode::StoreFailure);
        assert_eq!(snap.items().unwrap(), &[0, 1]);
        snap.items().unwrap();
        assert_eq!(store.fetches.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_count_reused_by_paginated_result() {
        let (store, snap) = snapshot(25);
        let snap = snap.page(3);
        assert_eq!(snap.count().unwrap(), 25);
        let result = snap.result().unwrap();
        assert_eq!(result.total(), Some(25));
        assert_eq!(result.items(), &[20, 21, 22, 23, 24]);
        assert_eq!(store.counts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clone_keeps_filter_and_count() {
        let (store, snap) = snapshot(25);
        let snap = snap.page(2).page_limit(10);
        snap.result().unwrap();

        let copy = snap.clone();
        assert_eq!(copy.count().unwrap(), 25);
        assert_eq!(copy.items().unwrap(), snap.items().unwrap());
        assert_eq!(store.counts.load(Ordering::SeqCst), 1);
        assert_eq!(store.fetches.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_iterate_snapshot() {
        let (_, snap) = snapshot(12);
        let snap = snap.page_limit(5);
        let items: Vec<u64> = snap.iter().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(items, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_try_with_propagates() {
        let (_, snap) = snapshot(1);
        let err = snap.try_with(|set| set.sort_mode("random").map(|_| ())).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedSortMode);
    }

    #[test]
    fn test_thaw_keeps_state() {
        let (_, snap) = snapshot(1);
        let snap = snap.classes(["article"]);
        let set = snap.thaw();
        assert!(set.query_filter().classes().contains("article"));
    }
}
