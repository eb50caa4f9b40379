//! Page-by-page traversal of a whole result.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::pagination::Paginator;
use crate::sort::SortField;
use crate::store::{CountQuery, ItemQuery};
use crate::traits::ContentStore;

/// Iterator over every item of a query, fetching one page at a time.
///
/// The total is counted once when the iterator is created. Pages are
/// fetched lazily; after the last page no further store calls are made.
/// A store failure is yielded once and ends the traversal.
pub struct QuerySetIterator<S: ContentStore> {
    store: Arc<S>,
    base: CountQuery,
    sort: Option<Vec<SortField>>,
    paginator: Box<dyn Paginator>,
    page_count: u64,
    next_page: u64,
    buffer: std::vec::IntoIter<S::Item>,
    finished: bool,
}

impl<S: ContentStore> QuerySetIterator<S> {
    /// Create an iterator over the pages of `paginator`.
    pub fn new(
        store: Arc<S>,
        base: CountQuery,
        sort: Option<Vec<SortField>>,
        paginator: Box<dyn Paginator>,
    ) -> Self {
        let page_count = if paginator.total() == 0 {
            0
        } else {
            paginator.page_count()
        };
        Self {
            store,
            base,
            sort,
            paginator,
            page_count,
            next_page: 1,
            buffer: Vec::new().into_iter(),
            finished: false,
        }
    }

    /// Total number of items, as counted when the iterator was created.
    pub fn total(&self) -> u64 {
        self.paginator.total()
    }

    /// Number of pages that will be fetched.
    pub fn page_count(&self) -> u64 {
        self.page_count
    }

    /// Restart from the first page. The total is not recounted.
    pub fn rewind(&mut self) {
        self.next_page = 1;
        self.buffer = Vec::new().into_iter();
        self.finished = false;
    }

    fn fetch_next_page(&mut self) -> QueryResult<()> {
        let page = self.paginator.build_page(self.next_page);
        self.next_page += 1;
        let query = ItemQuery::new(self.base.clone(), page.offset, page.size).with_sort(self.sort.clone());
        debug!(page = page.num, offset = page.offset, limit = page.size, "Fetching iterator page");
        let items = self
            .store
            .fetch(&query)?
            .ok_or_else(QueryError::empty_store_result)?;
        self.buffer = items.into_iter();
        Ok(())
    }
}

impl<S: ContentStore> Iterator for QuerySetIterator<S> {
    type Item = QueryResult<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }
            if self.finished || self.next_page > self.page_count {
                return None;
            }
            if let Err(err) = self.fetch_next_page() {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}

impl<S: ContentStore> fmt::Debug for QuerySetIterator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySetIterator")
            .field("total", &self.paginator.total())
            .field("page_count", &self.page_count)
            .field("next_page", &self.next_page)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_filter::ContentFilter;
    use crate::pagination::PageNumPagination;
    use crate::store::QueryScope;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct PagedStore {
        total: u64,
        fail_at: Option<u64>,
        fetches: Mutex<Vec<(u64, u64)>>,
    }

    impl ContentStore for PagedStore {
        type Item = u64;

        fn count(&self, _query: &CountQuery) -> QueryResult<u64> {
            Ok(self.total)
        }

        fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<u64>>> {
            self.fetches.lock().unwrap().push((query.offset, query.limit));
            if self.fail_at == Some(query.offset) {
                return Ok(None);
            }
            let end = (query.offset + query.limit).min(self.total);
            Ok(Some((query.offset..end).collect()))
        }
    }

    fn iterator(store: &Arc<PagedStore>, page_size: u64) -> QuerySetIterator<PagedStore> {
        let base = CountQuery::new(&ContentFilter::default(), QueryScope::default());
        let paginator = Box::new(PageNumPagination::new(store.total, page_size));
        QuerySetIterator::new(Arc::clone(store), base, None, paginator)
    }

    #[test]
    fn test_traverses_all_pages() {
        let store = Arc::new(PagedStore {
            total: 23,
            ..Default::default()
        });
        let items: Vec<u64> = iterator(&store, 10).map(|r| r.unwrap()).collect();
        assert_eq!(items, (0..23).collect::<Vec<_>>());
        assert_eq!(
            *store.fetches.lock().unwrap(),
            vec![(0, 10), (10, 10), (20, 3)]
        );
    }

    #[test]
    fn test_empty_total_makes_no_fetch() {
        let store = Arc::new(PagedStore::default());
        let mut iter = iterator(&store, 10);
        assert_eq!(iter.page_count(), 0);
        assert!(iter.next().is_none());
        assert!(store.fetches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rewind() {
        let store = Arc::new(PagedStore {
            total: 5,
            ..Default::default()
        });
        let mut iter = iterator(&store, 2);
        assert_eq!(iter.by_ref().count(), 5);
        iter.rewind();
        assert_eq!(iter.next().map(|r| r.unwrap()), Some(0));
    }

    #[test]
    fn test_missing_page_ends_traversal() {
        let store = Arc::new(PagedStore {
            total: 30,
            fail_at: Some(10),
            ..Default::default()
        });
        let results: Vec<_> = iterator(&store, 10).collect();
        assert_eq!(results.len(), 11);
        let err = results[10].as_ref().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::EmptyStoreResult);
        assert_eq!(store.fetches.lock().unwrap().len(), 2);
    }
}
