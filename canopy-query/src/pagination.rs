//! Page arithmetic.
//!
//! Pages are numbered from 1. A paginator over `total` items with a page
//! size always has at least one page, so an empty result still has a
//! (zero-sized) first page.
//!
//! ```rust
//! use canopy_query::{PageNumPagination, Paginator};
//!
//! let paginator = PageNumPagination::new(95, 10);
//! assert_eq!(paginator.page_count(), 10);
//!
//! let last = paginator.get_page(10).unwrap();
//! assert_eq!((last.offset, last.size), (90, 5));
//!
//! // Page numbers below 1 do not exist.
//! assert!(paginator.get_page(0).is_none());
//! assert!(paginator.page(-1).is_none());
//!
//! // Past the end saturates to the last page.
//! assert_eq!(paginator.page(42).map(|p| p.num), Some(10));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::params::QueryParams;

/// Query parameter holding the page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter holding a 0-based item offset.
pub const OFFSET_PARAM: &str = "offset";

/// One page of a paginated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Offset of the first item.
    pub offset: u64,
    /// Number of items on this page.
    pub size: u64,
    /// Page number, starting at 1.
    pub num: u64,
    /// Nominal page size.
    pub page_size: u64,
    /// Number of pages in the paginator.
    pub page_count: u64,
}

impl Page {
    /// Previous page number, if any.
    pub fn prev_num(&self) -> Option<u64> {
        (self.num > 1).then(|| self.num - 1)
    }

    /// Next page number, if any.
    pub fn next_num(&self) -> Option<u64> {
        (self.num < self.page_count).then(|| self.num + 1)
    }

    /// Check whether this is the first page.
    pub fn is_first(&self) -> bool {
        self.num <= 1
    }

    /// Check whether this is the last page.
    pub fn is_last(&self) -> bool {
        self.num >= self.page_count
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}/{} (offset {}, size {})", self.num, self.page_count, self.offset, self.size)
    }
}

/// Page size configuration: a fixed size or the query set's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLimit {
    /// Resolve through the default page limit chain.
    #[default]
    Default,
    /// Fixed page size.
    Fixed(u64),
}

impl From<u64> for PageLimit {
    fn from(size: u64) -> Self {
        Self::Fixed(size)
    }
}

/// Extra paginator parameters: variable page sizes picked by a query
/// parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageParams {
    /// Query parameter naming the page size.
    pub page_variable: Option<String>,
    /// Page sizes by name.
    #[serde(default)]
    pub named_sizes: IndexMap<String, u64>,
}

impl PageParams {
    /// Create parameters for a size variable.
    pub fn new(page_variable: impl Into<String>) -> Self {
        Self {
            page_variable: Some(page_variable.into()),
            named_sizes: IndexMap::new(),
        }
    }

    /// Add a named size.
    pub fn size(mut self, name: impl Into<String>, size: u64) -> Self {
        self.named_sizes.insert(name.into(), size);
        self
    }

    /// Size selected by the query parameters, if any.
    pub fn select(&self, params: &QueryParams) -> Option<u64> {
        let variable = self.page_variable.as_deref()?;
        let value = params.get(variable)?;
        let key = value.to_text()?;
        self.named_sizes.get(&key).copied()
    }
}

/// Page arithmetic over a known total.
pub trait Paginator: fmt::Debug + Send + Sync {
    /// Total number of items.
    fn total(&self) -> u64;

    /// Page size, at least 1.
    fn page_size(&self) -> u64;

    /// Apply query parameters that change the paginator (e.g. page size).
    fn resolve_query(&mut self, params: &QueryParams);

    /// Number of pages, at least 1.
    fn page_count(&self) -> u64 {
        self.total().div_ceil(self.page_size()).max(1)
    }

    /// Page number requested by the query parameters.
    ///
    /// Prefers the page parameter, then derives the page from an offset
    /// parameter, then defaults to 1.
    fn query_page(&self, params: &QueryParams) -> i64 {
        if let Some(num) = params.get(PAGE_PARAM).and_then(|v| v.as_i64()).filter(|n| *n != 0) {
            return num;
        }
        match params.get(OFFSET_PARAM).and_then(|v| v.as_i64()).filter(|n| *n > 0) {
            Some(offset) => self.page_from_offset(offset as u64) as i64,
            None => 1,
        }
    }

    /// Page containing a 0-based item offset.
    fn page_from_offset(&self, offset: u64) -> u64 {
        offset / self.page_size() + 1
    }

    /// Offset of the first item on a page.
    fn offset_from_page(&self, num: u64) -> u64 {
        num.saturating_sub(1) * self.page_size()
    }

    /// Check whether a page number is in range.
    fn page_exists(&self, num: i64) -> bool {
        num >= 1 && (num as u64) <= self.page_count()
    }

    /// Build a page without range checks.
    fn build_page(&self, num: u64) -> Page {
        let offset = self.offset_from_page(num);
        Page {
            offset,
            size: self.page_size().min(self.total().saturating_sub(offset)),
            num,
            page_size: self.page_size(),
            page_count: self.page_count(),
        }
    }

    /// The page with this number, or `None` when out of range.
    fn get_page(&self, num: i64) -> Option<Page> {
        self.page_exists(num).then(|| self.build_page(num as u64))
    }

    /// The page with this number, saturating to the last page.
    ///
    /// Numbers below 1 give `None`.
    fn page(&self, num: i64) -> Option<Page> {
        if num < 1 {
            return None;
        }
        Some(self.get_page(num).unwrap_or_else(|| self.last_page()))
    }

    /// First page.
    fn first_page(&self) -> Page {
        self.build_page(1)
    }

    /// Last page.
    fn last_page(&self) -> Page {
        self.build_page(self.page_count())
    }

    /// Page before `page`, if any.
    fn previous_page(&self, page: &Page) -> Option<Page> {
        self.get_page(page.num as i64 - 1)
    }

    /// Page after `page`, if any.
    fn next_page(&self, page: &Page) -> Option<Page> {
        self.get_page(page.num as i64 + 1)
    }

    /// All pages in order.
    fn pages(&self) -> Vec<Page> {
        (1..=self.page_count()).map(|num| self.build_page(num)).collect()
    }
}

/// Page-number pagination with optional named page sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNumPagination {
    total: u64,
    page_size: u64,
    params: PageParams,
}

impl PageNumPagination {
    /// Create a paginator. A page size of 0 is treated as 1.
    pub fn new(total: u64, page_size: u64) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
            params: PageParams::default(),
        }
    }

    /// Use named page sizes.
    pub fn with_params(mut self, params: PageParams) -> Self {
        self.params = params;
        self
    }

    /// The page requested by `params`, saturating to the last page.
    pub fn resolve_page(&mut self, params: &QueryParams) -> Option<Page> {
        self.resolve_query(params);
        self.page(self.query_page(params))
    }
}

impl Paginator for PageNumPagination {
    fn total(&self) -> u64 {
        self.total
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn resolve_query(&mut self, params: &QueryParams) {
        if let Some(size) = self.params.select(params) {
            self.page_size = size.max(1);
        }
    }
}
