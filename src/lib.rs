//! # Canopy
//!
//! Fluent query composition for hierarchical content stores.
//!
//! Canopy provides:
//! - Query sets that combine class, tree scope, field and structural filters
//! - Nested AND/OR filter trees built from sub-queries or JSON payloads
//! - Page-number pagination with named page sizes and offset parameters
//! - Named sort choices resolved from properties or query parameters
//! - TOML configuration (`canopy.toml`) for defaults
//!
//! Storage is not part of Canopy: implement [`ContentStore`] for your
//! backend and Canopy hands it ready-made query descriptors.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy::prelude::*;
//!
//! struct Articles(Vec<&'static str>);
//!
//! impl ContentStore for Articles {
//!     type Item = &'static str;
//!
//!     fn count(&self, _query: &CountQuery) -> QueryResult<u64> {
//!         Ok(self.0.len() as u64)
//!     }
//!
//!     fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<&'static str>>> {
//!         let start = (query.offset as usize).min(self.0.len());
//!         let end = (start + query.limit as usize).min(self.0.len());
//!         Ok(Some(self.0[start..end].to_vec()))
//!     }
//! }
//!
//! # fn main() -> QueryResult<()> {
//! let store = Articles(vec!["a", "b", "c", "d", "e"]);
//! let mut articles = QuerySet::new(store);
//! articles
//!     .classes(["article"])
//!     .define_filter("title", "string", None)?
//!     .filter("title", "release")
//!     .page(2)
//!     .page_limit(2);
//!
//! let result = articles.result()?;
//! assert_eq!(result.items(), &["c", "d"]);
//! assert_eq!(result.page().map(|p| p.page_count), Some(3));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use canopy_query::*;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use canopy_query::prelude::*;
    pub use canopy_query::{CanopyConfig, QuerySetIterator};
}
