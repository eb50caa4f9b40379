//! Fuzz target for JSON filter payloads and filter identifiers.
//!
//! Arbitrary bytes are read as JSON and handed to `add_filter`, then the
//! accepted entries are processed into a nested tree. The same input is
//! also parsed as a filter identifier.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_nested_json
//! ```

#![no_main]

use canopy_query::field_filter::ParsedIdentifier;
use canopy_query::{ContentFilter, ContentFilterIncrement, QueryFilter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = ParsedIdentifier::parse(input);
    assert!(!parsed.operator.is_empty());

    let Ok(value) = serde_json::from_str::<serde_json::Value>(input) else {
        return;
    };
    let mut filter = QueryFilter::new();
    if filter.add_filter(value).is_ok() {
        let mut content = ContentFilter::default();
        let before = content.clone();
        if content
            .merge(ContentFilterIncrement::nested(filter.nested().to_vec()))
            .is_err()
        {
            // Failed merges leave the filter untouched.
            assert_eq!(content, before);
        }
    } else {
        assert!(filter.object_filters().is_empty());
    }
});
