//! Fuzz target for filter construction.
//!
//! This target generates arbitrary builder call sequences to find crashes
//! and panics in filter composition and content filter building.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_filter_construction
//! ```

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use canopy_query::{
    ContentFilter, ContentFilterIncrement, FieldFilter, FilterMode, FilterValue, QueryFilter,
};
use libfuzzer_sys::fuzz_target;

/// A fuzzable filter value.
#[derive(Debug, Arbitrary, Clone)]
enum FuzzFilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FuzzFilterValue>),
}

impl From<FuzzFilterValue> for FilterValue {
    fn from(val: FuzzFilterValue) -> Self {
        match val {
            FuzzFilterValue::Null => FilterValue::Null,
            FuzzFilterValue::Bool(b) => FilterValue::Bool(b),
            FuzzFilterValue::Int(i) => FilterValue::Int(i),
            FuzzFilterValue::Float(f) => FilterValue::Float(f),
            FuzzFilterValue::String(s) => FilterValue::String(s),
            FuzzFilterValue::List(list) => {
                FilterValue::List(list.into_iter().map(FilterValue::from).collect())
            }
        }
    }
}

/// A fuzzable builder call.
#[derive(Debug, Arbitrary)]
enum FuzzCall {
    Define(String, u8, Option<String>),
    Filter(String, FuzzFilterValue),
    Reset(String),
    Classes(Vec<String>),
    SubQuery(String, Vec<FuzzCall>),
}

impl FuzzCall {
    fn apply(self, filter: &mut QueryFilter, depth: usize) {
        // Limit recursion depth to prevent stack overflow
        if depth > 8 {
            return;
        }

        match self {
            FuzzCall::Define(name, kind, attribute) => {
                let kind = ["int", "bool", "string", "date"][usize::from(kind) % 4];
                let _ = filter.define_filter(name, kind, attribute.as_deref());
            }
            FuzzCall::Filter(name, value) => {
                filter.filter(&name, FilterValue::from(value));
            }
            FuzzCall::Reset(name) => {
                filter.reset_filter(&name);
            }
            FuzzCall::Classes(classes) => {
                filter.add_classes(classes.into_iter().take(10));
            }
            FuzzCall::SubQuery(condition, calls) => {
                let _ = filter.sub_query(condition, |child| {
                    for call in calls.into_iter().take(10) {
                        call.apply(child, depth + 1);
                    }
                    Ok(())
                });
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(calls) = Vec::<FuzzCall>::arbitrary(&mut unstructured) else {
        return;
    };

    let mut filter = QueryFilter::new();
    for call in calls.into_iter().take(32) {
        call.apply(&mut filter, 0);
    }

    // Building should never panic, only return errors
    for mode in [FilterMode::Attribute, FilterMode::Nested] {
        let mut content = ContentFilter::new(filter.classes().iter().cloned());
        if content
            .merge(ContentFilterIncrement::nested(filter.object_filters().to_vec()))
            .is_ok()
        {
            let definitions = filter.resolve_definitions(None);
            let _ = content.set_filters(definitions.iter().map(|f| f.as_ref() as &dyn FieldFilter), mode);
            let _ = content.nested_filter_set();
            let _ = format!("{:?}", content);
        }
    }
});
