//! Benchmarks for filter composition and content filter building.

use std::hint::black_box;

use canopy::{
    CompositeFilter, ContentFilter, ContentFilterIncrement, ContentStore, CountQuery, FilterLeaf,
    FilterValue, ItemQuery, NestedItem, QueryFilter, QueryResult, QuerySet, StructuralFilter,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;

/// Store that answers instantly so only query building is measured.
struct NullStore;

impl ContentStore for NullStore {
    type Item = u64;

    fn count(&self, _query: &CountQuery) -> QueryResult<u64> {
        Ok(1000)
    }

    fn fetch(&self, _query: &ItemQuery) -> QueryResult<Option<Vec<u64>>> {
        Ok(Some(Vec::new()))
    }
}

/// Create a nested item tree of the given depth.
fn nested_tree(depth: usize) -> NestedItem {
    if depth == 0 {
        FilterLeaf::new("title", "=", vec![FilterValue::from("leaf")]).into()
    } else {
        let condition = if depth % 2 == 0 { "and" } else { "or" };
        NestedItem::Composite(CompositeFilter::new(
            condition,
            vec![
                StructuralFilter::new("depth", depth as i64).into(),
                nested_tree(depth - 1),
            ],
        ))
    }
}

fn bench_query_set_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_set_build");

    for count in [1, 5, 10, 25] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("defined_filters", count), &count, |b, &count| {
            b.iter(|| {
                let mut set = QuerySet::new(NullStore);
                set.classes(["article"]);
                for i in 0..count {
                    let name = format!("field_{}", i);
                    if set.define_filter(name.as_str(), "string", None).is_ok() {
                        set.filter(&name, "value");
                    }
                }
                black_box(set.content_filter().map(|f| f.attributes().len()))
            })
        });
    }

    group.bench_function("paginated_result", |b| {
        b.iter(|| {
            let mut set = QuerySet::new(NullStore);
            set.filter("section", 1).page(black_box(7)).page_limit(20);
            black_box(set.result().map(|r| r.page().copied()))
        })
    });

    group.finish();
}

fn bench_nested_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_processing");

    for depth in [1, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let tree = nested_tree(depth);
            b.iter(|| black_box(ContentFilter::process_nested(vec![tree.clone()])))
        });
    }

    group.bench_function("merge_increment", |b| {
        let items: Vec<NestedItem> = (0..10)
            .map(|i| StructuralFilter::new("priority:>", i).into())
            .collect();
        b.iter(|| {
            let mut filter = ContentFilter::new(["article"]);
            let _ = filter.merge(ContentFilterIncrement::nested(items.clone()));
            black_box(filter.nested_tree().map(|t| t.children.len()))
        })
    });

    group.finish();
}

fn bench_json_payloads(c: &mut Criterion) {
    let payload = json!([
        ["section", 3],
        ["title", ["a", "b", "c"], "in"],
        {"condition": "or", "nested": [["priority:>", 5], ["depth:<=", 2]]}
    ]);

    c.bench_function("add_filter_json", |b| {
        b.iter(|| {
            let mut filter = QueryFilter::new();
            let _ = filter.add_filter(black_box(payload.clone()));
            black_box(filter.nested().len())
        })
    });

    c.bench_function("sub_query", |b| {
        b.iter(|| {
            let mut filter = QueryFilter::new();
            let _ = filter.sub_query("or", |or| {
                or.filter("section", 1).filter("section", 2);
                Ok(())
            });
            black_box(filter.object_filters().len())
        })
    });
}

criterion_group!(
    benches,
    bench_query_set_build,
    bench_nested_processing,
    bench_json_payloads
);
criterion_main!(benches);
