//! Benchmarks for page arithmetic, paging parameters and sort resolution.

use std::hint::black_box;

use canopy::{
    PageNumPagination, PageParams, Paginator, QueryParams, SortChoice, SortOrder,
    default_sort_choices,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_page_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_lookup");

    for total in [10u64, 1_000, 1_000_000] {
        let paginator = PageNumPagination::new(total, 25);
        group.bench_with_input(BenchmarkId::new("saturating_page", total), &paginator, |b, p| {
            b.iter(|| black_box(p.page(black_box(12_345))))
        });
    }

    let paginator = PageNumPagination::new(10_000, 50);
    group.bench_function("all_pages", |b| b.iter(|| black_box(paginator.pages().len())));

    group.finish();
}

fn bench_query_paging(c: &mut Criterion) {
    let params = PageParams::new("size")
        .size("small", 10)
        .size("medium", 25)
        .size("large", 100);
    let by_page = QueryParams::parse("size=medium&page=7");
    let by_offset = QueryParams::parse("offset=4031");

    c.bench_function("resolve_page_named_size", |b| {
        b.iter(|| {
            let mut paginator = PageNumPagination::new(9_000, 10).with_params(params.clone());
            black_box(paginator.resolve_page(black_box(&by_page)))
        })
    });

    c.bench_function("resolve_page_offset", |b| {
        b.iter(|| {
            let mut paginator = PageNumPagination::new(9_000, 10);
            black_box(paginator.resolve_page(black_box(&by_offset)))
        })
    });

    c.bench_function("parse_query_string", |b| {
        b.iter(|| black_box(QueryParams::parse(black_box("size=large&page=3&sort=-a-z&q=news"))))
    });
}

fn bench_sort_resolution(c: &mut Criterion) {
    let mut choices = default_sort_choices();
    for i in 0..20 {
        choices.insert(format!("field_{}", i), SortChoice::from("name"));
    }

    c.bench_function("sort_resolve_known", |b| {
        b.iter(|| {
            let mut order = SortOrder::new(choices.clone(), Some("newest".into()));
            order.resolve_query(black_box(Some("-field_17")));
            black_box(order.ordering().map(<[_]>::len))
        })
    });

    c.bench_function("sort_resolve_fallback", |b| {
        b.iter(|| {
            let mut order = SortOrder::new(choices.clone(), Some("newest".into()));
            order.resolve_query(black_box(Some("missing")));
            black_box(order.identifier().map(str::len))
        })
    });
}

criterion_group!(benches, bench_page_lookup, bench_query_paging, bench_sort_resolution);
criterion_main!(benches);
