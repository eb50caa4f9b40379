//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `canopy.toml` settings reach the query sets
//! built from them.

mod common;

use std::sync::Arc;

use canopy::{
    CanopyConfig, ClassAttribute, ErrorCode, FilterKind, QueryParams, QuerySet, SortField,
    StaticClassCatalog,
};
use common::RecordingStore;
use pretty_assertions::assert_eq;

/// Test an empty file gives the defaults
#[test]
fn test_config_minimal() {
    let config = CanopyConfig::from_str("").expect("Failed to parse config");
    assert_eq!(config, CanopyConfig::default());
    assert_eq!(config.pagination.default_page_limit, 10);
    assert_eq!(config.filters.mode, "attribute");
}

/// Test a full configuration drives a query set
#[test]
fn test_config_drives_query_set() {
    let config_str = r#"
        [pagination]
        default_page_limit = 20
        page_variable = "size"
        named_sizes = { small = 5 }

        [sorting]
        mode = "query"
        query_name = "order"

        [scope]
        parent_node_id = 61
        depth = 1
        main_node_only = true
    "#;
    let config = CanopyConfig::from_str(config_str).expect("Failed to parse config");

    let store = Arc::new(RecordingStore::with_total(40));
    let mut set = QuerySet::with_config(Arc::clone(&store), &config).unwrap();
    set.page_from_query(None)
        .query(QueryParams::parse("size=small&page=3&order=z-a"));
    set.result().unwrap();

    let query = store.last_fetch();
    assert_eq!((query.offset, query.limit), (10, 5));
    assert_eq!(query.sort, Some(vec![SortField::desc("name")]));
    assert_eq!(query.base.scope.parent_node_id, 61);
    assert_eq!(query.base.scope.depth, Some(1));
    assert!(query.base.scope.main_node_only);
}

/// Test loading from a file on disk
#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("canopy-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[filters]\nmode = \"nested\"\nallow_user_input = true\n").unwrap();

    let config = CanopyConfig::from_file(&path).expect("Failed to load config");
    assert_eq!(config.filters.mode, "nested");
    assert!(config.filters.allow_user_input);

    std::fs::remove_file(&path).unwrap();
    let err = CanopyConfig::from_file(&path).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    assert!(err.is_configuration_error());
}

/// Test attribute handlers pick the filter kind for loaded filters
#[test]
fn test_config_attribute_handlers() {
    let config = CanopyConfig::from_str(
        r#"
        [attribute_filters.handlers]
        ezprice = "int"
    "#,
    )
    .unwrap();

    let catalog = StaticClassCatalog::new().with_class(
        "product",
        [
            ClassAttribute::new("price", "ezprice"),
            ClassAttribute::new("name", "ezstring"),
            ClassAttribute::new("in_stock", "ezboolean"),
        ],
    );
    let services = config
        .services()
        .unwrap()
        .with_class_catalog(Arc::new(catalog));

    let mut set = QuerySet::new(RecordingStore::with_total(0)).with_services(services);
    set.classes(["product"]).load_filters().unwrap();

    let filters = set.query_filter();
    assert_eq!(filters.definition("product/price").unwrap().kind(), FilterKind::Int);
    assert_eq!(filters.definition("product/name").unwrap().kind(), FilterKind::String);
    assert_eq!(filters.definition("product/in_stock").unwrap().kind(), FilterKind::Bool);
}

/// Test invalid values are rejected when loading
#[test]
fn test_config_invalid_values() {
    let err = CanopyConfig::from_str("[filters]\nmode = \"flat\"\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedFilterMode);

    let err = CanopyConfig::from_str("[scope]\nparent_node_id = \"root\"\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);

    let err = CanopyConfig::from_str("[cache]\nenabled = true\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
}
