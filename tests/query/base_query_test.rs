use semview::loader::{DatasetLoader, LoaderRegistry, SqlDatasetLoader};
use semview::model::{Column, Schema};
use semview::query::{JoinStrategy, QueryBuilder};

#[test]
fn test_all_columns() {
    let schema = Schema::new("orders");
    let sql = QueryBuilder::new(&schema).build_query().unwrap();
    assert_eq!(sql, "SELECT * FROM orders");
}

#[test]
fn test_declared_columns_in_order() {
    let schema = Schema::new("orders").with_columns(["status", "id", "amount"]);
    let sql = QueryBuilder::new(&schema).build_query().unwrap();
    assert_eq!(sql, "SELECT status, id, amount FROM orders");
}

#[test]
fn test_dotted_columns_rewritten() {
    let mut schema = Schema::new("orders");
    schema.columns = vec![
        Column::new("orders.id"),
        Column {
            alias: Some("total".into()),
            ..Column::new("orders.amount")
        },
    ];

    let sql = QueryBuilder::new(&schema).build_query().unwrap();
    assert_eq!(sql, "SELECT orders_id, orders_amount FROM orders");
}

#[test]
fn test_no_clauses_without_directives() {
    let schema = Schema::new("orders").with_columns(["id"]);
    let sql = QueryBuilder::new(&schema).build_query().unwrap();
    assert!(!sql.contains("ORDER BY"));
    assert!(!sql.contains("LIMIT"));
}

#[test]
fn test_order_by_then_limit() {
    let schema = Schema::new("orders")
        .with_order_by("created_at DESC")
        .with_limit(25);
    let sql = QueryBuilder::new(&schema).build_query().unwrap();
    insta::assert_snapshot!(sql, @"SELECT * FROM orders ORDER BY created_at DESC LIMIT 25");
}

#[test]
fn test_head_query_ignores_schema_limit() {
    let schema = Schema::new("orders")
        .with_columns(["id"])
        .with_order_by("id")
        .with_limit(1000);
    let builder = QueryBuilder::new(&schema);

    assert_eq!(
        builder.get_head_query(3).unwrap(),
        "SELECT id FROM orders LIMIT 3"
    );
}

#[test]
fn test_row_count_query() {
    let schema = Schema::new("orders").with_order_by("id");
    let sql = QueryBuilder::new(&schema).get_row_count_query().unwrap();
    assert_eq!(sql, "SELECT COUNT(*) FROM orders");
}

#[test]
fn test_loader_builder_uses_base_strategy() {
    let loader = SqlDatasetLoader::new(Schema::new("orders"));
    let builder = loader.query_builder().unwrap();

    assert!(matches!(builder.join_strategy(), JoinStrategy::None));
    assert_eq!(builder.schema().name, "orders");
}

#[test]
fn test_for_schema_base_ignores_registry() {
    let registry = LoaderRegistry::new();
    let schema = Schema::new("orders").with_limit(10);

    let sql = QueryBuilder::for_schema(&schema, &registry)
        .build_query()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM orders LIMIT 10");
}
