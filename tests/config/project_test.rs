use semview::config::{DatasetKind, Project, ProjectError};
use semview::model::{ModelError, Schema};
use semview::query::QueryError;
use std::fs;

const CATALOG: &str = r#"
[[datasets]]
name = "orders"
source = { type = "postgres" }
columns = [{ name = "id" }, { name = "customer_id" }, { name = "amount" }]

[[datasets]]
name = "customers"
source = { type = "postgres" }

[[datasets]]
name = "payments"
source = { type = "postgres" }

[[datasets]]
name = "events"
source = { type = "parquet", path = "data/events.parquet" }

[[datasets]]
name = "customer_orders"
columns = [{ name = "orders.id" }, { name = "customers.name" }]
relations = [{ from = "orders.customer_id", to = "customers.id" }]

[[datasets]]
name = "report"
order_by = ["customer_orders_orders_id"]
limit = 1000
relations = [{ from = "customer_orders.orders_id", to = "payments.order_id" }]
"#;

#[test]
fn test_base_dataset_uses_declared_columns() {
    let project = Project::parse(CATALOG).unwrap();
    assert_eq!(
        project.build_query("orders").unwrap(),
        "SELECT id, customer_id, amount FROM orders"
    );
}

#[test]
fn test_nested_view_composes() {
    let project = Project::parse(CATALOG).unwrap();

    let inner = project.build_query("customer_orders").unwrap();
    assert_eq!(
        inner,
        "SELECT orders_id, customers_name FROM ( SELECT orders.id AS orders_id, \
         customers.name AS customers_name FROM ( SELECT id, customer_id, amount FROM orders ) AS orders \
         JOIN ( SELECT * FROM customers ) AS customers ON orders.customer_id = customers.id \
         ) AS customer_orders"
    );

    let report = project.build_query("report").unwrap();
    assert_eq!(
        report,
        format!(
            "SELECT * FROM ( SELECT * FROM ( {} ) AS customer_orders \
             JOIN ( SELECT * FROM payments ) AS payments \
             ON customer_orders.orders_id = payments.order_id ) AS report \
             ORDER BY customer_orders_orders_id LIMIT 1000",
            inner
        )
    );
}

#[test]
fn test_head_and_count() {
    let project = Project::parse(CATALOG).unwrap();

    let head = project.head_query("report", 7).unwrap();
    assert!(head.ends_with(") AS report LIMIT 7"));
    assert!(!head.contains("ORDER BY"));
    assert_eq!(
        head,
        format!(
            "{} LIMIT 7",
            project
                .build_query("report")
                .unwrap()
                .trim_end_matches(" ORDER BY customer_orders_orders_id LIMIT 1000")
        )
    );

    let count = project.row_count_query("report").unwrap();
    assert!(count.starts_with("SELECT COUNT(*) FROM ( SELECT * FROM ( SELECT orders_id"));
    assert!(count.ends_with(") AS report"));
}

#[test]
fn test_local_dataset_cannot_be_queried() {
    let project = Project::parse(CATALOG).unwrap();
    assert!(matches!(
        project.build_query("events"),
        Err(ProjectError::Query(QueryError::UnsupportedComposition { dataset })) if dataset == "events"
    ));
}

#[test]
fn test_view_over_local_dataset_loads_but_fails_to_compose() {
    let toml = format!(
        "{}\n[[datasets]]\nname = \"tracked\"\nrelations = [{{ from = \"orders.id\", to = \"events.order_id\" }}]\n",
        CATALOG
    );
    let project = Project::parse(&toml).unwrap();

    assert!(matches!(
        project.build_query("tracked"),
        Err(ProjectError::Query(QueryError::UnsupportedComposition { dataset })) if dataset == "events"
    ));
}

#[test]
fn test_datasets_listing() {
    let project = Project::parse(CATALOG).unwrap();
    let kinds: Vec<_> = project.datasets();

    assert_eq!(kinds.len(), 6);
    assert!(kinds.contains(&("events", DatasetKind::Local)));
    assert!(kinds.contains(&("report", DatasetKind::View)));
    assert!(kinds.contains(&("orders", DatasetKind::Table)));
}

#[test]
fn test_unknown_dependency() {
    let toml = r#"
[[datasets]]
name = "orders"

[[datasets]]
name = "v"
relations = [{ from = "orders.id", to = "ghosts.order_id" }]
"#;
    match Project::parse(toml) {
        Err(ProjectError::UnknownDependency { view, dataset }) => {
            assert_eq!(view, "v");
            assert_eq!(dataset, "ghosts");
        }
        other => panic!("expected unknown dependency, got {:?}", other),
    }
}

#[test]
fn test_mutual_views_are_cyclic() {
    let toml = r#"
[[datasets]]
name = "a"
relations = [{ from = "b.id", to = "c.id" }]

[[datasets]]
name = "b"
relations = [{ from = "a.id", to = "c.id" }]

[[datasets]]
name = "c"
"#;
    match Project::parse(toml) {
        Err(ProjectError::CyclicView(path)) => {
            assert_eq!(path, vec!["a", "b", "a"]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_cycle_error_message() {
    let err = ProjectError::CyclicView(vec!["a".into(), "b".into(), "a".into()]);
    assert_eq!(err.to_string(), "Circular view definition: a -> b -> a");
}

#[test]
fn test_duplicate_dataset() {
    let result = Project::from_schemas(vec![Schema::new("orders"), Schema::new("orders")]);
    assert!(matches!(result, Err(ProjectError::DuplicateDataset(name)) if name == "orders"));
}

#[test]
fn test_invalid_schema() {
    let result = Project::from_schemas(vec![Schema::new("orders").with_limit(0)]);
    assert!(matches!(
        result,
        Err(ProjectError::InvalidSchema(ModelError::ZeroLimit { .. }))
    ));
}

#[test]
fn test_max_view_depth_applies() {
    let project = Project::parse(CATALOG).unwrap().with_max_view_depth(0);

    assert!(project.build_query("customer_orders").is_ok());
    assert!(matches!(
        project.build_query("report"),
        Err(ProjectError::Query(QueryError::NestingTooDeep { .. }))
    ));
}

#[test]
fn test_from_file() {
    let dir = std::env::temp_dir().join(format!("semview-project-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("datasets.toml");
    fs::write(&path, CATALOG).unwrap();

    let project = Project::from_file(&path).unwrap();
    assert_eq!(project.registry().len(), 6);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Project::from_file("/nonexistent/datasets.toml"),
        Err(ProjectError::FileNotFound { .. })
    ));
}
