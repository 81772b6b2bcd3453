//! # semview
//!
//! Composes semantic-layer views into a single SQL query.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Project file (datasets, views, relations)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [config::Project]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Schemas + LoaderRegistry (dataset name → loader)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query::QueryBuilder]
//! ┌─────────────────────────────────────────────────────────┐
//! │   SQL: base tables as subqueries, joined per relation,   │
//! │        wrapped as one derived table named after the view │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use semview::loader::{LoaderRegistry, SqlDatasetLoader};
//! use semview::model::Schema;
//! use semview::query::QueryBuilder;
//!
//! let registry = LoaderRegistry::new()
//!     .with(SqlDatasetLoader::new(Schema::new("orders")))
//!     .with(SqlDatasetLoader::new(Schema::new("customers")));
//!
//! let view = Schema::new("sales_view").with_relation("orders.id", "customers.order_id");
//! let sql = QueryBuilder::view(&view, &registry).build_query()?;
//! ```

pub mod config;
pub mod loader;
pub mod model;
pub mod query;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::loader::{DatasetLoader, LoaderRegistry, LocalDatasetLoader, SqlDatasetLoader};
    pub use crate::model::{Column, Relation, Schema, Source, SourceType};
    pub use crate::query::{
        JoinStrategy, QueryBuilder, QueryError, QueryResult, DEFAULT_HEAD_ROWS,
        DEFAULT_MAX_VIEW_DEPTH,
    };
}

pub use loader::{DatasetLoader, LoaderRegistry};
pub use model::Schema;
pub use query::{QueryBuilder, QueryError};
