// src/model/source.rs
use serde::{Deserialize, Serialize};

/// Where a dataset's data lives.
///
/// SQL sources are always read through the dataset's own name; there is no
/// separate physical table name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// File path for local sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Source {
    pub fn new(source_type: SourceType) -> Self {
        Self {
            source_type,
            path: None,
        }
    }

    pub fn file(source_type: SourceType, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(source_type)
        }
    }

    /// Whether the data is reachable through SQL.
    pub fn is_sql(&self) -> bool {
        self.source_type.is_sql()
    }
}

/// Storage backend of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Postgres,
    Mysql,
    Sqlite,
    Duckdb,
    Snowflake,
    Bigquery,
    Csv,
    Parquet,
}

impl SourceType {
    pub fn is_sql(&self) -> bool {
        !matches!(self, SourceType::Csv | SourceType::Parquet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Postgres => "postgres",
            SourceType::Mysql => "mysql",
            SourceType::Sqlite => "sqlite",
            SourceType::Duckdb => "duckdb",
            SourceType::Snowflake => "snowflake",
            SourceType::Bigquery => "bigquery",
            SourceType::Csv => "csv",
            SourceType::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
