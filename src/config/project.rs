//! Project files: a TOML catalog of datasets turned into loaders.
//!
//! ```toml
//! [[datasets]]
//! name = "orders"
//! source = { type = "postgres" }
//!
//! [[datasets]]
//! name = "customers"
//! source = { type = "postgres" }
//!
//! [[datasets]]
//! name = "sales_view"
//! columns = [{ name = "orders.id" }, { name = "customers.name" }]
//! relations = [{ from = "orders.id", to = "customers.order_id" }]
//! ```
//!
//! Each view gets a loader owning a registry of exactly the datasets its
//! relations name. Views are built after their dependencies, so a view that
//! (directly or transitively) depends on itself is rejected here, before any
//! query is composed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::loader::{DatasetLoader, LoaderRegistry, LocalDatasetLoader, SqlDatasetLoader};
use crate::model::{ModelError, Schema};
use crate::query::{QueryBuilder, QueryError, QueryResult, DEFAULT_MAX_VIEW_DEPTH};

/// Errors that can occur when loading a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse project file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Dataset '{0}' is defined more than once")]
    DuplicateDataset(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] ModelError),

    #[error("View '{view}' references unknown dataset '{dataset}'")]
    UnknownDependency { view: String, dataset: String },

    #[error("Circular view definition: {}", .0.join(" -> "))]
    CyclicView(Vec<String>),

    #[error("Dataset not found: {0}")]
    UnknownDataset(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// On-disk layout of a project file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct ProjectFile {
    #[serde(default)]
    datasets: Vec<Schema>,
}

/// What kind of dataset a project entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// SQL table read directly
    Table,
    /// Join of other datasets
    View,
    /// Local file, not composable into views
    Local,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Table => "table",
            DatasetKind::View => "view",
            DatasetKind::Local => "local",
        }
    }

    fn of(schema: &Schema) -> Self {
        if schema.is_view() {
            DatasetKind::View
        } else if schema.source.as_ref().is_some_and(|s| !s.is_sql()) {
            DatasetKind::Local
        } else {
            DatasetKind::Table
        }
    }
}

/// A loaded project: every dataset with its loader.
#[derive(Debug, Clone)]
pub struct Project {
    registry: LoaderRegistry,
    max_view_depth: usize,
}

impl Project {
    /// Load a project from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ProjectResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProjectError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load a project from TOML text.
    pub fn parse(content: &str) -> ProjectResult<Self> {
        let file: ProjectFile = toml::from_str(content)?;
        Self::from_schemas(file.datasets)
    }

    /// Build loaders for already-parsed schemas.
    pub fn from_schemas(schemas: Vec<Schema>) -> ProjectResult<Self> {
        let mut by_name = BTreeMap::new();
        for schema in schemas {
            schema.validate()?;
            if by_name.contains_key(&schema.name) {
                return Err(ProjectError::DuplicateDataset(schema.name));
            }
            by_name.insert(schema.name.clone(), schema);
        }

        let mut builder = RegistryBuilder {
            schemas: &by_name,
            built: HashMap::new(),
            stack: Vec::new(),
        };
        let mut registry = LoaderRegistry::new();
        for name in by_name.keys() {
            registry.insert_as(name.clone(), builder.build(name)?);
        }

        tracing::debug!(datasets = registry.len(), "loaded project");
        Ok(Self {
            registry,
            max_view_depth: DEFAULT_MAX_VIEW_DEPTH,
        })
    }

    pub fn with_max_view_depth(mut self, max_view_depth: usize) -> Self {
        self.max_view_depth = max_view_depth;
        self
    }

    /// All datasets, keyed by name.
    pub fn registry(&self) -> &LoaderRegistry {
        &self.registry
    }

    pub fn schema(&self, name: &str) -> ProjectResult<&Schema> {
        self.loader(name).map(|loader| loader.schema())
    }

    /// Dataset names with their kind, sorted by name.
    pub fn datasets(&self) -> Vec<(&str, DatasetKind)> {
        self.registry
            .iter()
            .map(|(name, loader)| (name, DatasetKind::of(loader.schema())))
            .collect()
    }

    /// Query builder for a dataset.
    ///
    /// Fails with [`QueryError::UnsupportedComposition`] for local datasets.
    pub fn query_builder(&self, name: &str) -> ProjectResult<QueryBuilder<'_>> {
        let builder = self
            .loader(name)?
            .query_builder()
            .ok_or_else(|| QueryError::UnsupportedComposition {
                dataset: name.to_string(),
            })?;
        Ok(builder.with_max_depth(self.max_view_depth))
    }

    pub fn build_query(&self, name: &str) -> ProjectResult<String> {
        self.compose(name, |b| b.build_query())
    }

    pub fn head_query(&self, name: &str, rows: u64) -> ProjectResult<String> {
        self.compose(name, |b| b.get_head_query(rows))
    }

    pub fn row_count_query(&self, name: &str) -> ProjectResult<String> {
        self.compose(name, |b| b.get_row_count_query())
    }

    fn compose<F>(&self, name: &str, f: F) -> ProjectResult<String>
    where
        F: FnOnce(&QueryBuilder<'_>) -> QueryResult<String>,
    {
        let builder = self.query_builder(name)?;
        Ok(f(&builder)?)
    }

    fn loader(&self, name: &str) -> ProjectResult<&Arc<dyn DatasetLoader>> {
        self.registry
            .get(name)
            .ok_or_else(|| ProjectError::UnknownDataset(name.to_string()))
    }
}

/// Depth-first construction of loaders, dependencies first.
struct RegistryBuilder<'a> {
    schemas: &'a BTreeMap<String, Schema>,
    built: HashMap<String, Arc<dyn DatasetLoader>>,
    /// Views currently being built, outermost first
    stack: Vec<String>,
}

impl RegistryBuilder<'_> {
    fn build(&mut self, name: &str) -> ProjectResult<Arc<dyn DatasetLoader>> {
        if let Some(loader) = self.built.get(name) {
            return Ok(Arc::clone(loader));
        }

        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(ProjectError::CyclicView(cycle));
        }

        let schemas = self.schemas;
        let schema = schemas
            .get(name)
            .ok_or_else(|| ProjectError::UnknownDataset(name.to_string()))?;

        let loader: Arc<dyn DatasetLoader> = match DatasetKind::of(schema) {
            DatasetKind::Table => Arc::new(SqlDatasetLoader::new(schema.clone())),
            DatasetKind::Local => Arc::new(LocalDatasetLoader::new(schema.clone())),
            DatasetKind::View => {
                self.stack.push(name.to_string());
                let dependencies = self.build_dependencies(schema)?;
                self.stack.pop();
                Arc::new(SqlDatasetLoader::view(schema.clone(), dependencies))
            }
        };

        self.built.insert(name.to_string(), Arc::clone(&loader));
        Ok(loader)
    }

    fn build_dependencies(&mut self, view: &Schema) -> ProjectResult<LoaderRegistry> {
        let mut registry = LoaderRegistry::new();
        for dataset in view.dependencies() {
            if !self.schemas.contains_key(dataset) {
                return Err(ProjectError::UnknownDependency {
                    view: view.name.clone(),
                    dataset: dataset.to_string(),
                });
            }
            registry.insert_as(dataset, self.build(dataset)?);
        }
        Ok(registry)
    }
}
