//! Dataset loaders and the registry views resolve them through.
//!
//! A loader knows a dataset's [`Schema`] and, when the dataset is reachable
//! through SQL, can hand out a [`QueryBuilder`] for it. Views only compose
//! datasets whose loaders offer a builder; the capability is asked for, never
//! inferred from the loader's concrete type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::model::Schema;
use crate::query::QueryBuilder;

/// Produces a dataset's schema and, optionally, its composable SQL.
pub trait DatasetLoader: fmt::Debug + Send + Sync {
    fn schema(&self) -> &Schema;

    /// A builder for this dataset's SQL, or `None` if the dataset cannot be
    /// expressed as SQL (e.g. a local file).
    fn query_builder(&self) -> Option<QueryBuilder<'_>>;
}

/// Loader for datasets backed by a SQL database.
///
/// For a view, `dependencies` holds the loaders of the datasets its relations
/// name.
#[derive(Debug, Clone)]
pub struct SqlDatasetLoader {
    schema: Schema,
    dependencies: LoaderRegistry,
}

impl SqlDatasetLoader {
    /// Loader for a base table.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            dependencies: LoaderRegistry::new(),
        }
    }

    /// Loader for a view over the datasets in `dependencies`.
    pub fn view(schema: Schema, dependencies: LoaderRegistry) -> Self {
        Self {
            schema,
            dependencies,
        }
    }

    pub fn dependencies(&self) -> &LoaderRegistry {
        &self.dependencies
    }
}

impl DatasetLoader for SqlDatasetLoader {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn query_builder(&self) -> Option<QueryBuilder<'_>> {
        Some(QueryBuilder::for_schema(&self.schema, &self.dependencies))
    }
}

/// Loader for datasets stored in local files.
///
/// File contents are read outside of SQL, so these datasets cannot take part
/// in a view.
#[derive(Debug, Clone)]
pub struct LocalDatasetLoader {
    schema: Schema,
}

impl LocalDatasetLoader {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Path of the backing file, if the schema declares one.
    pub fn path(&self) -> Option<&str> {
        self.schema.source.as_ref()?.path.as_deref()
    }
}

impl DatasetLoader for LocalDatasetLoader {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn query_builder(&self) -> Option<QueryBuilder<'_>> {
        None
    }
}

/// Dataset name to loader.
///
/// Cloning shares the loaders, so one loader can sit in the registries of
/// several views.
#[derive(Debug, Clone, Default)]
pub struct LoaderRegistry {
    loaders: BTreeMap<String, Arc<dyn DatasetLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` under its schema name, replacing any previous entry.
    pub fn insert(&mut self, loader: Arc<dyn DatasetLoader>) -> Option<Arc<dyn DatasetLoader>> {
        let name = loader.schema().name.clone();
        self.loaders.insert(name, loader)
    }

    /// Register `loader` under an explicit dataset name.
    pub fn insert_as(
        &mut self,
        name: impl Into<String>,
        loader: Arc<dyn DatasetLoader>,
    ) -> Option<Arc<dyn DatasetLoader>> {
        self.loaders.insert(name.into(), loader)
    }

    pub fn with(mut self, loader: impl DatasetLoader + 'static) -> Self {
        self.insert(Arc::new(loader));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DatasetLoader>> {
        self.loaders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Dataset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn DatasetLoader>)> {
        self.loaders.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}
