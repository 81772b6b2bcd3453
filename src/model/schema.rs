// src/model/schema.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::source::Source;
use super::ModelError;

/// A column of a dataset or view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Column {
    /// Column name, possibly qualified as `dataset.column`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Declared data type (informational)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            data_type: None,
            description: None,
        }
    }

    /// The identifier this column is exposed as in composed output.
    ///
    /// Dots are not valid in bare identifiers, so `orders.id` becomes
    /// `orders_id`.
    pub fn output_name(&self) -> String {
        self.name.replace('.', "_")
    }
}

/// An equi-join predicate `from = to` between two qualified columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Relation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `dataset.column` on the left of the predicate
    pub from: String,
    /// `dataset.column` on the right of the predicate
    pub to: String,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: None,
            description: None,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Dataset named by the `from` side.
    pub fn from_dataset(&self) -> &str {
        dataset_prefix(&self.from)
    }

    /// Dataset named by the `to` side.
    pub fn to_dataset(&self) -> &str {
        dataset_prefix(&self.to)
    }
}

fn dataset_prefix(qualified: &str) -> &str {
    qualified.split('.').next().unwrap_or(qualified)
}

/// Description of one dataset or view.
///
/// A schema with relations is a view: a join of the datasets its relations
/// name. A schema without relations is a base dataset read straight from the
/// table called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Schema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Output columns; empty means all columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Join chain; order is significant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    /// Raw ORDER BY items, e.g. `"amount DESC"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source: None,
            columns: vec![],
            relations: vec![],
            order_by: vec![],
            limit: None,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Column::new).collect();
        self
    }

    pub fn with_relation(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.relations.push(Relation::new(from, to));
        self
    }

    pub fn with_order_by(mut self, item: impl Into<String>) -> Self {
        self.order_by.push(item.into());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether this schema describes a view (has relations).
    pub fn is_view(&self) -> bool {
        !self.relations.is_empty()
    }

    /// Dataset names referenced by the relations, in first-seen order.
    ///
    /// The base dataset (first relation's `from` side) comes first, followed
    /// by every `to` side.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut deps = Vec::new();

        let base = self.relations.first().map(|r| r.from_dataset());
        let targets = self.relations.iter().map(|r| r.to_dataset());
        for name in base.into_iter().chain(targets) {
            if seen.insert(name) {
                deps.push(name);
            }
        }
        deps
    }

    /// Check the schema is well formed.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }

        let mut names = HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(ModelError::EmptyColumnName {
                    schema: self.name.clone(),
                });
            }
            if !names.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    schema: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        for relation in &self.relations {
            for side in [&relation.from, &relation.to] {
                if !is_qualified(side) {
                    return Err(ModelError::UnqualifiedRelation {
                        schema: self.name.clone(),
                        reference: side.clone(),
                    });
                }
            }
        }

        if self.limit == Some(0) {
            return Err(ModelError::ZeroLimit {
                schema: self.name.clone(),
            });
        }

        Ok(())
    }
}

fn is_qualified(reference: &str) -> bool {
    match reference.split_once('.') {
        Some((dataset, column)) => !dataset.is_empty() && !column.is_empty(),
        None => false,
    }
}
