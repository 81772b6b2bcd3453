//! Semantic layer schema types.
//!
//! A [`Schema`] describes one dataset. Schemas with [`Relation`]s are views:
//! joins of other datasets, composed into SQL by [`crate::query`].

pub mod schema;
pub mod source;

pub use schema::{Column, Relation, Schema};
pub use source::{Source, SourceType};

use thiserror::Error;

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Schema name must not be empty")]
    EmptyName,

    #[error("Schema '{schema}' has a column with an empty name")]
    EmptyColumnName { schema: String },

    #[error("Schema '{schema}' declares column '{column}' more than once")]
    DuplicateColumn { schema: String, column: String },

    #[error("Relation reference '{reference}' in schema '{schema}' must be qualified as dataset.column")]
    UnqualifiedRelation { schema: String, reference: String },

    #[error("Schema '{schema}' has a limit of 0")]
    ZeroLimit { schema: String },
}
