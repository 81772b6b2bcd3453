//! Query composition.
//!
//! A [`QueryBuilder`] turns one [`Schema`] into SQL text. How the FROM clause
//! is produced depends on its [`JoinStrategy`]:
//!
//! ```text
//! JoinStrategy::None           SELECT <cols> FROM <name>
//! JoinStrategy::RelationChain  SELECT <cols> FROM ( SELECT <src AS out> FROM ( <base> ) AS <base>
//!                                                   JOIN ( <sub> ) AS <sub> ON <from> = <to> ...
//!                                                 ) AS <view>
//! ```
//!
//! Subqueries come from the loaders in a [`LoaderRegistry`]; a loader that is
//! itself a view composes recursively.
//!
//! # Example
//!
//! ```ignore
//! use semview::query::QueryBuilder;
//!
//! let sql = QueryBuilder::for_schema(&schema, &registry).build_query()?;
//! ```

mod view;

use thiserror::Error;

use crate::loader::LoaderRegistry;
use crate::model::Schema;
use crate::sql::extract;
use crate::sql::token::{Token, TokenStream};

/// Row count used by [`QueryBuilder::get_head_query`] when none is given.
pub const DEFAULT_HEAD_ROWS: u64 = 5;

/// Deepest allowed nesting of views over views.
pub const DEFAULT_MAX_VIEW_DEPTH: usize = 32;

/// Errors raised while composing a query.
///
/// Any error aborts composition; no partial SQL is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A relation names a dataset that is not in the registry.
    #[error("Dataset '{dataset}' referenced by view '{view}' was not found")]
    DatasetNotFound { dataset: String, view: String },

    /// A relation names a dataset whose loader cannot produce SQL.
    #[error("Cannot compose dataset '{dataset}': views for local datasets or nested views are currently not supported")]
    UnsupportedComposition { dataset: String },

    /// Views are nested deeper than the configured bound.
    #[error("View '{view}' is nested more than {max_depth} levels deep")]
    NestingTooDeep { view: String, max_depth: usize },

    /// The relation-chain strategy was used on a schema with no relations.
    #[error("View '{view}' declares no relations")]
    MissingRelations { view: String },
}

/// Result type for query composition.
pub type QueryResult<T> = Result<T, QueryError>;

/// How a builder produces its FROM clause.
#[derive(Debug, Clone, Copy)]
pub enum JoinStrategy<'a> {
    /// Read the table named after the schema.
    None,
    /// Join the schema's relations, resolving datasets through the registry.
    RelationChain(&'a LoaderRegistry),
}

/// Builds SQL for one schema.
///
/// Builders only borrow their schema and registry; building is a pure
/// function of both, so repeated calls return identical text.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    schema: &'a Schema,
    joins: JoinStrategy<'a>,
    max_depth: usize,
}

impl<'a> QueryBuilder<'a> {
    /// Builder for a base dataset.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            joins: JoinStrategy::None,
            max_depth: DEFAULT_MAX_VIEW_DEPTH,
        }
    }

    /// Builder for a view whose relations resolve through `registry`.
    pub fn view(schema: &'a Schema, registry: &'a LoaderRegistry) -> Self {
        Self {
            schema,
            joins: JoinStrategy::RelationChain(registry),
            max_depth: DEFAULT_MAX_VIEW_DEPTH,
        }
    }

    /// Pick the strategy from the schema: views join, base datasets don't.
    pub fn for_schema(schema: &'a Schema, registry: &'a LoaderRegistry) -> Self {
        if schema.is_view() {
            Self::view(schema, registry)
        } else {
            Self::new(schema)
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn join_strategy(&self) -> JoinStrategy<'a> {
        self.joins
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Full query, honoring the schema's ORDER BY and LIMIT.
    pub fn build_query(&self) -> QueryResult<String> {
        Ok(self.query_tokens(0)?.serialize())
    }

    /// Preview query: same projection and source as
    /// [`build_query`](Self::build_query), capped at `n` rows.
    ///
    /// The schema's ORDER BY and LIMIT are not applied.
    pub fn get_head_query(&self, n: u64) -> QueryResult<String> {
        let mut ts = TokenStream::new();
        ts.push(Token::Select).append(&self.projection());
        ts.push(Token::From).append(&self.from_clause(0)?);
        ts.push(Token::Limit).push(Token::LitInt(n));
        Ok(ts.serialize())
    }

    /// `SELECT COUNT(*)` over the same source, without ordering or limit.
    pub fn get_row_count_query(&self) -> QueryResult<String> {
        let mut ts = TokenStream::new();
        ts.push(Token::Select).push(Token::CountStar);
        ts.push(Token::From).append(&self.from_clause(0)?);
        Ok(ts.serialize())
    }

    /// Best-effort list of the columns projected by `query`.
    ///
    /// Returns `None` when nothing resembling a projection is found.
    pub fn columns_for_query(query: &str) -> Option<Vec<String>> {
        extract::extract_projection(query)
    }

    /// Tokens of the full query at the given view nesting depth.
    pub(crate) fn query_tokens(&self, depth: usize) -> QueryResult<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::Select).append(&self.projection());
        ts.push(Token::From).append(&self.from_clause(depth)?);
        ts.append(&self.order_by_clause());
        if let Some(limit) = self.schema.limit {
            ts.push(Token::Limit).push(Token::LitInt(limit));
        }
        Ok(ts)
    }

    /// Outer column list: output names of declared columns, else `*`.
    fn projection(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        if self.schema.columns.is_empty() {
            ts.push(Token::Star);
        } else {
            ts.comma_separated(
                self.schema
                    .columns
                    .iter()
                    .map(|col| Token::Ident(col.output_name())),
            );
        }
        ts
    }

    fn from_clause(&self, depth: usize) -> QueryResult<TokenStream> {
        match self.joins {
            JoinStrategy::None => {
                let mut ts = TokenStream::new();
                ts.ident(&self.schema.name);
                Ok(ts)
            }
            JoinStrategy::RelationChain(registry) => self.relation_chain(registry, depth),
        }
    }

    fn order_by_clause(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        if !self.schema.order_by.is_empty() {
            ts.push(Token::OrderBy).comma_separated(
                self.schema
                    .order_by
                    .iter()
                    .map(|item| Token::Raw(item.clone())),
            );
        }
        ts
    }
}
