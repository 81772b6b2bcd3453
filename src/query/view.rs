//! Relation-chain composition for views.

use std::collections::HashSet;

use super::{QueryBuilder, QueryError, QueryResult};
use crate::loader::LoaderRegistry;
use crate::sql::token::{Token, TokenStream};

impl<'a> QueryBuilder<'a> {
    /// FROM clause of a view: the base dataset joined with every relation's
    /// `to` dataset, wrapped as one derived table named after the view.
    ///
    /// The chain is linear in relation order. Datasets are neither
    /// deduplicated nor checked for cycles: a dataset referenced twice is
    /// joined twice.
    pub(super) fn relation_chain(
        &self,
        registry: &LoaderRegistry,
        depth: usize,
    ) -> QueryResult<TokenStream> {
        let view = &self.schema.name;
        if depth > self.max_depth {
            return Err(QueryError::NestingTooDeep {
                view: view.clone(),
                max_depth: self.max_depth,
            });
        }

        let relations = &self.schema.relations;
        let first = relations
            .first()
            .ok_or_else(|| QueryError::MissingRelations { view: view.clone() })?;

        let (base_query, base_name) = self.resolve(registry, first.from_dataset(), depth)?;
        tracing::debug!(view = %view, base = %base_name, depth, "composing view");

        let mut ts = TokenStream::new();
        ts.lparen().push(Token::Select).append(&self.aliased_projection());
        ts.push(Token::From)
            .lparen()
            .append(&base_query)
            .rparen()
            .push(Token::As)
            .ident(&base_name);

        let mut joined = HashSet::from([base_name]);
        for relation in relations {
            let (subquery, name) = self.resolve(registry, relation.to_dataset(), depth)?;
            if !joined.insert(name.clone()) {
                tracing::warn!(view = %view, dataset = %name, "dataset joined more than once");
            }

            ts.push(Token::Join)
                .lparen()
                .append(&subquery)
                .rparen()
                .push(Token::As)
                .ident(name);
            ts.push(Token::On)
                .ident(&relation.from)
                .push(Token::Eq)
                .ident(&relation.to);
        }

        ts.rparen().push(Token::As).ident(view);
        Ok(ts)
    }

    /// Look up `dataset` and build its query one level deeper.
    ///
    /// Returns the subquery tokens and the alias to expose it under (the
    /// loader schema's name).
    fn resolve(
        &self,
        registry: &LoaderRegistry,
        dataset: &str,
        depth: usize,
    ) -> QueryResult<(TokenStream, String)> {
        let loader = registry
            .get(dataset)
            .ok_or_else(|| QueryError::DatasetNotFound {
                dataset: dataset.to_string(),
                view: self.schema.name.clone(),
            })?;

        let builder = loader
            .query_builder()
            .ok_or_else(|| QueryError::UnsupportedComposition {
                dataset: dataset.to_string(),
            })?;

        let tokens = builder
            .with_max_depth(self.max_depth)
            .query_tokens(depth + 1)?;
        tracing::debug!(dataset, depth = depth + 1, "resolved subquery");

        Ok((tokens, loader.schema().name.clone()))
    }

    /// Inner column list: `source AS output` per declared column, else `*`.
    ///
    /// This is where dotted source names are aliased to the identifiers the
    /// outer SELECT refers to.
    fn aliased_projection(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        if self.schema.columns.is_empty() {
            ts.push(Token::Star);
            return ts;
        }

        for (i, col) in self.schema.columns.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.ident(&col.name).push(Token::As).ident(col.output_name());
        }
        ts
    }
}
