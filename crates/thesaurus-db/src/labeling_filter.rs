//! SQL generation for [`LabelingQuery`] filters.
//!
//! Labeling rows are selected as `labeling lg JOIN concept c JOIN label lb`.
//! Conditions on the owner concept and target label are produced by the
//! concept and label repositories, so the SQL for a scope sits next to the
//! table it reads.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use uuid::Uuid;

use thesaurus_core::{LabelingFilter, LabelingQuery};

use crate::concepts::concept_scope_sql;
use crate::labels::label_scope_sql;

/// Alias of the `labeling` table in generated SQL.
pub const LABELING_ALIAS: &str = "lg";
/// Alias of the owner `concept` table in generated SQL.
pub const CONCEPT_ALIAS: &str = "c";
/// Alias of the target `label` table in generated SQL.
pub const LABEL_ALIAS: &str = "lb";

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Uuid(Uuid),
    String(String),
}

/// Bind parameters in the order they appear in the SQL.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Uuid(id) => query.bind(*id),
            QueryParam::String(s) => query.bind(s.clone()),
        };
    }
    query
}

/// Generates the WHERE clause for a labeling query.
///
/// # Example
///
/// ```rust,ignore
/// use thesaurus_db::labeling_filter::LabelingQueryBuilder;
/// use thesaurus_core::LabelingQuery;
///
/// let query = LabelingQuery::new().by_kind("Labeling::SKOS::AltLabel").label_published();
/// let (sql, params) = LabelingQueryBuilder::new(&query, 0).build();
/// // sql: "lg.kind = $1 AND lb.published_at IS NOT NULL"
/// ```
pub struct LabelingQueryBuilder<'a> {
    query: &'a LabelingQuery,
    param_offset: usize,
}

impl<'a> LabelingQueryBuilder<'a> {
    /// `param_offset` is the number of parameters already in the statement.
    pub fn new(query: &'a LabelingQuery, param_offset: usize) -> Self {
        Self {
            query,
            param_offset,
        }
    }

    /// Build the WHERE fragment and its parameters.
    ///
    /// An empty query yields `("TRUE", [])`.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        if self.query.is_empty() {
            return ("TRUE".to_string(), vec![]);
        }

        let mut clauses = Vec::with_capacity(self.query.filters().len());
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        for filter in self.query.filters() {
            match filter {
                LabelingFilter::ByConcept(id) => {
                    param_idx += 1;
                    clauses.push(format!("{}.owner_id = ${}", LABELING_ALIAS, param_idx));
                    params.push(QueryParam::Uuid(*id));
                }
                LabelingFilter::ByLabel(id) => {
                    param_idx += 1;
                    clauses.push(format!("{}.target_id = ${}", LABELING_ALIAS, param_idx));
                    params.push(QueryParam::Uuid(*id));
                }
                LabelingFilter::ByKind(kind) => {
                    param_idx += 1;
                    clauses.push(format!("{}.kind = ${}", LABELING_ALIAS, param_idx));
                    params.push(QueryParam::String(kind.clone()));
                }
                LabelingFilter::Concept(scope) => {
                    clauses.push(concept_scope_sql(scope, CONCEPT_ALIAS));
                }
                LabelingFilter::Label(scope) => {
                    let (sql, param) = label_scope_sql(scope, LABEL_ALIAS, param_idx + 1);
                    if let Some(param) = param {
                        param_idx += 1;
                        params.push(param);
                    }
                    clauses.push(sql);
                }
            }
        }

        (clauses.join(" AND "), params)
    }
}
