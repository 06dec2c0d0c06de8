//! Label repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use thesaurus_core::{Error, Label, LabelRepository, LabelScope, NewLabel, Result};

use crate::escape_like;
use crate::labeling_filter::QueryParam;

/// SQL condition for a label scope on the label table aliased `alias`.
///
/// `param_idx` is the placeholder number to use if the scope needs a value;
/// the value is returned alongside the SQL.
pub(crate) fn label_scope_sql(
    scope: &LabelScope,
    alias: &str,
    param_idx: usize,
) -> (String, Option<QueryParam>) {
    match scope {
        LabelScope::Published => (format!("{}.published_at IS NOT NULL", alias), None),
        LabelScope::BeginsWith(prefix) => (
            format!(
                "LOWER({}.value) LIKE LOWER(${}) || '%' ESCAPE '\\'",
                alias, param_idx
            ),
            Some(QueryParam::String(escape_like(prefix))),
        ),
        LabelScope::Language(lang) => (
            format!("{}.language = ${}", alias, param_idx),
            Some(QueryParam::String(lang.clone())),
        ),
    }
}

pub(crate) fn label_from_row(row: &PgRow) -> Label {
    Label {
        id: row.get("id"),
        value: row.get("value"),
        language: row.get("language"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
    }
}

/// PostgreSQL implementation of LabelRepository.
#[derive(Clone)]
pub struct PgLabelRepository {
    pool: Pool<Postgres>,
}

impl PgLabelRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LabelRepository for PgLabelRepository {
    async fn create_label(&self, label: NewLabel) -> Result<Uuid> {
        let id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO label (id, value, language, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(&label.value)
        .bind(&label.language)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get_label(&self, id: Uuid) -> Result<Option<Label>> {
        let row = sqlx::query(
            "SELECT id, value, language, published_at, created_at FROM label WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(label_from_row))
    }

    async fn publish_label(&self, id: Uuid) -> Result<()> {
        let result =
            sqlx::query("UPDATE label SET published_at = COALESCE(published_at, $2) WHERE id = $1")
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::LabelNotFound(id));
        }
        Ok(())
    }

    async fn labels_beginning_with(
        &self,
        prefix: &str,
        language: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Label>> {
        let rows = sqlx::query(
            r#"
            SELECT id, value, language, published_at, created_at
            FROM label
            WHERE LOWER(value) LIKE LOWER($1) || '%' ESCAPE '\'
              AND ($2::text IS NULL OR language = $2)
            ORDER BY value
            LIMIT $3
            "#,
        )
        .bind(escape_like(prefix))
        .bind(language)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(label_from_row).collect())
    }

    async fn delete_label(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM label WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::LabelNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_scope_has_no_param() {
        let (sql, param) = label_scope_sql(&LabelScope::Published, "lb", 1);
        assert_eq!(sql, "lb.published_at IS NOT NULL");
        assert!(param.is_none());
    }

    #[test]
    fn test_begins_with_escapes_wildcards() {
        let (sql, param) = label_scope_sql(&LabelScope::BeginsWith("a_b".to_string()), "t", 7);
        assert_eq!(sql, "LOWER(t.value) LIKE LOWER($7) || '%' ESCAPE '\\'");
        assert_eq!(param, Some(QueryParam::String("a\\_b".to_string())));
    }

    #[test]
    fn test_language_scope() {
        let (sql, param) = label_scope_sql(&LabelScope::Language("de".to_string()), "lb", 2);
        assert_eq!(sql, "lb.language = $2");
        assert_eq!(param, Some(QueryParam::String("de".to_string())));
    }
}
