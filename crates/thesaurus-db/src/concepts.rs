//! Concept repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use thesaurus_core::{
    Concept, ConceptOverviewRow, ConceptRepository, ConceptScope, CreateConceptRequest, Error,
    Result,
};

const CONCEPT_COLUMNS: &str = "id, origin, published_at, created_at, updated_at";

/// SQL condition for a concept scope on the concept table aliased `alias`.
pub(crate) fn concept_scope_sql(scope: &ConceptScope, alias: &str) -> String {
    match scope {
        ConceptScope::Published => format!("{}.published_at IS NOT NULL", alias),
    }
}

fn concept_from_row(row: &PgRow) -> Concept {
    Concept {
        id: row.get("id"),
        origin: row.get("origin"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn require_origin(origin: &str) -> Result<()> {
    if origin.trim().is_empty() {
        return Err(Error::InvalidInput(
            "concept origin cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// PostgreSQL implementation of ConceptRepository.
#[derive(Clone)]
pub struct PgConceptRepository {
    pool: Pool<Postgres>,
}

impl PgConceptRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConceptRepository for PgConceptRepository {
    async fn create_concept(&self, req: CreateConceptRequest) -> Result<Uuid> {
        require_origin(&req.origin)?;
        let id = Uuid::now_v7();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO concept (id, origin, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(id)
        .bind(&req.origin)
        .bind(req.published.then_some(now))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::InvalidInput(format!("concept origin already exists: {}", req.origin))
            }
            other => Error::Database(other),
        })?;

        Ok(id)
    }

    async fn get_concept(&self, id: Uuid) -> Result<Option<Concept>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM concept WHERE id = $1",
            CONCEPT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(concept_from_row))
    }

    async fn get_concept_by_origin(&self, origin: &str) -> Result<Option<Concept>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM concept WHERE origin = $1",
            CONCEPT_COLUMNS
        ))
        .bind(origin)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(concept_from_row))
    }

    async fn find_or_create_concept(&self, origin: &str) -> Result<(Concept, bool)> {
        require_origin(origin)?;
        let now = Utc::now();

        let inserted = sqlx::query(&format!(
            r#"
            INSERT INTO concept (id, origin, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (origin) DO NOTHING
            RETURNING {}
            "#,
            CONCEPT_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(origin)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if let Some(row) = inserted {
            let concept = concept_from_row(&row);
            debug!(
                subsystem = "database",
                component = "concepts",
                op = "find_or_create",
                concept_id = %concept.id,
                origin = %concept.origin,
                "Concept created"
            );
            return Ok((concept, true));
        }

        // Lost the insert race or the concept already existed.
        let existing = self.get_concept_by_origin(origin).await?.ok_or_else(|| {
            Error::Internal(format!("concept {} vanished during find_or_create", origin))
        })?;
        Ok((existing, false))
    }

    async fn publish_concept(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE concept
            SET published_at = COALESCE(published_at, $2), updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ConceptNotFound(id));
        }
        Ok(())
    }

    async fn list_concepts(&self, published_only: bool) -> Result<Vec<Concept>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM concept
            WHERE ($1 = FALSE OR published_at IS NOT NULL)
            ORDER BY origin
            "#,
            CONCEPT_COLUMNS
        ))
        .bind(published_only)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(concept_from_row).collect())
    }

    async fn delete_concept(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Labels belong to exactly one labeling; removing them cascades to
        // the labelings themselves.
        sqlx::query(
            "DELETE FROM label WHERE id IN (SELECT target_id FROM labeling WHERE owner_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM concept WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ConceptNotFound(id));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn concept_overview(
        &self,
        language: &str,
        pref_kind: &str,
    ) -> Result<Vec<ConceptOverviewRow>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.origin, c.published_at IS NOT NULL AS published,
                   p.value AS pref_label, c.updated_at
            FROM concept c
            LEFT JOIN LATERAL (
                SELECT lb.value
                FROM labeling lg
                JOIN label lb ON lb.id = lg.target_id
                WHERE lg.owner_id = c.id AND lg.kind = $2 AND lb.language = $1
                ORDER BY lg.created_at, lg.id
                LIMIT 1
            ) p ON TRUE
            ORDER BY c.origin
            "#,
        )
        .bind(language)
        .bind(pref_kind)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| ConceptOverviewRow {
                id: r.get("id"),
                origin: r.get("origin"),
                published: r.get("published"),
                pref_label: r.get("pref_label"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }
}
