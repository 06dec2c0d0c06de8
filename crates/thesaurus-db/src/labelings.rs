//! Labeling repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use thesaurus_core::{
    CreateLabelingRequest, Error, Label, Labeling, LabelingQuery, LabelingRepository,
    LabelingWithLabel, Result,
};

use crate::labeling_filter::{bind_params, LabelingQueryBuilder};

/// PostgreSQL implementation of LabelingRepository.
#[derive(Clone)]
pub struct PgLabelingRepository {
    pool: Pool<Postgres>,
}

impl PgLabelingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LabelingRepository for PgLabelingRepository {
    async fn create_labeling(&self, req: CreateLabelingRequest) -> Result<LabelingWithLabel> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let now = Utc::now();

        let owner_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM concept WHERE id = $1)")
                .bind(req.owner_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;
        if !owner_exists {
            return Err(Error::ConceptNotFound(req.owner_id));
        }

        let label = Label {
            id: Uuid::now_v7(),
            value: req.label.value,
            language: req.label.language,
            published_at: None,
            created_at: now,
        };
        sqlx::query(
            "INSERT INTO label (id, value, language, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(label.id)
        .bind(&label.value)
        .bind(&label.language)
        .bind(label.created_at)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let labeling = Labeling {
            id: Uuid::now_v7(),
            kind: req.kind,
            owner_id: req.owner_id,
            target_id: label.id,
            created_at: now,
        };
        sqlx::query(
            r#"
            INSERT INTO labeling (id, kind, owner_id, target_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(labeling.id)
        .bind(&labeling.kind)
        .bind(labeling.owner_id)
        .bind(labeling.target_id)
        .bind(labeling.created_at)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(LabelingWithLabel { labeling, label })
    }

    async fn get_labeling(&self, id: Uuid) -> Result<Option<Labeling>> {
        let row = sqlx::query(
            "SELECT id, kind, owner_id, target_id, created_at FROM labeling WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Labeling {
            id: r.get("id"),
            kind: r.get("kind"),
            owner_id: r.get("owner_id"),
            target_id: r.get("target_id"),
            created_at: r.get("created_at"),
        }))
    }

    async fn list_labelings(&self, query: &LabelingQuery) -> Result<Vec<LabelingWithLabel>> {
        let start = Instant::now();
        let (where_clause, params) = LabelingQueryBuilder::new(query, 0).build();

        let sql = format!(
            r#"
            SELECT lg.id, lg.kind, lg.owner_id, lg.target_id, lg.created_at,
                   lb.value AS label_value, lb.language AS label_language,
                   lb.published_at AS label_published_at,
                   lb.created_at AS label_created_at
            FROM labeling lg
            JOIN concept c ON c.id = lg.owner_id
            JOIN label lb ON lb.id = lg.target_id
            WHERE {}
            ORDER BY lg.created_at, lg.id
            "#,
            where_clause
        );

        let rows = bind_params(sqlx::query(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let labelings: Vec<LabelingWithLabel> = rows
            .into_iter()
            .map(|r| LabelingWithLabel {
                labeling: Labeling {
                    id: r.get("id"),
                    kind: r.get("kind"),
                    owner_id: r.get("owner_id"),
                    target_id: r.get("target_id"),
                    created_at: r.get("created_at"),
                },
                label: Label {
                    id: r.get("target_id"),
                    value: r.get("label_value"),
                    language: r.get("label_language"),
                    published_at: r.get("label_published_at"),
                    created_at: r.get("label_created_at"),
                },
            })
            .collect();

        debug!(
            subsystem = "database",
            component = "labelings",
            op = "list",
            filter_count = query.filters().len(),
            result_count = labelings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Labelings listed"
        );

        Ok(labelings)
    }

    async fn delete_labeling(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM labeling WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("labeling {}", id)));
        }
        Ok(())
    }
}
