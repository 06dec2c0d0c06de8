//! Concept HTTP handlers.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use thesaurus_core::{Concept, ConceptOverviewRow, Label, LabelingQuery};

use super::{concept_by_origin, relation_name_for};
use crate::{ApiError, AppState};

/// A concept with its labels grouped by relation name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConceptDetail {
    pub concept: Concept,
    /// Labels keyed by relation name (`pref_labelings`, `alt_labelings`, ...),
    /// each list in labeling creation order.
    pub labelings: BTreeMap<String, Vec<Label>>,
}

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Language of the preferred labels; defaults to the configured language.
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub language: String,
    pub concepts: Vec<ConceptOverviewRow>,
}

/// Get a concept and its labelings.
#[utoipa::path(
    get,
    path = "/api/v1/concepts/{origin}",
    tag = "Concepts",
    params(("origin" = String, Path, description = "Concept origin, e.g. c11880")),
    responses(
        (status = 200, description = "Concept found", body = ConceptDetail),
        (status = 404, description = "No concept with this origin")
    )
)]
pub async fn get_concept(
    State(state): State<AppState>,
    Path(origin): Path<String>,
) -> Result<Json<ConceptDetail>, ApiError> {
    let concept = concept_by_origin(state.concepts.as_ref(), &origin).await?;
    let rows = state
        .labelings
        .list_labelings(&LabelingQuery::new().by_concept(concept.id))
        .await?;

    let mut labelings: BTreeMap<String, Vec<Label>> = BTreeMap::new();
    for row in rows {
        labelings
            .entry(relation_name_for(&state.registry, &row.labeling.kind))
            .or_default()
            .push(row.label);
    }

    Ok(Json(ConceptDetail { concept, labelings }))
}

/// Publish a concept together with every label it owns.
#[utoipa::path(
    post,
    path = "/api/v1/concepts/{origin}/publish",
    tag = "Concepts",
    params(("origin" = String, Path, description = "Concept origin")),
    responses(
        (status = 200, description = "Concept published", body = Concept),
        (status = 404, description = "No concept with this origin")
    )
)]
pub async fn publish_concept(
    State(state): State<AppState>,
    Path(origin): Path<String>,
) -> Result<Json<Concept>, ApiError> {
    let concept = concept_by_origin(state.concepts.as_ref(), &origin).await?;
    state.concepts.publish_concept(concept.id).await?;

    let rows = state
        .labelings
        .list_labelings(&LabelingQuery::new().by_concept(concept.id))
        .await?;
    for row in &rows {
        state.labels.publish_label(row.label.id).await?;
    }

    let published = state
        .concepts
        .get_concept(concept.id)
        .await?
        .ok_or(thesaurus_core::Error::ConceptNotFound(concept.id))?;

    info!(
        subsystem = "api",
        op = "publish_concept",
        concept_id = %published.id,
        origin = %published.origin,
        result_count = rows.len(),
        "Concept published"
    );

    Ok(Json(published))
}

/// Concept overview with preferred labels in one language.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Concepts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Concepts ordered by origin", body = DashboardResponse),
        (status = 400, description = "Language not offered")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let language = query
        .lang
        .unwrap_or_else(|| state.config.default_language.clone());
    if !state.config.languages.contains(&language) {
        return Err(ApiError::BadRequest(format!(
            "Language {} is not one of {:?}",
            language, state.config.languages
        )));
    }

    let concepts = state
        .concepts
        .concept_overview(&language, &state.registry.preferred_kind().name)
        .await?;

    Ok(Json(DashboardResponse { language, concepts }))
}
