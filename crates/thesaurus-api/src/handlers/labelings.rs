//! Labeling query handler.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use thesaurus_core::{Label, Labeling, LabelingQuery};

use super::{concept_by_origin, relation_name_for};
use crate::{ApiError, AppState};

/// Query parameters for listing labelings. Every given parameter adds one
/// filter; all filters must hold.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLabelingsQuery {
    /// Owner concept origin.
    pub concept: Option<String>,
    /// Target label id.
    pub label: Option<Uuid>,
    /// Labeling kind name, e.g. `Labeling::SKOS::AltLabel`.
    pub kind: Option<String>,
    /// Only labelings whose concept is published.
    #[serde(default)]
    pub concept_published: bool,
    /// Only labelings whose label is published.
    #[serde(default)]
    pub label_published: bool,
    /// Label value prefix, case-insensitive.
    pub prefix: Option<String>,
    /// Label language.
    pub lang: Option<String>,
}

impl ListLabelingsQuery {
    /// Filters for everything except `concept`, which needs a lookup.
    fn to_query(&self) -> LabelingQuery {
        let mut query = LabelingQuery::new();
        if let Some(label_id) = self.label {
            query = query.by_label(label_id);
        }
        if let Some(kind) = &self.kind {
            query = query.by_kind(kind.clone());
        }
        if self.concept_published {
            query = query.concept_published();
        }
        if self.label_published {
            query = query.label_published();
        }
        if let Some(prefix) = &self.prefix {
            query = query.label_begins_with(prefix.clone());
        }
        if let Some(lang) = &self.lang {
            query = query.by_label_language(lang);
        }
        query
    }
}

/// One labeling with its label and relation name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LabelingView {
    pub labeling: Labeling,
    pub label: Label,
    pub relation_name: String,
}

/// List labelings matching the given filters, in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/labelings",
    tag = "Labelings",
    params(ListLabelingsQuery),
    responses(
        (status = 200, description = "Matching labelings", body = [LabelingView]),
        (status = 400, description = "Unknown labeling kind"),
        (status = 404, description = "No concept with the given origin")
    )
)]
pub async fn list_labelings(
    State(state): State<AppState>,
    Query(params): Query<ListLabelingsQuery>,
) -> Result<Json<Vec<LabelingView>>, ApiError> {
    if let Some(kind) = &params.kind {
        state.registry.require(kind)?;
    }

    let mut query = LabelingQuery::new();
    if let Some(origin) = &params.concept {
        let concept = concept_by_origin(state.concepts.as_ref(), origin).await?;
        query = query.by_concept(concept.id);
    }
    let query = query.merge(params.to_query());

    let rows = state.labelings.list_labelings(&query).await?;
    let views = rows
        .into_iter()
        .map(|row| LabelingView {
            relation_name: relation_name_for(&state.registry, &row.labeling.kind),
            labeling: row.labeling,
            label: row.label,
        })
        .collect();

    Ok(Json(views))
}
