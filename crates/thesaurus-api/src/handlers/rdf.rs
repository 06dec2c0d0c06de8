//! RDF import and export handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use thesaurus_core::{export_concept, ImportReport, LabelingQuery, RdfImporter};

use super::concept_by_origin;
use crate::{ApiError, AppState};

const TRIPLE_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Import triples, one per line.
///
/// Lines are `subject predicate object`, with an optional trailing ` .`.
/// Import stops at the first malformed line or literal; records created
/// before it are kept.
#[utoipa::path(
    post,
    path = "/api/v1/rdf/import",
    tag = "RDF",
    request_body(content = String, content_type = "text/plain", description = "Triple text"),
    responses(
        (status = 201, description = "Triples imported", body = ImportReport),
        (status = 400, description = "Malformed triple or literal")
    )
)]
pub async fn import_rdf(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ImportReport>), ApiError> {
    let importer = RdfImporter::new(
        state.concepts.as_ref(),
        state.labelings.as_ref(),
        &state.registry,
    );
    let report = importer.import_text(&body).await?;

    info!(
        subsystem = "api",
        op = "import_rdf",
        triple_count = report.triples,
        labelings_created = report.labelings_created,
        "RDF import request complete"
    );

    Ok((StatusCode::CREATED, Json(report)))
}

/// Export a concept and its labelings as triple text.
#[utoipa::path(
    get,
    path = "/api/v1/concepts/{origin}/rdf",
    tag = "RDF",
    params(("origin" = String, Path, description = "Concept origin")),
    responses(
        (status = 200, description = "Triple text", body = String, content_type = "text/plain"),
        (status = 404, description = "No concept with this origin")
    )
)]
pub async fn export_rdf(
    State(state): State<AppState>,
    Path(origin): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let concept = concept_by_origin(state.concepts.as_ref(), &origin).await?;
    let rows = state
        .labelings
        .list_labelings(&LabelingQuery::new().by_concept(concept.id))
        .await?;
    let body = export_concept(&concept, &rows, &state.registry)?;

    Ok(([(header::CONTENT_TYPE, TRIPLE_CONTENT_TYPE)], body))
}
