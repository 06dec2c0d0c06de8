//! thesaurus-api - HTTP API for the thesaurus SKOS vocabulary service
//!
//! The router is built here so the binary and the integration tests share it.

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;
use utoipa::OpenApi;
use uuid::Uuid;

use thesaurus_core::{
    ConceptRepository, Error, InMemoryVocabulary, LabelRepository, LabelingRegistry,
    LabelingRepository, ThesaurusConfig,
};
use thesaurus_db::Database;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub concepts: Arc<dyn ConceptRepository>,
    pub labels: Arc<dyn LabelRepository>,
    pub labelings: Arc<dyn LabelingRepository>,
    pub registry: Arc<LabelingRegistry>,
    pub config: Arc<ThesaurusConfig>,
    /// Pool pinged by the health check; `None` for non-database stores.
    pub pool: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL repositories.
    pub fn from_database(
        db: Database,
        registry: LabelingRegistry,
        config: ThesaurusConfig,
    ) -> Self {
        Self {
            concepts: Arc::new(db.concepts),
            labels: Arc::new(db.labels),
            labelings: Arc::new(db.labelings),
            registry: Arc::new(registry),
            config: Arc::new(config),
            pool: Some(db.pool),
        }
    }

    /// State backed by a non-persistent store.
    pub fn in_memory(
        store: InMemoryVocabulary,
        registry: LabelingRegistry,
        config: ThesaurusConfig,
    ) -> Self {
        Self {
            concepts: Arc::new(store.clone()),
            labels: Arc::new(store.clone()),
            labelings: Arc::new(store),
            registry: Arc::new(registry),
            config: Arc::new(config),
            pool: None,
        }
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Thesaurus API",
        description = "SKOS vocabulary service: concepts, labels and labelings with RDF import and export"
    ),
    paths(
        handlers::system::health_check,
        handlers::rdf::import_rdf,
        handlers::rdf::export_rdf,
        handlers::concepts::get_concept,
        handlers::concepts::publish_concept,
        handlers::concepts::dashboard,
        handlers::labelings::list_labelings,
    ),
    components(schemas(
        thesaurus_core::Concept,
        thesaurus_core::Label,
        thesaurus_core::Labeling,
        thesaurus_core::ConceptOverviewRow,
        thesaurus_core::ImportReport,
        handlers::concepts::ConceptDetail,
        handlers::concepts::DashboardResponse,
        handlers::labelings::LabelingView,
    )),
    tags(
        (name = "Concepts", description = "Concept lookup, publication and overview"),
        (name = "Labelings", description = "Labeling queries"),
        (name = "RDF", description = "Triple import and export"),
        (name = "System", description = "Health checks and API description")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::system::health_check))
        .route("/openapi.json", get(openapi_json))
        .route("/api/v1/rdf/import", post(handlers::rdf::import_rdf))
        .route("/api/v1/concepts/:origin", get(handlers::concepts::get_concept))
        .route("/api/v1/concepts/:origin/rdf", get(handlers::rdf::export_rdf))
        .route(
            "/api/v1/concepts/:origin/publish",
            post(handlers::concepts::publish_concept),
        )
        .route("/api/v1/labelings", get(handlers::labelings::list_labelings))
        .route("/api/v1/dashboard", get(handlers::concepts::dashboard))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Internal(Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::ConceptNotFound(_) | Error::LabelNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::MalformedLiteral { .. }
            | Error::MalformedTriple { .. }
            | Error::UnknownLabelingKind(_) => ApiError::BadRequest(err.to_string()),
            Error::Database(sqlx::Error::Database(ref db)) if db.is_unique_violation() => {
                ApiError::Conflict(db.message().to_string())
            }
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
