//! HTTP handlers for the thesaurus API.

pub mod concepts;
pub mod labelings;
pub mod rdf;
pub mod system;

use thesaurus_core::{Concept, ConceptRepository, LabelingKind, LabelingRegistry};

use crate::ApiError;

/// Concept with `origin`, or 404.
pub(crate) async fn concept_by_origin(
    concepts: &dyn ConceptRepository,
    origin: &str,
) -> Result<Concept, ApiError> {
    concepts
        .get_concept_by_origin(origin)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Concept not found: {}", origin)))
}

/// Relation name for a stored labeling kind.
///
/// Kinds missing from the registry get an inferred name, which logs a warning.
pub(crate) fn relation_name_for(registry: &LabelingRegistry, kind: &str) -> String {
    match registry.get(kind) {
        Some(known) => known.relation_name(),
        None => LabelingKind::new(kind, "", "").relation_name(),
    }
}
