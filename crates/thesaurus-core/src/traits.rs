//! Core traits for vocabulary storage.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy. The PostgreSQL repositories live in `thesaurus-db`; an in-memory
//! implementation lives in [`crate::memory`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::labeling::LabelingQuery;
use crate::models::*;

// =============================================================================
// CONCEPT REPOSITORY
// =============================================================================

/// Repository for concept CRUD operations.
#[async_trait]
pub trait ConceptRepository: Send + Sync {
    /// Insert a new concept.
    async fn create_concept(&self, req: CreateConceptRequest) -> Result<Uuid>;

    /// Get a concept by ID.
    async fn get_concept(&self, id: Uuid) -> Result<Option<Concept>>;

    /// Get a concept by origin.
    async fn get_concept_by_origin(&self, origin: &str) -> Result<Option<Concept>>;

    /// Fetch the concept with this origin, creating an unpublished one if
    /// absent. The flag is `true` when the concept was created.
    async fn find_or_create_concept(&self, origin: &str) -> Result<(Concept, bool)>;

    /// Mark a concept as published.
    async fn publish_concept(&self, id: Uuid) -> Result<()>;

    /// List concepts ordered by origin.
    async fn list_concepts(&self, published_only: bool) -> Result<Vec<Concept>>;

    /// Delete a concept with its labelings and their labels.
    async fn delete_concept(&self, id: Uuid) -> Result<()>;

    /// Concept overview: one row per concept with its preferred label in
    /// `language`, where `pref_kind` names the preferred labeling kind.
    async fn concept_overview(
        &self,
        language: &str,
        pref_kind: &str,
    ) -> Result<Vec<ConceptOverviewRow>>;
}

// =============================================================================
// LABEL REPOSITORY
// =============================================================================

/// Repository for label operations.
#[async_trait]
pub trait LabelRepository: Send + Sync {
    /// Insert a standalone label.
    async fn create_label(&self, label: NewLabel) -> Result<Uuid>;

    /// Get a label by ID.
    async fn get_label(&self, id: Uuid) -> Result<Option<Label>>;

    /// Mark a label as published.
    async fn publish_label(&self, id: Uuid) -> Result<()>;

    /// Labels whose value starts with `prefix` (case-insensitive),
    /// optionally restricted to a language.
    async fn labels_beginning_with(
        &self,
        prefix: &str,
        language: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Label>>;

    /// Delete a label and any labeling pointing at it.
    async fn delete_label(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// LABELING REPOSITORY
// =============================================================================

/// Repository for labeling operations.
#[async_trait]
pub trait LabelingRepository: Send + Sync {
    /// Create a label and the labeling linking it to its owner, atomically.
    async fn create_labeling(&self, req: CreateLabelingRequest) -> Result<LabelingWithLabel>;

    /// Get a labeling by ID.
    async fn get_labeling(&self, id: Uuid) -> Result<Option<Labeling>>;

    /// Labelings matching every filter of the query, with their labels,
    /// in creation order.
    async fn list_labelings(&self, query: &LabelingQuery) -> Result<Vec<LabelingWithLabel>>;

    /// Delete a labeling. The label is kept.
    async fn delete_labeling(&self, id: Uuid) -> Result<()>;
}
