//! Core data models for thesaurus.
//!
//! These types are shared across all thesaurus crates and represent the
//! vocabulary entities: concepts, labels, and the labelings between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default dashboard language when the configuration names none.
pub const DEFAULT_LANGUAGE: &str = "en";

// =============================================================================
// CONCEPTS
// =============================================================================

/// A node in the vocabulary graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Concept {
    pub id: Uuid,
    /// Local name used in RDF (`:c11880` has origin `c11880`).
    pub origin: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Concept {
    /// Whether the concept is in the published state.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// Request to create a concept.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateConceptRequest {
    pub origin: String,
    #[serde(default)]
    pub published: bool,
}

// =============================================================================
// LABELS
// =============================================================================

/// A literal value with a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Label {
    pub id: Uuid,
    pub value: String,
    /// Language tag. `None` for literals imported without `@lang`.
    pub language: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Label {
    /// Whether the label is in the published state.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// A label that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewLabel {
    pub value: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl NewLabel {
    pub fn new(value: impl Into<String>, language: Option<impl Into<String>>) -> Self {
        Self {
            value: value.into(),
            language: language.map(Into::into),
        }
    }
}

// =============================================================================
// LABELINGS
// =============================================================================

/// A typed edge from a concept (owner) to a label (target).
///
/// `kind` holds the name of the labeling kind and is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Labeling {
    pub id: Uuid,
    pub kind: String,
    pub owner_id: Uuid,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request to attach a new label to a concept.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateLabelingRequest {
    pub owner_id: Uuid,
    /// Labeling kind name (e.g. `Labeling::SKOS::AltLabel`).
    pub kind: String,
    pub label: NewLabel,
}

/// A labeling joined with its target label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LabelingWithLabel {
    pub labeling: Labeling,
    pub label: Label,
}

/// Result of creating a label together with its labeling.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatedLabeling {
    pub labeling: Labeling,
    pub label: Label,
    /// Concept association the labeling was appended to.
    pub relation_name: String,
    /// Whether the owner concept was materialized for this labeling.
    pub concept_created: bool,
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// One row of the concept overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConceptOverviewRow {
    pub id: Uuid,
    pub origin: String,
    pub published: bool,
    /// Preferred label in the requested language, if any.
    pub pref_label: Option<String>,
    pub updated_at: DateTime<Utc>,
}
