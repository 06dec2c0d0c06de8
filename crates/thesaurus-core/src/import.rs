//! Turning RDF triples into concepts, labels and labelings.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::labeling::{LabelingKind, LabelingRegistry};
use crate::models::{CreateLabelingRequest, CreatedLabeling};
use crate::rdf::{decode_literal, parse_triples, subject_origin, Triple};
use crate::traits::{ConceptRepository, LabelingRepository};

/// Counts from one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportReport {
    pub triples: usize,
    pub concepts_created: usize,
    pub labels_created: usize,
    pub labelings_created: usize,
    /// Triples whose predicate is neither `rdf:type skos:Concept` nor a
    /// registered labeling predicate.
    pub skipped: usize,
}

/// Builds vocabulary records from RDF triples.
pub struct RdfImporter<'a> {
    concepts: &'a dyn ConceptRepository,
    labelings: &'a dyn LabelingRepository,
    registry: &'a LabelingRegistry,
}

impl<'a> RdfImporter<'a> {
    pub fn new(
        concepts: &'a dyn ConceptRepository,
        labelings: &'a dyn LabelingRepository,
        registry: &'a LabelingRegistry,
    ) -> Self {
        Self {
            concepts,
            labelings,
            registry,
        }
    }

    /// Create a label and labeling from one triple.
    ///
    /// The labeling kind is looked up by `predicate`; `kind` is used when the
    /// predicate is not registered. The subject concept is created when it
    /// does not exist yet. Fails with `Error::MalformedLiteral`, before
    /// touching storage, when `object` is not a quoted string literal.
    pub async fn build_from_rdf(
        &self,
        kind: &LabelingKind,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<CreatedLabeling> {
        let label = decode_literal(object, &kind.name)?;
        let origin = subject_origin(subject)?;
        let kind = self.registry.resolve(predicate, kind);

        let (concept, concept_created) = self.concepts.find_or_create_concept(origin).await?;
        let relation_name = kind.relation_name();

        let row = self
            .labelings
            .create_labeling(CreateLabelingRequest {
                owner_id: concept.id,
                kind: kind.name.clone(),
                label,
            })
            .await?;

        debug!(
            subsystem = "rdf",
            component = "importer",
            op = "build_from_rdf",
            concept_id = %concept.id,
            origin = %concept.origin,
            label_id = %row.label.id,
            labeling_kind = %kind.name,
            relation_name = %relation_name,
            "Labeling built from triple"
        );

        Ok(CreatedLabeling {
            labeling: row.labeling,
            label: row.label,
            relation_name,
            concept_created,
        })
    }

    /// Import a batch of triples in order.
    ///
    /// Stops at the first error; records created before it are kept.
    pub async fn import(&self, triples: &[Triple]) -> Result<ImportReport> {
        let start = Instant::now();
        let mut report = ImportReport {
            triples: triples.len(),
            ..Default::default()
        };
        let fallback = self.registry.default_kind();

        for triple in triples {
            if triple.is_concept_declaration() {
                let origin = subject_origin(&triple.subject)?;
                let (_, created) = self.concepts.find_or_create_concept(origin).await?;
                if created {
                    report.concepts_created += 1;
                }
                continue;
            }

            if self.registry.for_predicate(&triple.predicate).is_none() {
                warn!(
                    subsystem = "rdf",
                    component = "importer",
                    predicate = %triple.predicate,
                    "Skipping triple with unsupported predicate"
                );
                report.skipped += 1;
                continue;
            }

            let created = self
                .build_from_rdf(fallback, &triple.subject, &triple.predicate, &triple.object)
                .await?;
            if created.concept_created {
                report.concepts_created += 1;
            }
            report.labels_created += 1;
            report.labelings_created += 1;
        }

        info!(
            subsystem = "rdf",
            component = "importer",
            op = "import",
            triple_count = report.triples,
            concepts_created = report.concepts_created,
            labelings_created = report.labelings_created,
            skipped = report.skipped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Triple import complete"
        );

        Ok(report)
    }

    /// Parse triple text and import it.
    pub async fn import_text(&self, text: &str) -> Result<ImportReport> {
        let triples = parse_triples(text)?;
        self.import(&triples).await
    }
}
