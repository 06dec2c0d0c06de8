//! In-memory repository implementations.
//!
//! `InMemoryVocabulary` implements every repository trait over plain
//! collections behind an async `RwLock`. It backs unit and router tests and
//! small embedded uses where no database is available. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::labeling::LabelingQuery;
use crate::models::*;
use crate::traits::{ConceptRepository, LabelRepository, LabelingRepository};

#[derive(Debug, Default)]
struct State {
    concepts: HashMap<Uuid, Concept>,
    labels: HashMap<Uuid, Label>,
    /// Creation order.
    labelings: Vec<Labeling>,
}

impl State {
    fn insert_concept(&mut self, origin: &str, published: bool) -> Result<Concept> {
        if origin.trim().is_empty() {
            return Err(Error::InvalidInput("concept origin cannot be empty".to_string()));
        }
        if self.concepts.values().any(|c| c.origin == origin) {
            return Err(Error::InvalidInput(format!(
                "concept with origin {} already exists",
                origin
            )));
        }
        let now = Utc::now();
        let concept = Concept {
            id: Uuid::now_v7(),
            origin: origin.to_string(),
            published_at: published.then_some(now),
            created_at: now,
            updated_at: now,
        };
        self.concepts.insert(concept.id, concept.clone());
        Ok(concept)
    }

    fn insert_label(&mut self, label: NewLabel) -> Label {
        let label = Label {
            id: Uuid::now_v7(),
            value: label.value,
            language: label.language,
            published_at: None,
            created_at: Utc::now(),
        };
        self.labels.insert(label.id, label.clone());
        label
    }
}

/// Non-persistent vocabulary store. Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVocabulary {
    state: Arc<RwLock<State>>,
}

impl InMemoryVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored concepts, labels and labelings.
    pub async fn counts(&self) -> (usize, usize, usize) {
        let state = self.state.read().await;
        (
            state.concepts.len(),
            state.labels.len(),
            state.labelings.len(),
        )
    }
}

#[async_trait]
impl ConceptRepository for InMemoryVocabulary {
    async fn create_concept(&self, req: CreateConceptRequest) -> Result<Uuid> {
        let mut state = self.state.write().await;
        Ok(state.insert_concept(&req.origin, req.published)?.id)
    }

    async fn get_concept(&self, id: Uuid) -> Result<Option<Concept>> {
        Ok(self.state.read().await.concepts.get(&id).cloned())
    }

    async fn get_concept_by_origin(&self, origin: &str) -> Result<Option<Concept>> {
        let state = self.state.read().await;
        Ok(state.concepts.values().find(|c| c.origin == origin).cloned())
    }

    async fn find_or_create_concept(&self, origin: &str) -> Result<(Concept, bool)> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.concepts.values().find(|c| c.origin == origin) {
            return Ok((existing.clone(), false));
        }
        Ok((state.insert_concept(origin, false)?, true))
    }

    async fn publish_concept(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let concept = state
            .concepts
            .get_mut(&id)
            .ok_or(Error::ConceptNotFound(id))?;
        let now = Utc::now();
        concept.published_at.get_or_insert(now);
        concept.updated_at = now;
        Ok(())
    }

    async fn list_concepts(&self, published_only: bool) -> Result<Vec<Concept>> {
        let state = self.state.read().await;
        let mut concepts: Vec<Concept> = state
            .concepts
            .values()
            .filter(|c| !published_only || c.is_published())
            .cloned()
            .collect();
        concepts.sort_by(|a, b| a.origin.cmp(&b.origin));
        Ok(concepts)
    }

    async fn delete_concept(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        if state.concepts.remove(&id).is_none() {
            return Err(Error::ConceptNotFound(id));
        }
        let (owned, kept): (Vec<Labeling>, Vec<Labeling>) = std::mem::take(&mut state.labelings)
            .into_iter()
            .partition(|l| l.owner_id == id);
        state.labelings = kept;
        for labeling in owned {
            state.labels.remove(&labeling.target_id);
        }
        Ok(())
    }

    async fn concept_overview(
        &self,
        language: &str,
        pref_kind: &str,
    ) -> Result<Vec<ConceptOverviewRow>> {
        let state = self.state.read().await;
        let mut rows: Vec<ConceptOverviewRow> = state
            .concepts
            .values()
            .map(|concept| {
                let pref_label = state
                    .labelings
                    .iter()
                    .filter(|l| l.owner_id == concept.id && l.kind == pref_kind)
                    .filter_map(|l| state.labels.get(&l.target_id))
                    .find(|label| label.language.as_deref() == Some(language))
                    .map(|label| label.value.clone());
                ConceptOverviewRow {
                    id: concept.id,
                    origin: concept.origin.clone(),
                    published: concept.is_published(),
                    pref_label,
                    updated_at: concept.updated_at,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.origin.cmp(&b.origin));
        Ok(rows)
    }
}

#[async_trait]
impl LabelRepository for InMemoryVocabulary {
    async fn create_label(&self, label: NewLabel) -> Result<Uuid> {
        Ok(self.state.write().await.insert_label(label).id)
    }

    async fn get_label(&self, id: Uuid) -> Result<Option<Label>> {
        Ok(self.state.read().await.labels.get(&id).cloned())
    }

    async fn publish_label(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let label = state.labels.get_mut(&id).ok_or(Error::LabelNotFound(id))?;
        label.published_at.get_or_insert_with(Utc::now);
        Ok(())
    }

    async fn labels_beginning_with(
        &self,
        prefix: &str,
        language: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Label>> {
        let state = self.state.read().await;
        let prefix = prefix.to_lowercase();
        let mut labels: Vec<Label> = state
            .labels
            .values()
            .filter(|l| l.value.to_lowercase().starts_with(&prefix))
            .filter(|l| language.is_none() || l.language.as_deref() == language)
            .cloned()
            .collect();
        labels.sort_by(|a, b| a.value.cmp(&b.value));
        labels.truncate(limit.max(0) as usize);
        Ok(labels)
    }

    async fn delete_label(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        if state.labels.remove(&id).is_none() {
            return Err(Error::LabelNotFound(id));
        }
        state.labelings.retain(|l| l.target_id != id);
        Ok(())
    }
}

#[async_trait]
impl LabelingRepository for InMemoryVocabulary {
    async fn create_labeling(&self, req: CreateLabelingRequest) -> Result<LabelingWithLabel> {
        let mut state = self.state.write().await;
        if !state.concepts.contains_key(&req.owner_id) {
            return Err(Error::ConceptNotFound(req.owner_id));
        }
        let label = state.insert_label(req.label);
        let labeling = Labeling {
            id: Uuid::now_v7(),
            kind: req.kind,
            owner_id: req.owner_id,
            target_id: label.id,
            created_at: Utc::now(),
        };
        state.labelings.push(labeling.clone());
        Ok(LabelingWithLabel { labeling, label })
    }

    async fn get_labeling(&self, id: Uuid) -> Result<Option<Labeling>> {
        let state = self.state.read().await;
        Ok(state.labelings.iter().find(|l| l.id == id).cloned())
    }

    async fn list_labelings(&self, query: &LabelingQuery) -> Result<Vec<LabelingWithLabel>> {
        let state = self.state.read().await;
        let rows = state
            .labelings
            .iter()
            .filter_map(|labeling| {
                let owner = state.concepts.get(&labeling.owner_id)?;
                let target = state.labels.get(&labeling.target_id)?;
                query
                    .matches(labeling, owner, target)
                    .then(|| LabelingWithLabel {
                        labeling: labeling.clone(),
                        label: target.clone(),
                    })
            })
            .collect();
        Ok(rows)
    }

    async fn delete_labeling(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.labelings.len();
        state.labelings.retain(|l| l.id != id);
        if state.labelings.len() == before {
            return Err(Error::NotFound(format!("labeling {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::{ALT_LABEL_KIND, PREF_LABEL_KIND};

    async fn seeded() -> (InMemoryVocabulary, Concept) {
        let store = InMemoryVocabulary::new();
        let (concept, created) = store.find_or_create_concept("c1").await.unwrap();
        assert!(created);
        (store, concept)
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let (store, concept) = seeded().await;
        let (again, created) = store.find_or_create_concept("c1").await.unwrap();
        assert!(!created);
        assert_eq!(again.id, concept.id);
        assert_eq!(store.counts().await, (1, 0, 0));
    }

    #[tokio::test]
    async fn test_create_concept_rejects_duplicate_origin() {
        let (store, _) = seeded().await;
        let err = store
            .create_concept(CreateConceptRequest {
                origin: "c1".to_string(),
                published: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_labeling_requires_owner() {
        let store = InMemoryVocabulary::new();
        let owner_id = Uuid::new_v4();
        let err = store
            .create_labeling(CreateLabelingRequest {
                owner_id,
                kind: PREF_LABEL_KIND.to_string(),
                label: NewLabel::new("Dog", Some("en")),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConceptNotFound(id) if id == owner_id));
        assert_eq!(store.counts().await, (0, 0, 0));
    }

    #[tokio::test]
    async fn test_publish_and_list_concepts() {
        let (store, c1) = seeded().await;
        store.find_or_create_concept("c0").await.unwrap();
        store.publish_concept(c1.id).await.unwrap();

        let all = store.list_concepts(false).await.unwrap();
        assert_eq!(
            all.iter().map(|c| c.origin.as_str()).collect::<Vec<_>>(),
            vec!["c0", "c1"]
        );
        let published = store.list_concepts(true).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, c1.id);

        assert!(matches!(
            store.publish_concept(Uuid::new_v4()).await,
            Err(Error::ConceptNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_concept_removes_labelings_and_labels() {
        let (store, c1) = seeded().await;
        store
            .create_labeling(CreateLabelingRequest {
                owner_id: c1.id,
                kind: PREF_LABEL_KIND.to_string(),
                label: NewLabel::new("Dog", Some("en")),
            })
            .await
            .unwrap();
        assert_eq!(store.counts().await, (1, 1, 1));

        store.delete_concept(c1.id).await.unwrap();
        assert_eq!(store.counts().await, (0, 0, 0));
    }

    #[tokio::test]
    async fn test_delete_label_drops_its_labelings() {
        let (store, c1) = seeded().await;
        let row = store
            .create_labeling(CreateLabelingRequest {
                owner_id: c1.id,
                kind: ALT_LABEL_KIND.to_string(),
                label: NewLabel::new("Hound", Some("en")),
            })
            .await
            .unwrap();
        store.delete_label(row.label.id).await.unwrap();
        assert!(store.get_labeling(row.labeling.id).await.unwrap().is_none());
        assert_eq!(store.counts().await, (1, 0, 0));
    }

    #[tokio::test]
    async fn test_labels_beginning_with() {
        let store = InMemoryVocabulary::new();
        store.create_label(NewLabel::new("Dog", Some("en"))).await.unwrap();
        store.create_label(NewLabel::new("dogma", Some("en"))).await.unwrap();
        store.create_label(NewLabel::new("Dogge", Some("de"))).await.unwrap();
        store.create_label(NewLabel::new("Cat", Some("en"))).await.unwrap();

        let en = store.labels_beginning_with("DOG", Some("en"), 10).await.unwrap();
        assert_eq!(
            en.iter().map(|l| l.value.as_str()).collect::<Vec<_>>(),
            vec!["Dog", "dogma"]
        );
        let any = store.labels_beginning_with("dog", None, 2).await.unwrap();
        assert_eq!(any.len(), 2);
    }

    #[tokio::test]
    async fn test_concept_overview_picks_pref_label_in_language() {
        let (store, c1) = seeded().await;
        let (c2, _) = store.find_or_create_concept("c2").await.unwrap();
        for (kind, value, lang) in [
            (ALT_LABEL_KIND, "Ipsum", "de"),
            (PREF_LABEL_KIND, "Lorem", "en"),
            (PREF_LABEL_KIND, "Lorem Ypsem", "de"),
        ] {
            store
                .create_labeling(CreateLabelingRequest {
                    owner_id: c1.id,
                    kind: kind.to_string(),
                    label: NewLabel::new(value, Some(lang)),
                })
                .await
                .unwrap();
        }

        let rows = store.concept_overview("de", PREF_LABEL_KIND).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].origin, "c1");
        assert_eq!(rows[0].pref_label.as_deref(), Some("Lorem Ypsem"));
        assert_eq!(rows[1].id, c2.id);
        assert!(rows[1].pref_label.is_none());
    }
}
