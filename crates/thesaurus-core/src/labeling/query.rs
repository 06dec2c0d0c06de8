//! Composable labeling filters.
//!
//! A [`LabelingQuery`] is a conjunction of [`LabelingFilter`]s. Filters on the
//! owner concept or target label are expressed as [`ConceptScope`] and
//! [`LabelScope`] so that their meaning lives with the entity they test. The
//! database crate turns the same query into SQL; [`LabelingQuery::matches`]
//! evaluates it in memory.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Concept, Label, Labeling};

/// Filter on a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptScope {
    /// Concept has been published.
    Published,
}

impl ConceptScope {
    pub fn matches(&self, concept: &Concept) -> bool {
        match self {
            Self::Published => concept.is_published(),
        }
    }
}

/// Filter on a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelScope {
    /// Label has been published.
    Published,
    /// Label value starts with the prefix, ignoring case.
    BeginsWith(String),
    /// Label language equals the tag.
    Language(String),
}

impl LabelScope {
    pub fn matches(&self, label: &Label) -> bool {
        match self {
            Self::Published => label.is_published(),
            Self::BeginsWith(prefix) => label
                .value
                .to_lowercase()
                .starts_with(&prefix.to_lowercase()),
            Self::Language(lang) => label.language.as_deref() == Some(lang.as_str()),
        }
    }
}

/// One condition on a labeling row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelingFilter {
    /// Owner concept id equals.
    ByConcept(Uuid),
    /// Target label id equals.
    ByLabel(Uuid),
    /// Labeling kind name equals.
    ByKind(String),
    /// Owner concept satisfies the scope.
    Concept(ConceptScope),
    /// Target label satisfies the scope.
    Label(LabelScope),
}

impl LabelingFilter {
    pub fn matches(&self, labeling: &Labeling, owner: &Concept, target: &Label) -> bool {
        match self {
            Self::ByConcept(id) => labeling.owner_id == *id,
            Self::ByLabel(id) => labeling.target_id == *id,
            Self::ByKind(kind) => labeling.kind == *kind,
            Self::Concept(scope) => scope.matches(owner),
            Self::Label(scope) => scope.matches(target),
        }
    }
}

/// Conjunction of labeling filters, built by chaining.
///
/// ```
/// use thesaurus_core::LabelingQuery;
///
/// let query = LabelingQuery::new()
///     .label_published()
///     .by_label_language("de")
///     .label_begins_with("Lor");
/// assert_eq!(query.filters().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelingQuery {
    filters: Vec<LabelingFilter>,
}

impl LabelingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: LabelingFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Labelings owned by the concept.
    pub fn by_concept(self, concept_id: Uuid) -> Self {
        self.filter(LabelingFilter::ByConcept(concept_id))
    }

    /// Labelings pointing at the label.
    pub fn by_label(self, label_id: Uuid) -> Self {
        self.filter(LabelingFilter::ByLabel(label_id))
    }

    /// Labelings of one kind.
    pub fn by_kind(self, kind: impl Into<String>) -> Self {
        self.filter(LabelingFilter::ByKind(kind.into()))
    }

    /// Labelings whose owner concept is published.
    pub fn concept_published(self) -> Self {
        self.filter(LabelingFilter::Concept(ConceptScope::Published))
    }

    /// Labelings whose target label is published.
    pub fn label_published(self) -> Self {
        self.filter(LabelingFilter::Label(LabelScope::Published))
    }

    /// Labelings whose target label value starts with `prefix`.
    pub fn label_begins_with(self, prefix: impl Into<String>) -> Self {
        self.filter(LabelingFilter::Label(LabelScope::BeginsWith(prefix.into())))
    }

    /// Labelings whose target label has language `lang`.
    pub fn by_label_language(self, lang: impl Display) -> Self {
        self.filter(LabelingFilter::Label(LabelScope::Language(lang.to_string())))
    }

    /// Conjunction of both queries.
    pub fn merge(mut self, other: LabelingQuery) -> Self {
        self.filters.extend(other.filters);
        self
    }

    pub fn filters(&self) -> &[LabelingFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether the row satisfies every filter.
    pub fn matches(&self, labeling: &Labeling, owner: &Concept, target: &Label) -> bool {
        self.filters
            .iter()
            .all(|f| f.matches(labeling, owner, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn concept(published: bool) -> Concept {
        let now = Utc::now();
        Concept {
            id: Uuid::new_v4(),
            origin: "c1".to_string(),
            published_at: published.then(Utc::now),
            created_at: now,
            updated_at: now,
        }
    }

    fn label(value: &str, language: Option<&str>, published: bool) -> Label {
        Label {
            id: Uuid::new_v4(),
            value: value.to_string(),
            language: language.map(str::to_string),
            published_at: published.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    fn labeling(owner: &Concept, target: &Label) -> Labeling {
        Labeling {
            id: Uuid::new_v4(),
            kind: "Labeling::SKOS::PrefLabel".to_string(),
            owner_id: owner.id,
            target_id: target.id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let c = concept(false);
        let l = label("Dog", Some("en"), false);
        assert!(LabelingQuery::new().matches(&labeling(&c, &l), &c, &l));
    }

    #[test]
    fn test_by_concept_and_by_label() {
        let c = concept(true);
        let l = label("Dog", Some("en"), true);
        let row = labeling(&c, &l);

        assert!(LabelingQuery::new().by_concept(c.id).matches(&row, &c, &l));
        assert!(!LabelingQuery::new()
            .by_concept(Uuid::new_v4())
            .matches(&row, &c, &l));
        assert!(LabelingQuery::new().by_label(l.id).matches(&row, &c, &l));
        assert!(!LabelingQuery::new()
            .by_label(Uuid::new_v4())
            .matches(&row, &c, &l));
    }

    #[test]
    fn test_published_scopes_delegate_to_entities() {
        let published = concept(true);
        let draft = concept(false);
        let l = label("Dog", Some("en"), false);

        let q = LabelingQuery::new().concept_published();
        assert!(q.matches(&labeling(&published, &l), &published, &l));
        assert!(!q.matches(&labeling(&draft, &l), &draft, &l));

        let q = LabelingQuery::new().label_published();
        assert!(!q.matches(&labeling(&published, &l), &published, &l));
    }

    #[test]
    fn test_label_begins_with_is_case_insensitive() {
        let c = concept(false);
        let l = label("Lorem Ypsem", Some("de"), false);
        let row = labeling(&c, &l);

        assert!(LabelingQuery::new()
            .label_begins_with("lor")
            .matches(&row, &c, &l));
        assert!(LabelingQuery::new()
            .label_begins_with("")
            .matches(&row, &c, &l));
        assert!(!LabelingQuery::new()
            .label_begins_with("Ypsem")
            .matches(&row, &c, &l));
    }

    #[test]
    fn test_by_label_language_coerces_to_text() {
        struct Lang;
        impl Display for Lang {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "de")
            }
        }

        let c = concept(false);
        let de = label("Hund", Some("de"), false);
        let untagged = label("Hund", None, false);

        let q = LabelingQuery::new().by_label_language(Lang);
        assert_eq!(
            q.filters(),
            &[LabelingFilter::Label(LabelScope::Language("de".to_string()))]
        );
        assert!(q.matches(&labeling(&c, &de), &c, &de));
        assert!(!q.matches(&labeling(&c, &untagged), &c, &untagged));
    }

    #[test]
    fn test_merge_is_conjunction() {
        let c = concept(true);
        let l = label("Dog", Some("en"), false);
        let row = labeling(&c, &l);

        let a = LabelingQuery::new().concept_published();
        let b = LabelingQuery::new().label_published();
        assert!(a.matches(&row, &c, &l));
        assert!(!b.matches(&row, &c, &l));
        assert!(!a.clone().merge(b.clone()).matches(&row, &c, &l));
        assert_eq!(a.merge(b).filters().len(), 2);
    }

    #[test]
    fn test_by_kind() {
        let c = concept(false);
        let l = label("Dog", None, false);
        let row = labeling(&c, &l);
        assert!(LabelingQuery::new()
            .by_kind("Labeling::SKOS::PrefLabel")
            .matches(&row, &c, &l));
        assert!(!LabelingQuery::new()
            .by_kind("Labeling::SKOS::AltLabel")
            .matches(&row, &c, &l));
    }
}
