//! Per-kind labeling configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sort key used when a kind does not declare one.
pub const DEFAULT_SORT_KEY: i32 = 200;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("valid regex"));
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

fn default_sort_key() -> i32 {
    DEFAULT_SORT_KEY
}

/// Configuration of one labeling kind (prefLabel, altLabel, ...).
///
/// The predicate of a labeling is a property of its kind, never a per-row
/// field, so a labeling's relation type cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LabelingKind {
    /// Kind identifier, stored in `labeling.kind` (e.g. `Labeling::SKOS::PrefLabel`).
    pub name: String,
    /// RDF namespace prefix (e.g. `skos`).
    pub namespace: String,
    /// RDF predicate local name (e.g. `prefLabel`).
    pub predicate: String,
    /// At most one labeling of this kind and language per concept.
    /// Informational only: nothing enforces it.
    #[serde(default)]
    pub singular: bool,
    /// Name of the concept association this kind is appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_name: Option<String>,
    /// Ordering of kinds in listings and exports (lower first).
    #[serde(default = "default_sort_key")]
    pub sort_key: i32,
}

impl LabelingKind {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        predicate: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            predicate: predicate.into(),
            singular: false,
            relation_name: None,
            sort_key: DEFAULT_SORT_KEY,
        }
    }

    pub fn with_singular(mut self, singular: bool) -> Self {
        self.singular = singular;
        self
    }

    pub fn with_relation_name(mut self, relation_name: impl Into<String>) -> Self {
        self.relation_name = Some(relation_name.into());
        self
    }

    pub fn with_sort_key(mut self, sort_key: i32) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Predicate in prefixed form, e.g. `skos:prefLabel`.
    pub fn qualified_predicate(&self) -> String {
        format!("{}:{}", self.namespace, self.predicate)
    }

    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// Whether the relation name is configured rather than inferred.
    pub fn has_explicit_relation_name(&self) -> bool {
        self.relation_name.is_some()
    }

    /// Name of the concept association for this kind.
    ///
    /// Falls back to [`LabelingKind::inferred_relation_name`] and logs a
    /// warning on every call when no name was configured.
    pub fn relation_name(&self) -> String {
        if let Some(name) = &self.relation_name {
            return name.clone();
        }
        let inferred = self.inferred_relation_name();
        warn!(
            subsystem = "labeling",
            component = "kind",
            labeling_kind = %self.name,
            relation_name = %inferred,
            "Inferring relation name from kind name, configure relation_name for this kind"
        );
        inferred
    }

    /// Relation name derived from the kind name: `Labeling::Broader` → `broader`.
    pub fn inferred_relation_name(&self) -> String {
        underscore(&self.name)
            .replace('/', "_")
            .replacen("labeling_", "", 1)
    }
}

/// Converts a `CamelCase::Path` identifier to `snake_case/path`.
pub fn underscore(name: &str) -> String {
    let path = name.replace("::", "/");
    let path = ACRONYM_BOUNDARY.replace_all(&path, "${1}_${2}");
    let path = WORD_BOUNDARY.replace_all(&path, "${1}_${2}");
    path.replace('-', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_camel_case_path() {
        assert_eq!(underscore("Labeling::SKOS::PrefLabel"), "labeling/skos/pref_label");
        assert_eq!(underscore("Labeling::Broader"), "labeling/broader");
        assert_eq!(underscore("HTTPServer"), "http_server");
        assert_eq!(underscore("already_snake"), "already_snake");
    }

    #[test]
    fn test_inferred_relation_name_strips_prefix() {
        let kind = LabelingKind::new("Labeling::Broader", "skos", "broader");
        assert_eq!(kind.inferred_relation_name(), "broader");

        let kind = LabelingKind::new("Labeling::SKOS::AltLabel", "skos", "altLabel");
        assert_eq!(kind.inferred_relation_name(), "skos_alt_label");
    }

    #[test]
    fn test_explicit_relation_name_wins() {
        let kind = LabelingKind::new("Labeling::SKOS::PrefLabel", "skos", "prefLabel")
            .with_relation_name("pref_labelings");
        assert!(kind.has_explicit_relation_name());
        assert_eq!(kind.relation_name(), "pref_labelings");
    }

    #[test]
    fn test_singular_defaults_to_false() {
        let kind = LabelingKind::new("Labeling::Custom", "ex", "custom");
        assert!(!kind.is_singular());

        let yaml = "name: Labeling::Custom\nnamespace: ex\npredicate: custom\n";
        let parsed: LabelingKind = serde_yaml::from_str(yaml).unwrap();
        assert!(!parsed.is_singular());
        assert_eq!(parsed.sort_key, DEFAULT_SORT_KEY);
        assert!(parsed.relation_name.is_none());
    }

    #[test]
    fn test_qualified_predicate() {
        let kind = LabelingKind::new("Labeling::SKOS::HiddenLabel", "skos", "hiddenLabel");
        assert_eq!(kind.qualified_predicate(), "skos:hiddenLabel");
    }
}
