//! Predicate-to-kind registry.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use super::kind::LabelingKind;
use crate::error::{Error, Result};

/// Kind used by `skos:prefLabel`.
pub const PREF_LABEL_KIND: &str = "Labeling::SKOS::PrefLabel";
/// Kind used by `skos:altLabel`.
pub const ALT_LABEL_KIND: &str = "Labeling::SKOS::AltLabel";
/// Kind used by `skos:hiddenLabel`.
pub const HIDDEN_LABEL_KIND: &str = "Labeling::SKOS::HiddenLabel";

/// The built-in SKOS labeling kinds.
pub fn builtin_kinds() -> Vec<LabelingKind> {
    vec![
        LabelingKind::new(PREF_LABEL_KIND, "skos", "prefLabel")
            .with_singular(true)
            .with_relation_name("pref_labelings")
            .with_sort_key(100),
        LabelingKind::new(ALT_LABEL_KIND, "skos", "altLabel")
            .with_relation_name("alt_labelings")
            .with_sort_key(200),
        LabelingKind::new(HIDDEN_LABEL_KIND, "skos", "hiddenLabel")
            .with_relation_name("hidden_labelings")
            .with_sort_key(300),
    ]
}

/// Explicit table of labeling kinds, keyed by name and by prefixed predicate.
///
/// The first kind registered is the default used when a caller has no
/// specific kind to start from.
#[derive(Debug, Clone)]
pub struct LabelingRegistry {
    kinds: Vec<LabelingKind>,
    by_name: HashMap<String, usize>,
    by_predicate: HashMap<String, usize>,
}

impl LabelingRegistry {
    /// Build and validate a registry.
    ///
    /// With `strict` set, every kind must declare a relation name; otherwise
    /// missing names are inferred (and warned about) when used.
    pub fn new(kinds: Vec<LabelingKind>, strict: bool) -> Result<Self> {
        if kinds.is_empty() {
            return Err(Error::Config(
                "labeling registry needs at least one kind".to_string(),
            ));
        }

        let mut by_name = HashMap::with_capacity(kinds.len());
        let mut by_predicate = HashMap::with_capacity(kinds.len());

        for (idx, kind) in kinds.iter().enumerate() {
            if kind.name.trim().is_empty()
                || kind.namespace.trim().is_empty()
                || kind.predicate.trim().is_empty()
            {
                return Err(Error::Config(format!(
                    "labeling kind #{} needs a name, namespace and predicate",
                    idx + 1
                )));
            }
            if !kind.has_explicit_relation_name() {
                if strict {
                    return Err(Error::Config(format!(
                        "labeling kind {} does not declare relation_name",
                        kind.name
                    )));
                }
                warn!(
                    subsystem = "labeling",
                    component = "registry",
                    labeling_kind = %kind.name,
                    "Labeling kind has no relation_name; it will be inferred"
                );
            }
            if by_name.insert(kind.name.clone(), idx).is_some() {
                return Err(Error::Config(format!(
                    "duplicate labeling kind: {}",
                    kind.name
                )));
            }
            let predicate = kind.qualified_predicate();
            if by_predicate.insert(predicate.clone(), idx).is_some() {
                return Err(Error::Config(format!(
                    "predicate {} is mapped to more than one labeling kind",
                    predicate
                )));
            }
        }

        debug!(
            subsystem = "labeling",
            component = "registry",
            kinds = kinds.len(),
            strict,
            "Labeling registry built"
        );

        Ok(Self {
            kinds,
            by_name,
            by_predicate,
        })
    }

    /// Registry with the built-in SKOS kinds.
    pub fn builtin() -> Self {
        let kinds = builtin_kinds();
        let by_name = kinds
            .iter()
            .enumerate()
            .map(|(idx, k)| (k.name.clone(), idx))
            .collect();
        let by_predicate = kinds
            .iter()
            .enumerate()
            .map(|(idx, k)| (k.qualified_predicate(), idx))
            .collect();
        Self {
            kinds,
            by_name,
            by_predicate,
        }
    }

    /// Parse a YAML list of kinds.
    pub fn from_yaml(yaml: &str, strict: bool) -> Result<Self> {
        let kinds: Vec<LabelingKind> = serde_yaml::from_str(yaml)?;
        Self::new(kinds, strict)
    }

    /// Load a YAML list of kinds from a file.
    pub fn from_file(path: &Path, strict: bool) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml, strict)
    }

    /// Look up a kind by name.
    pub fn get(&self, name: &str) -> Option<&LabelingKind> {
        self.by_name.get(name).map(|&idx| &self.kinds[idx])
    }

    /// Look up a kind by name, failing when it is not registered.
    pub fn require(&self, name: &str) -> Result<&LabelingKind> {
        self.get(name)
            .ok_or_else(|| Error::UnknownLabelingKind(name.to_string()))
    }

    /// Look up a kind by prefixed predicate (`skos:altLabel`).
    pub fn for_predicate(&self, predicate: &str) -> Option<&LabelingKind> {
        self.by_predicate.get(predicate).map(|&idx| &self.kinds[idx])
    }

    /// Kind for `predicate`, or `fallback` when the predicate is unmapped.
    pub fn resolve<'a>(&'a self, predicate: &str, fallback: &'a LabelingKind) -> &'a LabelingKind {
        self.for_predicate(predicate).unwrap_or(fallback)
    }

    /// The first registered kind.
    pub fn default_kind(&self) -> &LabelingKind {
        &self.kinds[0]
    }

    /// Kind whose label names a concept: the first singular kind by
    /// `sort_key`, or the default kind if none is singular.
    pub fn preferred_kind(&self) -> &LabelingKind {
        self.kinds()
            .into_iter()
            .find(|k| k.is_singular())
            .unwrap_or_else(|| self.default_kind())
    }

    /// All kinds in ascending `sort_key` order.
    pub fn kinds(&self) -> Vec<&LabelingKind> {
        let mut kinds: Vec<&LabelingKind> = self.kinds.iter().collect();
        kinds.sort_by_key(|k| k.sort_key);
        kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for LabelingRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
