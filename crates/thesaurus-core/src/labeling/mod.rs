//! Labelings: typed edges from a concept to a label.
//!
//! - [`kind`]: per-kind configuration (predicate, singular, relation name)
//! - [`registry`]: predicate-to-kind lookup table, validated at startup
//! - [`query`]: composable filters over labeling rows

pub mod kind;
pub mod query;
pub mod registry;

pub use kind::{underscore, LabelingKind, DEFAULT_SORT_KEY};
pub use query::{ConceptScope, LabelScope, LabelingFilter, LabelingQuery};
pub use registry::{
    builtin_kinds, LabelingRegistry, ALT_LABEL_KIND, HIDDEN_LABEL_KIND, PREF_LABEL_KIND,
};
