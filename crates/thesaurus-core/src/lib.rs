//! # thesaurus-core
//!
//! Core types, traits, and abstractions for the thesaurus SKOS vocabulary
//! service.
//!
//! This crate provides the vocabulary data model (concepts, labels,
//! labelings), the labeling kind registry and composable labeling filters,
//! the RDF triple text codec and importer, and the repository traits the
//! storage crates implement.

pub mod config;
pub mod error;
pub mod import;
pub mod labeling;
pub mod logging;
pub mod memory;
pub mod models;
pub mod rdf;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{PoolSettings, ThesaurusConfig};
pub use error::{Error, Result};
pub use import::{ImportReport, RdfImporter};
pub use labeling::*;
pub use memory::InMemoryVocabulary;
pub use models::*;
pub use rdf::{
    decode_literal, encode_literal, export_concept, parse_triples, subject_origin, Triple,
    RDF_TYPE, SKOS_CONCEPT,
};
pub use traits::*;
