//! RDF triple text format.
//!
//! One triple per line, `subject predicate object`, using prefixed names
//! (`:c11880 skos:prefLabel "Lorem Ypsem"@de`). Object literals are
//! double-quoted, JSON-escaped strings with an optional `@lang` suffix.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::labeling::LabelingRegistry;
use crate::models::{Concept, LabelingWithLabel, NewLabel};

/// `rdf:type` predicate.
pub const RDF_TYPE: &str = "rdf:type";
/// `skos:Concept` class.
pub const SKOS_CONCEPT: &str = "skos:Concept";

static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(.+)"(@(.+))?$"#).expect("valid regex"));

/// A single subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Whether this triple declares its subject a `skos:Concept`.
    pub fn is_concept_declaration(&self) -> bool {
        self.predicate == RDF_TYPE && self.object == SKOS_CONCEPT
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// Split triple text into triples.
///
/// Blank lines and `#` comments are skipped and a trailing ` .` is dropped.
/// The object is the remainder of the line, so literals may contain spaces.
pub fn parse_triples(text: &str) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_suffix(" .") {
            line = stripped.trim_end();
        }

        let (subject, rest) = split_term(line).ok_or_else(|| Error::MalformedTriple {
            line: line_no,
            reason: "expected subject, predicate and object".to_string(),
        })?;
        let (predicate, object) = split_term(rest).ok_or_else(|| Error::MalformedTriple {
            line: line_no,
            reason: "expected predicate and object".to_string(),
        })?;

        triples.push(Triple::new(subject, predicate, object));
    }

    Ok(triples)
}

fn split_term(s: &str) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(char::is_whitespace)?;
    let tail = tail.trim();
    if head.is_empty() || tail.is_empty() {
        return None;
    }
    Some((head, tail))
}

/// Concept origin named by a subject term.
///
/// `:c11880` and `<http://example.org/voc#c11880>` both resolve to `c11880`.
pub fn subject_origin(subject: &str) -> Result<&str> {
    let origin = if let Some(iri) = subject.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        iri.rsplit(['#', '/']).next().unwrap_or(iri)
    } else if let Some((_, local)) = subject.split_once(':') {
        local
    } else {
        subject
    };

    if origin.is_empty() {
        return Err(Error::InvalidInput(format!(
            "subject {} does not name a concept",
            subject
        )));
    }
    Ok(origin)
}

/// Decode a quoted literal into a label.
///
/// `kind` names the labeling kind on whose behalf the literal is read and is
/// carried in the error.
pub fn decode_literal(object: &str, kind: &str) -> Result<NewLabel> {
    let malformed = || Error::MalformedLiteral {
        value: object.to_string(),
        kind: kind.to_string(),
    };

    let caps = STRING_LITERAL.captures(object).ok_or_else(malformed)?;
    let raw = caps.get(1).map(|m| m.as_str()).ok_or_else(malformed)?;
    let language = caps.get(3).map(|m| m.as_str().to_string());

    // Doubly escaped newlines (`\\n`) are read as newlines too.
    let raw = raw.replace(r"\\n", r"\n");
    let value: String =
        serde_json::from_str(&format!("\"{}\"", raw)).map_err(|_| malformed())?;

    Ok(NewLabel { value, language })
}

/// Encode a value and language as a literal that [`decode_literal`] reads back.
///
/// Backslashes are written as `\u005c` so a literal backslash followed by `n`
/// is not mistaken for an escaped newline.
pub fn encode_literal(value: &str, language: Option<&str>) -> Result<String> {
    let quoted = serde_json::to_string(value)?.replace(r"\\", r"\u005c");
    Ok(match language {
        Some(lang) if !lang.is_empty() => format!("{}@{}", quoted, lang),
        _ => quoted,
    })
}

/// Serialize a concept and its labelings as triple text.
///
/// Labelings are ordered by kind `sort_key`, then label value.
pub fn export_concept(
    concept: &Concept,
    labelings: &[LabelingWithLabel],
    registry: &LabelingRegistry,
) -> Result<String> {
    let subject = format!(":{}", concept.origin);
    let mut lines = vec![Triple::new(&subject, RDF_TYPE, SKOS_CONCEPT).to_string()];

    let mut rows = Vec::with_capacity(labelings.len());
    for row in labelings {
        let kind = registry.require(&row.labeling.kind)?;
        rows.push((kind, row));
    }
    rows.sort_by(|(ka, a), (kb, b)| {
        ka.sort_key
            .cmp(&kb.sort_key)
            .then_with(|| a.label.value.cmp(&b.label.value))
    });

    for (kind, row) in rows {
        let object = encode_literal(&row.label.value, row.label.language.as_deref())?;
        lines.push(Triple::new(&subject, kind.qualified_predicate(), object).to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
