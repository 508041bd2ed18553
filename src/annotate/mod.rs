//! Annotation types and the `Annotator` seam
//!
//! The linguistic annotator (tokenizer, tagger, dependency parser, NER) is an
//! external collaborator. Everything downstream consumes its output through
//! the types in this module:
//!
//! - `AnnotatedToken` - one token with lemma, dependency role and head index
//! - `EntitySpan` - a named-entity span with its type label
//! - `Annotation` - the full per-text result
//!
//! `spacy.rs` provides `PrecomputedAnnotator`, which serves annotations that
//! spaCy produced offline (`Doc.to_json()` format).

pub mod spacy;

pub use spacy::{PrecomputedAnnotator, SpacyDoc};

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Dependency roles
// =============================================================================

/// Dependency label of a token relative to its head.
///
/// Only the labels the relation extractor cares about get their own variant;
/// every other label is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyRole {
    /// Clause root (main predicate)
    Root,
    /// Nominal subject: "**BikeBox** is a storage"
    NominalSubject,
    /// Direct object: "found the **ring**"
    DirectObject,
    /// Attribute of a copula: "is a **storage**"
    Attribute,
    /// Object of a preposition: "in **Paris**"
    PrepositionalObject,
    /// Negation modifier: "is **not**"
    Negation,
    /// Any other label (det, amod, punct, ...)
    Other(String),
}

impl DependencyRole {
    /// Parse a spaCy / ClearNLP label. Matching is exact except for `ROOT`,
    /// which spaCy emits in upper case but some exporters lower-case.
    pub fn from_label(label: &str) -> Self {
        match label {
            "ROOT" | "root" => Self::Root,
            "nsubj" => Self::NominalSubject,
            "dobj" => Self::DirectObject,
            "attr" => Self::Attribute,
            "pobj" => Self::PrepositionalObject,
            "neg" => Self::Negation,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::Root => "ROOT",
            Self::NominalSubject => "nsubj",
            Self::DirectObject => "dobj",
            Self::Attribute => "attr",
            Self::PrepositionalObject => "pobj",
            Self::Negation => "neg",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for DependencyRole {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<DependencyRole> for String {
    fn from(role: DependencyRole) -> Self {
        role.as_label().to_string()
    }
}

impl fmt::Display for DependencyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

// =============================================================================
// Tokens + spans
// =============================================================================

/// A single annotated token. Immutable once produced by an annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Ordinal position in the document (0-based)
    pub index: usize,
    /// Surface text
    pub text: String,
    /// Lemma ("is" -> "be")
    pub lemma: String,
    /// Dependency role relative to `head`
    pub role: DependencyRole,
    /// Index of the syntactic head. A root points at itself.
    pub head: usize,
}

impl AnnotatedToken {
    pub fn new(
        index: usize,
        text: impl Into<String>,
        lemma: impl Into<String>,
        role: DependencyRole,
        head: usize,
    ) -> Self {
        Self {
            index,
            text: text.into(),
            lemma: lemma.into(),
            role,
            head,
        }
    }

    pub fn is_root(&self) -> bool {
        self.role == DependencyRole::Root
    }

    /// Whether this token negates its head ("not", "n't", "never")
    pub fn is_negation(&self) -> bool {
        self.role == DependencyRole::Negation
    }
}

/// A named-entity span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Covered text
    pub text: String,
    /// Entity type (GPE, ORG, FAC, ...)
    pub label: String,
    /// Start char offset in the source text
    pub start: usize,
    /// End char offset (exclusive)
    pub end: usize,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }
}

/// Everything an annotator produces for one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub tokens: Vec<AnnotatedToken>,
    pub entities: Vec<EntitySpan>,
}

// =============================================================================
// Annotator seam
// =============================================================================

/// Annotator failures. All of them are fatal for the pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum AnnotatorError {
    #[error("No annotation available for text: {0:?}")]
    Unsupported(String),

    #[error("Malformed annotation: {0}")]
    Malformed(String),

    #[error("Failed to read annotations: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse annotations: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns raw text into tokens + entity spans.
///
/// Implementations wrap an external NLP model; they are constructed once by
/// the entry point and passed by reference to whoever needs them.
pub trait Annotator {
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotatorError>;
}

impl<A: Annotator + ?Sized> Annotator for &A {
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotatorError> {
        (**self).annotate(text)
    }
}
