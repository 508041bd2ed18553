//! spaCy annotation adapter
//!
//! Reads documents serialized with spaCy's `Doc.to_json()`:
//!
//! ```json
//! {
//!   "text": "BikeBox is a secure bicycle storage.",
//!   "ents": [{"start": 0, "end": 7, "label": "ORG"}],
//!   "tokens": [
//!     {"id": 0, "start": 0, "end": 7, "lemma": "BikeBox", "dep": "nsubj", "head": 1},
//!     {"id": 1, "start": 8, "end": 10, "lemma": "be", "dep": "ROOT", "head": 1}
//!   ]
//! }
//! ```
//!
//! Offsets are character offsets, heads are absolute token ids and a root
//! token is its own head. Extra keys (`tag`, `pos`, `morph`, `sents`) are
//! ignored.

use super::{AnnotatedToken, Annotation, Annotator, AnnotatorError, DependencyRole, EntitySpan};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacyDoc {
    pub text: String,
    #[serde(default)]
    pub ents: Vec<SpacyEnt>,
    #[serde(default)]
    pub tokens: Vec<SpacyToken>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacyEnt {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacyToken {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub lemma: Option<String>,
    pub dep: String,
    pub head: usize,
}

/// A corpus file holds either one document or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum Corpus {
    Many(Vec<SpacyDoc>),
    One(SpacyDoc),
}

/// Slice `text` by char offsets
fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let mut boundaries = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()));
    let byte_start = boundaries.nth(start)?;
    let byte_end = if end == start {
        byte_start
    } else {
        boundaries.nth(end - start - 1)?
    };
    text.get(byte_start..byte_end)
}

impl SpacyDoc {
    pub fn from_json(json: &str) -> Result<Self, AnnotatorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert into the pipeline's annotation types
    pub fn into_annotation(self) -> Result<Annotation, AnnotatorError> {
        let token_count = self.tokens.len();
        let mut tokens = Vec::with_capacity(token_count);

        for (position, token) in self.tokens.iter().enumerate() {
            if token.id != position {
                return Err(AnnotatorError::Malformed(format!(
                    "token id {} at position {}",
                    token.id, position
                )));
            }
            if token.head >= token_count {
                return Err(AnnotatorError::Malformed(format!(
                    "token {} has head {} but the document has {} tokens",
                    token.id, token.head, token_count
                )));
            }
            let surface = char_slice(&self.text, token.start, token.end).ok_or_else(|| {
                AnnotatorError::Malformed(format!(
                    "token {} span {}..{} is outside the text",
                    token.id, token.start, token.end
                ))
            })?;

            tokens.push(AnnotatedToken::new(
                token.id,
                surface,
                token.lemma.clone().unwrap_or_else(|| surface.to_string()),
                DependencyRole::from_label(&token.dep),
                token.head,
            ));
        }

        let mut entities = Vec::with_capacity(self.ents.len());
        for ent in &self.ents {
            let surface = char_slice(&self.text, ent.start, ent.end).ok_or_else(|| {
                AnnotatorError::Malformed(format!(
                    "entity {} span {}..{} is outside the text",
                    ent.label, ent.start, ent.end
                ))
            })?;
            entities.push(EntitySpan::new(surface, ent.label.clone(), ent.start, ent.end));
        }

        Ok(Annotation {
            text: self.text,
            tokens,
            entities,
        })
    }
}

// =============================================================================
// PrecomputedAnnotator
// =============================================================================

/// Serves annotations produced offline, looked up by exact text.
///
/// Documents are validated when loaded, so a malformed corpus fails at
/// startup rather than mid-run.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedAnnotator {
    docs: HashMap<String, Annotation>,
}

impl PrecomputedAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON string holding one spaCy doc or an array of them
    pub fn from_json(json: &str) -> Result<Self, AnnotatorError> {
        let docs = match serde_json::from_str::<Corpus>(json)? {
            Corpus::Many(docs) => docs,
            Corpus::One(doc) => vec![doc],
        };

        let mut annotator = Self::new();
        for doc in docs {
            annotator.insert(doc.into_annotation()?);
        }
        tracing::info!(documents = annotator.len(), "loaded precomputed annotations");
        Ok(annotator)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnnotatorError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Add or replace the annotation for its text
    pub fn insert(&mut self, annotation: Annotation) {
        self.docs.insert(annotation.text.clone(), annotation);
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl Annotator for PrecomputedAnnotator {
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotatorError> {
        self.docs
            .get(text)
            .cloned()
            .ok_or_else(|| AnnotatorError::Unsupported(text.to_string()))
    }
}
