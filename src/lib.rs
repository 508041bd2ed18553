//! FactCore: Knowledge-Graph Extraction + NLI Contradiction Checking
//!
//! A Rust/WASM implementation of a two-signal contradiction checker for
//! generated text against a reference article.
//!
//! # Architecture
//!
//! ## Graph signal
//! - `annotate/` - Annotation types, `Annotator` seam, spaCy JSON corpus
//! - `graph/extract.rs` - RelationExtractor: (subject, relation, object) per clause root
//! - `graph/builder.rs` - GraphBuilder: entities + triples → KnowledgeGraph
//! - `graph/sentences.rs` - SentenceGenerator: one sentence per edge
//!
//! ## NLI signal
//! - `nli/mod.rs` - ContradictionScorer over an injected `NliClassifier`
//! - `nli/model.rs` - OnnxNliClassifier: MNLI models via tract-onnx
//!
//! ## Pipeline
//! - `orchestrator.rs` - Orchestrator: both signals → ComparisonReport
//! - `config.rs` - PipelineConfig (factcheck.json)
//! - `console.rs` - `tracing` events → browser console
//! - `wasm.rs` - GraphCortex / NliCortex bindings
//!
//! # Usage (native)
//! ```rust,ignore
//! use factcore::{ContradictionScorer, NliConfig, OnnxNliClassifier, Orchestrator, PrecomputedAnnotator};
//!
//! let annotator = PrecomputedAnnotator::from_path("fixtures/demo_annotations.json")?;
//! let classifier = OnnxNliClassifier::from_files(
//!     "models/bart-large-mnli/model.onnx",
//!     "models/bart-large-mnli/tokenizer.json",
//!     NliConfig::default(),
//! )?;
//! let scorer = ContradictionScorer::new(Box::new(classifier));
//!
//! let report = Orchestrator::new(&annotator, &scorer).compare(
//!     "BikeBox is a secure bicycle storage.",
//!     "BikeBox is not a secure bicycle storage.",
//! )?;
//! println!("{}", report);
//! ```

pub mod annotate;
pub mod config;
pub mod console;
pub mod error;
pub mod graph;
pub mod nli;
pub mod orchestrator;
pub mod wasm;

// Public exports
pub use annotate::{AnnotatedToken, Annotation, Annotator, AnnotatorError, DependencyRole, EntitySpan, PrecomputedAnnotator};
pub use config::{ConfigError, PipelineConfig, CONFIG_FILE};
pub use error::{Error, Result};
pub use graph::{
    CandidatePolicy, GeneratedSentence, GraphBuilder, KnowledgeGraph, RelationConflict, RelationExtractor,
    RelationTriple, SentenceGenerator,
};
pub use nli::{
    ClassifierOutput, ContradictionScorer, ContradictionVerdict, NliClassifier, NliConfig, NliError, NliLabel,
    NliModel, OnnxNliClassifier,
};
pub use orchestrator::{ComparisonReport, Orchestrator, StageTimings, TextAnalysis};
pub use wasm::{GraphCortex, NliCortex};

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook and console logging for the browser
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    console::init();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("factcore v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(super::version().starts_with("factcore v"));
    }
}
