//! Knowledge-graph core
//!
//! - `extract.rs` - RelationExtractor: clause roots → (subject, relation, object)
//! - `knowledge.rs` - KnowledgeGraph: petgraph DiGraph keyed by node text
//! - `builder.rs` - GraphBuilder: entity spans + triples → KnowledgeGraph
//! - `sentences.rs` - SentenceGenerator: edges → "{subject} {relation} {object}."
//! - `export.rs` - ExportedGraph: serializable nodes/edges/sentences/conflicts

pub mod builder;
pub mod export;
pub mod extract;
pub mod knowledge;
pub mod sentences;

pub use builder::GraphBuilder;
pub use export::{ExportedEdge, ExportedGraph};
pub use extract::{CandidatePolicy, ObjectRole, RelationExtractor, RelationTriple, NEGATION_PREFIX};
pub use knowledge::{EntityNode, KnowledgeGraph, RelationConflict, RelationEdge};
pub use sentences::{GeneratedSentence, SentenceGenerator, Sentences};
