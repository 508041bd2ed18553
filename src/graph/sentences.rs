//! SentenceGenerator: KnowledgeGraph → simple declarative sentences
//!
//! One sentence per edge, `"{subject} {relation} {object}."`, produced lazily
//! in `KnowledgeGraph::edges` order: grouped by source node (node insertion
//! order), then edge insertion order within a source. The iterator borrows
//! the graph, so calling `sentences()` again restarts from the first edge.

use super::knowledge::KnowledgeGraph;
use rustworkx_core::petgraph::graph::EdgeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sentence regenerated from one graph edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSentence {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl fmt::Display for GeneratedSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}.", self.subject, self.relation, self.object)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceGenerator;

impl SentenceGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn sentences<'g>(&self, graph: &'g KnowledgeGraph) -> Sentences<'g> {
        graph.sentences()
    }
}

/// Lazy sentence sequence over a borrowed graph
#[derive(Clone)]
pub struct Sentences<'g> {
    graph: &'g KnowledgeGraph,
    edges: std::vec::IntoIter<EdgeIndex>,
}

impl Iterator for Sentences<'_> {
    type Item = GeneratedSentence;

    fn next(&mut self) -> Option<Self::Item> {
        let edge_idx = self.edges.next()?;
        let (source, target, edge) = self.graph.edge_at(edge_idx)?;
        Some(GeneratedSentence {
            subject: source.text.clone(),
            relation: edge.relation.clone(),
            object: target.text.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl KnowledgeGraph {
    /// Sentences for every edge, restartable
    pub fn sentences(&self) -> Sentences<'_> {
        Sentences {
            graph: self,
            edges: self.edge_order().into_iter(),
        }
    }
}
