//! GraphBuilder: entity spans + triples → KnowledgeGraph

use super::extract::RelationTriple;
use super::knowledge::{KnowledgeGraph, RelationEdge};
use crate::annotate::EntitySpan;

/// Builds one graph per text. Stateless; pure graph mutation, no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Entities first (every span becomes a node, related or not), then one
    /// edge write per triple in order. Later triples for the same pair
    /// overwrite earlier ones; see `KnowledgeGraph::conflicts`.
    pub fn build(&self, entities: &[EntitySpan], triples: &[RelationTriple]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();

        for entity in entities {
            graph.add_entity(&entity.text, entity.label.as_str());
        }

        for triple in triples {
            graph.set_relation(
                &triple.subject,
                &triple.object,
                RelationEdge::new(triple.relation.as_str()).with_clause(triple.clause),
            );
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            conflicts = graph.conflicts().len(),
            "knowledge graph built"
        );
        graph
    }
}
