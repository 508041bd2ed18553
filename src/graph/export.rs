//! Serializable view of a KnowledgeGraph (for JSON and JavaScript callers)

use super::knowledge::{EntityNode, KnowledgeGraph, RelationConflict};
use serde::{Serialize, Serializer};

/// Graph edge by node text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedEdge {
    pub source: String,
    pub relation: String,
    pub target: String,
}

/// Nodes, edges, regenerated sentences and conflicts of one graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedGraph {
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<ExportedEdge>,
    pub sentences: Vec<String>,
    pub conflicts: Vec<RelationConflict>,
}

impl KnowledgeGraph {
    pub fn export(&self) -> ExportedGraph {
        ExportedGraph {
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|(source, target, edge)| ExportedEdge {
                    source: source.text.clone(),
                    relation: edge.relation.clone(),
                    target: target.text.clone(),
                })
                .collect(),
            sentences: self.sentences().map(|s| s.to_string()).collect(),
            conflicts: self.conflicts().to_vec(),
        }
    }
}

impl Serialize for KnowledgeGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.export().serialize(serializer)
    }
}
