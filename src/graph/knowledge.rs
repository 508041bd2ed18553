//! In-memory knowledge graph using petgraph
//!
//! Nodes are keyed by surface text: two mentions of "Norway" are one node.
//! Each ordered (subject, object) pair carries at most one edge; writing a
//! second relation for the same pair overwrites the label in place and, when
//! the label changed, records a `RelationConflict`.

// Use petgraph from rustworkx-core to ensure version compatibility
use rustworkx_core::petgraph::dot::Dot;
use rustworkx_core::petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rustworkx_core::petgraph::visit::EdgeRef;
use rustworkx_core::petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::extract::NEGATION_PREFIX;

// =============================================================================
// Types
// =============================================================================

/// A node: entity or token text with an optional entity type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityNode {
    pub text: String,
    /// Entity type ("GPE", "ORG"); None for nodes created by an edge
    pub label: Option<String>,
}

impl EntityNode {
    pub fn new(text: impl Into<String>, label: Option<String>) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

impl fmt::Display for EntityNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An edge: the relation between subject and object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub relation: String,
    /// Clause root the relation was last written from
    pub clause: Option<usize>,
}

impl RelationEdge {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            clause: None,
        }
    }

    /// Builder: set the originating clause
    pub fn with_clause(mut self, clause: usize) -> Self {
        self.clause = Some(clause);
        self
    }
}

impl fmt::Display for RelationEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relation)
    }
}

/// One (subject, object) pair written twice with different relations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationConflict {
    pub subject: String,
    pub object: String,
    /// Label that was overwritten
    pub previous: String,
    /// Label the edge carries now
    pub current: String,
}

impl RelationConflict {
    /// True when one label is the negation of the other ("be" / "not be")
    pub fn is_negation(&self) -> bool {
        let strip = |label: &str| label.strip_prefix(NEGATION_PREFIX).map(str::to_string);
        strip(&self.previous).as_deref() == Some(self.current.as_str())
            || strip(&self.current).as_deref() == Some(self.previous.as_str())
    }
}

impl fmt::Display for RelationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: '{}' overwritten by '{}'",
            self.subject, self.object, self.previous, self.current
        )
    }
}

// =============================================================================
// KnowledgeGraph
// =============================================================================

/// Directed knowledge graph for one text
///
/// Uses a `DiGraph` where:
/// - Nodes are `EntityNode` (keyed by text)
/// - Edges are `RelationEdge`, one per ordered pair
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<EntityNode, RelationEdge>,
    /// Fast lookup: node text → petgraph NodeIndex
    text_to_index: HashMap<String, NodeIndex>,
    conflicts: Vec<RelationConflict>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity node, or overwrite the label of an existing one
    pub fn add_entity(&mut self, text: &str, label: impl Into<String>) -> NodeIndex {
        let idx = self.ensure_node(text);
        self.graph[idx].label = Some(label.into());
        idx
    }

    /// Get the node for `text`, creating an unlabeled one if missing
    pub fn ensure_node(&mut self, text: &str) -> NodeIndex {
        if let Some(&idx) = self.text_to_index.get(text) {
            return idx;
        }

        let idx = self.graph.add_node(EntityNode::new(text, None));
        self.text_to_index.insert(text.to_string(), idx);
        idx
    }

    /// Add or overwrite the edge subject → object.
    ///
    /// Missing endpoints are created unlabeled. An existing edge keeps its
    /// position and takes the new relation; if the label changed, the old
    /// one is recorded as a conflict and returned.
    pub fn set_relation(&mut self, subject: &str, object: &str, edge: RelationEdge) -> Option<RelationConflict> {
        let source = self.ensure_node(subject);
        let target = self.ensure_node(object);

        let Some(existing) = self.graph.find_edge(source, target) else {
            self.graph.add_edge(source, target, edge);
            return None;
        };

        let previous = std::mem::replace(&mut self.graph[existing], edge);
        if previous.relation == self.graph[existing].relation {
            return None;
        }

        let conflict = RelationConflict {
            subject: subject.to_string(),
            object: object.to_string(),
            previous: previous.relation,
            current: self.graph[existing].relation.clone(),
        };
        tracing::warn!(%conflict, "relation overwritten");
        self.conflicts.push(conflict.clone());
        Some(conflict)
    }

    /// Find a node by text
    pub fn get_node(&self, text: &str) -> Option<&EntityNode> {
        let idx = self.text_to_index.get(text)?;
        self.graph.node_weight(*idx)
    }

    /// Relation currently stored for subject → object
    pub fn relation(&self, subject: &str, object: &str) -> Option<&RelationEdge> {
        let source = *self.text_to_index.get(subject)?;
        let target = *self.text_to_index.get(object)?;
        let edge = self.graph.find_edge(source, target)?;
        self.graph.edge_weight(edge)
    }

    /// Overwrites that changed a relation label, in the order they happened
    pub fn conflicts(&self) -> &[RelationConflict] {
        &self.conflicts
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterate over all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.graph.node_weights()
    }

    /// Iterate over all edges with source and target, grouped by source.
    /// See `edge_order`.
    pub fn edges(&self) -> impl Iterator<Item = (&EntityNode, &EntityNode, &RelationEdge)> {
        self.edge_order().into_iter().filter_map(|edge_idx| self.edge_at(edge_idx))
    }

    /// Sources in node insertion order; each source's outgoing edges in
    /// edge insertion order. An overwritten edge keeps its slot.
    pub(crate) fn edge_order(&self) -> Vec<EdgeIndex> {
        let mut order = Vec::with_capacity(self.graph.edge_count());
        for node_idx in self.graph.node_indices() {
            // edges_directed yields newest first
            let mut outgoing: Vec<EdgeIndex> = self
                .graph
                .edges_directed(node_idx, Direction::Outgoing)
                .map(|edge_ref| edge_ref.id())
                .collect();
            outgoing.sort_unstable();
            order.extend(outgoing);
        }
        order
    }

    pub(crate) fn edge_at(&self, edge_idx: EdgeIndex) -> Option<(&EntityNode, &EntityNode, &RelationEdge)> {
        let (source_idx, target_idx) = self.graph.edge_endpoints(edge_idx)?;
        let source = self.graph.node_weight(source_idx)?;
        let target = self.graph.node_weight(target_idx)?;
        let edge = self.graph.edge_weight(edge_idx)?;
        Some((source, target, edge))
    }

    /// Graphviz DOT rendering for an external viewer.
    /// Nodes are labelled with their text, edges with their relation.
    pub fn to_dot(&self) -> String {
        Dot::new(&self.graph).to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
