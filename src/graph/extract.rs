//! RelationExtractor: Subject-Relation-Object triples from a dependency parse
//!
//! For every clause root, looks at the root's direct children:
//!
//! | Child role          | Becomes             |
//! |---------------------|---------------------|
//! | nsubj               | subject candidate   |
//! | dobj / attr / pobj  | object candidate    |
//! | neg                 | negation flag       |
//!
//! A triple is emitted only when both a subject and an object were found.
//! The relation is the root's lemma, prefixed with `"not "` under negation.

use crate::annotate::{AnnotatedToken, DependencyRole};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix applied to negated relation labels
pub const NEGATION_PREFIX: &str = "not ";

// =============================================================================
// Types
// =============================================================================

/// An extracted (subject, relation, object) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTriple {
    pub subject: String,
    /// Root lemma, with `NEGATION_PREFIX` when `negated`
    pub relation: String,
    pub object: String,
    pub negated: bool,
    /// Token index of the clause root this triple came from
    pub clause: usize,
}

impl RelationTriple {
    pub fn new(
        subject: impl Into<String>,
        lemma: &str,
        object: impl Into<String>,
        negated: bool,
        clause: usize,
    ) -> Self {
        let relation = if negated {
            format!("{}{}", NEGATION_PREFIX, lemma)
        } else {
            lemma.to_string()
        };
        Self {
            subject: subject.into(),
            relation,
            object: object.into(),
            negated,
            clause,
        }
    }
}

/// Roles that qualify a child as the clause object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectRole {
    PrepositionalObject,
    Attribute,
    DirectObject,
}

impl ObjectRole {
    pub fn from_role(role: &DependencyRole) -> Option<Self> {
        match role {
            DependencyRole::DirectObject => Some(Self::DirectObject),
            DependencyRole::Attribute => Some(Self::Attribute),
            DependencyRole::PrepositionalObject => Some(Self::PrepositionalObject),
            _ => None,
        }
    }

    /// Priority under `CandidatePolicy::Ranked`. Higher wins.
    pub fn rank(self) -> u8 {
        match self {
            Self::DirectObject => 3,
            Self::Attribute => 2,
            Self::PrepositionalObject => 1,
        }
    }
}

/// How to choose between several qualifying children of one root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePolicy {
    /// dobj > attr > pobj; equal rank goes to the later child
    #[default]
    Ranked,
    /// Last qualifying child in token order, whatever its role
    ScanOrder,
}

// =============================================================================
// RelationExtractor
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct RelationExtractor {
    policy: CandidatePolicy,
}

/// Per-clause scan state
#[derive(Default)]
struct ClauseScan<'t> {
    subject: Option<&'t AnnotatedToken>,
    object: Option<(&'t AnnotatedToken, ObjectRole)>,
    negated: bool,
}

impl RelationExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CandidatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CandidatePolicy {
        self.policy
    }

    /// Extract triples from one text's tokens, one per qualifying clause root,
    /// in root order.
    pub fn extract(&self, tokens: &[AnnotatedToken]) -> Vec<RelationTriple> {
        let children = children_index(tokens);

        tokens
            .iter()
            .filter(|token| token.is_root())
            .filter_map(|root| {
                let kids = children.get(&root.index).map(Vec::as_slice).unwrap_or(&[]);
                self.extract_clause(root, kids.iter().copied())
            })
            .collect()
    }

    fn extract_clause<'t>(
        &self,
        root: &AnnotatedToken,
        children: impl Iterator<Item = &'t AnnotatedToken>,
    ) -> Option<RelationTriple> {
        let mut scan = ClauseScan::default();

        for child in children {
            if child.role == DependencyRole::NominalSubject {
                scan.subject = Some(child);
            }
            if let Some(role) = ObjectRole::from_role(&child.role) {
                scan.object = match (self.policy, scan.object) {
                    (CandidatePolicy::Ranked, Some((kept, kept_role))) if kept_role.rank() > role.rank() => {
                        Some((kept, kept_role))
                    }
                    _ => Some((child, role)),
                };
            }
            if child.is_negation() {
                scan.negated = true;
            }
        }

        match (scan.subject, scan.object) {
            (Some(subject), Some((object, _))) => Some(RelationTriple::new(
                subject.text.as_str(),
                &root.lemma,
                object.text.as_str(),
                scan.negated,
                root.index,
            )),
            (subject, object) => {
                tracing::debug!(
                    root = %root.text,
                    has_subject = subject.is_some(),
                    has_object = object.is_some(),
                    "clause skipped: no subject/object pair"
                );
                None
            }
        }
    }
}

/// head id → tokens attached to it, in token order.
/// Keyed by token id, so gaps in the ids or a slice of a larger document
/// resolve the same way. A root's self-reference is not a child.
fn children_index(tokens: &[AnnotatedToken]) -> HashMap<usize, Vec<&AnnotatedToken>> {
    let mut children: HashMap<usize, Vec<&AnnotatedToken>> = HashMap::new();
    for token in tokens {
        if token.head != token.index {
            children.entry(token.head).or_default().push(token);
        }
    }
    children
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use DependencyRole::*;

    /// Build tokens from (text, lemma, role, head) rows
    fn tokens(rows: &[(&str, &str, DependencyRole, usize)]) -> Vec<AnnotatedToken> {
        rows.iter()
            .enumerate()
            .map(|(i, (text, lemma, role, head))| AnnotatedToken::new(i, *text, *lemma, role.clone(), *head))
            .collect()
    }

    fn other(label: &str) -> DependencyRole {
        Other(label.to_string())
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Copular clause yields (subject, lemma, attr)
    // -------------------------------------------------------------------------
    #[test]
    fn test_copular_clause() {
        let toks = tokens(&[
            ("BikeBox", "BikeBox", NominalSubject, 1),
            ("is", "be", Root, 1),
            ("a", "a", other("det"), 5),
            ("secure", "secure", other("amod"), 5),
            ("bicycle", "bicycle", other("compound"), 5),
            ("storage", "storage", Attribute, 1),
            (".", ".", other("punct"), 1),
        ]);

        let triples = RelationExtractor::new().extract(&toks);

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "BikeBox");
        assert_eq!(triples[0].relation, "be");
        assert_eq!(triples[0].object, "storage");
        assert!(!triples[0].negated);
        assert_eq!(triples[0].clause, 1);
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Negation prefixes the relation
    // -------------------------------------------------------------------------
    #[test]
    fn test_negated_clause() {
        let toks = tokens(&[
            ("BikeBox", "BikeBox", NominalSubject, 1),
            ("is", "be", Root, 1),
            ("not", "not", Negation, 1),
            ("storage", "storage", Attribute, 1),
        ]);

        let triples = RelationExtractor::new().extract(&toks);

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].relation, "not be");
        assert!(triples[0].negated);
    }

    #[test]
    fn test_negation_below_root_is_ignored() {
        // "not" hangs off the object, not the root
        let toks = tokens(&[
            ("Sam", "Sam", NominalSubject, 1),
            ("carried", "carry", Root, 1),
            ("not", "not", Negation, 3),
            ("ring", "ring", DirectObject, 1),
        ]);

        let triples = RelationExtractor::new().extract(&toks);
        assert_eq!(triples[0].relation, "carry");
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Missing subject or object skips the clause
    // -------------------------------------------------------------------------
    #[test]
    fn test_no_subject() {
        let toks = tokens(&[
            ("Tower", "Tower", other("nsubjpass"), 2),
            ("is", "be", other("auxpass"), 2),
            ("located", "locate", Root, 2),
            ("in", "in", other("prep"), 2),
            ("Paris", "Paris", PrepositionalObject, 3),
        ]);

        assert!(RelationExtractor::new().extract(&toks).is_empty());
    }

    #[test]
    fn test_no_object() {
        let toks = tokens(&[
            ("Frodo", "Frodo", NominalSubject, 1),
            ("slept", "sleep", Root, 1),
        ]);

        assert!(RelationExtractor::new().extract(&toks).is_empty());
    }

    #[test]
    fn test_no_root() {
        let toks = tokens(&[("Frodo", "Frodo", NominalSubject, 0)]);
        assert!(RelationExtractor::new().extract(&toks).is_empty());
        assert!(RelationExtractor::new().extract(&[]).is_empty());
    }

    // -------------------------------------------------------------------------
    // Requirement 4: One triple per clause root
    // -------------------------------------------------------------------------
    #[test]
    fn test_multiple_roots() {
        let toks = tokens(&[
            ("Alice", "Alice", NominalSubject, 1),
            ("likes", "like", Root, 1),
            ("Bob", "Bob", DirectObject, 1),
            (".", ".", other("punct"), 1),
            ("Bob", "Bob", NominalSubject, 5),
            ("fears", "fear", Root, 5),
            ("Carol", "Carol", DirectObject, 5),
            (".", ".", other("punct"), 5),
        ]);

        let triples = RelationExtractor::new().extract(&toks);

        assert_eq!(triples.len(), 2);
        assert_eq!((triples[0].subject.as_str(), triples[0].object.as_str()), ("Alice", "Bob"));
        assert_eq!((triples[1].subject.as_str(), triples[1].object.as_str()), ("Bob", "Carol"));
        assert_eq!(triples[1].clause, 5);
    }

    #[test]
    fn test_negation_does_not_leak_across_clauses() {
        let toks = tokens(&[
            ("Alice", "Alice", NominalSubject, 1),
            ("likes", "like", Root, 1),
            ("not", "not", Negation, 1),
            ("Bob", "Bob", DirectObject, 1),
            ("Bob", "Bob", NominalSubject, 5),
            ("likes", "like", Root, 5),
            ("Alice", "Alice", DirectObject, 5),
        ]);

        let triples = RelationExtractor::new().extract(&toks);
        assert_eq!(triples[0].relation, "not like");
        assert_eq!(triples[1].relation, "like");
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Candidate tie-breaks
    // -------------------------------------------------------------------------
    #[test]
    fn test_object_rank_order() {
        assert!(ObjectRole::DirectObject.rank() > ObjectRole::Attribute.rank());
        assert!(ObjectRole::Attribute.rank() > ObjectRole::PrepositionalObject.rank());
    }

    #[test]
    fn test_ranked_prefers_direct_object() {
        // dobj first, pobj later: ranked keeps dobj, scan order keeps pobj
        let toks = tokens(&[
            ("Gandalf", "Gandalf", NominalSubject, 1),
            ("gave", "give", Root, 1),
            ("staff", "staff", DirectObject, 1),
            ("Frodo", "Frodo", PrepositionalObject, 1),
        ]);

        let ranked = RelationExtractor::with_policy(CandidatePolicy::Ranked).extract(&toks);
        assert_eq!(ranked[0].object, "staff");

        let scan = RelationExtractor::with_policy(CandidatePolicy::ScanOrder).extract(&toks);
        assert_eq!(scan[0].object, "Frodo");
    }

    #[test]
    fn test_ranked_upgrades_to_later_higher_role() {
        let toks = tokens(&[
            ("Gandalf", "Gandalf", NominalSubject, 1),
            ("gave", "give", Root, 1),
            ("Frodo", "Frodo", PrepositionalObject, 1),
            ("staff", "staff", DirectObject, 1),
        ]);

        let ranked = RelationExtractor::new().extract(&toks);
        assert_eq!(ranked[0].object, "staff");
    }

    #[test]
    fn test_equal_rank_last_wins() {
        let toks = tokens(&[
            ("Sam", "Sam", NominalSubject, 2),
            ("Frodo", "Frodo", NominalSubject, 2),
            ("carried", "carry", Root, 1),
            ("pack", "pack", DirectObject, 2),
            ("ring", "ring", DirectObject, 2),
        ]);

        for policy in [CandidatePolicy::Ranked, CandidatePolicy::ScanOrder] {
            let triples = RelationExtractor::with_policy(policy).extract(&toks);
            assert_eq!(triples[0].subject, "Frodo", "{:?}", policy);
            assert_eq!(triples[0].object, "ring", "{:?}", policy);
        }
    }

    #[test]
    fn test_default_policy_is_ranked() {
        assert_eq!(RelationExtractor::new().policy(), CandidatePolicy::Ranked);
    }

    // -------------------------------------------------------------------------
    // Requirement 6: Children resolve by token id, not slice position
    // -------------------------------------------------------------------------
    #[test]
    fn test_gap_in_token_ids() {
        // Annotator dropped token 2 (punctuation)
        let toks = vec![
            AnnotatedToken::new(0, "Alice", "Alice", NominalSubject, 1),
            AnnotatedToken::new(1, "likes", "like", Root, 1),
            AnnotatedToken::new(3, "Bob", "Bob", DirectObject, 1),
        ];

        let triples = RelationExtractor::new().extract(&toks);

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "Alice");
        assert_eq!(triples[0].relation, "like");
        assert_eq!(triples[0].object, "Bob");
    }

    #[test]
    fn test_sentence_slice_keeps_document_ids() {
        let toks = vec![
            AnnotatedToken::new(4, "Bob", "Bob", NominalSubject, 5),
            AnnotatedToken::new(5, "fears", "fear", Root, 5),
            AnnotatedToken::new(6, "Carol", "Carol", DirectObject, 5),
        ];

        let triples = RelationExtractor::new().extract(&toks);

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "Bob");
        assert_eq!(triples[0].object, "Carol");
        assert_eq!(triples[0].clause, 5);
    }

    #[test]
    fn test_head_outside_slice_is_ignored() {
        let toks = vec![
            AnnotatedToken::new(0, "Bob", "Bob", NominalSubject, 9),
            AnnotatedToken::new(1, "fears", "fear", Root, 1),
        ];

        assert!(RelationExtractor::new().extract(&toks).is_empty());
    }
}
