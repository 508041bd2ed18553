//! Orchestrator: runs both contradiction signals for an article/candidate pair
//!
//! 1. Graph signal: annotate → extract → build → sentences, once per text.
//! 2. NLI signal: the raw pair scored by the injected `ContradictionScorer`.
//!
//! The two signals are reported side by side and never reconciled.

use crate::annotate::Annotator;
use crate::error::Result;
use crate::graph::{CandidatePolicy, GraphBuilder, KnowledgeGraph, RelationExtractor, RelationTriple};
use crate::nli::{ContradictionScorer, ContradictionVerdict};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Types
// =============================================================================

/// Timing per pipeline stage, summed over both texts
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageTimings {
    pub total_us: u64,
    pub annotate_us: u64,
    pub extract_us: u64,
    pub build_us: u64,
    pub score_us: u64,
}

/// Graph-side result for one text
#[derive(Debug, Clone, Serialize)]
pub struct TextAnalysis {
    pub text: String,
    pub triples: Vec<RelationTriple>,
    pub graph: KnowledgeGraph,
    pub sentences: Vec<String>,
}

/// Both graphs, both sentence lists and the NLI verdict
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub article: TextAnalysis,
    pub candidate: TextAnalysis,
    pub verdict: ContradictionVerdict,
    pub timings: StageTimings,
}

impl ComparisonReport {
    /// True when either graph overwrote a relation with a different label
    pub fn has_conflicts(&self) -> bool {
        !self.article.graph.conflicts().is_empty() || !self.candidate.graph.conflicts().is_empty()
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Sequences the pipeline with borrowed model handles.
///
/// The annotator and scorer are built once by the caller and may be shared
/// by any number of orchestrators.
pub struct Orchestrator<'a> {
    annotator: &'a dyn Annotator,
    scorer: &'a ContradictionScorer,
    extractor: RelationExtractor,
    builder: GraphBuilder,
}

impl<'a> Orchestrator<'a> {
    pub fn new(annotator: &'a dyn Annotator, scorer: &'a ContradictionScorer) -> Self {
        Self {
            annotator,
            scorer,
            extractor: RelationExtractor::new(),
            builder: GraphBuilder::new(),
        }
    }

    /// Builder: choose how competing objects are resolved
    pub fn with_policy(mut self, policy: CandidatePolicy) -> Self {
        self.extractor = RelationExtractor::with_policy(policy);
        self
    }

    /// Graph signal for one text
    pub fn analyze(&self, text: &str) -> Result<TextAnalysis> {
        self.analyze_timed(text, &mut StageTimings::default())
    }

    fn analyze_timed(&self, text: &str, timings: &mut StageTimings) -> Result<TextAnalysis> {
        let annotate_start = instant::Instant::now();
        let annotation = self.annotator.annotate(text)?;
        timings.annotate_us += annotate_start.elapsed().as_micros() as u64;

        let extract_start = instant::Instant::now();
        let triples = self.extractor.extract(&annotation.tokens);
        timings.extract_us += extract_start.elapsed().as_micros() as u64;

        let build_start = instant::Instant::now();
        let graph = self.builder.build(&annotation.entities, &triples);
        let sentences = graph.sentences().map(|s| s.to_string()).collect();
        timings.build_us += build_start.elapsed().as_micros() as u64;

        Ok(TextAnalysis {
            text: annotation.text,
            triples,
            graph,
            sentences,
        })
    }

    /// Run both signals for (article, candidate)
    pub fn compare(&self, article: &str, candidate: &str) -> Result<ComparisonReport> {
        let overall_start = instant::Instant::now();
        let mut timings = StageTimings::default();

        let article_analysis = self.analyze_timed(article, &mut timings)?;
        let candidate_analysis = self.analyze_timed(candidate, &mut timings)?;

        let score_start = instant::Instant::now();
        let verdict = self.scorer.check(article, candidate)?;
        timings.score_us = score_start.elapsed().as_micros() as u64;

        timings.total_us = overall_start.elapsed().as_micros() as u64;

        tracing::info!(
            article_edges = article_analysis.graph.edge_count(),
            candidate_edges = candidate_analysis.graph.edge_count(),
            label = %verdict.label,
            total_us = timings.total_us,
            "comparison complete"
        );

        Ok(ComparisonReport {
            article: article_analysis,
            candidate: candidate_analysis,
            verdict,
            timings,
        })
    }
}

// =============================================================================
// Display
// =============================================================================

fn write_nodes(f: &mut fmt::Formatter<'_>, graph: &KnowledgeGraph) -> fmt::Result {
    let nodes: Vec<&str> = graph.nodes().map(|n| n.text.as_str()).collect();
    writeln!(f, "  nodes: [{}]", nodes.join(", "))
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Article KG:")?;
        let edges: Vec<String> = self
            .article
            .graph
            .edges()
            .map(|(source, target, edge)| format!("({}, {}, {})", source.text, target.text, edge.relation))
            .collect();
        writeln!(f, "  edges: [{}]", edges.join(", "))?;
        write_nodes(f, &self.article.graph)?;

        writeln!(f, "Candidate KG:")?;
        write_nodes(f, &self.candidate.graph)?;

        writeln!(f, "\nSentences from Article KG:")?;
        for sentence in &self.article.sentences {
            writeln!(f, "{}", sentence)?;
        }

        writeln!(f, "\nSentences from Candidate KG:")?;
        for sentence in &self.candidate.sentences {
            writeln!(f, "{}", sentence)?;
        }

        if self.has_conflicts() {
            writeln!(f, "\nRelation conflicts:")?;
            for conflict in self.article.graph.conflicts().iter().chain(self.candidate.graph.conflicts()) {
                writeln!(f, "{}", conflict)?;
            }
        }

        write!(f, "\n{}", self.verdict)
    }
}

// =============================================================================
// Tests
// =============================================================================
