// factcore/src/nli/mod.rs
//
// Natural-language-inference scoring of a raw text pair.
// Uses `tract-onnx` for pure-Rust ONNX inference (WASM-compatible).
//
// Supported models:
// - BartLargeMnli (facebook/bart-large-mnli) - default
// - RobertaLargeMnli (FacebookAI/roberta-large-mnli)
// - DebertaV3BaseMnli (MoritzLaurer/DeBERTa-v3-base-mnli-fever-anli)

pub mod config;
pub mod model;
pub mod tokenize;

pub use config::{NliConfig, NliModel, DEFAULT_SEPARATOR};
pub use model::OnnxNliClassifier;
pub use tokenize::{NliTokenizer, TokenizedInput, TokenizerError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NLI errors
#[derive(Debug, thiserror::Error)]
pub enum NliError {
    #[error("Model load failed: {0}")]
    LoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Classifier returned no result")]
    EmptyResult,

    #[error("Unknown NLI label: {0:?}")]
    UnknownLabel(String),

    #[error("Score {0} outside [0, 1]")]
    InvalidScore(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The three MNLI classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NliLabel {
    Entailment,
    Neutral,
    Contradiction,
}

impl NliLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entailment => "entailment",
            Self::Neutral => "neutral",
            Self::Contradiction => "contradiction",
        }
    }
}

impl fmt::Display for NliLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NliLabel {
    type Err = NliError;

    /// Case-insensitive; accepts "CONTRADICTION" as emitted by some id2label maps
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entailment" => Ok(Self::Entailment),
            "neutral" => Ok(Self::Neutral),
            "contradiction" => Ok(Self::Contradiction),
            _ => Err(NliError::UnknownLabel(s.to_string())),
        }
    }
}

/// Raw classifier output at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: String,
    pub score: f32,
}

/// Validated result of one scoring call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContradictionVerdict {
    pub label: NliLabel,
    pub confidence: f32,
}

impl ContradictionVerdict {
    /// Validate a raw output: known label, finite score in [0, 1]
    pub fn from_output(output: &ClassifierOutput) -> Result<Self, NliError> {
        let label = output.label.parse()?;
        if !(0.0..=1.0).contains(&output.score) {
            return Err(NliError::InvalidScore(output.score));
        }
        Ok(Self {
            label,
            confidence: output.score,
        })
    }

    pub fn is_contradiction(&self) -> bool {
        self.label == NliLabel::Contradiction
    }
}

impl fmt::Display for ContradictionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label: {}, Confidence: {}", self.label, self.confidence)
    }
}

/// A text-classification model over a single joined input.
///
/// Returns every label with its score, highest first.
pub trait NliClassifier {
    fn classify(&self, input: &str) -> Result<Vec<ClassifierOutput>, NliError>;

    fn model_id(&self) -> &str;
}

/// Scores a premise/hypothesis pair with an injected classifier
pub struct ContradictionScorer {
    classifier: Box<dyn NliClassifier>,
    separator: String,
}

impl ContradictionScorer {
    pub fn new(classifier: Box<dyn NliClassifier>) -> Self {
        Self {
            classifier,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn model_id(&self) -> &str {
        self.classifier.model_id()
    }

    /// "{premise} {separator} {hypothesis}"
    pub fn format_pair(&self, premise: &str, hypothesis: &str) -> String {
        format!("{} {} {}", premise, self.separator, hypothesis)
    }

    /// Classify the pair and return the top label
    pub fn check(&self, premise: &str, hypothesis: &str) -> Result<ContradictionVerdict, NliError> {
        let input = self.format_pair(premise, hypothesis);
        let outputs = self.classifier.classify(&input)?;
        let top = outputs.first().ok_or(NliError::EmptyResult)?;
        let verdict = ContradictionVerdict::from_output(top)?;

        tracing::info!(
            model = self.classifier.model_id(),
            label = %verdict.label,
            confidence = verdict.confidence,
            "scored pair"
        );

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays canned outputs and records every input it saw
    struct StubClassifier {
        outputs: Vec<ClassifierOutput>,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl StubClassifier {
        fn new(outputs: &[(&str, f32)]) -> (Self, Rc<RefCell<Vec<String>>>) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let stub = Self {
                outputs: outputs
                    .iter()
                    .map(|&(label, score)| ClassifierOutput {
                        label: label.to_string(),
                        score,
                    })
                    .collect(),
                seen: Rc::clone(&seen),
            };
            (stub, seen)
        }
    }

    impl NliClassifier for StubClassifier {
        fn classify(&self, input: &str) -> Result<Vec<ClassifierOutput>, NliError> {
            self.seen.borrow_mut().push(input.to_string());
            Ok(self.outputs.clone())
        }

        fn model_id(&self) -> &str {
            "stub"
        }
    }

    fn scorer(outputs: &[(&str, f32)]) -> (ContradictionScorer, Rc<RefCell<Vec<String>>>) {
        let (stub, seen) = StubClassifier::new(outputs);
        (ContradictionScorer::new(Box::new(stub)), seen)
    }

    // ==================== Requirement 1: pair formatting ====================

    #[test]
    fn test_format_pair_default_separator() {
        let (scorer, seen) = scorer(&[("contradiction", 0.9)]);
        scorer.check("A is B.", "A is C.").unwrap();

        assert_eq!(*seen.borrow(), vec!["A is B. [SEP] A is C."]);
    }

    #[test]
    fn test_format_pair_custom_separator() {
        let (stub, seen) = StubClassifier::new(&[("neutral", 0.4)]);
        let scorer = ContradictionScorer::new(Box::new(stub)).with_separator("</s></s>");

        scorer.check("p", "h").unwrap();
        assert_eq!(seen.borrow()[0], "p </s></s> h");
    }

    // ==================== Requirement 2: verdict ====================

    #[test]
    fn test_top_label_becomes_verdict() {
        let (scorer, _) = scorer(&[("contradiction", 0.97), ("neutral", 0.02), ("entailment", 0.01)]);
        let verdict = scorer.check("p", "h").unwrap();

        assert_eq!(verdict.label, NliLabel::Contradiction);
        assert!(verdict.is_contradiction());
        assert_eq!(verdict.confidence, 0.97);
        assert_eq!(verdict.to_string(), "Label: contradiction, Confidence: 0.97");
    }

    #[test]
    fn test_uppercase_label_accepted() {
        let (scorer, _) = scorer(&[("ENTAILMENT", 0.8)]);
        assert_eq!(scorer.check("p", "h").unwrap().label, NliLabel::Entailment);
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let (scorer, seen) = scorer(&[("neutral", 0.51), ("entailment", 0.49)]);

        let first = scorer.check("The sky is blue.", "The sky is green.").unwrap();
        let second = scorer.check("The sky is blue.", "The sky is green.").unwrap();

        assert_eq!(first, second);
        assert_eq!(seen.borrow().len(), 2);
    }

    // ==================== Requirement 3: boundary validation ====================

    #[test]
    fn test_empty_result_is_error() {
        let (scorer, _) = scorer(&[]);
        assert!(matches!(scorer.check("p", "h"), Err(NliError::EmptyResult)));
    }

    #[test]
    fn test_unknown_label_is_error() {
        let (scorer, _) = scorer(&[("LABEL_0", 0.9)]);
        match scorer.check("p", "h") {
            Err(NliError::UnknownLabel(label)) => assert_eq!(label, "LABEL_0"),
            other => panic!("expected UnknownLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_score_out_of_range_is_error() {
        for bad in [1.5, -0.1, f32::NAN] {
            let (scorer, _) = scorer(&[("contradiction", bad)]);
            assert!(
                matches!(scorer.check("p", "h"), Err(NliError::InvalidScore(_))),
                "score {} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_score_bounds_inclusive() {
        for ok in [0.0, 1.0] {
            let (scorer, _) = scorer(&[("neutral", ok)]);
            assert_eq!(scorer.check("p", "h").unwrap().confidence, ok);
        }
    }

    #[test]
    fn test_label_round_trip_names() {
        for label in [NliLabel::Entailment, NliLabel::Neutral, NliLabel::Contradiction] {
            assert_eq!(label.as_str().parse::<NliLabel>().unwrap(), label);
        }
        assert_eq!(serde_json::to_string(&NliLabel::Contradiction).unwrap(), "\"contradiction\"");
    }
}
