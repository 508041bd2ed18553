// factcore/src/nli/config.rs
//
// Configuration types for the NLI classifier

use serde::{Deserialize, Serialize};
use std::fmt;

use super::NliLabel;

/// Separator placed between premise and hypothesis
pub const DEFAULT_SEPARATOR: &str = "[SEP]";

/// Supported MNLI sequence-classification models (exported to ONNX).
///
/// Serialized by short name; deserialization also accepts the
/// HuggingFace model id (see `from_name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum NliModel {
    /// facebook/bart-large-mnli - 3 labels, ~1.6GB
    #[default]
    BartLargeMnli,

    /// FacebookAI/roberta-large-mnli - 3 labels, ~1.4GB
    RobertaLargeMnli,

    /// MoritzLaurer/DeBERTa-v3-base-mnli-fever-anli - 3 labels, ~740MB
    DebertaV3BaseMnli,
}

impl TryFrom<String> for NliModel {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::from_name(&name).ok_or_else(|| format!("unknown NLI model: {:?}", name))
    }
}

impl From<NliModel> for String {
    fn from(model: NliModel) -> Self {
        model.to_string()
    }
}

impl fmt::Display for NliModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BartLargeMnli => write!(f, "bart-large-mnli"),
            Self::RobertaLargeMnli => write!(f, "roberta-large-mnli"),
            Self::DebertaV3BaseMnli => write!(f, "deberta-v3-base-mnli"),
        }
    }
}

impl NliModel {
    /// Resolve a short model name ("bart-large-mnli", "deberta-v3-base")
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bart-large-mnli" | "facebook/bart-large-mnli" => Some(Self::BartLargeMnli),
            "roberta-large-mnli" | "FacebookAI/roberta-large-mnli" => Some(Self::RobertaLargeMnli),
            "deberta-v3-base-mnli" | "deberta-v3-base" | "MoritzLaurer/DeBERTa-v3-base-mnli-fever-anli" => {
                Some(Self::DebertaV3BaseMnli)
            }
            _ => None,
        }
    }

    /// Logit order of the classification head (the model's id2label)
    pub fn labels(&self) -> &'static [NliLabel] {
        match self {
            Self::BartLargeMnli | Self::RobertaLargeMnli => {
                &[NliLabel::Contradiction, NliLabel::Neutral, NliLabel::Entailment]
            }
            Self::DebertaV3BaseMnli => &[NliLabel::Entailment, NliLabel::Neutral, NliLabel::Contradiction],
        }
    }

    /// Maximum sequence length in tokens
    pub fn max_length(&self) -> usize {
        match self {
            Self::BartLargeMnli => 1024,
            Self::RobertaLargeMnli => 512,
            Self::DebertaV3BaseMnli => 512,
        }
    }

    /// Whether the ONNX graph takes a `token_type_ids` input
    pub fn uses_token_type_ids(&self) -> bool {
        matches!(self, Self::DebertaV3BaseMnli)
    }

    /// Get HuggingFace model ID
    pub fn hf_model_id(&self) -> &'static str {
        match self {
            Self::BartLargeMnli => "facebook/bart-large-mnli",
            Self::RobertaLargeMnli => "FacebookAI/roberta-large-mnli",
            Self::DebertaV3BaseMnli => "MoritzLaurer/DeBERTa-v3-base-mnli-fever-anli",
        }
    }
}

/// NLI scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NliConfig {
    /// Which model the ONNX file holds
    pub model: NliModel,

    /// Joins premise and hypothesis: "{premise} {separator} {hypothesis}"
    pub separator: String,

    /// Token limit override (None = model maximum)
    pub max_length: Option<usize>,
}

impl Default for NliConfig {
    fn default() -> Self {
        Self {
            model: NliModel::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            max_length: None,
        }
    }
}

impl NliConfig {
    pub fn for_model(model: NliModel) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    /// Builder: set separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Builder: cap the token length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Effective token limit, never above the model maximum
    pub fn effective_max_length(&self) -> usize {
        let limit = self.model.max_length();
        self.max_length.map_or(limit, |len| len.min(limit))
    }
}
