//! Pipeline configuration
//!
//! Loaded from JSON (`factcheck.json`); every field is optional and falls
//! back to the defaults below.
//!
//! ```json
//! {
//!   "annotations": "fixtures/demo_annotations.json",
//!   "model_path": "models/bart-large-mnli/model.onnx",
//!   "tokenizer_path": "models/bart-large-mnli/tokenizer.json",
//!   "nli": { "model": "bart-large-mnli", "separator": "[SEP]" },
//!   "candidate_policy": "ranked"
//! }
//! ```

use crate::graph::CandidatePolicy;
use crate::nli::NliConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file the binary looks for in the working directory
pub const CONFIG_FILE: &str = "factcheck.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// spaCy `Doc.to_json()` corpus served by the annotator
    pub annotations: PathBuf,

    /// ONNX export of the NLI model
    pub model_path: PathBuf,

    /// HuggingFace tokenizer.json matching the model
    pub tokenizer_path: PathBuf,

    pub nli: NliConfig,

    pub candidate_policy: CandidatePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            annotations: PathBuf::from("fixtures/demo_annotations.json"),
            model_path: PathBuf::from("models/bart-large-mnli/model.onnx"),
            tokenizer_path: PathBuf::from("models/bart-large-mnli/tokenizer.json"),
            nli: NliConfig::default(),
            candidate_policy: CandidatePolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Like `load`, but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nli.separator.trim().is_empty() {
            return Err(ConfigError::Invalid("nli.separator must not be blank".to_string()));
        }
        if self.nli.max_length == Some(0) {
            return Err(ConfigError::Invalid("nli.max_length must be positive".to_string()));
        }
        Ok(())
    }
}
