// factcore/src/nli/tokenize.rs
//
// Tokenization wrapper for sequence-classification models

use std::sync::Arc;
use tokenizers::Tokenizer;

/// Tokenizer wrapper for NLI models
pub struct NliTokenizer {
    tokenizer: Arc<Tokenizer>,
    max_length: usize,
}

/// Tokenized input ready for model inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

impl TokenizedInput {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Cut all three sequences to `max_length`
    pub fn truncate(&mut self, max_length: usize) {
        self.input_ids.truncate(max_length);
        self.attention_mask.truncate(max_length);
        self.token_type_ids.truncate(max_length);
    }
}

/// Tokenizer errors
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    #[error("Failed to load tokenizer: {0}")]
    LoadFailed(String),

    #[error("Failed to encode text: {0}")]
    EncodeFailed(String),
}

impl NliTokenizer {
    /// Create tokenizer from tokenizer.json contents
    pub fn from_json(tokenizer_json: &str, max_length: usize) -> Result<Self, TokenizerError> {
        let tokenizer = Tokenizer::from_bytes(tokenizer_json.as_bytes())
            .map_err(|e| TokenizerError::LoadFailed(e.to_string()))?;

        Ok(Self {
            tokenizer: Arc::new(tokenizer),
            max_length,
        })
    }

    /// Tokenize the joined premise/hypothesis string, with special tokens
    pub fn encode(&self, text: &str) -> Result<TokenizedInput, TokenizerError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| TokenizerError::EncodeFailed(e.to_string()))?;

        let mut input = TokenizedInput {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding.get_attention_mask().iter().map(|&m| m as i64).collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&id| id as i64).collect(),
        };

        if input.len() > self.max_length {
            tracing::debug!(tokens = input.len(), max = self.max_length, "truncating NLI input");
            input.truncate(self.max_length);
        }

        if input.is_empty() {
            return Err(TokenizerError::EncodeFailed("empty encoding".to_string()));
        }

        Ok(input)
    }
}
