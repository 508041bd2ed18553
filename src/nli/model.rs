// factcore/src/nli/model.rs
//
// ONNX sequence-classification inference via tract

use crate::nli::config::NliConfig;
use crate::nli::tokenize::{NliTokenizer, TokenizedInput};
use crate::nli::{ClassifierOutput, NliClassifier, NliError};
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

/// Type alias for the tract typed model
type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Loaded MNLI model ready for inference
pub struct OnnxNliClassifier {
    model: Arc<TractModel>,
    tokenizer: NliTokenizer,
    config: NliConfig,
}

impl OnnxNliClassifier {
    /// Load model from ONNX bytes and tokenizer JSON
    pub fn from_bytes(
        model_bytes: &[u8],
        tokenizer_json: &str,
        config: NliConfig,
    ) -> Result<Self, NliError> {
        let start = instant::Instant::now();

        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(|e| NliError::LoadFailed(e.to_string()))?
            .into_optimized()
            .map_err(|e| NliError::LoadFailed(e.to_string()))?
            .into_runnable()
            .map_err(|e| NliError::LoadFailed(e.to_string()))?;

        let tokenizer = NliTokenizer::from_json(tokenizer_json, config.effective_max_length())?;

        tracing::info!(
            model = config.model.hf_model_id(),
            bytes = model_bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded NLI model"
        );

        Ok(Self {
            model: Arc::new(model),
            tokenizer,
            config,
        })
    }

    /// Load model.onnx and tokenizer.json from disk
    pub fn from_files(
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
        config: NliConfig,
    ) -> Result<Self, NliError> {
        let model_bytes = std::fs::read(model_path.as_ref())?;
        let tokenizer_json = std::fs::read_to_string(tokenizer_path.as_ref())?;
        Self::from_bytes(&model_bytes, &tokenizer_json, config)
    }

    /// Raw logits for one encoded input, one per label
    fn logits(&self, encoded: &TokenizedInput) -> Result<Vec<f32>, NliError> {
        let seq_len = encoded.len();

        let input_ids = build_input_tensor(&encoded.input_ids, seq_len)?;
        let attention_mask = build_input_tensor(&encoded.attention_mask, seq_len)?;

        let mut inputs: TVec<TValue> = tvec![input_ids.into(), attention_mask.into()];
        if self.config.model.uses_token_type_ids() {
            inputs.push(build_input_tensor(&encoded.token_type_ids, seq_len)?.into());
        }

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| NliError::InferenceFailed(e.to_string()))?;

        logits_from_outputs(&outputs)
    }
}

/// Sequence classification head: (batch_size, num_labels), batch of one
fn logits_from_outputs(outputs: &[TValue]) -> Result<Vec<f32>, NliError> {
    let output_tensor = outputs
        .first()
        .ok_or_else(|| NliError::Shape("model produced no outputs".to_string()))?;
    let shape = output_tensor.shape();
    if shape.len() != 2 || shape[0] != 1 {
        return Err(NliError::Shape(format!("expected logits of shape [1, num_labels], got {:?}", shape)));
    }

    let logits = output_tensor
        .as_slice::<f32>()
        .map_err(|e| NliError::Shape(e.to_string()))?;

    Ok(logits.to_vec())
}

impl NliClassifier for OnnxNliClassifier {
    fn classify(&self, input: &str) -> Result<Vec<ClassifierOutput>, NliError> {
        let encoded = self.tokenizer.encode(input)?;
        let logits = self.logits(&encoded)?;

        let labels = self.config.model.labels();
        if logits.len() != labels.len() {
            return Err(NliError::Shape(format!(
                "model returned {} logits, {} expects {}",
                logits.len(),
                self.config.model,
                labels.len()
            )));
        }

        Ok(rank_labels(&logits, labels.iter().map(|l| l.to_string())))
    }

    fn model_id(&self) -> &str {
        self.config.model.hf_model_id()
    }
}

/// Build a [1, seq_len] tensor from one sequence
fn build_input_tensor(data: &[i64], seq_len: usize) -> Result<Tensor, NliError> {
    Tensor::from_shape(&[1, seq_len], data).map_err(|e| NliError::Shape(e.to_string()))
}

/// Numerically stable softmax
pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Softmax the logits and pair them with labels, highest score first
pub(crate) fn rank_labels<I>(logits: &[f32], labels: I) -> Vec<ClassifierOutput>
where
    I: IntoIterator<Item = String>,
{
    let mut outputs: Vec<ClassifierOutput> = labels
        .into_iter()
        .zip(softmax(logits))
        .map(|(label, score)| ClassifierOutput { label, score })
        .collect();

    outputs.sort_by(|a, b| b.score.total_cmp(&a.score));
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nli::config::NliModel;
    use crate::nli::{ContradictionScorer, NliLabel};

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[2.0, 1.0, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probs = softmax(&[1000.0, 999.0, -1000.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[2] < 1e-6);
    }

    #[test]
    fn test_rank_labels_sorted_descending() {
        let labels = NliModel::BartLargeMnli.labels().iter().map(|l| l.to_string());
        let ranked = rank_labels(&[3.2, -0.4, -2.9], labels);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label, "contradiction");
        assert_eq!(ranked[1].label, "neutral");
        assert_eq!(ranked[2].label, "entailment");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_logits_from_outputs() {
        let tensor = Tensor::from_shape(&[1, 3], &[0.5f32, -1.0, 2.0]).unwrap();
        let outputs: TVec<TValue> = tvec![tensor.into()];
        let logits = logits_from_outputs(&outputs).unwrap();
        assert_eq!(logits, vec![0.5, -1.0, 2.0]);
    }

    #[test]
    fn test_no_outputs_is_shape_error() {
        assert!(matches!(logits_from_outputs(&[]), Err(NliError::Shape(_))));
    }

    #[test]
    fn test_batched_logits_rejected() {
        let tensor = Tensor::from_shape(&[2, 3], &[0.0f32; 6]).unwrap();
        let outputs: TVec<TValue> = tvec![tensor.into()];
        assert!(matches!(logits_from_outputs(&outputs), Err(NliError::Shape(_))));
    }

    #[test]
    fn test_missing_model_file() {
        let result = OnnxNliClassifier::from_files(
            "models/does-not-exist.onnx",
            "models/does-not-exist.json",
            NliConfig::default(),
        );
        assert!(matches!(result, Err(NliError::Io(_))));
    }

    #[test]
    fn test_garbage_model_bytes() {
        let result = OnnxNliClassifier::from_bytes(b"not an onnx graph", "{}", NliConfig::default());
        assert!(matches!(result, Err(NliError::LoadFailed(_))));
    }

    // Requires an ONNX export of facebook/bart-large-mnli, e.g.
    // `optimum-cli export onnx --model facebook/bart-large-mnli --task text-classification models/bart-large-mnli`
    #[test]
    #[ignore = "needs models/bart-large-mnli/{model.onnx,tokenizer.json}"]
    fn test_eiffel_tower_contradiction() {
        let classifier = OnnxNliClassifier::from_files(
            "models/bart-large-mnli/model.onnx",
            "models/bart-large-mnli/tokenizer.json",
            NliConfig::default(),
        )
        .unwrap();
        let scorer = ContradictionScorer::new(Box::new(classifier));

        let verdict = scorer
            .check(
                "The Eiffel Tower is in Tianducheng, China.",
                "The Eiffel Tower is located in Paris.",
            )
            .unwrap();

        assert_eq!(verdict.label, NliLabel::Contradiction);
        assert!(verdict.confidence > 0.5, "confidence {}", verdict.confidence);
    }
}
