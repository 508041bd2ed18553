//! WASM bindings
//!
//! - `GraphCortex` - spaCy doc JSON → knowledge graph, sentences, conflicts
//! - `NliCortex` - ONNX NLI model, premise/hypothesis → verdict
//!
//! ```javascript,ignore
//! import init, { GraphCortex, NliCortex } from 'factcore';
//!
//! await init();
//!
//! const graphs = new GraphCortex();
//! const kg = graphs.extractGraph(JSON.stringify(spacyDoc.to_json()));
//! console.log(kg.sentences);   // ["BikeBox be storage."]
//!
//! const nli = new NliCortex();
//! nli.loadModel(modelBytes, tokenizerJson);
//! console.log(nli.check(article, candidate)); // { label: "contradiction", confidence: 0.98 }
//! ```

use crate::annotate::{AnnotatorError, SpacyDoc};
use crate::graph::{CandidatePolicy, ExportedGraph, GraphBuilder, KnowledgeGraph, RelationExtractor};
use crate::nli::{ContradictionScorer, ContradictionVerdict, NliConfig, NliError, OnnxNliClassifier};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T, cortex: &str) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            web_sys::console::error_1(&format!("[{}] Serialization failed: {:?}", cortex, e).into());
            JsValue::NULL
        }
    }
}

// =============================================================================
// GraphCortex
// =============================================================================

#[wasm_bindgen]
pub struct GraphCortex {
    extractor: RelationExtractor,
    builder: GraphBuilder,
}

impl Default for GraphCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl GraphCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: RelationExtractor::new(),
            builder: GraphBuilder::new(),
        }
    }

    /// Set the object policy: "ranked" (default) or "scan_order"
    #[wasm_bindgen(js_name = setPolicy)]
    pub fn js_set_policy(&mut self, policy: JsValue) -> Result<(), JsValue> {
        let policy: CandidatePolicy = serde_wasm_bindgen::from_value(policy)
            .map_err(|e| JsValue::from_str(&format!("Invalid policy: {}", e)))?;
        self.set_policy(policy);
        Ok(())
    }

    /// spaCy `Doc.to_json()` string → { nodes, edges, sentences, conflicts }
    #[wasm_bindgen(js_name = extractGraph)]
    pub fn js_extract_graph(&self, doc_json: &str) -> Result<JsValue, JsValue> {
        let exported = self
            .extract_graph(doc_json)
            .map_err(|e| JsValue::from_str(&format!("Extract failed: {}", e)))?;
        Ok(to_js(&exported, "GraphCortex"))
    }

    /// Graphviz DOT for the doc's graph
    #[wasm_bindgen(js_name = toDot)]
    pub fn js_to_dot(&self, doc_json: &str) -> Result<String, JsValue> {
        self.graph_for(doc_json)
            .map(|graph| graph.to_dot())
            .map_err(|e| JsValue::from_str(&format!("Extract failed: {}", e)))
    }
}

impl GraphCortex {
    pub fn set_policy(&mut self, policy: CandidatePolicy) {
        self.extractor = RelationExtractor::with_policy(policy);
    }

    pub fn graph_for(&self, doc_json: &str) -> Result<KnowledgeGraph, AnnotatorError> {
        let annotation = SpacyDoc::from_json(doc_json)?.into_annotation()?;
        let triples = self.extractor.extract(&annotation.tokens);
        Ok(self.builder.build(&annotation.entities, &triples))
    }

    pub fn extract_graph(&self, doc_json: &str) -> Result<ExportedGraph, AnnotatorError> {
        self.graph_for(doc_json).map(|graph| graph.export())
    }
}

// =============================================================================
// NliCortex
// =============================================================================

#[wasm_bindgen]
pub struct NliCortex {
    scorer: Option<ContradictionScorer>,
    config: NliConfig,
}

impl Default for NliCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl NliCortex {
    /// Create with the default model configuration (bart-large-mnli)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            scorer: None,
            config: NliConfig::default(),
        }
    }

    /// Create with an `NliConfig` object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_js: JsValue) -> Result<NliCortex, JsValue> {
        let config: NliConfig = serde_wasm_bindgen::from_value(config_js)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        Ok(Self::from_config(config))
    }

    /// Load model from ONNX bytes
    ///
    /// # Arguments
    /// * `model_bytes` - ONNX model file contents
    /// * `tokenizer_json` - tokenizer.json contents
    #[wasm_bindgen(js_name = loadModel)]
    pub fn js_load_model(&mut self, model_bytes: &[u8], tokenizer_json: &str) -> Result<(), JsValue> {
        self.load_model(model_bytes, tokenizer_json)
            .map_err(|e| JsValue::from_str(&format!("Model load failed: {}", e)))
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.scorer.is_some()
    }

    /// HuggingFace id of the configured model
    #[wasm_bindgen(js_name = modelId)]
    pub fn model_id(&self) -> String {
        self.config.model.hf_model_id().to_string()
    }

    /// premise + hypothesis → { label, confidence }
    #[wasm_bindgen(js_name = check)]
    pub fn js_check(&self, premise: &str, hypothesis: &str) -> Result<JsValue, JsValue> {
        let verdict = self
            .check(premise, hypothesis)
            .map_err(|e| JsValue::from_str(&format!("Check failed: {}", e)))?;
        Ok(to_js(&verdict, "NliCortex"))
    }
}

impl NliCortex {
    pub fn from_config(config: NliConfig) -> Self {
        Self { scorer: None, config }
    }

    pub fn load_model(&mut self, model_bytes: &[u8], tokenizer_json: &str) -> Result<(), NliError> {
        let classifier = OnnxNliClassifier::from_bytes(model_bytes, tokenizer_json, self.config.clone())?;
        let scorer = ContradictionScorer::new(Box::new(classifier)).with_separator(self.config.separator.as_str());
        self.scorer = Some(scorer);
        Ok(())
    }

    pub fn check(&self, premise: &str, hypothesis: &str) -> Result<ContradictionVerdict, NliError> {
        let scorer = self
            .scorer
            .as_ref()
            .ok_or_else(|| NliError::LoadFailed("Model not loaded".to_string()))?;
        scorer.check(premise, hypothesis)
    }
}
