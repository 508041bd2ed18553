//! Browser-side checks for the JS bindings (`wasm-pack test --headless --firefox`)

#![cfg(target_arch = "wasm32")]

use factcore::{GraphCortex, NliCortex};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const BIKEBOX: &str = include_str!("../fixtures/bikebox.json");

#[wasm_bindgen_test]
fn extract_graph_returns_object() {
    let cortex = GraphCortex::new();
    let value = cortex.js_extract_graph(BIKEBOX).unwrap();

    let graph: serde_json::Value = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(graph["sentences"][0], "BikeBox be storage.");
    assert_eq!(graph["nodes"][0]["label"], "ORG");
}

#[wasm_bindgen_test]
fn extract_graph_rejects_bad_json() {
    let cortex = GraphCortex::new();
    let err = cortex.js_extract_graph("{").unwrap_err();
    assert!(err.as_string().unwrap().starts_with("Extract failed"));
}

#[wasm_bindgen_test]
fn set_policy_accepts_known_names() {
    let mut cortex = GraphCortex::new();
    assert!(cortex.js_set_policy(JsValue::from_str("scan_order")).is_ok());
    assert!(cortex.js_set_policy(JsValue::from_str("random")).is_err());
}

#[wasm_bindgen_test]
fn check_without_model_fails() {
    let cortex = NliCortex::new();
    assert!(!cortex.is_ready());
    assert!(cortex.js_check("p", "h").is_err());
}

