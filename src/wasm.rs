use wasm_bindgen::prelude::*;

/// Render a JSON conversation to PDF bytes.
#[wasm_bindgen]
pub fn render_pdf(json: &str) -> Result<Vec<u8>, JsValue> {
    crate::render_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}
