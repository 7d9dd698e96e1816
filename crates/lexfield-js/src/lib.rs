//! WASM bindings for the lexfield rich-text field synchronizer.
//!
//! The host supplies two plain JS objects: an editor engine adapter and a
//! form field adapter. `JsEditorField` drives the sync state machine between
//! them; the host calls back into it from its own event loop.

mod engine;
mod field;
mod host;

pub use engine::*;
pub use field::*;
pub use host::*;

use lexfield_core::DocumentState;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::prelude::*;

/// Install the panic hook and route tracing output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let console_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );
    let reg = Registry::default().with(wasm_layer);
    let _ = tracing::subscriber::set_global_default(reg);
}

/// Hash a serialized editor state.
///
/// Strings are hashed as-is, without canonicalisation; objects are hashed
/// through their canonical JSON form. Objects are read the way `JSON.stringify`
/// reads them, so `undefined` properties are dropped and hash like absent keys.
#[wasm_bindgen(js_name = hashSerializedState)]
pub fn hash_serialized_state(value: JsValue) -> Result<String, JsError> {
    if let Some(text) = value.as_string() {
        return Ok(lexfield_core::hash_str(&text).to_string());
    }
    let state = state_from_js(value)?;
    Ok(lexfield_core::hash_state(&state).to_string())
}

/// Whether a serialized state holds any user content.
#[wasm_bindgen(js_name = hasText)]
pub fn has_text(value: JsValue) -> bool {
    state_from_js(value).is_ok_and(|state| state.has_text())
}

/// A serialized state whose root holds one empty paragraph.
#[wasm_bindgen(js_name = createEmptyEditorState)]
pub fn create_empty_editor_state() -> Result<JsValue, JsError> {
    state_to_js(&DocumentState::empty())
}

/// Decode a JS value with `JSON.stringify` semantics: `undefined` and function
/// properties are dropped, `toJSON` is honoured.
pub(crate) fn state_from_js(value: JsValue) -> Result<DocumentState, JsError> {
    let json = js_sys::JSON::stringify(&value)
        .ok()
        .and_then(|s| s.as_string())
        .ok_or_else(|| JsError::new("Invalid editor state: not JSON-serializable"))?;
    serde_json::from_str(&json).map_err(|e| JsError::new(&format!("Invalid editor state: {}", e)))
}

pub(crate) fn state_to_js(state: &DocumentState) -> Result<JsValue, JsError> {
    use serde::Serialize;

    state
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
