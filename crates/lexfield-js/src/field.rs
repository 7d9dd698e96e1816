//! JsEditorField - one synchronised rich-text field, exposed to JavaScript.

use lexfield_core::{
    EditorField, FieldConfig, FieldError, UpdateTags, ValidateOptions, validate_rich_text,
};
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::engine::JsEngine;
use crate::host::JsHost;
use crate::state_from_js;

/// Keeps a host-supplied engine and form field in sync.
///
/// Outcomes come back as strings: `"absent"`, `"echo"`, `"unchanged"`,
/// `"applied"` from the apply path; `"emit"`, `"awaitingBaseline"`,
/// `"matchesBaseline"`, `"duplicateEmit"` from the emit path, or `undefined`
/// when a change was queued for idle time.
#[wasm_bindgen]
pub struct JsEditorField {
    inner: EditorField<JsEngine, JsHost>,
}

#[wasm_bindgen]
impl JsEditorField {
    /// Create a field and apply the host's current value.
    ///
    /// `config` may be omitted; missing keys take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(engine: JsValue, host: JsValue, config: JsValue) -> Result<JsEditorField, JsError> {
        if engine.is_null() || engine.is_undefined() {
            return Err(FieldError::MissingContext {
                hook: "JsEditorField",
                provider: "an editor engine",
            }
            .into());
        }
        if host.is_null() || host.is_undefined() {
            return Err(FieldError::MissingContext {
                hook: "JsEditorField",
                provider: "a form field",
            }
            .into());
        }
        let config: FieldConfig = if config.is_null() || config.is_undefined() {
            FieldConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };
        let inner = EditorField::mount(JsEngine::new(engine)?, JsHost::new(host)?, config)?;
        Ok(Self { inner })
    }

    /// The form value changed.
    #[wasm_bindgen(js_name = onValue)]
    pub fn on_value(&mut self) -> Result<String, JsError> {
        Ok(self.inner.on_value()?.as_str().to_string())
    }

    /// The engine reported a change.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, state: JsValue, tags: Vec<String>) -> Result<Option<String>, JsError> {
        let state = state_from_js(state)?;
        let tags = UpdateTags::from_iter(tags);
        Ok(self
            .inner
            .on_change(state, &tags)
            .map(|d| d.as_str().to_string()))
    }

    /// A nested sub-editor reported a change.
    #[wasm_bindgen(js_name = onNestedChange)]
    pub fn on_nested_change(&mut self, tags: Vec<String>) -> Result<Option<String>, JsError> {
        let tags = UpdateTags::from_iter(tags);
        Ok(self
            .inner
            .on_nested_change(&tags)?
            .map(|d| d.as_str().to_string()))
    }

    /// Advance one scheduling round. Call once per microtask and animation frame.
    pub fn tick(&mut self) -> Result<(), JsError> {
        self.inner.tick()?;
        Ok(())
    }

    /// Flush the coalesced update from a `requestIdleCallback` handler.
    pub fn idle(&mut self) -> Option<String> {
        self.inner.idle().map(|d| d.as_str().to_string())
    }

    /// Flush the coalesced update if its deadline has passed.
    pub fn poll(&mut self) -> Option<String> {
        self.inner
            .poll(Instant::now())
            .map(|d| d.as_str().to_string())
    }

    pub fn remount(&mut self) -> Result<String, JsError> {
        Ok(self.inner.remount()?.as_str().to_string())
    }

    #[wasm_bindgen(getter, js_name = hasPendingUpdate)]
    pub fn has_pending_update(&self) -> bool {
        self.inner.has_pending_update()
    }

    #[wasm_bindgen(getter, js_name = lastAppliedHash)]
    pub fn last_applied_hash(&self) -> Option<String> {
        self.inner.sync_state().last_applied_hash.map(|h| h.to_string())
    }

    #[wasm_bindgen(getter, js_name = lastEmittedHash)]
    pub fn last_emitted_hash(&self) -> Option<String> {
        self.inner.sync_state().last_emitted_hash.map(|h| h.to_string())
    }

    #[wasm_bindgen(getter, js_name = normalizedIncomingHash)]
    pub fn normalized_incoming_hash(&self) -> Option<String> {
        self.inner
            .sync_state()
            .normalized_incoming_hash
            .map(|h| h.to_string())
    }

    #[wasm_bindgen(getter, js_name = hasNormalizedBaseline)]
    pub fn has_normalized_baseline(&self) -> bool {
        self.inner.sync_state().has_normalized_baseline
    }

    /// Mark an image URL as preloaded. Returns false if it already was.
    #[wasm_bindgen(js_name = markPreloaded)]
    pub fn mark_preloaded(&mut self, url: &str) -> bool {
        self.inner.preload_cache().mark_loaded(url)
    }

    #[wasm_bindgen(js_name = isPreloaded)]
    pub fn is_preloaded(&mut self, url: &str) -> bool {
        self.inner.preload_cache().contains(url)
    }
}

/// Validate a rich-text value. Returns `true` or the error message.
#[wasm_bindgen(js_name = validateRichText)]
pub fn validate_rich_text_js(value: JsValue, name: &str, required: bool) -> JsValue {
    let state = if value.is_null() || value.is_undefined() {
        None
    } else {
        state_from_js(value).ok()
    };
    let options = ValidateOptions::new(name).required(required);
    match validate_rich_text(state.as_ref(), &options) {
        Ok(()) => JsValue::TRUE,
        Err(e) => JsValue::from_str(&e.message),
    }
}
