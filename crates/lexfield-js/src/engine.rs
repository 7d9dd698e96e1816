//! Engine adapter backed by a JS object.

use js_sys::{Function, Reflect};
use lexfield_core::{DocumentState, EditorEngine, FieldError, Result};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::{state_from_js, state_to_js};

/// Wraps a host-supplied engine object.
///
/// The object must provide:
/// - `parse(serialized) -> state` (throws on malformed input)
/// - `replaceState(state, tag)`
/// - `getCurrentState() -> state`
/// - `toSerializable(state) -> serialized`
pub struct JsEngine {
    target: JsValue,
    parse: Function,
    replace_state: Function,
    get_current_state: Function,
    to_serializable: Function,
}

impl JsEngine {
    pub fn new(target: JsValue) -> std::result::Result<Self, JsError> {
        Ok(Self {
            parse: method(&target, "parse")?,
            replace_state: method(&target, "replaceState")?,
            get_current_state: method(&target, "getCurrentState")?,
            to_serializable: method(&target, "toSerializable")?,
            target,
        })
    }
}

pub(crate) fn method(target: &JsValue, name: &str) -> std::result::Result<Function, JsError> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| JsError::new(&format!("Missing method `{}`", name)))
}

pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err))
}

impl EditorEngine for JsEngine {
    type State = JsValue;

    fn parse(&self, value: &DocumentState) -> Result<JsValue> {
        let serialized = state_to_js(value)
            .map_err(|_| FieldError::Parse("state is not representable in JS".into()))?;
        self.parse
            .call1(&self.target, &serialized)
            .map_err(|e| FieldError::Parse(describe(&e)))
    }

    fn replace_state(&mut self, state: JsValue, tag: &str) -> Result<()> {
        self.replace_state
            .call2(&self.target, &state, &JsValue::from_str(tag))
            .map(drop)
            .map_err(|e| FieldError::Parse(describe(&e)))
    }

    fn current_state(&self) -> Result<JsValue> {
        self.get_current_state
            .call0(&self.target)
            .map_err(|e| FieldError::Engine(format!("getCurrentState threw: {}", describe(&e))))
    }

    fn to_serializable(&self, state: &JsValue) -> Result<DocumentState> {
        let serialized = self
            .to_serializable
            .call1(&self.target, state)
            .map_err(|e| FieldError::Engine(format!("toSerializable threw: {}", describe(&e))))?;
        state_from_js(serialized).map_err(|_| {
            FieldError::Engine("toSerializable returned a non-JSON state".into())
        })
    }
}
