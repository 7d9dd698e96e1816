//! Form field adapter backed by a JS object.

use js_sys::Function;
use lexfield_core::{DocumentState, FieldHost};
use wasm_bindgen::prelude::*;

use crate::engine::{describe, method};
use crate::{state_from_js, state_to_js};

/// Wraps a host form field object exposing `getValue()`, `setValue(value)`
/// and optionally `getInitialValue()`.
///
/// `null` and `undefined` read as "no value".
pub struct JsHost {
    target: JsValue,
    get_value: Function,
    set_value: Function,
    get_initial_value: Option<Function>,
}

impl JsHost {
    pub fn new(target: JsValue) -> Result<Self, JsError> {
        Ok(Self {
            get_value: method(&target, "getValue")?,
            set_value: method(&target, "setValue")?,
            get_initial_value: method(&target, "getInitialValue").ok(),
            target,
        })
    }

    fn read(&self, getter: &Function) -> Option<DocumentState> {
        let value = getter
            .call0(&self.target)
            .map_err(|e| tracing::error!(error = %describe(&e), "host getter threw"))
            .ok()?;
        if value.is_null() || value.is_undefined() {
            return None;
        }
        state_from_js(value)
            .map_err(|_| tracing::warn!("host value is not a serialized editor state"))
            .ok()
    }
}

impl FieldHost for JsHost {
    fn value(&self) -> Option<DocumentState> {
        self.read(&self.get_value)
    }

    fn initial_value(&self) -> Option<DocumentState> {
        self.get_initial_value.as_ref().and_then(|f| self.read(f))
    }

    fn set_value(&mut self, value: DocumentState) {
        let Ok(js) = state_to_js(&value) else {
            tracing::error!("could not convert field value for the host");
            return;
        };
        if let Err(e) = self.set_value.call1(&self.target, &js) {
            tracing::error!(error = %describe(&e), "host setValue threw");
        }
    }
}
