//! Serialized editor state as stored by the host.
//!
//! The schema belongs to the editor engine: a root node with `type: "root"`
//! and nested `children`, leaves carrying `type`, `text`, `format` and so on.
//! Synchronisation never branches on node type; only [`DocumentState::has_text`]
//! looks inside, for required-field validation.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::hash::{ContentHash, hash_state};

/// An immutable serialized document tree. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentState(Value);

impl DocumentState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A root holding one empty paragraph.
    ///
    /// The engine rejects a root with zero children, so this is how "no
    /// content" is represented.
    pub fn empty() -> Self {
        Self(json!({
            "root": {
                "type": "root",
                "version": 1,
                "direction": "ltr",
                "format": "",
                "indent": 0,
                "children": [{
                    "type": "paragraph",
                    "format": "",
                    "indent": 0,
                    "textFormat": 0,
                    "textStyle": "",
                    "version": 1,
                    "direction": "ltr",
                    "children": [{
                        "type": "text",
                        "text": "",
                        "format": 0,
                        "style": "",
                        "mode": "normal",
                        "detail": 0,
                        "version": 1
                    }]
                }]
            }
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn content_hash(&self) -> ContentHash {
        hash_state(self)
    }

    /// Top-level nodes under the root, if the state has a root at all.
    pub fn root_children(&self) -> Option<&[Value]> {
        self.0
            .get("root")?
            .get("children")?
            .as_array()
            .map(Vec::as_slice)
    }

    /// Whether the document holds any content worth saving.
    ///
    /// A single paragraph that is empty, or holds one empty text node, counts
    /// as no content. Any second root child counts as content.
    pub fn has_text(&self) -> bool {
        let Some(children) = self.root_children() else {
            return false;
        };

        match children {
            [] => false,
            [only] if node_type(only) == Some("paragraph") => {
                let Some(inline) = only.get("children").and_then(Value::as_array) else {
                    return false;
                };
                match inline.as_slice() {
                    [] => false,
                    [leaf] if node_type(leaf) == Some("text") => leaf
                        .get("text")
                        .and_then(Value::as_str)
                        .is_some_and(|text| !text.is_empty()),
                    _ => true,
                }
            }
            _ => true,
        }
    }
}

impl From<Value> for DocumentState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}
