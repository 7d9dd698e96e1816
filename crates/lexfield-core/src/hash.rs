//! Content hashing for serialized editor states.
//!
//! Hashes are used to detect no-op value changes without deep equality. The
//! scheme must agree byte for byte with the JS side of the field, so the
//! canonical form mirrors `JSON.stringify` over key-sorted objects and the
//! hash runs over UTF-16 code units.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::state::DocumentState;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a fingerprint of a document state.
///
/// Collisions are possible; this is a change-detection hint, not an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContentHash(u32);

impl ContentHash {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u32::from_str_radix(s, 16).map(Self)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

impl TryFrom<String> for ContentHash {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Hash a string directly, over its UTF-16 code units.
pub fn hash_str(s: &str) -> ContentHash {
    let mut acc = FNV_OFFSET_BASIS;
    for unit in s.encode_utf16() {
        acc ^= u32::from(unit);
        acc = acc.wrapping_mul(FNV_PRIME);
    }
    ContentHash(acc)
}

/// Hash an arbitrary JSON value through its canonical form.
pub fn hash_value(value: &Value) -> ContentHash {
    hash_str(&canonical_json(value))
}

/// Hash a document state through its canonical form.
pub fn hash_state(state: &DocumentState) -> ContentHash {
    hash_value(state.as_value())
}

/// Serialize a value compactly with every object's keys sorted.
///
/// Keys sort by UTF-16 code unit, arrays keep their order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

// Integral floats print without a fraction, matching JS number formatting.
fn write_number(n: &Number, out: &mut String) {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                out.push('0');
            } else {
                let _ = write!(out, "{:.0}", f);
            }
        }
        _ => {
            let _ = write!(out, "{}", n);
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_hash_str_known_values() {
        assert_eq!(hash_str("").to_string(), "811c9dc5");
        assert_eq!(hash_str("a").to_string(), "e40c292c");
        assert_eq!(hash_str("hello").to_string(), "4f9f2cab");
    }

    #[test]
    fn test_hash_str_uses_utf16_units() {
        // Non-BMP chars contribute two surrogate units.
        assert_eq!(hash_str("😀").to_string(), "cb31c4b8");
        assert_eq!(hash_str("é").to_string(), "6c0b6c44");
    }

    #[test]
    fn test_hash_not_zero_padded() {
        let hash = ContentHash::from_raw(0x0000_0abc);
        assert_eq!(hash.to_string(), "abc");
        assert_eq!("abc".parse::<ContentHash>().unwrap(), hash);
    }

    #[test]
    fn test_key_order_independent() {
        let a = json!({ "value": "1", "relationTo": "media" });
        let b = json!({ "relationTo": "media", "value": "1" });

        assert_eq!(hash_value(&a), hash_value(&b));
        assert_eq!(hash_value(&a).to_string(), "47b00926");
    }

    #[test]
    fn test_array_order_matters() {
        let a = json!({ "children": [1, 2] });
        let b = json!({ "children": [2, 1] });
        assert_ne!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn test_canonical_nested() {
        let value = json!({ "b": null, "a": [3, { "d": 1, "c": 2 }] });
        insta::assert_snapshot!(canonical_json(&value), @r#"{"a":[3,{"c":2,"d":1}],"b":null}"#);
        assert_eq!(hash_value(&value).to_string(), "63590230");
    }

    #[test]
    fn test_canonical_numbers() {
        let value = json!({ "z": -0.0, "x": 1.5, "y": 2.0 });
        insta::assert_snapshot!(canonical_json(&value), @r#"{"x":1.5,"y":2,"z":0}"#);
    }

    #[test]
    fn test_canonical_escapes() {
        let value = json!({ "text": "line\n\"quoted\"\u{1}" });
        assert_eq!(
            canonical_json(&value),
            r#"{"text":"line\n\"quoted\"\u0001"}"#
        );
    }

    #[test]
    fn test_root_state_hash() {
        let state = DocumentState::from(json!({
            "root": {
                "children": [],
                "direction": "ltr",
                "format": "",
                "indent": 0,
                "type": "root",
                "version": 1
            }
        }));
        assert_eq!(hash_state(&state).to_string(), "a6b01855");
        assert_eq!(hash_state(&state), hash_str(&canonical_json(state.as_value())));
    }

    #[test]
    fn test_hash_serde_as_hex_string() {
        let hash = hash_str("hello");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, r#""4f9f2cab""#);
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
