//! Encoder: [`OrderedMap`] → JSON object text.
//!
//! Objects are written in their key order, recursively. `serde_json`'s writer
//! escapes only what the JSON grammar requires, so `<`, `>` and `&` pass through
//! untouched.
//!
//! # Number formatting
//!
//! Every number is an `f64` in the tree. Whole numbers whose magnitude is below
//! 2^53 (the range where `f64` is exact) are written as integers, so `1` stays
//! `1` rather than becoming `1.0`. Non-finite numbers have no JSON spelling and
//! fail with [`JsonsError::Serialization`].

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{JsonsError, Result};
use crate::ordered::OrderedMap;
use crate::types::Value;

/// Largest magnitude (exclusive) at which every whole `f64` is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Encode an [`OrderedMap`] as compact JSON.
///
/// # Examples
///
/// ```
/// use jsons_core::{decode, encode};
///
/// let map = decode(r#"{"z":1,"a":"<b>"}"#).unwrap();
/// assert_eq!(encode(&map).unwrap(), br#"{"z":1,"a":"<b>"}"#);
/// ```
pub fn encode(map: &OrderedMap) -> Result<Vec<u8>> {
    serde_json::to_vec(map).map_err(serialization)
}

/// Encode an [`OrderedMap`] as indented JSON, using `indent` once per
/// nesting level.
pub fn encode_pretty(map: &OrderedMap, indent: &str) -> Result<Vec<u8>> {
    encode_pretty_with_prefix(map, "", indent)
}

/// Like [`encode_pretty`], but every line after the first starts with
/// `prefix`.
///
/// ```
/// use jsons_core::{decode, encode_pretty_with_prefix};
///
/// let map = decode(r#"{"a":1}"#).unwrap();
/// let out = encode_pretty_with_prefix(&map, "// ", "  ").unwrap();
/// assert_eq!(out, b"{\n//   \"a\": 1\n// }");
/// ```
pub fn encode_pretty_with_prefix(map: &OrderedMap, prefix: &str, indent: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    map.serialize(&mut ser).map_err(serialization)?;
    if prefix.is_empty() {
        return Ok(out);
    }
    // Newlines inside strings are escaped, so every raw one is a line break.
    let breaks = out.iter().filter(|&&b| b == b'\n').count();
    let mut prefixed = Vec::with_capacity(out.len() + breaks * prefix.len());
    for byte in out {
        prefixed.push(byte);
        if byte == b'\n' {
            prefixed.extend_from_slice(prefix.as_bytes());
        }
    }
    Ok(prefixed)
}

fn serialization(err: serde_json::Error) -> JsonsError {
    JsonsError::Serialization(err.to_string())
}

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if !n.is_finite() {
        return Err(S::Error::custom(format!("number {n} cannot be represented in JSON")));
    }
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        // Also folds -0 into 0.
        return serializer.serialize_i64(n as i64);
    }
    serializer.serialize_f64(n)
}
