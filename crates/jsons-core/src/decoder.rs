//! Decoder: JSON object text → [`OrderedMap`].
//!
//! `serde_json` does the tokenizing; the `Deserialize` impls in this module
//! build the tree so that key order is captured exactly as it appears in the
//! text. Nested objects and arrays recurse through the same visitor, which
//! gives arbitrary nesting without a second parse pass.
//!
//! # Key design decisions
//!
//! - **Top-level classification first**: the first non-whitespace byte decides
//!   whether the payload is an object. Anything else that is still valid JSON
//!   is reported as [`JsonsError::NotAnObject`] with its [`Kind`]. Invalid
//!   JSON is always [`JsonsError::Structural`], whatever its first byte.
//! - **Duplicate keys relocate**: a repeated key drops its earlier position
//!   and value and is re-appended, so the last occurrence wins both the value
//!   and the place in the key order. `serde_json` hands every occurrence to the
//!   visitor.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::error::{JsonsError, Result};
use crate::ordered::OrderedMap;
use crate::types::{Kind, Value};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode JSON object text into an [`OrderedMap`].
///
/// Trailing whitespace is allowed; any other trailing data is a structural
/// error. A leading UTF-8 byte-order mark is skipped.
///
/// # Examples
///
/// ```
/// use jsons_core::decode;
///
/// let map = decode(r#"{"a":1,"b":2,"a":3}"#).unwrap();
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
/// ```
pub fn decode(input: impl AsRef<[u8]>) -> Result<OrderedMap> {
    let input = input.as_ref();
    let input = input.strip_prefix(BOM).unwrap_or(input);

    match first_token_kind(input)? {
        Kind::Object => {}
        kind => {
            // Still a structural error if the rest of the payload is malformed.
            serde_json::from_slice::<IgnoredAny>(input).map_err(structural)?;
            return Err(JsonsError::NotAnObject { kind });
        }
    }

    let mut de = serde_json::Deserializer::from_slice(input);
    let map = OrderedMap::deserialize(&mut de).map_err(structural)?;
    de.end().map_err(structural)?;
    Ok(map)
}

/// Classify the payload by its first structural token without parsing it.
fn first_token_kind(input: &[u8]) -> Result<Kind> {
    let first = input
        .iter()
        .copied()
        .find(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .ok_or_else(|| JsonsError::Structural("unexpected end of input".to_string()))?;
    match first {
        b'{' => Ok(Kind::Object),
        b'[' => Ok(Kind::Array),
        b'"' => Ok(Kind::String),
        b't' | b'f' => Ok(Kind::Bool),
        b'n' => Ok(Kind::Null),
        b'-' | b'0'..=b'9' => Ok(Kind::Number),
        other => Err(JsonsError::Structural(format!(
            "unexpected character '{}' at start of input",
            char::from(other).escape_default()
        ))),
    }
}

fn structural(err: serde_json::Error) -> JsonsError {
    JsonsError::Structural(err.to_string())
}

/// Drain a map access into an [`OrderedMap`], relocating duplicate keys to
/// the position of their last occurrence.
///
/// Entries are buffered and an earlier occurrence is blanked out when its key
/// repeats, so relocation costs O(1) per duplicate.
fn collect_entries<'de, A>(mut access: A) -> std::result::Result<OrderedMap, A::Error>
where
    A: MapAccess<'de>,
{
    let capacity = access.size_hint().unwrap_or(0);
    let mut entries: Vec<Option<(String, Value)>> = Vec::with_capacity(capacity);
    let mut last_seen: HashMap<String, usize> = HashMap::with_capacity(capacity);
    while let Some(key) = access.next_key::<String>()? {
        let value: Value = access.next_value()?;
        if let Some(earlier) = last_seen.insert(key.clone(), entries.len()) {
            entries[earlier] = None;
        }
        entries.push(Some((key, value)));
    }
    Ok(entries.into_iter().flatten().collect())
}

struct OrderedMapVisitor;

impl<'de> Visitor<'de> for OrderedMapVisitor {
    type Value = OrderedMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<OrderedMap, A::Error> {
        collect_entries(access)
    }
}

impl<'de> Deserialize<'de> for OrderedMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> std::result::Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> std::result::Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> std::result::Result<Value, E> {
        Ok(Value::Number(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Value, A::Error> {
        collect_entries(access).map(Value::Object)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}
