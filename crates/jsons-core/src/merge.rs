//! Deep merge of ordered trees.
//!
//! Per field, a source value is folded into the target value like this:
//!
//! | source            | target              | result                              |
//! |-------------------|---------------------|-------------------------------------|
//! | null              | anything            | target unchanged                    |
//! | anything          | absent / null       | source                              |
//! | kind differs      | kind differs        | error, or source with type override |
//! | array             | array               | target elements then source elements|
//! | object            | object              | recursive merge, new keys appended  |
//! | bool/number/string| same kind           | source                              |
//!
//! A failure anywhere aborts the merge. The error carries the dotted path of
//! the failing field, assembled while the recursion unwinds.

use crate::error::{JsonsError, Result};
use crate::ordered::OrderedMap;
use crate::types::Value;

/// Merge `source` into `target` in place.
///
/// Keys new to `target` are appended in `source`'s key order. A key that is
/// absent from `target` is introduced even when its source value is null.
///
/// # Examples
///
/// ```
/// use jsons_core::{decode, encode, merge_into};
///
/// let mut target = decode(r#"{"a":[1,2],"b":1}"#).unwrap();
/// merge_into(&mut target, decode(r#"{"a":[3],"b":null,"c":true}"#).unwrap(), false).unwrap();
/// assert_eq!(encode(&target).unwrap(), br#"{"a":[1,2,3],"b":1,"c":true}"#);
/// ```
pub fn merge_into(target: &mut OrderedMap, source: OrderedMap, type_override: bool) -> Result<()> {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(slot) => merge_field(slot, value, type_override).map_err(|e| e.within(&key))?,
            None => {
                target.set(key, value);
            }
        }
    }
    Ok(())
}

/// Fold every source into `target`, left to right. Later sources win.
pub fn merge_all<I>(target: &mut OrderedMap, sources: I, type_override: bool) -> Result<()>
where
    I: IntoIterator<Item = OrderedMap>,
{
    for source in sources {
        merge_into(target, source, type_override)?;
    }
    Ok(())
}

/// Merge one value into another. The error path is left empty here and
/// filled in by the enclosing [`merge_into`].
pub(crate) fn merge_field(target: &mut Value, source: Value, type_override: bool) -> Result<()> {
    if source.is_null() {
        return Ok(());
    }
    if target.is_null() {
        *target = source;
        return Ok(());
    }
    match (target, source) {
        (Value::Array(items), Value::Array(more)) => items.extend(more),
        (Value::Object(map), Value::Object(other)) => merge_into(map, other, type_override)?,
        (target, source) if target.kind() != source.kind() => {
            if !type_override {
                return Err(JsonsError::TypeMismatch {
                    path: String::new(),
                    expected: target.kind(),
                    got: source.kind(),
                });
            }
            *target = source;
        }
        (target, source) => *target = source,
    }
    Ok(())
}
