//! Post-merge rules over the arrays of a tree.
//!
//! Three passes run over a merged tree:
//!
//! 1. **Sort**: every array is stably sorted by the numeric value of its
//!    elements' order field. The first `order_by` field present with a
//!    non-null value decides; anything that is not a number, or no field at
//!    all, sorts as `0`.
//! 2. **Merge by tag**: within each array, an object element absorbs every
//!    later object element that shares at least one tag with it, using the
//!    deep merge from [`crate::merge`]. Absorbed elements are dropped, so the
//!    first element of a tag group keeps its position.
//! 3. **Helper removal**: keys configured with `remove` are deleted from every
//!    object at every depth.
//!
//! An array is sorted and tag-merged before its surviving elements are
//! visited, so arrays that grew by concatenation during a tag merge get the
//! same treatment. Tag merging only ever compares siblings in one array.

use crate::error::Result;
use crate::merge::merge_into;
use crate::ordered::OrderedMap;
use crate::types::Value;

/// A field the rules look up in array elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: String,
    /// Delete this field from the output once the rules have run.
    pub remove: bool,
}

impl FieldDescriptor {
    /// A field that stays in the output.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            remove: false,
        }
    }

    /// A helper field, deleted from the output after the rules have run.
    pub fn helper(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            remove: true,
        }
    }
}

/// A reusable rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    pub order_by: Vec<FieldDescriptor>,
    pub merge_by: Vec<FieldDescriptor>,
    pub type_override: bool,
}

impl Rules {
    pub fn is_empty(&self) -> bool {
        self.order_by.is_empty() && self.merge_by.is_empty()
    }

    pub fn apply(&self, tree: &mut OrderedMap) -> Result<()> {
        apply_rules(tree, &self.order_by, &self.merge_by, self.type_override)
    }
}

/// Run the sort, merge-by-tag and helper-removal passes over `tree`.
///
/// Does nothing when both descriptor lists are empty. A type conflict during
/// a tag merge aborts with the dotted path of the conflicting field.
///
/// # Examples
///
/// ```
/// use jsons_core::{apply_rules, decode, encode, FieldDescriptor};
///
/// let mut tree = decode(
///     r#"{"a":[{"_tag":"x","v":1},{"_tag":"y","_order":-1,"v":2},{"_tag":"x","v":0}]}"#,
/// ).unwrap();
/// apply_rules(
///     &mut tree,
///     &[FieldDescriptor::helper("_order")],
///     &[FieldDescriptor::helper("_tag")],
///     false,
/// ).unwrap();
/// assert_eq!(encode(&tree).unwrap(), br#"{"a":[{"v":2},{"v":0}]}"#);
/// ```
pub fn apply_rules(
    tree: &mut OrderedMap,
    order_by: &[FieldDescriptor],
    merge_by: &[FieldDescriptor],
    type_override: bool,
) -> Result<()> {
    if order_by.is_empty() && merge_by.is_empty() {
        return Ok(());
    }
    let engine = Engine {
        order_by,
        merge_by,
        type_override,
    };
    engine.sort_merge_map(tree)?;
    if engine.has_helpers() {
        engine.strip_map(tree);
    }
    Ok(())
}

struct Engine<'a> {
    order_by: &'a [FieldDescriptor],
    merge_by: &'a [FieldDescriptor],
    type_override: bool,
}

impl Engine<'_> {
    fn sort_merge_map(&self, map: &mut OrderedMap) -> Result<()> {
        let keys: Vec<String> = map.keys().map(str::to_string).collect();
        for key in keys {
            if let Some(value) = map.get_mut(&key) {
                self.sort_merge_value(value).map_err(|e| e.within(&key))?;
            }
        }
        Ok(())
    }

    fn sort_merge_value(&self, value: &mut Value) -> Result<()> {
        match value {
            Value::Array(items) => {
                self.sort(items);
                self.merge_by_tags(items)?;
                for item in items.iter_mut() {
                    self.sort_merge_value(item)?;
                }
            }
            Value::Object(map) => self.sort_merge_map(map)?,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
        Ok(())
    }

    fn sort(&self, items: &mut Vec<Value>) {
        if self.order_by.is_empty() || items.len() < 2 {
            return;
        }
        let mut keyed: Vec<(f64, Value)> = items
            .drain(..)
            .map(|item| (self.order_of(&item), item))
            .collect();
        // `sort_by` is stable: equal orders keep their original index order.
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        items.extend(keyed.into_iter().map(|(_, item)| item));
    }

    fn order_of(&self, item: &Value) -> f64 {
        let Value::Object(map) = item else {
            return 0.0;
        };
        let order = self
            .order_by
            .iter()
            .find_map(|field| map.get(&field.key).filter(|v| !v.is_null()))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        if order.is_nan() {
            0.0
        } else {
            // Folds -0 into 0 so total_cmp treats them as equal.
            order + 0.0
        }
    }

    fn merge_by_tags(&self, items: &mut Vec<Value>) -> Result<()> {
        if self.merge_by.is_empty() {
            return Ok(());
        }
        let mut i = 0;
        while i < items.len() {
            let tags: Vec<String> = match &items[i] {
                Value::Object(map) => self.tags_of(map).into_iter().map(str::to_string).collect(),
                _ => Vec::new(),
            };
            if tags.is_empty() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < items.len() {
                let shares_tag = items[j]
                    .as_object()
                    .is_some_and(|map| self.tags_of(map).iter().any(|t| tags.iter().any(|own| own == t)));
                if !shares_tag {
                    j += 1;
                    continue;
                }
                if let (Value::Object(other), Some(head)) = (items.remove(j), items[i].as_object_mut()) {
                    merge_into(head, other, self.type_override)?;
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// One tag per `merge_by` field holding a non-empty string.
    fn tags_of<'m>(&self, map: &'m OrderedMap) -> Vec<&'m str> {
        self.merge_by
            .iter()
            .filter_map(|field| map.get(&field.key).and_then(Value::as_str))
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    fn has_helpers(&self) -> bool {
        self.descriptors().any(|field| field.remove)
    }

    fn is_helper(&self, key: &str) -> bool {
        self.descriptors().any(|field| field.remove && field.key == key)
    }

    fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.order_by.iter().chain(self.merge_by)
    }

    fn strip_map(&self, map: &mut OrderedMap) {
        map.retain(|key, value| {
            if self.is_helper(key) {
                return false;
            }
            self.strip_value(value);
            true
        });
    }

    fn strip_value(&self, value: &mut Value) {
        match value {
            Value::Object(map) => self.strip_map(map),
            Value::Array(items) => {
                for item in items {
                    self.strip_value(item);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }
}
