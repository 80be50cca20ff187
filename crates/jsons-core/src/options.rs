//! Merge configuration for [`crate::Merger`].

use crate::rules::{FieldDescriptor, Rules};

/// How a [`crate::Merger`] folds its inputs and renders the result.
///
/// Built with the `with_*` methods:
///
/// ```
/// use jsons_core::Options;
///
/// let options = Options::new()
///     .with_order_by_and_remove("_order")
///     .with_merge_by_and_remove("_tag")
///     .with_indent("  ");
/// assert_eq!(options.rules().order_by[0].key, "_order");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub order_by: Vec<FieldDescriptor>,
    pub merge_by: Vec<FieldDescriptor>,
    /// Let a value of a different kind replace the target instead of failing.
    pub type_override: bool,
    /// Pretty-print the output with this indent per level. Compact if `None`.
    pub indent: Option<String>,
    /// Start every pretty-printed line after the first with this string.
    /// Ignored for compact output.
    pub prefix: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort arrays by `key`, keeping the field in the output.
    pub fn with_order_by(mut self, key: impl Into<String>) -> Self {
        self.order_by.push(FieldDescriptor::new(key));
        self
    }

    /// Sort arrays by `key`, then delete the field everywhere.
    pub fn with_order_by_and_remove(mut self, key: impl Into<String>) -> Self {
        self.order_by.push(FieldDescriptor::helper(key));
        self
    }

    /// Merge array elements sharing a `key` tag, keeping the field.
    pub fn with_merge_by(mut self, key: impl Into<String>) -> Self {
        self.merge_by.push(FieldDescriptor::new(key));
        self
    }

    /// Merge array elements sharing a `key` tag, then delete the field
    /// everywhere.
    pub fn with_merge_by_and_remove(mut self, key: impl Into<String>) -> Self {
        self.merge_by.push(FieldDescriptor::helper(key));
        self
    }

    pub fn with_type_override(mut self, type_override: bool) -> Self {
        self.type_override = type_override;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The rule configuration these options describe.
    pub fn rules(&self) -> Rules {
        Rules {
            order_by: self.order_by.clone(),
            merge_by: self.merge_by.clone(),
            type_override: self.type_override,
        }
    }
}
