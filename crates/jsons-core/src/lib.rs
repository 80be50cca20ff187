//! # jsons-core
//!
//! Merge several JSON documents into one while keeping key order, then tidy
//! the result with declarative array rules.
//!
//! - Objects remember the order their keys were last introduced in, through
//!   decode, merge and encode. A duplicate key in the input moves to the
//!   position of its last occurrence.
//! - Merging is deep: objects merge key by key, arrays concatenate, scalars
//!   are overwritten, `null` never overwrites anything, and differently typed
//!   values are an error unless type override is on.
//! - Rules then sort arrays by an order field, merge array elements that share
//!   a tag, and strip helper fields that only existed to drive those rules.
//!
//! ## Quick start
//!
//! ```rust
//! use jsons_core::{Merger, Options};
//!
//! let base = br#"{"name":"base","plugins":[{"_tag":"log","level":"info"}]}"#;
//! let local = br#"{"name":"local","plugins":[{"_tag":"log","level":"debug"}]}"#;
//!
//! let merger = Merger::new(Options::new().with_merge_by_and_remove("_tag"));
//! let out = merger.merge([base.as_slice(), local.as_slice()]).unwrap();
//! assert_eq!(out, br#"{"name":"local","plugins":[{"level":"debug"}]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: `Value`, the recursive document tree, and its `Kind`
//! - [`ordered`]: `OrderedMap`, the order-preserving object
//! - [`decoder`]: JSON text → `OrderedMap`
//! - [`encoder`]: `OrderedMap` → JSON text
//! - [`merge`]: deep merge of trees
//! - [`rules`]: sort, merge-by-tag and helper-field removal over arrays
//! - [`options`] / [`merger`]: loader registry and the end-to-end pipeline
//! - [`error`]: error type shared by all of the above

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod merge;
pub mod merger;
pub mod options;
pub mod ordered;
pub mod rules;
pub mod types;

pub use decoder::decode;
pub use encoder::{encode, encode_pretty, encode_pretty_with_prefix};
pub use error::{JsonsError, Result};
pub use merge::{merge_all, merge_into};
pub use merger::{merge, Format, Input, Merger};
pub use options::Options;
pub use ordered::OrderedMap;
pub use rules::{apply_rules, FieldDescriptor, Rules};
pub use types::{Kind, Value};
