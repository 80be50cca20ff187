//! Error types for decoding, merging, rule application and encoding.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Kind;

/// Errors that can occur anywhere in jsons-core.
#[derive(Error, Debug)]
pub enum JsonsError {
    /// The input was not well-formed JSON (bad syntax, missing delimiter,
    /// trailing data).
    #[error("JSON syntax error: {0}")]
    Structural(String),

    /// The top-level payload parsed, but it is not an object.
    #[error("cannot decode {kind} into an object")]
    NotAnObject { kind: Kind },

    /// A merge (or tag-merge) found two values of different kinds under the
    /// same field while type override was disabled.
    ///
    /// `path` is the dotted field path, built while unwinding the recursion.
    #[error("field '{path}': type mismatch, expected {expected}, got {got}")]
    TypeMismatch {
        path: String,
        expected: Kind,
        got: Kind,
    },

    /// A value could not be rendered as JSON text.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading an input failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No loader is registered under the requested format name.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// A file's extension has no registered loader.
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("format {0} is already registered")]
    DuplicateFormat(String),

    #[error("extension {extension} is already registered to {format}")]
    DuplicateExtension { extension: String, format: String },

    /// Every registered loader rejected an input of unknown format.
    #[error("tried all formats but failed:\n  {}", errors.join("\n  "))]
    AllFormatsFailed { errors: Vec<String> },
}

impl JsonsError {
    /// Prefix a type-mismatch path with the enclosing field name.
    ///
    /// Other variants pass through untouched.
    pub(crate) fn within(self, key: &str) -> Self {
        match self {
            JsonsError::TypeMismatch {
                path,
                expected,
                got,
            } => {
                let path = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{key}.{path}")
                };
                JsonsError::TypeMismatch {
                    path,
                    expected,
                    got,
                }
            }
            other => other,
        }
    }
}

/// Convenience alias used throughout jsons-core.
pub type Result<T> = std::result::Result<T, JsonsError>;
