//! Orchestration: turn inputs into trees, fold them, apply rules, encode.
//!
//! A [`Merger`] owns a registry of format loaders. Each loader has a name
//! ([`Format`]), a list of file extensions and a function turning raw bytes
//! into an [`OrderedMap`]. JSON is registered out of the box.
//!
//! Files are dispatched by extension. Byte buffers, readers and files without
//! an extension are offered to every loader in registration order; the first
//! one that decodes the payload wins.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::decoder::decode;
use crate::encoder::{encode, encode_pretty_with_prefix};
use crate::error::{JsonsError, Result};
use crate::merge::merge_into;
use crate::options::Options;
use crate::ordered::OrderedMap;
use crate::rules::apply_rules;

/// The name a loader is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Format(Cow<'static, str>);

impl Format {
    pub const JSON: Format = Format(Cow::Borrowed("json"));
    /// Not a loader: detect the format the way [`Merger::merge_to`] does.
    pub const AUTO: Format = Format(Cow::Borrowed("auto"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Format {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A document to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A file on disk, dispatched by its extension.
    File(PathBuf),
    /// Raw content of unknown format.
    Bytes(Vec<u8>),
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::File(path)
    }
}

impl From<&Path> for Input {
    fn from(path: &Path) -> Self {
        Input::File(path.to_path_buf())
    }
}

/// Strings name files, not content. Use [`Input::Bytes`] for content.
impl From<&str> for Input {
    fn from(path: &str) -> Self {
        Input::File(PathBuf::from(path))
    }
}

impl From<String> for Input {
    fn from(path: String) -> Self {
        Input::File(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl From<&[u8]> for Input {
    fn from(bytes: &[u8]) -> Self {
        Input::Bytes(bytes.to_vec())
    }
}

type LoadFn = Box<dyn Fn(&[u8]) -> Result<OrderedMap> + Send + Sync>;

struct Loader {
    format: Format,
    extensions: Vec<String>,
    load: LoadFn,
}

/// Merges documents of any registered format into one JSON object.
pub struct Merger {
    options: Options,
    loaders: Vec<Loader>,
    by_extension: HashMap<String, usize>,
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field("options", &self.options)
            .field(
                "formats",
                &self.loaders.iter().map(|l| l.format.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Merger {
    /// A merger with the JSON loader registered for `.json`.
    pub fn new(options: Options) -> Self {
        let mut merger = Self {
            options,
            loaders: Vec::new(),
            by_extension: HashMap::new(),
        };
        merger.loaders.push(Loader {
            format: Format::JSON,
            extensions: vec![".json".to_string()],
            load: Box::new(|bytes: &[u8]| decode(bytes)),
        });
        merger.by_extension.insert(".json".to_string(), 0);
        merger
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Register a loader for another format.
    ///
    /// Extensions are matched case-insensitively, with or without the
    /// leading dot. Fails without registering anything if the format name or
    /// any extension is already taken. `auto` is always taken.
    pub fn register_loader<F>(
        &mut self,
        format: impl Into<Format>,
        extensions: &[&str],
        load: F,
    ) -> Result<()>
    where
        F: Fn(&[u8]) -> Result<OrderedMap> + Send + Sync + 'static,
    {
        let format = format.into();
        if format == Format::AUTO || self.loaders.iter().any(|l| l.format == format) {
            return Err(JsonsError::DuplicateFormat(format.to_string()));
        }
        let extensions: Vec<String> = extensions.iter().map(|e| normalize_extension(e)).collect();
        for extension in &extensions {
            if let Some(&idx) = self.by_extension.get(extension) {
                return Err(JsonsError::DuplicateExtension {
                    extension: extension.clone(),
                    format: self.loaders[idx].format.to_string(),
                });
            }
        }

        debug!(%format, ?extensions, "registering loader");
        let idx = self.loaders.len();
        for extension in &extensions {
            self.by_extension.insert(extension.clone(), idx);
        }
        self.loaders.push(Loader {
            format,
            extensions,
            load: Box::new(load),
        });
        Ok(())
    }

    /// Extensions handled by the given formats, or by every registered
    /// format when `formats` is empty or names [`Format::AUTO`]. No
    /// duplicates, registration order.
    pub fn extensions(&self, formats: &[Format]) -> Result<Vec<String>> {
        let mut out: Vec<String> = Vec::new();
        let selected: Vec<&Loader> = if formats.is_empty() || formats.contains(&Format::AUTO) {
            self.loaders.iter().collect()
        } else {
            formats
                .iter()
                .map(|f| self.loader(f))
                .collect::<Result<_>>()?
        };
        for loader in selected {
            for extension in &loader.extensions {
                if !out.contains(extension) {
                    out.push(extension.clone());
                }
            }
        }
        Ok(out)
    }

    /// Merge every input and return the rule-processed, encoded result.
    pub fn merge<I>(&self, inputs: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: Into<Input>,
    {
        let mut target = OrderedMap::new();
        for input in inputs {
            self.merge_to(input, &mut target)?;
        }
        self.finish(target)
    }

    /// Like [`Merger::merge`], but every input is loaded as `format`.
    pub fn merge_as<I>(&self, format: &Format, inputs: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: Into<Input>,
    {
        let mut target = OrderedMap::new();
        for input in inputs {
            self.merge_to_as(format, input, &mut target)?;
        }
        self.finish(target)
    }

    /// Load one input and merge it into `target`.
    ///
    /// Neither applies the rules nor strips helper fields; call
    /// [`Merger::finish`] or [`crate::apply_rules`] once all inputs are in.
    pub fn merge_to(&self, input: impl Into<Input>, target: &mut OrderedMap) -> Result<()> {
        let source = match input.into() {
            Input::File(path) => self.load_file(&path)?,
            Input::Bytes(bytes) => self.load_any(&bytes)?,
        };
        merge_into(target, source, self.options.type_override)
    }

    /// Load one input with a specific loader and merge it into `target`.
    /// [`Format::AUTO`] falls back to [`Merger::merge_to`].
    pub fn merge_to_as(
        &self,
        format: &Format,
        input: impl Into<Input>,
        target: &mut OrderedMap,
    ) -> Result<()> {
        if *format == Format::AUTO {
            return self.merge_to(input, target);
        }
        let loader = self.loader(format)?;
        let bytes = match input.into() {
            Input::File(path) => read_file(&path)?,
            Input::Bytes(bytes) => bytes,
        };
        let source = (loader.load)(&bytes)?;
        merge_into(target, source, self.options.type_override)
    }

    /// Read `reader` to the end and merge its content as bytes of unknown
    /// format.
    pub fn merge_reader(&self, mut reader: impl Read, target: &mut OrderedMap) -> Result<()> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| JsonsError::Io {
                path: PathBuf::from("<reader>"),
                source,
            })?;
        self.merge_to(bytes, target)
    }

    /// Apply the configured rules to `target` and encode it.
    pub fn finish(&self, mut target: OrderedMap) -> Result<Vec<u8>> {
        trace!(keys = target.len(), "applying rules");
        apply_rules(
            &mut target,
            &self.options.order_by,
            &self.options.merge_by,
            self.options.type_override,
        )?;
        match &self.options.indent {
            Some(indent) => encode_pretty_with_prefix(
                &target,
                self.options.prefix.as_deref().unwrap_or_default(),
                indent,
            ),
            None => encode(&target),
        }
    }

    fn loader(&self, format: &Format) -> Result<&Loader> {
        self.loaders
            .iter()
            .find(|l| &l.format == format)
            .ok_or_else(|| JsonsError::UnknownFormat(format.to_string()))
    }

    fn load_file(&self, path: &Path) -> Result<OrderedMap> {
        let Some(extension) = path.extension() else {
            debug!(path = %path.display(), "no extension, trying every format");
            return self.load_any(&read_file(path)?);
        };
        let extension = normalize_extension(&extension.to_string_lossy());
        let idx = *self
            .by_extension
            .get(&extension)
            .ok_or(JsonsError::UnsupportedExtension(extension))?;
        let loader = &self.loaders[idx];
        debug!(path = %path.display(), format = %loader.format, "loading file");
        (loader.load)(&read_file(path)?)
    }

    fn load_any(&self, bytes: &[u8]) -> Result<OrderedMap> {
        let mut errors = Vec::with_capacity(self.loaders.len());
        for loader in &self.loaders {
            match (loader.load)(bytes) {
                Ok(map) => {
                    debug!(format = %loader.format, "content decoded");
                    return Ok(map);
                }
                Err(err) => {
                    trace!(format = %loader.format, %err, "format rejected content");
                    errors.push(format!("[{}] {}", loader.format, err));
                }
            }
        }
        Err(JsonsError::AllFormatsFailed { errors })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| JsonsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_extension(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Merge inputs with default options: JSON only, no rules, compact output.
///
/// # Examples
///
/// ```
/// let out = jsons_core::merge([
///     br#"{"a":1,"list":[1]}"#.as_slice(),
///     br#"{"b":2,"list":[2]}"#.as_slice(),
/// ])
/// .unwrap();
/// assert_eq!(out, br#"{"a":1,"list":[1,2],"b":2}"#);
/// ```
pub fn merge<I>(inputs: I) -> Result<Vec<u8>>
where
    I: IntoIterator,
    I::Item: Into<Input>,
{
    Merger::default().merge(inputs)
}
