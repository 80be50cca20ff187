//! `jsons` CLI: merge JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Merge two files to stdout
//! jsons base.json local.json
//!
//! # Merge stdin on top of a file, pretty-printed, into a file
//! cat override.json | jsons base.json - --indent 2 -o merged.json
//!
//! # Sort arrays by "_order" and merge elements sharing a "_tag",
//! # stripping both helper fields from the output
//! jsons --order-by-remove _order --merge-by-remove _tag conf.d/*.json
//!
//! # Show loader dispatch on stderr
//! jsons -v base.json local.json
//! ```

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use jsons_core::{FieldDescriptor, Format, Merger, Options, OrderedMap};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Input name that reads from stdin.
const STDIN: &str = "-";

#[derive(Parser, Debug)]
#[command(
    name = "jsons",
    version,
    about = "Merge JSON documents, keeping key order"
)]
struct Cli {
    /// Files to merge, in order. `-` reads from stdin
    #[arg(required = true, value_name = "INPUTS")]
    inputs: Vec<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Sort arrays by this numeric field (repeatable, first present wins)
    #[arg(long, value_name = "KEY")]
    order_by: Vec<String>,

    /// Like --order-by, then remove the field from the output
    #[arg(long, value_name = "KEY")]
    order_by_remove: Vec<String>,

    /// Merge array elements sharing a value in this field (repeatable)
    #[arg(long, value_name = "KEY")]
    merge_by: Vec<String>,

    /// Like --merge-by, then remove the field from the output
    #[arg(long, value_name = "KEY")]
    merge_by_remove: Vec<String>,

    /// Let values of a different type replace each other instead of failing
    #[arg(long)]
    type_override: bool,

    /// Pretty-print with this many spaces per level (0 keeps compact output)
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Start every pretty-printed line after the first with this string
    #[arg(long, value_name = "STR", requires = "indent")]
    prefix: Option<String>,

    /// Load every input with this format instead of detecting it
    #[arg(long)]
    format: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Build merge options. Descriptor precedence follows the order the
    /// flags were given in, across each flag and its `-remove` twin.
    fn options(&self, matches: &ArgMatches) -> Options {
        let mut options = Options::new().with_type_override(self.type_override);
        options.order_by = descriptors_in_order(matches, "order_by", "order_by_remove");
        options.merge_by = descriptors_in_order(matches, "merge_by", "merge_by_remove");
        if let Some(prefix) = &self.prefix {
            options = options.with_prefix(prefix.as_str());
        }
        match self.indent {
            Some(n) if n > 0 => options.with_indent(" ".repeat(n)),
            _ => options,
        }
    }
}

/// Merge the values of a keep flag and its removing twin by their position
/// on the command line.
fn descriptors_in_order(matches: &ArgMatches, keep: &str, strip: &str) -> Vec<FieldDescriptor> {
    let mut indexed: Vec<(usize, FieldDescriptor)> = Vec::new();
    for (id, remove) in [(keep, false), (strip, true)] {
        let (Some(indices), Some(keys)) = (matches.indices_of(id), matches.get_many::<String>(id))
        else {
            continue;
        };
        for (index, key) in indices.zip(keys) {
            indexed.push((
                index,
                FieldDescriptor {
                    key: key.clone(),
                    remove,
                },
            ));
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, field)| field).collect()
}

fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    init_tracing(cli.verbose);

    let merger = Merger::new(cli.options(&matches));
    let format = cli.format.clone().map(Format::from);
    debug!(inputs = cli.inputs.len(), ?format, "merging");

    let mut target = OrderedMap::new();
    for input in &cli.inputs {
        merge_input(&merger, format.as_ref(), input, &mut target)
            .with_context(|| format!("Failed to merge {}", display_name(input)))?;
    }
    let merged = merger.finish(target).context("Failed to apply rules")?;

    write_output(cli.output.as_deref(), &merged)
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "jsons_core=debug,jsons=debug",
        _ => "jsons_core=trace,jsons=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn merge_input(
    merger: &Merger,
    format: Option<&Format>,
    input: &str,
    target: &mut OrderedMap,
) -> Result<()> {
    match (input, format) {
        (STDIN, None) => merger.merge_reader(io::stdin().lock(), target)?,
        (STDIN, Some(format)) => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read from stdin")?;
            merger.merge_to_as(format, bytes, target)?;
        }
        (path, None) => merger.merge_to(path, target)?,
        (path, Some(format)) => merger.merge_to_as(format, path, target)?,
    }
    Ok(())
}

fn display_name(input: &str) -> &str {
    if input == STDIN {
        "<stdin>"
    } else {
        input
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.write_all(b"\n"))
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
