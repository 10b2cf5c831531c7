//! Filter command implementation.
//!
//! Reads record batches from JSON files or stdin, filters them with a filter
//! expression, optionally sorts the survivors, and prints them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use ra_filter::{filter_and_sort_indices, json_kind, parse, Record, SortDirection, SortKey};
use serde_json::Value as Json;

use super::config::{Config, DEFAULT_LIMIT};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_records_json, format_records_table, BatchSummary};

/// Keys searched, in order, when an object input gives no `--items-key`.
const DEFAULT_ITEMS_KEYS: [&str; 4] = ["events", "results", "data", "items"];

/// Options for the filter command.
#[derive(Debug, Default)]
pub struct FilterOptions {
    /// Input files; empty or "-" means stdin.
    pub files: Vec<PathBuf>,
    /// Filter expression.
    pub filter: Option<String>,
    /// Sort key name.
    pub sort: Option<String>,
    /// Explicit sort direction.
    pub direction: Option<SortDirection>,
    /// Limit results.
    pub limit: Option<usize>,
    /// Show all records (no limit).
    pub all: bool,
    /// Key (or dotted path) of the record array in object inputs.
    pub items_key: Option<String>,
}

/// Records read from every input, with their raw JSON kept alongside.
#[derive(Debug, Default)]
pub struct Batch {
    /// Raw JSON objects, as read.
    pub raw: Vec<Json>,
    /// Flattened records, parallel to `raw`.
    pub records: Vec<Record>,
}

impl Batch {
    /// Adds the records of one source.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Record`] for the first item that is not a JSON object.
    fn extend(&mut self, source_name: &str, items: Vec<Json>) -> Result<()> {
        for (index, item) in items.into_iter().enumerate() {
            let record = Record::from_json(&item).map_err(|error| CommandError::Record {
                source_name: source_name.to_string(),
                index,
                error,
            })?;
            self.records.push(record);
            self.raw.push(item);
        }
        Ok(())
    }
}

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, or if the filter
/// expression is invalid.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions, config: &Config) -> Result<()> {
    // Parse first so a bad filter fails before any input is read.
    let expression = parse(opts.filter.as_deref().unwrap_or(""))?;

    let items_key = opts
        .items_key
        .as_deref()
        .or(config.filter.items_key.as_deref());
    let batch = load_batch(&opts.files, items_key)?;

    let sort_key = resolve_sort_key(opts.sort.as_deref().or(config.filter.sort.as_deref()));
    let indices = filter_and_sort_indices(&batch.records, &expression, sort_key, opts.direction);

    let limit = if opts.all {
        usize::MAX
    } else {
        opts.limit.or(config.filter.limit).unwrap_or(DEFAULT_LIMIT)
    };
    let matched = indices.len();
    let selected: Vec<usize> = indices.into_iter().take(limit).collect();

    let summary = BatchSummary {
        total: batch.records.len(),
        matched,
        returned: selected.len(),
    };
    info!(
        "{} of {} records matched, showing {}",
        summary.matched, summary.total, summary.returned
    );

    if ctx.json_output {
        println!("{}", format_records_json(&batch.raw, &selected, summary)?);
    } else if !ctx.quiet {
        let output = format_records_table(
            &batch.records,
            &selected,
            &config.columns(),
            summary,
            ctx.use_colors,
        );
        print!("{output}");
    }

    Ok(())
}

/// Maps a sort key name to a [`SortKey`]; blank names mean no sort.
fn resolve_sort_key(name: Option<&str>) -> Option<SortKey> {
    let name = name.map(str::trim).filter(|n| !n.is_empty())?;
    Some(name.parse().unwrap_or_else(|never| match never {}))
}

/// Reads every source into one batch, in argument order.
///
/// No files, or a file named `-`, reads stdin.
pub fn load_batch(files: &[PathBuf], items_key: Option<&str>) -> Result<Batch> {
    let stdin = [PathBuf::from("-")];
    let files = if files.is_empty() { &stdin[..] } else { files };

    let mut batch = Batch::default();
    for path in files {
        let (source_name, text) = read_source(path)?;
        let items = parse_source(&source_name, &text, items_key)?;
        debug!("read {} records from {source_name}", items.len());
        batch.extend(&source_name, items)?;
    }
    Ok(batch)
}

fn read_source(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let text = io::read_to_string(io::stdin())?;
        return Ok(("stdin".to_string(), text));
    }

    let text = fs::read_to_string(path).map_err(|e| {
        CommandError::Io(io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })?;
    Ok((path.display().to_string(), text))
}

/// Parses one source and returns its record array.
fn parse_source(source_name: &str, text: &str, items_key: Option<&str>) -> Result<Vec<Json>> {
    let json: Json = serde_json::from_str(text).map_err(|error| CommandError::InvalidJson {
        source_name: source_name.to_string(),
        error,
    })?;
    extract_items(source_name, json, items_key)
}

/// Finds the record array in a parsed source.
///
/// Arrays are used as-is. Objects are searched for `items_key` (a dotted path
/// is followed through nested objects) or, without one, for the first of
/// the default keys holding an array.
fn extract_items(source_name: &str, json: Json, items_key: Option<&str>) -> Result<Vec<Json>> {
    match (json, items_key) {
        (Json::Array(items), _) => Ok(items),
        (json @ Json::Object(_), Some(key)) => match take_path(json, key) {
            Some(Json::Array(items)) => Ok(items),
            Some(_) => Err(CommandError::Input(format!(
                "'{key}' in {source_name} is not an array"
            ))),
            None => Err(CommandError::Input(format!(
                "no '{key}' key in {source_name}"
            ))),
        },
        (Json::Object(mut map), None) => DEFAULT_ITEMS_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Json::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                CommandError::Input(format!(
                    "{source_name} holds an object without a record array \
                     (looked for {}; use --items-key)",
                    DEFAULT_ITEMS_KEYS.join(", ")
                ))
            }),
        (other, _) => Err(CommandError::Input(format!(
            "{source_name} holds a {}, expected an array of records",
            json_kind(&other)
        ))),
    }
}

/// Follows a dotted key path through nested objects.
fn take_path(mut json: Json, path: &str) -> Option<Json> {
    for segment in path.split('.') {
        json = match json {
            Json::Object(mut map) => map.remove(segment)?,
            _ => return None,
        };
    }
    Some(json)
}
