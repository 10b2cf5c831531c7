//! Filter expression engine for Resident Advisor listings.
//!
//! The listings façade accepts compound boolean queries such as
//! `genre:contains_any:techno,house AND artists:has:charlotte` and applies
//! them to artist, label, venue and event records fetched from upstream.
//! This crate holds that engine:
//!
//! - [`record`] - the typed [`Record`] model and JSON flattening
//! - [`filter`] - lexer, parser, AST and evaluator for filter strings
//! - [`sort`] - the stable secondary sort applied after filtering
//!
//! Parsing and evaluation are pure: no I/O, no shared state, safe to call
//! from any number of threads at once.
//!
//! # Example
//!
//! ```
//! use ra_filter::{filter_and_sort, parse, Record, SortKey, Value};
//!
//! let records = vec![
//!     Record::new().with("title", "Closing").with("score", 10.0).with("genre", Value::list(["techno"])),
//!     Record::new().with("title", "Opening").with("score", 30.0).with("genre", Value::list(["house"])),
//!     Record::new().with("title", "Afters").with("score", 20.0).with("genre", Value::list(["trance"])),
//! ];
//!
//! let expr = parse("genre:contains_any:techno,house").unwrap();
//! let result = filter_and_sort(&records, &expr, Some(SortKey::Score), None);
//!
//! let titles: Vec<String> = result.iter().map(|r| r.get("title").unwrap().to_string()).collect();
//! assert_eq!(titles, vec!["Opening", "Closing"]);
//! ```

use log::debug;

pub mod filter;
pub mod record;
pub mod sort;

pub use filter::{
    Condition, Expression, FilterError, FilterEvaluator, FilterParser, FilterResult, Operand,
    Operator,
};
pub use record::{json_kind, Record, RecordError, Value};
pub use sort::{ParseDirectionError, SortDirection, SortKey};

/// Parses a filter string. The empty string matches every record.
///
/// # Errors
///
/// Returns a [`FilterError`] naming the offending clause or token.
pub fn parse(input: &str) -> FilterResult<Expression> {
    FilterParser::parse(input)
}

/// Evaluates an expression against a single record.
pub fn evaluate(expression: &Expression, record: &Record) -> bool {
    filter::evaluate_expression(expression, record)
}

/// Filters records and optionally sorts the survivors.
///
/// Filtering is stable. When `sort_key` is set, survivors are stably sorted by
/// it in `direction` (or the key's default direction); records missing the
/// key go last.
pub fn filter_and_sort<'a>(
    records: &'a [Record],
    expression: &Expression,
    sort_key: Option<SortKey>,
    direction: Option<SortDirection>,
) -> Vec<&'a Record> {
    filter_and_sort_indices(records, expression, sort_key, direction)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

/// Like [`filter_and_sort`], but returns indices into `records`.
///
/// Useful for callers that keep richer data (such as the raw JSON) alongside
/// each record.
pub fn filter_and_sort_indices(
    records: &[Record],
    expression: &Expression,
    sort_key: Option<SortKey>,
    direction: Option<SortDirection>,
) -> Vec<usize> {
    let mut indices = FilterEvaluator::new(expression).matching_indices(records);
    debug!(
        "filter kept {} of {} records",
        indices.len(),
        records.len()
    );

    if let Some(key) = sort_key {
        let direction = direction.unwrap_or_else(|| key.default_direction());
        debug!("sorting by {key} {direction}");
        sort::sort_indices(records, &mut indices, &key, direction);
    }

    indices
}
