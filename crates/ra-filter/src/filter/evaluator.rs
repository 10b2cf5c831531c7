//! Filter evaluation against records.
//!
//! This module provides the [`FilterEvaluator`] for evaluating parsed filter
//! expressions against [`Record`]s.
//!
//! # Text normalization
//!
//! Text on both sides of a comparison is trimmed, runs of whitespace collapse
//! to a single space, and the result is lowercased (Unicode-aware). Diacritics
//! are kept: `Köln` does not equal `Koln`. The same rule applies to every text
//! operator.
//!
//! # Missing fields
//!
//! A condition on a field the record does not have is `false`, except for
//! `neq` and `contains_none`, which hold vacuously. `NOT` simply negates the
//! verdict of its operand, so `NOT genre:eq:techno` keeps records without a
//! genre.
//!
//! # Example
//!
//! ```
//! use ra_filter::filter::{FilterEvaluator, FilterParser};
//! use ra_filter::{Record, Value};
//!
//! let expr = FilterParser::parse("genre:contains_any:techno,house AND price:lte:30").unwrap();
//! let record = Record::new()
//!     .with("genre", Value::list(["Techno", "Minimal"]))
//!     .with("price", 25.0);
//!
//! let evaluator = FilterEvaluator::new(&expr);
//! assert!(evaluator.matches(&record));
//! ```

use log::trace;

use super::ast::{Condition, Expression, Operand, Operator};
use crate::record::{parse_number, Record, Value};

/// Evaluates a parsed expression against records.
///
/// The evaluator borrows the expression and is cheap to create; it holds no
/// state between calls.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    expression: &'a Expression,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(expression: &'a Expression) -> Self {
        Self { expression }
    }

    /// Returns true if the record matches the expression.
    pub fn matches(&self, record: &Record) -> bool {
        evaluate_expression(self.expression, record)
    }

    /// Filters a slice of records, returning matches in their original order.
    pub fn filter_records<'b>(&self, records: &'b [Record]) -> Vec<&'b Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Returns the indices of matching records, in ascending order.
    pub fn matching_indices(&self, records: &[Record]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| self.matches(record).then_some(idx))
            .collect()
    }
}

/// Evaluates an expression tree with short-circuit semantics.
pub(crate) fn evaluate_expression(expression: &Expression, record: &Record) -> bool {
    match expression {
        Expression::All => true,
        Expression::Condition(condition) => evaluate_condition(condition, record),
        Expression::And(operands) => operands.iter().all(|op| evaluate_expression(op, record)),
        Expression::Or(operands) => operands.iter().any(|op| evaluate_expression(op, record)),
        Expression::Not(inner) => !evaluate_expression(inner, record),
    }
}

/// Evaluates one condition against one record.
pub fn evaluate_condition(condition: &Condition, record: &Record) -> bool {
    let verdict = match record.get(&condition.field) {
        Some(value) => evaluate_value(condition.operator, &condition.operand, value),
        None => condition.operator.matches_missing(),
    };
    trace!("{condition} -> {verdict}");
    verdict
}

fn evaluate_value(operator: Operator, operand: &Operand, value: &Value) -> bool {
    match (operator, operand) {
        (Operator::Gt, Operand::Number(bound)) => any_number(value, |n| n > *bound),
        (Operator::Lt, Operand::Number(bound)) => any_number(value, |n| n < *bound),
        (Operator::Gte, Operand::Number(bound)) => any_number(value, |n| n >= *bound),
        (Operator::Lte, Operand::Number(bound)) => any_number(value, |n| n <= *bound),
        (Operator::Between, Operand::Range { low, high }) => {
            any_number(value, |n| *low <= n && n <= *high)
        }
        (op, Operand::Values(values)) => evaluate_text(op, values, value),
        // The parser never pairs an operator with the wrong operand shape.
        _ => false,
    }
}

fn evaluate_text(operator: Operator, operands: &[String], value: &Value) -> bool {
    let items: Vec<String> = value.text_items().iter().map(|s| normalize(s)).collect();
    let operands: Vec<String> = operands.iter().map(|s| normalize(s)).collect();

    match operator {
        Operator::Eq => is_equal(value, &items, &operands),
        Operator::Neq => !is_equal(value, &items, &operands),
        Operator::Has => any_pair(&items, &operands, |item, op| item.contains(op)),
        Operator::Starts => any_pair(&items, &operands, |item, op| item.starts_with(op)),
        Operator::Ends => any_pair(&items, &operands, |item, op| item.ends_with(op)),
        Operator::ContainsAny => operands.iter().any(|op| items.contains(op)),
        Operator::ContainsAll => operands.iter().all(|op| items.contains(op)),
        Operator::ContainsNone => !operands.iter().any(|op| items.contains(op)),
        Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte | Operator::Between => false,
    }
}

/// Equality: numeric when both sides parse as numbers, text otherwise.
///
/// Numeric text (`"25.0"`) and list items count as numbers, the same reading
/// the ordering operators use.
fn is_equal(value: &Value, items: &[String], operands: &[String]) -> bool {
    let numbers: Vec<f64> = operands.iter().filter_map(|op| parse_number(op)).collect();
    if !numbers.is_empty() && any_number(value, |n| numbers.contains(&n)) {
        return true;
    }
    any_pair(items, operands, |item, op| item == op)
}

fn any_pair(items: &[String], operands: &[String], pred: impl Fn(&str, &str) -> bool) -> bool {
    items
        .iter()
        .any(|item| operands.iter().any(|op| pred(item, op)))
}

/// True if any numeric reading of the value satisfies the predicate.
///
/// Lists are read item by item; non-numeric items are skipped.
fn any_number(value: &Value, pred: impl Fn(f64) -> bool) -> bool {
    match value {
        Value::List(items) => items.iter().filter_map(|s| parse_number(s)).any(pred),
        other => other.as_number().is_some_and(pred),
    }
}

/// Normalizes text for comparison: trim, collapse whitespace, lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
