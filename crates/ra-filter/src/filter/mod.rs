//! Filter expression parser and evaluator.
//!
//! Filters are the query-string grammar of the listings façade: condition
//! clauses of the form `field:operator:values` joined by `AND`, `OR` and
//! `NOT`.
//!
//! # Supported Syntax
//!
//! ## Clauses
//! - `genre:eq:techno` - field equals value (case-insensitive)
//! - `genre:contains_any:techno,house` - comma-separated value lists
//! - `artists.name:has:charlotte` - dotted field paths
//! - `title:has:"drum and bass"` - quotes protect keywords and commas
//!
//! ## Operators
//! - Text: `eq`, `neq` (`ne`), `has`, `starts`, `ends`
//! - Lists: `contains_any` (`in`, `any`), `contains_all` (`all`), `contains_none` (`nin`)
//! - Numbers: `gt`, `lt`, `gte`, `lte`, `between` (`low,high`, inclusive)
//!
//! ## Boolean Operators
//! - `AND`, `OR`, `NOT` (case-insensitive)
//! - Precedence: `NOT` > `AND` > `OR`, left to right; no parentheses
//!
//! # Example
//!
//! ```
//! use ra_filter::filter::{FilterEvaluator, FilterParser};
//! use ra_filter::{Record, Value};
//!
//! let filter = FilterParser::parse("genre:contains_any:techno,house AND artists:has:charlotte").unwrap();
//! let record = Record::new()
//!     .with("genre", Value::list(["techno"]))
//!     .with("artists", Value::list(["Charlotte de Witte"]));
//!
//! assert!(FilterEvaluator::new(&filter).matches(&record));
//! ```

mod ast;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{Condition, Expression, Operand, Operator};
pub use error::{FilterError, FilterResult};
pub use evaluator::{evaluate_condition, normalize, FilterEvaluator};
pub use parser::{parse_condition, FilterParser};

pub(crate) use evaluator::evaluate_expression;

impl Expression {
    /// Returns true if the record matches this expression.
    pub fn matches(&self, record: &crate::Record) -> bool {
        evaluate_expression(self, record)
    }
}

impl std::str::FromStr for Expression {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterParser::parse(s)
    }
}


#[cfg(test)]
mod evaluator_tests;
