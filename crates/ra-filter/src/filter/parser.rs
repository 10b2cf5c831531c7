//! Recursive descent parser for filter expressions.

use log::debug;
use strsim::levenshtein;

use super::ast::{Condition, Expression, Operand, Operator};
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer};

/// Maximum Levenshtein distance to suggest an operator for a typo.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Parser for filter expressions.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr | ""
/// or_expr    ::= and_expr ("OR" and_expr)*
/// and_expr   ::= unary_expr (("AND" unary_expr) | ("NOT" unary_expr))*
/// unary_expr ::= "NOT"* clause
/// clause     ::= field ":" operator ":" value ("," value)*
/// ```
///
/// A `NOT` in connective position (`a NOT b`) reads as `a AND NOT b`.
/// There is no grouping: parentheses are ordinary clause characters.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `NOT` - unary
/// 2. `AND` - binary, left-associative
/// 3. `OR` - binary, left-associative
///
/// # Example
///
/// ```
/// use ra_filter::filter::{Expression, FilterParser};
///
/// let expr = FilterParser::parse("genre:contains_any:techno,house OR NOT price:gt:30").unwrap();
/// assert!(matches!(expr, Expression::Or(_)));
///
/// assert_eq!(FilterParser::parse("").unwrap(), Expression::All);
/// ```
pub struct FilterParser {
    tokens: Vec<FilterToken>,
    position: usize,
}

impl FilterParser {
    /// Parses a filter expression string into an [`Expression`].
    ///
    /// An empty or whitespace-only input yields [`Expression::All`].
    ///
    /// # Errors
    ///
    /// - `FilterError::MalformedCondition` if a clause is not `field:operator:values`.
    /// - `FilterError::UnknownOperator` if the operator is not recognized.
    /// - `FilterError::InvalidOperand` if the values do not fit the operator.
    /// - `FilterError::UnexpectedToken` / `UnexpectedEndOfInput` for misplaced keywords.
    pub fn parse(input: &str) -> FilterResult<Expression> {
        let tokens = Lexer::new(input).tokenize();
        if tokens.is_empty() {
            return Ok(Expression::All);
        }

        let mut parser = Self {
            tokens,
            position: 0,
        };
        let expression = parser.parse_expression()?;

        // Check that we consumed all tokens
        if let Some(remaining) = parser.peek() {
            return Err(FilterError::unexpected_token(remaining.as_text()));
        }

        debug!("parsed filter {input:?} as {expression}");
        Ok(expression)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&FilterToken> {
        self.tokens.get(self.position)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<&FilterToken> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Checks if the current token matches the expected token type.
    fn check(&self, expected: &FilterToken) -> bool {
        self.peek() == Some(expected)
    }

    /// Parses the top-level expression (OR expression).
    fn parse_expression(&mut self) -> FilterResult<Expression> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `and_expr ("OR" and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<Expression> {
        let mut left = self.parse_and_expr()?;

        while self.check(&FilterToken::Or) {
            self.advance(); // consume OR
            let right = self.parse_and_expr()?;
            left = Expression::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions, including the implicit AND before a connective NOT.
    fn parse_and_expr(&mut self) -> FilterResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        loop {
            if self.check(&FilterToken::And) {
                self.advance(); // consume AND
            } else if !self.check(&FilterToken::Not) {
                break;
            }
            // NOT is left in place for parse_unary_expr
            let right = self.parse_unary_expr()?;
            left = Expression::and(left, right);
        }

        Ok(left)
    }

    /// Parses unary expressions: `"NOT"* clause`
    ///
    /// A run of `NOT`s is counted rather than recursed into; only its parity
    /// matters.
    fn parse_unary_expr(&mut self) -> FilterResult<Expression> {
        let mut negations = 0usize;
        while self.check(&FilterToken::Not) {
            self.advance(); // consume NOT
            negations += 1;
        }

        let primary = self.parse_primary()?;
        if negations % 2 == 1 {
            Ok(Expression::negate(primary))
        } else {
            Ok(primary)
        }
    }

    /// Parses a condition clause.
    fn parse_primary(&mut self) -> FilterResult<Expression> {
        let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;

        match token {
            FilterToken::Clause(text) => {
                let text = text.clone();
                Ok(Expression::Condition(parse_condition(&text)?))
            }
            other => Err(FilterError::unexpected_token(other.as_text())),
        }
    }
}

/// Parses a single `field:operator:values` clause.
///
/// # Errors
///
/// See [`FilterParser::parse`].
pub fn parse_condition(clause: &str) -> FilterResult<Condition> {
    let mut parts = clause.splitn(3, ':');
    let (Some(field), Some(operator), Some(values)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FilterError::malformed(clause));
    };

    let field = field.trim();
    let operator_text = operator.trim();
    if field.is_empty() || operator_text.is_empty() {
        return Err(FilterError::malformed(clause));
    }

    let operator: Operator = operator_text
        .parse()
        .map_err(|()| FilterError::UnknownOperator {
            clause: clause.to_string(),
            operator: operator_text.to_string(),
            suggestion: suggest_operator(operator_text),
        })?;

    let items = split_values(values);
    if items.is_empty() {
        return Err(FilterError::invalid_operand(clause, "no values given"));
    }

    let operand = if operator.is_numeric() {
        parse_numeric_operand(clause, operator, &items)?
    } else {
        Operand::Values(items)
    };

    Ok(Condition::new(field, operator, operand))
}

/// Splits an operand segment on commas outside double quotes.
///
/// Items are trimmed, quotes are removed and empty items are dropped.
fn split_values(values: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in values.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_numeric_operand(
    clause: &str,
    operator: Operator,
    items: &[String],
) -> FilterResult<Operand> {
    let numbers = items
        .iter()
        .map(|item| {
            item.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| {
                    FilterError::invalid_operand(clause, format!("'{item}' is not a number"))
                })
        })
        .collect::<FilterResult<Vec<f64>>>()?;

    match (operator, numbers.as_slice()) {
        (Operator::Between, [low, high]) => Ok(Operand::Range {
            low: *low,
            high: *high,
        }),
        (Operator::Between, _) => Err(FilterError::invalid_operand(
            clause,
            format!("between expects exactly 2 numbers, got {}", numbers.len()),
        )),
        (_, [value]) => Ok(Operand::Number(*value)),
        (op, _) => Err(FilterError::invalid_operand(
            clause,
            format!("{op} expects exactly 1 number, got {}", numbers.len()),
        )),
    }
}

/// Finds the closest known operator keyword for a typo.
fn suggest_operator(operator: &str) -> Option<String> {
    let lower = operator.to_lowercase();

    let (best, distance) = Operator::all_keywords()
        .map(|keyword| (keyword, levenshtein(&lower, keyword)))
        .min_by_key(|(_, d)| *d)?;

    if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
        Some(best.to_string())
    } else {
        None
    }
}
