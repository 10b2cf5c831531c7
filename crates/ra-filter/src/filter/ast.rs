//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;
use std::str::FromStr;

/// Comparison operator of a condition clause.
///
/// The canonical spelling is what [`fmt::Display`] renders; [`FromStr`] also
/// accepts the short aliases older query strings still use (`ne`, `in`,
/// `any`, `nin`, `all`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality (case-insensitive for text, numeric when both sides are numbers).
    Eq,
    /// Negation of [`Operator::Eq`].
    Neq,
    /// Case-insensitive substring containment.
    Has,
    /// Case-insensitive prefix match.
    Starts,
    /// Case-insensitive suffix match.
    Ends,
    /// Field shares at least one element with the operand list.
    ContainsAny,
    /// Every operand element is present in the field.
    ContainsAll,
    /// No operand element is present in the field.
    ContainsNone,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
    /// Inclusive range `low <= value <= high`.
    Between,
}

impl Operator {
    /// All operators, in help-listing order.
    pub const ALL: [Operator; 13] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Has,
        Operator::Starts,
        Operator::Ends,
        Operator::ContainsAny,
        Operator::ContainsAll,
        Operator::ContainsNone,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Between,
    ];

    /// Canonical keyword as it appears in filter strings.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Has => "has",
            Operator::Starts => "starts",
            Operator::Ends => "ends",
            Operator::ContainsAny => "contains_any",
            Operator::ContainsAll => "contains_all",
            Operator::ContainsNone => "contains_none",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Between => "between",
        }
    }

    /// Alternative spellings accepted by the parser.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Operator::Neq => &["ne"],
            Operator::ContainsAny => &["in", "any"],
            Operator::ContainsAll => &["all"],
            Operator::ContainsNone => &["nin"],
            _ => &[],
        }
    }

    /// One-line description for help output.
    pub fn description(self) -> &'static str {
        match self {
            Operator::Eq => "equals any of the values",
            Operator::Neq => "equals none of the values",
            Operator::Has => "contains any of the values as a substring",
            Operator::Starts => "starts with any of the values",
            Operator::Ends => "ends with any of the values",
            Operator::ContainsAny => "shares at least one element with the values",
            Operator::ContainsAll => "contains every one of the values",
            Operator::ContainsNone => "contains none of the values",
            Operator::Gt => "is a number greater than the value",
            Operator::Lt => "is a number less than the value",
            Operator::Gte => "is a number greater than or equal to the value",
            Operator::Lte => "is a number less than or equal to the value",
            Operator::Between => "is a number within low,high (inclusive)",
        }
    }

    /// Returns true for operators whose operands must be numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte | Operator::Between
        )
    }

    /// Returns true for operators that hold when the field is absent.
    pub fn matches_missing(self) -> bool {
        matches!(self, Operator::Neq | Operator::ContainsNone)
    }

    /// Every keyword the parser recognizes, canonical names first.
    pub fn all_keywords() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .map(Operator::keyword)
            .chain(Self::ALL.into_iter().flat_map(|op| op.aliases().iter().copied()))
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.keyword() == lower || op.aliases().contains(&lower.as_str()))
            .ok_or(())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Parsed operand of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Text values for the equality, substring and contains operators.
    ///
    /// Stored as written (trimmed, quotes removed); the evaluator normalizes.
    Values(Vec<String>),
    /// Single bound for `gt` / `lt` / `gte` / `lte`.
    Number(f64),
    /// Inclusive bounds for `between`.
    Range {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Values(values) => {
                let rendered: Vec<String> = values.iter().map(|v| quote_if_needed(v)).collect();
                f.write_str(&rendered.join(","))
            }
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Range { low, high } => write!(f, "{low},{high}"),
        }
    }
}

/// Quotes an operand item if it would not survive re-lexing verbatim.
fn quote_if_needed(value: &str) -> String {
    let has_keyword = value
        .split_whitespace()
        .any(|w| matches!(w.to_ascii_uppercase().as_str(), "AND" | "OR" | "NOT"));
    if has_keyword || value.contains(',') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Atomic predicate `field:operator:operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Record field, dotted paths allowed (`artists.name`).
    pub field: String,
    /// Comparison operator.
    pub operator: Operator,
    /// Parsed operand.
    pub operand: Operand,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Self {
            field: field.into(),
            operator,
            operand,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.field, self.operator, self.operand)
    }
}

/// Represents a parsed filter expression.
///
/// `AND` and `OR` chains are stored flat and runs of `NOT` collapse by parity,
/// so a parsed tree is never more than a few levels deep however long the
/// filter string is.
///
/// Displaying a parsed expression yields a canonical filter string that parses
/// back to an equal tree. The grammar has no grouping, so hand-built trees that
/// nest a lower-precedence node inside a higher one do not round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Matches every record (the empty filter).
    All,

    /// A single condition clause.
    Condition(Condition),

    /// Logical AND of its operands. An empty list matches every record.
    And(Vec<Expression>),

    /// Logical OR of its operands. An empty list matches no record.
    Or(Vec<Expression>),

    /// Logical NOT of an expression.
    Not(Box<Expression>),
}

impl Expression {
    /// Creates an AND expression from two expressions.
    ///
    /// Operands that are themselves `AND` nodes are spliced in, keeping the
    /// chain flat.
    ///
    /// # Example
    ///
    /// ```
    /// use ra_filter::filter::Expression;
    ///
    /// let expr = Expression::and(Expression::All, Expression::All);
    /// assert!(matches!(expr, Expression::And(ref ops) if ops.len() == 2));
    ///
    /// let expr = Expression::and(expr, Expression::All);
    /// assert!(matches!(expr, Expression::And(ref ops) if ops.len() == 3));
    /// ```
    pub fn and(left: Expression, right: Expression) -> Self {
        let mut operands = match left {
            Expression::And(operands) => operands,
            other => vec![other],
        };
        match right {
            Expression::And(rest) => operands.extend(rest),
            other => operands.push(other),
        }
        Expression::And(operands)
    }

    /// Creates an OR expression from two expressions, splicing nested `OR` nodes.
    pub fn or(left: Expression, right: Expression) -> Self {
        let mut operands = match left {
            Expression::Or(operands) => operands,
            other => vec![other],
        };
        match right {
            Expression::Or(rest) => operands.extend(rest),
            other => operands.push(other),
        }
        Expression::Or(operands)
    }

    /// Creates a NOT expression. Negating a `NOT` unwraps it.
    pub fn negate(inner: Expression) -> Self {
        match inner {
            Expression::Not(inner) => *inner,
            other => Expression::Not(Box::new(other)),
        }
    }

    /// Returns true for the match-everything expression.
    pub fn is_all(&self) -> bool {
        matches!(self, Expression::All)
    }

    /// Collects the conditions of the tree, left to right.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Expression::All => {}
            Expression::Condition(c) => out.push(c),
            Expression::And(operands) | Expression::Or(operands) => {
                for operand in operands {
                    operand.collect_conditions(out);
                }
            }
            Expression::Not(inner) => inner.collect_conditions(out),
        }
    }
}

impl From<Condition> for Expression {
    fn from(condition: Condition) -> Self {
        Expression::Condition(condition)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, operands: &[Expression], keyword: &str) -> fmt::Result {
    for (idx, operand) in operands.iter().enumerate() {
        if idx > 0 {
            write!(f, " {keyword} ")?;
        }
        write!(f, "{operand}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::All => Ok(()),
            Expression::Condition(c) => write!(f, "{c}"),
            Expression::Not(inner) => write!(f, "NOT {inner}"),
            Expression::And(operands) => write_joined(f, operands, "AND"),
            Expression::Or(operands) => write_joined(f, operands, "OR"),
        }
    }
}
