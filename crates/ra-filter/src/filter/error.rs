//! Error types for the filter parser.

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur during filter parsing.
///
/// Every variant carries the offending clause or token so callers can reject
/// the request with a precise message. Evaluation never fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A clause is not of the form `field:operator:values`.
    #[error("malformed condition '{clause}': expected field:operator:values")]
    MalformedCondition {
        /// The clause text as written.
        clause: String,
    },

    /// The operator segment of a clause is not recognized.
    #[error("unknown operator '{operator}' in '{clause}'{}", suggestion_suffix(.suggestion))]
    UnknownOperator {
        /// The clause text as written.
        clause: String,
        /// The unrecognized operator.
        operator: String,
        /// Closest known operator, if any is near enough.
        suggestion: Option<String>,
    },

    /// The operand list does not fit the operator.
    #[error("invalid operand in '{clause}': {reason}")]
    InvalidOperand {
        /// The clause text as written.
        clause: String,
        /// What was wrong with the operand.
        reason: String,
    },

    /// A logical keyword appeared where a condition was expected.
    #[error("unexpected token: {token}")]
    UnexpectedToken {
        /// The unexpected token that was encountered.
        token: String,
    },

    /// The expression ended where a condition was expected.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a malformed condition error.
    pub fn malformed(clause: impl Into<String>) -> Self {
        FilterError::MalformedCondition {
            clause: clause.into(),
        }
    }

    /// Creates an invalid operand error.
    pub fn invalid_operand(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::InvalidOperand {
            clause: clause.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>) -> Self {
        FilterError::UnexpectedToken {
            token: token.into(),
        }
    }

    /// Returns the clause text the error refers to, if it refers to one.
    pub fn clause(&self) -> Option<&str> {
        match self {
            FilterError::MalformedCondition { clause }
            | FilterError::UnknownOperator { clause, .. }
            | FilterError::InvalidOperand { clause, .. } => Some(clause),
            FilterError::UnexpectedToken { .. } | FilterError::UnexpectedEndOfInput => None,
        }
    }
}
