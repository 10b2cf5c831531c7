//! Lexer (tokenizer) for filter expressions.
//!
//! The lexer only separates logical keywords from condition clauses. Clause
//! internals (`field:op:values`) are split later by the parser, because the
//! operand segment may legitimately contain spaces, colons and commas.

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// A condition clause, verbatim from the input (quotes included).
    Clause(String),

    /// The `AND` keyword.
    And,

    /// The `OR` keyword.
    Or,

    /// The `NOT` keyword.
    Not,
}

impl FilterToken {
    /// Returns the token as it would appear in a filter string.
    pub fn as_text(&self) -> &str {
        match self {
            FilterToken::Clause(text) => text,
            FilterToken::And => "AND",
            FilterToken::Or => "OR",
            FilterToken::Not => "NOT",
        }
    }
}

/// Lexer for tokenizing filter expressions.
///
/// Input is read as whitespace-separated words. A word equal to `AND`, `OR`
/// or `NOT` (any case) outside double quotes is a keyword; every run of other
/// words between keywords is one clause.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();
    }

    /// Reads one whitespace-delimited word, honoring double quotes.
    ///
    /// Returns the byte range of the word. An unterminated quote extends the
    /// word to the end of the input.
    fn read_word(&mut self) -> (usize, usize) {
        let start = self.position;
        let mut in_quotes = false;

        for (offset, c) in self.input[start..].char_indices() {
            if c == '"' {
                in_quotes = !in_quotes;
            } else if c.is_whitespace() && !in_quotes {
                self.position = start + offset;
                return (start, self.position);
            }
        }

        self.position = self.input.len();
        (start, self.position)
    }

    /// Maps a bare word to a keyword token.
    fn keyword(word: &str) -> Option<FilterToken> {
        if word.eq_ignore_ascii_case("and") {
            Some(FilterToken::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(FilterToken::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Some(FilterToken::Not)
        } else {
            None
        }
    }

    /// Collects all tokens into a vector.
    pub fn tokenize(mut self) -> Vec<FilterToken> {
        let mut tokens = Vec::new();
        // Byte range of the clause currently being accumulated.
        let mut clause: Option<(usize, usize)> = None;

        loop {
            self.skip_whitespace();
            if self.position >= self.input.len() {
                break;
            }

            let (start, end) = self.read_word();
            match Self::keyword(&self.input[start..end]) {
                Some(token) => {
                    if let Some((cs, ce)) = clause.take() {
                        tokens.push(FilterToken::Clause(self.input[cs..ce].to_string()));
                    }
                    tokens.push(token);
                }
                None => {
                    clause = Some(match clause {
                        Some((cs, _)) => (cs, end),
                        None => (start, end),
                    });
                }
            }
        }

        if let Some((cs, ce)) = clause {
            tokens.push(FilterToken::Clause(self.input[cs..ce].to_string()));
        }

        tokens
    }
}
