//! Syntax error and parse failure types
//!
//! [`SyntaxError`] is the user-facing record produced by the recovery policy.
//! [`ParseError`] is the internal failure taxonomy: decision and end-of-input
//! failures are converted into syntax errors at the nearest rule boundary,
//! while cancellation propagates to the caller untouched.

use std::fmt;

use thiserror::Error;

use super::codes::ErrorCode;
use crate::base::{Position, TextRange, TextSize};
use crate::parser::grammar::RuleId;
use crate::parser::lexer::Token;
use crate::parser::syntax_kind::{SyntaxKind, TokenSet, kind_to_name};

/// A syntax error reported by the recovery policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Rule being parsed when the error was detected
    pub rule: RuleId,
    /// Line/column of the offending token
    pub position: Position,
    /// Source range of the offending token
    pub range: TextRange,
    /// Tokens that would have been accepted
    pub expected: TokenSet,
    /// Token actually found
    pub found: SyntaxKind,
    /// Categorized error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl SyntaxError {
    /// Create an error located at `found`, deriving the message from the
    /// code and the expected set.
    pub fn new(code: ErrorCode, rule: RuleId, found: &Token, expected: TokenSet) -> Self {
        let message = match code {
            ErrorCode::E0101 => format!("invalid token '{}'", found.text),
            ErrorCode::E0202 | ErrorCode::E0302 => {
                format!("unexpected {}", kind_to_name(found.kind))
            }
            ErrorCode::E0204 => format!("{} before {}", code.default_message(), kind_to_name(found.kind)),
            _ if expected.is_empty() => {
                format!("{}, found {}", code.default_message(), kind_to_name(found.kind))
            }
            _ => format!("expected {}, found {}", expected, kind_to_name(found.kind)),
        };
        Self {
            rule,
            position: found.position,
            range: found.range(),
            expected,
            found: found.kind,
            code,
            message,
        }
    }

    /// Convert a decision or end-of-input failure into a syntax error.
    ///
    /// Returns `None` for [`ParseError::Cancelled`], which is not user-facing.
    pub fn from_parse_error(error: &ParseError, fallback_rule: RuleId) -> Option<Self> {
        match error {
            ParseError::NoViableAlternative {
                rule,
                position,
                offset,
                expected,
                found,
            } => Some(Self {
                rule: *rule,
                position: *position,
                range: TextRange::empty(*offset),
                expected: *expected,
                found: *found,
                code: ErrorCode::E0301,
                message: format!(
                    "no viable alternative for {}: expected {}, found {}",
                    rule,
                    expected,
                    kind_to_name(*found)
                ),
            }),
            ParseError::UnexpectedEndOfInput { position, offset } => Some(Self {
                rule: fallback_rule,
                position: *position,
                range: TextRange::empty(*offset),
                expected: TokenSet::EMPTY,
                found: SyntaxKind::EOF,
                code: ErrorCode::E0901,
                message: ErrorCode::E0901.default_message().to_string(),
            }),
            ParseError::Syntax(err) => Some(err.clone()),
            ParseError::Cancelled => None,
        }
    }

    pub fn offset(&self) -> TextSize {
        self.range.start()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error[{}] at {} in {}: {}",
            self.code, self.position, self.rule, self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Failures raised while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No alternative of `rule` fits the upcoming tokens.
    #[error("no viable alternative for {rule} at {position}: expected {expected}, found {found}")]
    NoViableAlternative {
        rule: RuleId,
        position: Position,
        offset: TextSize,
        expected: TokenSet,
        found: SyntaxKind,
    },

    /// The cursor was asked for a token past the end-of-input sentinel.
    #[error("unexpected end of input at {position}")]
    UnexpectedEndOfInput { position: Position, offset: TextSize },

    /// A reported syntax error.
    #[error("{0}")]
    Syntax(SyntaxError),

    /// The parse was cancelled through its cancellation token.
    #[error("parse cancelled")]
    Cancelled,
}

impl ParseError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
