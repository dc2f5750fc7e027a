//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Token errors (tokens the scanner could not classify)
//! - E02xx: Structural errors (missing or extraneous tokens)
//! - E03xx: Decision errors (no alternative fits the input)
//! - E09xx: End-of-input errors

use std::fmt;

/// Error codes for parser diagnostics
///
/// Each error code represents a specific category of parse error,
/// enabling filtering and IDE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Token errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// A required token is missing
    E0201,
    /// Tokens were skipped to resynchronize
    E0202,
    /// A closing delimiter is missing
    E0203,
    /// Nesting exceeds the configured depth limit
    E0204,

    // =========================================================================
    // E03xx: Decision errors
    // =========================================================================
    /// No alternative of the rule accepts the next token
    E0301,
    /// Input remains after the entry rule completed
    E0302,

    // =========================================================================
    // E09xx: End of input
    // =========================================================================
    /// Input ended while a rule still required tokens
    E0901,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0901 => "E0901",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid token",
            Self::E0201 => "missing token",
            Self::E0202 => "unexpected token",
            Self::E0203 => "missing closing delimiter",
            Self::E0204 => "nesting too deep",
            Self::E0301 => "no viable alternative",
            Self::E0302 => "unexpected trailing input",
            Self::E0901 => "unexpected end of input",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::E0201.as_str(), "E0201");
        assert_eq!(ErrorCode::E0901.as_str(), "E0901");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::E0301), "E0301");
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(ErrorCode::E0203.default_message(), "missing closing delimiter");
        assert_eq!(ErrorCode::E0901.default_message(), "unexpected end of input");
    }
}
