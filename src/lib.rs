//! # syster-kerml
//!
//! Table-driven parser for KerML.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! parser    → Logos lexer, rule table, decision resolver, precedence
//!             climber, parse tree, error recovery
//!   ↓
//! base      → Primitives (Position, TextRange)
//! ```
//!
//! ```
//! use kerml::{RuleId, parse};
//!
//! let parse = parse("package P { class C :> Base; }");
//! assert!(parse.ok());
//! let class = parse.root.find(RuleId::Class).unwrap();
//! assert_eq!(class.name(), Some("C"));
//! ```

// ============================================================================
// MODULES (dependency order: base → parser)
// ============================================================================

/// Foundation types: Position, TextRange
pub mod base;

/// Parser: lexer, rule table, decision resolver, parse tree
pub mod parser;

pub use parser::{
    DiagnosticSink, ErrorCode, Parse, ParseError, ParseNode, ParserConfig, Relation, RuleId, SyntaxError,
    SyntaxKind, Token, parse, parse_batch, parse_rule, parse_tokens, tokenize,
};

// Re-export foundation types
pub use base::{Position, TextRange, TextSize};
