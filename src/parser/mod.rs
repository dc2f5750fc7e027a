//! Table-driven parser for KerML
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens on default / comment / hidden channels
//!     ↓
//! TokenCursor → lookahead over default-channel tokens, mark/rewind
//!     ↓
//! Parser → walks the rule table (grammar), asking the DecisionResolver
//!          at every choice; expression rules go through precedence climbing
//!     ↓
//! ParseNode tree + SyntaxErrors
//! ```
//!
//! The rule table is built once ([`grammar::GRAMMAR`]) and shared read-only,
//! so independent parses may run on separate threads ([`parse_batch`]).
//! Everything else (cursor, decision cache, tree) belongs to one parse.

#[allow(clippy::module_inception)]
mod parser;

mod config;
mod cursor;
mod decision;
mod errors;
mod expressions;
pub mod grammar;
mod lexer;
mod syntax_kind;
mod tree;

pub use config::{DEFAULT_LOOKAHEAD_LIMIT, DEFAULT_MAX_DEPTH, ParserConfig};
pub use cursor::{Mark, TokenCursor};
pub use decision::{DecisionResolver, DecisionStats};
pub use errors::{DiagnosticSink, ErrorCode, ParseError, SinkFn, SyntaxError};
pub use grammar::{Relation, RuleId};
pub use lexer::{Channel, Lexer, Token, tokenize};
pub use parser::{Parse, parse, parse_batch, parse_rule, parse_tokens};
pub use syntax_kind::{SyntaxKind, TokenSet, kind_to_name};
pub use tree::{Child, FieldShape, FieldSlot, NodeBuilder, NodeShape, ParseNode};
