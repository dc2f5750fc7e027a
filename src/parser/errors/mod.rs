//! Parser error handling module
//!
//! - Categorized error codes for filtering
//! - The parse failure taxonomy ([`ParseError`])
//! - User-facing [`SyntaxError`] records
//! - Sinks that receive errors while a parse is still running

mod codes;
mod error;
mod sink;

pub use codes::ErrorCode;
pub use error::{ParseError, SyntaxError};
pub use sink::{DiagnosticSink, SinkFn};
