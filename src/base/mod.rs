//! Foundation types for the KerML parser.
//!
//! - [`Position`] - 0-indexed line/column of a token
//! - [`TextRange`], [`TextSize`] - byte offsets into the source
//!
//! This module has NO dependencies on other crate modules.

mod position;

pub use position::Position;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
