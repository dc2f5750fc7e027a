//! Parser configuration

use tokio_util::sync::CancellationToken;

/// Default number of tokens speculation may look ahead.
///
/// The longest prefix two alternatives share in the KerML table is a feature
/// declaration (prefix, identification, multiplicity, typing list) before a
/// distinguishing keyword; 32 tokens covers it with room to spare.
pub const DEFAULT_LOOKAHEAD_LIMIT: usize = 32;

/// Default limit on nested rule invocations.
///
/// A parenthesized expression costs three levels and a nested package about
/// five, so real sources stay far below it while a default 2 MiB thread
/// stack still fits the recursion in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Tokens speculation may look ahead before falling back to
    /// declaration order
    pub lookahead_limit: usize,
    /// Cache resolved decisions per (rule, position)
    pub decision_cache: bool,
    /// Stop reporting after this many errors; parsing still completes
    pub max_errors: Option<usize>,
    /// Nested rule invocations allowed before the input is skipped as too deep
    pub max_depth: usize,
    /// Checked at every rule invocation
    pub cancel: Option<CancellationToken>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lookahead_limit: DEFAULT_LOOKAHEAD_LIMIT,
            decision_cache: true,
            max_errors: None,
            max_depth: DEFAULT_MAX_DEPTH,
            cancel: None,
        }
    }
}

impl ParserConfig {
    pub fn with_lookahead_limit(mut self, limit: usize) -> Self {
        self.lookahead_limit = limit.max(1);
        self
    }

    pub fn with_decision_cache(mut self, enabled: bool) -> Self {
        self.decision_cache = enabled;
        self
    }

    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
