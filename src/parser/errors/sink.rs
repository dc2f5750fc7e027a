//! Diagnostics sinks
//!
//! Errors are streamed to a sink as they are reported, independently of the
//! list returned with the finished parse.

use std::sync::mpsc::Sender;

use super::error::SyntaxError;

/// Receives syntax errors as the parser reports them.
pub trait DiagnosticSink {
    fn report(&mut self, error: &SyntaxError);
}

/// Discards every diagnostic.
impl DiagnosticSink for () {
    fn report(&mut self, _error: &SyntaxError) {}
}

impl DiagnosticSink for Vec<SyntaxError> {
    fn report(&mut self, error: &SyntaxError) {
        self.push(error.clone());
    }
}

/// Streams diagnostics to another thread. A disconnected receiver is ignored.
impl DiagnosticSink for Sender<SyntaxError> {
    fn report(&mut self, error: &SyntaxError) {
        let _ = self.send(error.clone());
    }
}

/// Adapts a closure into a sink.
pub struct SinkFn<F>(pub F);

impl<F> DiagnosticSink for SinkFn<F>
where
    F: FnMut(&SyntaxError),
{
    fn report(&mut self, error: &SyntaxError) {
        (self.0)(error)
    }
}
