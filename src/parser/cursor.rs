//! Token cursor over an externally produced token stream
//!
//! The cursor owns the token vector plus an end-of-input sentinel. Lookahead
//! only sees default-channel tokens; comment-channel tokens are reachable
//! through [`TokenCursor::peek_comment`] for the few rules that consume
//! comment bodies.

use super::errors::ParseError;
use super::lexer::{Channel, Token};
use super::syntax_kind::SyntaxKind;
use crate::base::{Position, TextSize};

/// A saved cursor position, restored with [`TokenCursor::rewind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

pub struct TokenCursor {
    tokens: Vec<Token>,
    /// Raw index of the next unconsumed token (any channel)
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().collect();
        let (offset, position) = match tokens.last() {
            Some(last) => (last.range().end(), last.position.advanced_by(&last.text)),
            None => (TextSize::new(0), Position::default()),
        };
        tokens.push(Token::new(SyntaxKind::EOF, "", offset, position));
        Self { tokens, pos: 0 }
    }

    fn sentinel(&self) -> usize {
        self.tokens.len() - 1
    }

    fn eof_error(&self) -> ParseError {
        let eof = &self.tokens[self.sentinel()];
        ParseError::UnexpectedEndOfInput {
            position: eof.position,
            offset: eof.offset,
        }
    }

    /// Raw index of the first default-channel token at or after `from`.
    fn significant_from(&self, from: usize) -> usize {
        let mut i = from.min(self.sentinel());
        while i < self.sentinel() && self.tokens[i].channel != Channel::Default {
            i += 1;
        }
        i
    }

    /// Raw index of the `offset`-th default-channel token ahead, or `None`
    /// past the sentinel.
    fn index_of(&self, offset: usize) -> Option<usize> {
        let mut i = self.significant_from(self.pos);
        for _ in 0..offset {
            if i == self.sentinel() {
                return None;
            }
            i = self.significant_from(i + 1);
        }
        Some(i)
    }

    /// The default-channel token `offset` positions ahead.
    ///
    /// Offset 0 is the current token. Reading past the sentinel fails with
    /// [`ParseError::UnexpectedEndOfInput`].
    pub fn peek(&self, offset: usize) -> Result<&Token, ParseError> {
        match self.index_of(offset) {
            Some(i) => Ok(&self.tokens[i]),
            None => Err(self.eof_error()),
        }
    }

    /// Kind of the token `offset` positions ahead; `EOF` past the end.
    pub fn peek_kind(&self, offset: usize) -> SyntaxKind {
        self.index_of(offset)
            .map_or(SyntaxKind::EOF, |i| self.tokens[i].kind)
    }

    /// The current default-channel token (the sentinel at end of input).
    pub fn current(&self) -> &Token {
        &self.tokens[self.significant_from(self.pos)]
    }

    pub fn at_eof(&self) -> bool {
        self.significant_from(self.pos) == self.sentinel()
    }

    /// A comment-channel token that precedes the next default-channel token.
    pub fn peek_comment(&self) -> Option<&Token> {
        let end = self.significant_from(self.pos);
        self.tokens[self.pos.min(end)..end]
            .iter()
            .find(|t| t.channel == Channel::Comment)
    }

    /// Consume the comment returned by [`peek_comment`](Self::peek_comment).
    pub fn advance_comment(&mut self) -> Option<Token> {
        let end = self.significant_from(self.pos);
        let index = (self.pos..end).find(|&i| self.tokens[i].channel == Channel::Comment)?;
        self.pos = index + 1;
        Some(self.tokens[index].clone())
    }

    /// Consume and return the current default-channel token.
    ///
    /// The sentinel itself is never consumed.
    pub fn advance(&mut self) -> Result<Token, ParseError> {
        let i = self.significant_from(self.pos);
        if i == self.sentinel() {
            return Err(self.eof_error());
        }
        self.pos = i + 1;
        Ok(self.tokens[i].clone())
    }

    /// Skip the current token without cloning it. Returns `false` at EOF.
    pub fn bump(&mut self) -> bool {
        let i = self.significant_from(self.pos);
        if i == self.sentinel() {
            return false;
        }
        self.pos = i + 1;
        true
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn rewind(&mut self, mark: Mark) {
        self.pos = mark.0.min(self.sentinel());
    }

    /// Stable index of the current default-channel token.
    ///
    /// Used as the key for per-position caches; trivia between two tokens
    /// never changes it.
    pub fn position(&self) -> usize {
        self.significant_from(self.pos)
    }

    /// [`position`](Self::position) of the token `k` default-channel tokens
    /// ahead, clamped to the sentinel.
    pub fn horizon(&self, k: usize) -> usize {
        self.index_of(k).unwrap_or(self.sentinel())
    }

    pub fn token_at(&self, position: usize) -> &Token {
        &self.tokens[position.min(self.sentinel())]
    }
}
