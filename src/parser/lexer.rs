//! Logos-based lexer for KerML
//!
//! Fast tokenization using the logos crate. This is the bundled scanner; the
//! parser core accepts any token stream, so hosts with their own scanner only
//! need to produce [`Token`]s.

use super::syntax_kind::SyntaxKind;
use crate::base::{Position, TextRange, TextSize};
use logos::Logos;
use smol_str::SmolStr;

/// The channel a token is delivered on.
///
/// The parser only sees default-channel tokens unless a rule explicitly asks
/// for a comment-channel token (comment and doc bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Default,
    Hidden,
    Comment,
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: SmolStr,
    pub offset: TextSize,
    pub position: Position,
    pub channel: Channel,
}

impl Token {
    pub fn new(kind: SyntaxKind, text: impl Into<SmolStr>, offset: TextSize, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            position,
            channel: channel_of(kind),
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text.as_str()))
    }
}

/// The channel the bundled scanner assigns to a token kind
pub fn channel_of(kind: SyntaxKind) -> Channel {
    match kind {
        SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT => Channel::Hidden,
        SyntaxKind::BLOCK_COMMENT => Channel::Comment,
        _ => Channel::Default,
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
            position: Position::default(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        let position = self.position;
        self.offset += text.len() as u32;
        self.position = position.advanced_by(text);

        let kind = match logos_token {
            Ok(LogosToken::Word) => SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::IDENT),
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token::new(kind, text, offset, position))
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

/// Raw scanner output, classified into [`SyntaxKind`] by [`Lexer`].
///
/// Identifiers and keywords share [`LogosToken::Word`] so the keyword list
/// lives only in [`SyntaxKind::from_keyword`]. Punctuation carries its kind
/// directly; logos prefers the longest match, so `::>` never lexes as `::`
/// followed by `>`.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
    /// `'...'`, an identifier that may contain any character
    #[regex(r"'([^'\\]|\\.)*'")]
    UnrestrictedName,
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Decimal,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[token("::>", |_| SyntaxKind::COLON_COLON_GT)]
    #[token(":>>", |_| SyntaxKind::COLON_GT_GT)]
    #[token(":>", |_| SyntaxKind::COLON_GT)]
    #[token("::", |_| SyntaxKind::COLON_COLON)]
    #[token(":=", |_| SyntaxKind::COLON_EQ)]
    #[token("..", |_| SyntaxKind::DOT_DOT)]
    #[token("===", |_| SyntaxKind::EQ_EQ_EQ)]
    #[token("!==", |_| SyntaxKind::BANG_EQ_EQ)]
    #[token("==", |_| SyntaxKind::EQ_EQ)]
    #[token("!=", |_| SyntaxKind::BANG_EQ)]
    #[token("<=", |_| SyntaxKind::LT_EQ)]
    #[token(">=", |_| SyntaxKind::GT_EQ)]
    #[token("->", |_| SyntaxKind::ARROW)]
    #[token("=>", |_| SyntaxKind::FAT_ARROW)]
    #[token("@@", |_| SyntaxKind::AT_AT)]
    #[token("**", |_| SyntaxKind::STAR_STAR)]
    #[token("??", |_| SyntaxKind::QUESTION_QUESTION)]
    #[token("{", |_| SyntaxKind::L_BRACE)]
    #[token("}", |_| SyntaxKind::R_BRACE)]
    #[token("[", |_| SyntaxKind::L_BRACKET)]
    #[token("]", |_| SyntaxKind::R_BRACKET)]
    #[token("(", |_| SyntaxKind::L_PAREN)]
    #[token(")", |_| SyntaxKind::R_PAREN)]
    #[token(";", |_| SyntaxKind::SEMICOLON)]
    #[token(":", |_| SyntaxKind::COLON)]
    #[token(".", |_| SyntaxKind::DOT)]
    #[token(",", |_| SyntaxKind::COMMA)]
    #[token("=", |_| SyntaxKind::EQ)]
    #[token("<", |_| SyntaxKind::LT)]
    #[token(">", |_| SyntaxKind::GT)]
    #[token("@", |_| SyntaxKind::AT)]
    #[token("#", |_| SyntaxKind::HASH)]
    #[token("*", |_| SyntaxKind::STAR)]
    #[token("+", |_| SyntaxKind::PLUS)]
    #[token("-", |_| SyntaxKind::MINUS)]
    #[token("/", |_| SyntaxKind::SLASH)]
    #[token("%", |_| SyntaxKind::PERCENT)]
    #[token("^", |_| SyntaxKind::CARET)]
    #[token("~", |_| SyntaxKind::TILDE)]
    #[token("?", |_| SyntaxKind::QUESTION)]
    #[token("|", |_| SyntaxKind::PIPE)]
    #[token("&", |_| SyntaxKind::AMP)]
    Punct(SyntaxKind),
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::Word | LogosToken::UnrestrictedName => SyntaxKind::IDENT,
            LogosToken::Integer => SyntaxKind::INTEGER,
            LogosToken::Decimal => SyntaxKind::DECIMAL,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Punct(kind) => kind,
        }
    }
}
