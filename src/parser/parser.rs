//! Table-driven parser for KerML
//!
//! Walks the rule table from an entry rule, asking the decision resolver
//! which alternative to take wherever more than one fits, and builds a
//! [`ParseNode`] tree. Syntax errors never abort the parse: each one is
//! reported once and the parser resynchronizes on a FOLLOW token.

use rayon::prelude::*;

use super::config::ParserConfig;
use super::cursor::TokenCursor;
use super::decision::{DecisionResolver, DecisionStats, lookahead};
use super::errors::{DiagnosticSink, ErrorCode, ParseError, SyntaxError};
use super::grammar::{Element, GRAMMAR, Grammar, RuleId, Shape};
use super::lexer::{Token, tokenize};
use super::syntax_kind::{SyntaxKind, TokenSet};
use super::tree::{NodeBuilder, ParseNode};

const CLOSING_DELIMITERS: TokenSet = TokenSet::new(&[SyntaxKind::R_BRACE, SyntaxKind::R_PAREN, SyntaxKind::R_BRACKET]);
const EOF_SET: TokenSet = TokenSet::single(SyntaxKind::EOF);

/// Parse result containing the tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub root: ParseNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn failed(rule: RuleId, error: &ParseError) -> Self {
        let mut root = NodeBuilder::new(rule);
        root.mark_error();
        Parse {
            root: root.finish(),
            errors: SyntaxError::from_parse_error(error, rule).into_iter().collect(),
        }
    }
}

/// Parse a KerML source file from the root namespace
pub fn parse(input: &str) -> Parse {
    parse_rule(RuleId::RootNamespace, input)
}

/// Parse a fragment of KerML starting from any rule
pub fn parse_rule(rule: RuleId, input: &str) -> Parse {
    match parse_tokens(rule, tokenize(input), &ParserConfig::default(), &mut ()) {
        Ok(parse) => parse,
        // only cancellation fails a parse and no token is attached here
        Err(error) => Parse::failed(rule, &error),
    }
}

/// Parse an externally produced token stream.
///
/// Every syntax error is pushed to `sink` as it is found and also returned
/// in the [`Parse`]. The only failure is [`ParseError::Cancelled`]; a
/// cancelled parse returns no tree.
pub fn parse_tokens(
    rule: RuleId,
    tokens: impl IntoIterator<Item = Token>,
    config: &ParserConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Parse, ParseError> {
    Parser::new(tokens, config.clone(), sink).run(rule)
}

/// Parse independent sources in parallel.
///
/// Each parse owns its cursor and decision cache; only the rule table is
/// shared.
pub fn parse_batch<S>(sources: &[S]) -> Vec<Parse>
where
    S: AsRef<str> + Sync,
{
    sources.par_iter().map(|source| parse(source.as_ref())).collect()
}

/// State of one parse invocation
pub(super) struct Parser<'s> {
    pub(super) cursor: TokenCursor,
    pub(super) grammar: &'static Grammar,
    resolver: DecisionResolver,
    config: ParserConfig,
    sink: &'s mut dyn DiagnosticSink,
    errors: Vec<SyntaxError>,
    /// Set after a report; follow-on reports are dropped until a token
    /// matches again
    recovering: bool,
    /// Tokens an enclosing list can resume at; recovery never skips these
    context: TokenSet,
    /// Rule invocations currently open
    depth: usize,
    /// Lookahead sees comment-channel tokens
    pub(super) comments: bool,
}

impl<'s> Parser<'s> {
    pub(super) fn new(tokens: impl IntoIterator<Item = Token>, config: ParserConfig, sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            grammar: &GRAMMAR,
            resolver: DecisionResolver::new(config.lookahead_limit, config.decision_cache),
            config,
            sink,
            errors: Vec::new(),
            recovering: false,
            context: TokenSet::EMPTY,
            depth: 0,
            comments: false,
        }
    }

    fn run(mut self, entry: RuleId) -> Result<Parse, ParseError> {
        tracing::debug!(rule = %entry, "[PARSER] parse started");
        let follow = self.grammar.follow_set(entry).union(EOF_SET);
        let mut outer = NodeBuilder::new(entry);
        self.parse_rule(entry, &mut outer, follow)?;
        let mut root = match outer.into_single_node() {
            Ok(node) => NodeBuilder::reopen(node),
            Err(builder) => builder,
        };

        if !self.cursor.at_eof() {
            self.report(ErrorCode::E0302, entry, EOF_SET);
            if let Some(skipped) = self.skip_until(EOF_SET) {
                root.push_node(skipped);
            }
        }

        let DecisionStats {
            immediate,
            speculated,
            cached,
        } = self.resolver.stats();
        tracing::debug!(
            errors = self.errors.len(),
            immediate,
            speculated,
            cached,
            "[PARSER] parse finished"
        );
        Ok(Parse {
            root: root.finish(),
            errors: self.errors,
        })
    }

    // =========================================================================
    // Rules
    // =========================================================================

    pub(super) fn check_cancelled(&self) -> Result<(), ParseError> {
        if self.config.is_cancelled() {
            tracing::debug!(position = self.cursor.position(), "[PARSER] cancelled");
            return Err(ParseError::Cancelled);
        }
        Ok(())
    }

    /// Invoke `rule`, attaching its result to `out`.
    pub(super) fn parse_rule(&mut self, rule: RuleId, out: &mut NodeBuilder, follow: TokenSet) -> Result<(), ParseError> {
        self.parse_rule_at(rule, 0, out, follow)
    }

    /// Invoke `rule`; a left-recursive rule only takes operators at `level`
    /// or tighter.
    pub(super) fn parse_rule_at(&mut self, rule: RuleId, level: u8, out: &mut NodeBuilder, follow: TokenSet) -> Result<(), ParseError> {
        self.check_cancelled()?;
        if self.depth >= self.config.max_depth {
            tracing::debug!(%rule, depth = self.depth, "[PARSER] nesting limit reached");
            self.report(ErrorCode::E0204, rule, self.grammar.first_set(rule));
            self.recover_rule(rule, out, follow);
            return Ok(());
        }
        self.depth += 1;
        let result = self.invoke(rule, level, out, follow);
        self.depth -= 1;
        result
    }

    fn invoke(&mut self, rule: RuleId, level: u8, out: &mut NodeBuilder, follow: TokenSet) -> Result<(), ParseError> {
        if self.grammar.precedence(rule).is_some() {
            let node = self.parse_climbed(rule, level, follow)?;
            out.push_node(node);
            return Ok(());
        }

        let def = self.grammar.rule(rule);
        let saved = self.comments;
        self.comments |= def.comments;
        let result = match def.shape {
            Shape::Node => {
                let mut node = NodeBuilder::new(rule);
                let result = self.parse_rule_body(rule, &mut node, follow);
                out.push_node(node.finish());
                result
            }
            Shape::Inline => self.parse_rule_body(rule, out, follow),
        };
        self.comments = saved;
        result
    }

    /// Choose an alternative of `rule` and parse it into `b`.
    pub(super) fn parse_rule_body(&mut self, rule: RuleId, b: &mut NodeBuilder, follow: TokenSet) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let candidates = grammar.atom_alternatives(rule);
        let decision = self
            .resolver
            .decide(grammar, &mut self.cursor, rule, &candidates, follow, self.comments);
        match decision {
            Ok(alt) => self.parse_seq(rule, &grammar.alternatives_for(rule)[alt].elements, b, follow),
            Err(ParseError::NoViableAlternative { expected, .. }) => {
                self.report(ErrorCode::E0301, rule, expected);
                self.recover_rule(rule, b, follow);
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    fn parse_seq(&mut self, rule: RuleId, elements: &[Element], b: &mut NodeBuilder, follow: TokenSet) -> Result<(), ParseError> {
        for (i, element) in elements.iter().enumerate() {
            let (mut element_follow, rest_nullable) = self.grammar.first_of_seq(&elements[i + 1..]);
            if rest_nullable {
                element_follow.extend(follow);
            }
            self.parse_element(rule, element, b, element_follow)?;
        }
        Ok(())
    }

    fn parse_element(&mut self, rule: RuleId, element: &Element, b: &mut NodeBuilder, follow: TokenSet) -> Result<(), ParseError> {
        match element {
            Element::Token(kind) | Element::Relation(kind, _) => {
                self.expect(rule, TokenSet::single(*kind), b, follow);
                Ok(())
            }
            Element::OneOf(set) => {
                self.expect(rule, *set, b, follow);
                Ok(())
            }
            Element::Comment => {
                match self.cursor.advance_comment() {
                    Some(token) => {
                        b.push_token(token);
                        self.recovering = false;
                    }
                    None => {
                        self.report(ErrorCode::E0201, rule, TokenSet::single(SyntaxKind::BLOCK_COMMENT));
                        b.mark_error();
                    }
                }
                Ok(())
            }
            Element::Rule(id) => self.parse_rule(*id, b, follow),
            Element::RuleAt(id, level) => self.parse_rule_at(*id, *level, b, follow),
            Element::Optional(inner) => {
                let grammar = self.grammar;
                if self
                    .resolver
                    .decide_enter(grammar, &mut self.cursor, inner, follow, self.comments)
                {
                    self.parse_element(rule, inner, b, follow)?;
                }
                Ok(())
            }
            Element::Repeat {
                element: inner,
                min,
                resync,
            } => self.parse_repeat(rule, inner, usize::from(*min), *resync, b, follow),
            Element::Seq(elements) => self.parse_seq(rule, elements, b, follow),
            Element::Labeled {
                name,
                many,
                element: inner,
            } => {
                let start = b.len();
                self.parse_element(rule, inner, b, follow)?;
                let relation = match inner.as_ref() {
                    Element::Relation(_, relation) => Some(*relation),
                    _ => None,
                };
                b.label(name, *many, start, inner.captures_tokens(), relation);
                Ok(())
            }
        }
    }

    fn parse_repeat(
        &mut self,
        rule: RuleId,
        element: &Element,
        min: usize,
        resync: bool,
        b: &mut NodeBuilder,
        follow: TokenSet,
    ) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let (first, _) = grammar.first_of(element);
        let iteration_follow = follow.union(first);
        let outer = self.context;
        let mut count = 0;
        loop {
            self.check_cancelled()?;
            let enter = count < min
                || self
                    .resolver
                    .decide_enter(grammar, &mut self.cursor, element, follow, self.comments);
            if !enter {
                let la = lookahead(&self.cursor, self.comments);
                if !resync
                    || la == SyntaxKind::EOF
                    || la == SyntaxKind::BLOCK_COMMENT
                    || follow.contains(la)
                    || first.contains(la)
                    || outer.contains(la)
                {
                    // whatever follows the list reports anything left over
                    return Ok(());
                }
                // A member list owns its resync point: drop tokens until
                // another member or the end of the body shows up.
                self.report(ErrorCode::E0202, rule, iteration_follow);
                if let Some(skipped) = self.skip_until(iteration_follow.union(EOF_SET)) {
                    b.push_node(skipped);
                }
                continue;
            }

            let before = self.cursor.mark();
            self.context = outer.union(iteration_follow);
            let result = self.parse_element(rule, element, b, iteration_follow);
            self.context = outer;
            result?;
            count += 1;
            if self.cursor.mark() == before {
                let la = self.cursor.peek_kind(0);
                if !resync || la == SyntaxKind::EOF || follow.contains(la) {
                    return Ok(());
                }
                tracing::debug!(%rule, ?la, "[PARSER] stuck on token, skipping");
                self.report(ErrorCode::E0202, rule, iteration_follow);
                if let Some(skipped) = self.skip_one() {
                    b.push_node(skipped);
                }
            }
        }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Consume a token in `set`, or report it missing and resynchronize.
    fn expect(&mut self, rule: RuleId, set: TokenSet, b: &mut NodeBuilder, follow: TokenSet) {
        if set == EOF_SET {
            if !self.cursor.at_eof() {
                self.report(ErrorCode::E0302, rule, EOF_SET);
                if let Some(skipped) = self.skip_until(EOF_SET) {
                    b.push_node(skipped);
                }
            }
            return;
        }
        if self.eat(set, b) {
            return;
        }

        let la = self.cursor.peek_kind(0);
        let code = if set.len() == 1 && set.intersects(CLOSING_DELIMITERS) {
            ErrorCode::E0203
        } else if la == SyntaxKind::EOF {
            ErrorCode::E0901
        } else {
            ErrorCode::E0201
        };
        self.report(code, rule, set);
        b.mark_error();

        // Delete tokens up to the expected one or to something that may
        // follow; in the second case the token is treated as inserted.
        if let Some(skipped) = self.skip_until(set.union(follow).union(self.context).union(EOF_SET)) {
            b.push_node(skipped);
        }
        if !self.eat(set, b) {
            self.recovering = true;
        }
    }

    fn eat(&mut self, set: TokenSet, b: &mut NodeBuilder) -> bool {
        let la = self.cursor.peek_kind(0);
        if la == SyntaxKind::EOF || !set.contains(la) {
            return false;
        }
        match self.cursor.advance() {
            Ok(token) => {
                b.push_token(token);
                self.recovering = false;
                true
            }
            Err(_) => false,
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    /// Record a syntax error at the current token unless recovery from an
    /// earlier one is still in progress.
    pub(super) fn report(&mut self, code: ErrorCode, rule: RuleId, expected: TokenSet) {
        let found = self.cursor.current();
        if self.recovering {
            tracing::trace!(%rule, found = ?found.kind, "[PARSER] error suppressed during recovery");
            return;
        }
        if self.config.max_errors.is_some_and(|max| self.errors.len() >= max) {
            return;
        }
        let code = if found.kind == SyntaxKind::ERROR {
            ErrorCode::E0101
        } else {
            code
        };
        let error = SyntaxError::new(code, rule, found, expected);
        tracing::debug!(%error, "[PARSER] syntax error");
        self.sink.report(&error);
        self.errors.push(error);
        self.recovering = true;
    }

    /// After no alternative of `rule` fit: skip to a token that may follow
    /// the rule.
    fn recover_rule(&mut self, rule: RuleId, b: &mut NodeBuilder, follow: TokenSet) {
        let sync = follow
            .union(self.grammar.follow_set(rule))
            .union(self.context)
            .union(EOF_SET);
        if let Some(skipped) = self.skip_until(sync) {
            b.push_node(skipped);
        }
        b.mark_error();
    }

    /// Consume tokens until one in `sync`, wrapping them in an error node.
    fn skip_until(&mut self, sync: TokenSet) -> Option<ParseNode> {
        let mut error = NodeBuilder::new(RuleId::Error);
        while !self.cursor.at_eof() && !sync.contains(self.cursor.peek_kind(0)) {
            match self.cursor.advance() {
                Ok(token) => error.push_token(token),
                Err(_) => break,
            }
        }
        if error.is_empty() {
            return None;
        }
        tracing::debug!(skipped = error.len(), resumed_at = ?self.cursor.peek_kind(0), "[PARSER] resynchronized");
        error.mark_error();
        Some(error.finish())
    }

    fn skip_one(&mut self) -> Option<ParseNode> {
        let token = self.cursor.advance().ok()?;
        let mut error = NodeBuilder::new(RuleId::Error);
        error.push_token(token);
        error.mark_error();
        Some(error.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::Relation;

    fn parse_ok(input: &str) -> ParseNode {
        let parse = parse(input);
        assert!(parse.ok(), "unexpected errors for {input:?}: {:?}", parse.errors);
        parse.root
    }

    #[test]
    fn test_empty_input() {
        let root = parse_ok("");
        assert_eq!(root.rule(), RuleId::RootNamespace);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_package_with_class() {
        let root = parse_ok("package P { class C; }");
        let package = root.find(RuleId::Package).unwrap();
        assert_eq!(package.name(), Some("P"));
        let class = package.find(RuleId::Class).unwrap();
        assert_eq!(class.name(), Some("C"));
    }

    #[test]
    fn test_typing_relation_is_normalized() {
        let root = parse_ok("feature f : T;");
        let typing = root.find(RuleId::FeatureTyping).unwrap();
        assert_eq!(typing.relation("relation"), Some(Relation::Typing));
    }

    #[test]
    fn test_missing_semicolon_reports_once() {
        let parse = parse("package P { class A class B; }");
        assert_eq!(parse.errors.len(), 1, "{:?}", parse.errors);
        let package = parse.root.find(RuleId::Package).unwrap();
        let names: Vec<_> = package
            .descendants()
            .into_iter()
            .filter(|n| n.rule() == RuleId::Class)
            .filter_map(|n| n.name())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_trailing_input_after_fragment() {
        let parse = parse_rule(RuleId::QualifiedName, "a::b }");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::E0302);
        assert_eq!(parse.root.rule(), RuleId::QualifiedName);
        assert!(parse.root.has_errors());
    }

    #[test]
    fn test_unclosed_body() {
        let parse = parse("package P { class C;");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].found, SyntaxKind::EOF);
        assert!(parse.root.find(RuleId::Class).is_some());
    }

    #[test]
    fn test_max_errors() {
        let config = ParserConfig::default().with_max_errors(1);
        let mut sink = Vec::new();
        let parse = parse_tokens(
            RuleId::RootNamespace,
            tokenize("class A class B class C;"),
            &config,
            &mut sink,
        )
        .unwrap();
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(sink.len(), 1);
    }
}
