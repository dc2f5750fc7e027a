//! Adaptive decision resolver
//!
//! At every point where the grammar offers more than one way forward the
//! resolver picks exactly one before any tree is built:
//!
//! 1. Alternatives whose FIRST set excludes the next token are dropped
//!    (nullable alternatives stay when the token is in the caller's FOLLOW).
//! 2. One survivor commits immediately.
//! 3. Several survivors are each run through a recognizer that consumes
//!    tokens without building anything, bounded by the lookahead limit.
//!    The first alternative, in declaration order, that survives to the
//!    horizon or completes in front of a FOLLOW token wins. If none does,
//!    the one that got farthest before failing is chosen so the error lands
//!    where the input actually diverges.
//!
//! Decisions reached by speculation are cached per (rule, position).

use rustc_hash::FxHashMap;

use super::cursor::{Mark, TokenCursor};
use super::errors::ParseError;
use super::grammar::{Element, Grammar, OperatorForm, PrecedenceTable, RuleId};
use super::syntax_kind::{SyntaxKind, TokenSet};

/// Nesting bound for speculative rule calls. Input nested deeper than this
/// is treated as a failed alternative during speculation only.
const MAX_SPECULATION_DEPTH: usize = 256;

/// Result of recognizing a grammar fragment speculatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The fragment matched completely.
    Matched,
    /// The lookahead limit was reached before the fragment could fail.
    Horizon,
    /// The fragment cannot match; carries the farthest position reached.
    Failed(usize),
}

/// Counters for how decisions were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionStats {
    /// Resolved from one token of lookahead
    pub immediate: usize,
    /// Resolved by speculation
    pub speculated: usize,
    /// Served from the decision cache
    pub cached: usize,
}

/// A decision depends on everything `decide` reads besides the tokens:
/// the rule, where it starts, what may follow it, and comment visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DecisionKey {
    rule: RuleId,
    pos: usize,
    follow: TokenSet,
    comments: bool,
}

pub struct DecisionResolver {
    cache: FxHashMap<DecisionKey, usize>,
    memo: FxHashMap<(RuleId, usize, bool), (Outcome, Mark)>,
    lookahead_limit: usize,
    use_cache: bool,
    stats: DecisionStats,
}

impl DecisionResolver {
    pub fn new(lookahead_limit: usize, use_cache: bool) -> Self {
        Self {
            cache: FxHashMap::default(),
            memo: FxHashMap::default(),
            lookahead_limit: lookahead_limit.max(1),
            use_cache,
            stats: DecisionStats::default(),
        }
    }

    pub fn stats(&self) -> DecisionStats {
        self.stats
    }

    /// Choose among `candidates` (alternative indices of `rule`).
    ///
    /// `follow` is what may come after the rule in the current context and
    /// `comments` makes comment-channel tokens visible to lookahead. The
    /// cursor is left where it was.
    pub fn decide(
        &mut self,
        grammar: &Grammar,
        cursor: &mut TokenCursor,
        rule: RuleId,
        candidates: &[usize],
        follow: TokenSet,
        comments: bool,
    ) -> Result<usize, ParseError> {
        if let [only] = candidates {
            return Ok(*only);
        }
        let pos = cursor.position();
        let key = DecisionKey {
            rule,
            pos,
            follow,
            comments,
        };
        if self.use_cache {
            if let Some(&alt) = self.cache.get(&key) {
                self.stats.cached += 1;
                tracing::trace!(%rule, pos, alt, "[DECISION] cache hit");
                return Ok(alt);
            }
        }

        let la = lookahead(cursor, comments);
        let mut expected = TokenSet::EMPTY;
        let mut viable = Vec::new();
        for &alt in candidates {
            let (first, nullable) = grammar.alternative_first(rule, alt);
            expected.extend(first);
            if nullable {
                expected.extend(follow);
            }
            if first.contains(la) || (nullable && follow.contains(la)) {
                viable.push(alt);
            }
        }

        let chosen = match viable.as_slice() {
            [] => {
                let found = cursor.current();
                return Err(ParseError::NoViableAlternative {
                    rule,
                    position: found.position,
                    offset: found.offset,
                    expected,
                    found: la,
                });
            }
            [alt] => {
                self.stats.immediate += 1;
                return Ok(*alt);
            }
            _ => self.speculate(grammar, cursor, rule, &viable, follow, comments),
        };

        self.stats.speculated += 1;
        if self.use_cache {
            self.cache.insert(key, chosen);
        }
        Ok(chosen)
    }

    fn speculate(
        &mut self,
        grammar: &Grammar,
        cursor: &mut TokenCursor,
        rule: RuleId,
        viable: &[usize],
        follow: TokenSet,
        comments: bool,
    ) -> usize {
        let start = cursor.mark();
        let horizon = cursor.horizon(self.lookahead_limit);
        let alternatives = grammar.alternatives_for(rule);

        let mut chosen = None;
        let mut completed = None;
        let mut farthest: Option<(usize, usize)> = None;
        for &alt in viable {
            let mut spec = Speculation::new(grammar, cursor, &mut self.memo, horizon, comments);
            let outcome = spec.seq(&alternatives[alt].elements);
            let followed = spec.limit_reached() || follow.contains(spec.la());
            self.rewind(cursor, start);

            tracing::trace!(%rule, alt, ?outcome, "[DECISION] speculated alternative");
            match outcome {
                Outcome::Horizon => {
                    chosen = Some(alt);
                    break;
                }
                Outcome::Matched if followed => {
                    chosen = Some(alt);
                    break;
                }
                Outcome::Matched => {
                    completed.get_or_insert(alt);
                }
                Outcome::Failed(at) => {
                    if farthest.is_none_or(|(_, best)| at > best) {
                        farthest = Some((alt, at));
                    }
                }
            }
        }
        self.memo.clear();

        chosen
            .or(completed)
            .or(farthest.map(|(alt, _)| alt))
            .unwrap_or(viable[0])
    }

    /// Whether an optional or repeated `element` should be entered.
    ///
    /// Entering is free when the next token starts `element` and cannot
    /// follow it. When it can do both, the element is entered only if it
    /// speculatively matches.
    pub fn decide_enter(
        &mut self,
        grammar: &Grammar,
        cursor: &mut TokenCursor,
        element: &Element,
        follow: TokenSet,
        comments: bool,
    ) -> bool {
        let la = lookahead(cursor, comments);
        let (first, _) = grammar.first_of(element);
        if !first.contains(la) {
            return false;
        }
        if !follow.contains(la) {
            return true;
        }

        let start = cursor.mark();
        let before = cursor.position();
        let horizon = cursor.horizon(self.lookahead_limit);
        let mut spec = Speculation::new(grammar, cursor, &mut self.memo, horizon, comments);
        let outcome = spec.element(element);
        let progressed = spec.cursor.position() > before || spec.consumed_comment;
        self.rewind(cursor, start);
        self.memo.clear();

        tracing::trace!(?la, ?outcome, "[DECISION] speculated optional element");
        match outcome {
            Outcome::Horizon => true,
            Outcome::Matched => progressed,
            Outcome::Failed(_) => false,
        }
    }

    /// Rewind `cursor`, dropping cached decisions made past the mark.
    pub fn rewind(&mut self, cursor: &mut TokenCursor, mark: Mark) {
        cursor.rewind(mark);
        self.invalidate_from(cursor.position() + 1);
    }

    /// Drop cached decisions at `position` or later.
    pub fn invalidate_from(&mut self, position: usize) {
        if !self.cache.is_empty() {
            self.cache.retain(|key, _| key.pos < position);
        }
    }
}

/// Kind of the next token as a decision sees it.
pub(crate) fn lookahead(cursor: &TokenCursor, comments: bool) -> SyntaxKind {
    if comments && cursor.peek_comment().is_some() {
        SyntaxKind::BLOCK_COMMENT
    } else {
        cursor.peek_kind(0)
    }
}

/// A recognizer over the rule table that consumes tokens without building
/// a tree. Optional and repeated elements are greedy, and alternatives are
/// tried in declaration order with the first match taken.
struct Speculation<'g, 'c, 'm> {
    grammar: &'g Grammar,
    cursor: &'c mut TokenCursor,
    memo: &'m mut FxHashMap<(RuleId, usize, bool), (Outcome, Mark)>,
    horizon: usize,
    comments: bool,
    consumed_comment: bool,
    depth: usize,
}

impl<'g, 'c, 'm> Speculation<'g, 'c, 'm> {
    fn new(
        grammar: &'g Grammar,
        cursor: &'c mut TokenCursor,
        memo: &'m mut FxHashMap<(RuleId, usize, bool), (Outcome, Mark)>,
        horizon: usize,
        comments: bool,
    ) -> Self {
        Self {
            grammar,
            cursor,
            memo,
            horizon,
            comments,
            consumed_comment: false,
            depth: 0,
        }
    }

    fn la(&self) -> SyntaxKind {
        lookahead(&*self.cursor, self.comments)
    }

    /// The lookahead budget is spent. Running into the end of input is not
    /// exhaustion: the tokens there are known.
    fn limit_reached(&self) -> bool {
        self.cursor.position() >= self.horizon && !self.cursor.at_eof()
    }

    fn fail(&self) -> Outcome {
        Outcome::Failed(self.cursor.position())
    }

    fn token(&mut self, kind: SyntaxKind) -> Outcome {
        if kind == SyntaxKind::EOF {
            return if self.cursor.at_eof() { Outcome::Matched } else { self.fail() };
        }
        if self.la() == kind {
            self.cursor.bump();
            Outcome::Matched
        } else {
            self.fail()
        }
    }

    fn element(&mut self, element: &Element) -> Outcome {
        if self.limit_reached() {
            return Outcome::Horizon;
        }
        match element {
            Element::Token(kind) | Element::Relation(kind, _) => self.token(*kind),
            Element::OneOf(set) => {
                let la = self.la();
                if la != SyntaxKind::EOF && la != SyntaxKind::BLOCK_COMMENT && set.contains(la) {
                    self.cursor.bump();
                    Outcome::Matched
                } else {
                    self.fail()
                }
            }
            Element::Comment => match self.cursor.advance_comment() {
                Some(_) => {
                    self.consumed_comment = true;
                    Outcome::Matched
                }
                None => self.fail(),
            },
            Element::Rule(id) | Element::RuleAt(id, _) => self.rule(*id),
            Element::Optional(inner) => {
                let mark = self.cursor.mark();
                match self.element(inner) {
                    Outcome::Failed(_) => {
                        self.cursor.rewind(mark);
                        Outcome::Matched
                    }
                    outcome => outcome,
                }
            }
            Element::Repeat { element: inner, min, .. } => self.repeat(inner, usize::from(*min)),
            Element::Seq(elements) => self.seq(elements),
            Element::Labeled { element: inner, .. } => self.element(inner),
        }
    }

    fn seq(&mut self, elements: &[Element]) -> Outcome {
        for element in elements {
            match self.element(element) {
                Outcome::Matched => {}
                outcome => return outcome,
            }
        }
        Outcome::Matched
    }

    fn repeat(&mut self, element: &Element, min: usize) -> Outcome {
        let mut count = 0;
        loop {
            let mark = self.cursor.mark();
            let before = self.cursor.position();
            match self.element(element) {
                Outcome::Matched => {
                    count += 1;
                    if self.cursor.position() == before && self.cursor.mark() == mark {
                        return Outcome::Matched;
                    }
                }
                Outcome::Horizon => return Outcome::Horizon,
                Outcome::Failed(at) => {
                    if count < min {
                        return Outcome::Failed(at);
                    }
                    self.cursor.rewind(mark);
                    return Outcome::Matched;
                }
            }
        }
    }

    fn rule(&mut self, id: RuleId) -> Outcome {
        if self.depth >= MAX_SPECULATION_DEPTH {
            return self.fail();
        }
        let key = (id, self.cursor.position(), self.comments);
        if let Some(&(outcome, end)) = self.memo.get(&key) {
            if outcome == Outcome::Matched {
                self.cursor.rewind(end);
            }
            return outcome;
        }

        let grammar = self.grammar;
        let saved = self.comments;
        self.comments |= grammar.rule(id).comments;
        self.depth += 1;
        let outcome = match grammar.precedence(id) {
            Some(table) => self.climbed(id, table),
            None => self.alternatives(id),
        };
        self.depth -= 1;
        self.comments = saved;

        self.memo.insert(key, (outcome, self.cursor.mark()));
        outcome
    }

    fn alternatives(&mut self, id: RuleId) -> Outcome {
        let grammar = self.grammar;
        let la = self.la();
        let start = self.cursor.mark();
        let mut farthest = self.cursor.position();
        for (index, alt) in grammar.alternatives_for(id).iter().enumerate() {
            if alt.left_recursive {
                continue;
            }
            let (first, nullable) = grammar.alternative_first(id, index);
            if !first.contains(la) && !nullable {
                continue;
            }
            match self.seq(&alt.elements) {
                Outcome::Failed(at) => {
                    farthest = farthest.max(at);
                    self.cursor.rewind(start);
                }
                outcome => return outcome,
            }
        }
        Outcome::Failed(farthest)
    }

    /// An operand followed by any run of operators. Precedence does not
    /// change which token sequences are accepted, so it is ignored here.
    fn climbed(&mut self, id: RuleId, table: &PrecedenceTable) -> Outcome {
        match self.alternatives(id) {
            Outcome::Matched => {}
            outcome => return outcome,
        }
        loop {
            if self.limit_reached() {
                return Outcome::Horizon;
            }
            let Some((tier, node)) = table.lookup(self.la()) else {
                return Outcome::Matched;
            };
            self.cursor.bump();
            let outcome = match tier.form {
                OperatorForm::Infix => self.alternatives(id),
                OperatorForm::TypeSuffix | OperatorForm::Postfix => self.rule(node),
            };
            if outcome != Outcome::Matched {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::GRAMMAR;
    use crate::parser::lexer::tokenize;

    fn cursor(input: &str) -> TokenCursor {
        TokenCursor::new(tokenize(input))
    }

    fn decide(input: &str, rule: RuleId) -> Result<usize, ParseError> {
        let mut c = cursor(input);
        let mut resolver = DecisionResolver::new(32, true);
        let candidates = GRAMMAR.atom_alternatives(rule);
        let follow = GRAMMAR.follow_set(rule);
        let result = resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false);
        assert_eq!(c.position(), 0, "decision must not move the cursor");
        result
    }

    fn first_alternative_matching(rule: RuleId, element: Element) -> usize {
        GRAMMAR
            .alternatives_for(rule)
            .iter()
            .position(|alt| alt.elements.contains(&element))
            .unwrap()
    }

    #[test]
    fn test_single_token_decision() {
        let alt = decide("null", RuleId::PrimaryExpression).unwrap();
        assert_eq!(alt, first_alternative_matching(RuleId::PrimaryExpression, Element::Rule(RuleId::NullExpression)));
    }

    #[test]
    fn test_speculation_separates_shared_prefix() {
        // `(` starts both the empty-sequence null and a sequence expression
        let null = decide("( )", RuleId::PrimaryExpression).unwrap();
        let seq = decide("( a , b )", RuleId::PrimaryExpression).unwrap();
        assert_eq!(null, first_alternative_matching(RuleId::PrimaryExpression, Element::Rule(RuleId::NullExpression)));
        assert_eq!(seq, first_alternative_matching(RuleId::PrimaryExpression, Element::Rule(RuleId::SequenceExpression)));
    }

    #[test]
    fn test_no_viable_alternative_reports_expected_set() {
        let err = decide(";", RuleId::PrimaryExpression).unwrap_err();
        match err {
            ParseError::NoViableAlternative { rule, expected, found, .. } => {
                assert_eq!(rule, RuleId::PrimaryExpression);
                assert_eq!(found, SyntaxKind::SEMICOLON);
                assert!(expected.contains(SyntaxKind::NULL_KW));
                assert!(expected.contains(SyntaxKind::L_PAREN));
                assert!(expected.contains(SyntaxKind::IDENT));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_farthest_failure_wins_when_nothing_matches() {
        // Both parenthesized alternatives fail; the sequence gets farther.
        let alt = decide("( a , ;", RuleId::PrimaryExpression).unwrap();
        assert_eq!(alt, first_alternative_matching(RuleId::PrimaryExpression, Element::Rule(RuleId::SequenceExpression)));
    }

    #[test]
    fn test_horizon_falls_back_to_declaration_order() {
        let mut c = cursor("( a , b , c , d )");
        let mut resolver = DecisionResolver::new(2, false);
        let rule = RuleId::PrimaryExpression;
        let candidates = GRAMMAR.atom_alternatives(rule);
        let alt = resolver
            .decide(&GRAMMAR, &mut c, rule, &candidates, GRAMMAR.follow_set(rule), false)
            .unwrap();
        // `( a` cannot be the empty sequence, so the sequence survives to the horizon
        assert_eq!(alt, first_alternative_matching(rule, Element::Rule(RuleId::SequenceExpression)));
    }

    #[test]
    fn test_cache_hit_and_invalidation() {
        let mut c = cursor("( a )");
        let mut resolver = DecisionResolver::new(32, true);
        let rule = RuleId::PrimaryExpression;
        let candidates = GRAMMAR.atom_alternatives(rule);
        let follow = GRAMMAR.follow_set(rule);

        let first = resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false).unwrap();
        let second = resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.stats().speculated, 1);
        assert_eq!(resolver.stats().cached, 1);

        resolver.invalidate_from(0);
        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false).unwrap();
        assert_eq!(resolver.stats().speculated, 2);
    }

    #[test]
    fn test_cache_is_keyed_by_follow() {
        let mut c = cursor("( a )");
        let mut resolver = DecisionResolver::new(32, true);
        let rule = RuleId::PrimaryExpression;
        let candidates = GRAMMAR.atom_alternatives(rule);
        let follow = GRAMMAR.follow_set(rule);
        let narrower = TokenSet::single(SyntaxKind::SEMICOLON);

        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false).unwrap();
        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, narrower, false).unwrap();
        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, true).unwrap();
        assert_eq!(resolver.stats().cached, 0);
        assert_eq!(resolver.stats().speculated, 3);

        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, narrower, false).unwrap();
        assert_eq!(resolver.stats().cached, 1);
    }

    #[test]
    fn test_cache_disabled() {
        let mut c = cursor("( a )");
        let mut resolver = DecisionResolver::new(32, false);
        let rule = RuleId::PrimaryExpression;
        let candidates = GRAMMAR.atom_alternatives(rule);
        let follow = GRAMMAR.follow_set(rule);
        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false).unwrap();
        resolver.decide(&GRAMMAR, &mut c, rule, &candidates, follow, false).unwrap();
        assert_eq!(resolver.stats().cached, 0);
        assert_eq!(resolver.stats().speculated, 2);
    }

    #[test]
    fn test_decide_enter_trailing_separator() {
        // `, )` must not enter another `, item` repetition
        let mut c = cursor(", )");
        let mut resolver = DecisionResolver::new(32, true);
        let element = Element::Seq(vec![Element::Token(SyntaxKind::COMMA), Element::Rule(RuleId::OwnedExpression)]);
        let follow = TokenSet::new(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
        assert!(!resolver.decide_enter(&GRAMMAR, &mut c, &element, follow, false));

        let mut c = cursor(", b )");
        assert!(resolver.decide_enter(&GRAMMAR, &mut c, &element, follow, false));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_decide_enter_outside_first() {
        let mut c = cursor(";");
        let mut resolver = DecisionResolver::new(32, true);
        let element = Element::Rule(RuleId::Multiplicity);
        assert!(!resolver.decide_enter(&GRAMMAR, &mut c, &element, TokenSet::EMPTY, false));
    }

    #[test]
    fn test_comment_aware_lookahead() {
        let c = cursor("/* body */ x");
        assert_eq!(lookahead(&c, true), SyntaxKind::BLOCK_COMMENT);
        assert_eq!(lookahead(&c, false), SyntaxKind::IDENT);
    }
}
