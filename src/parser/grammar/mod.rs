//! Grammar rule table
//!
//! Rules are data: each [`RuleId`] maps to an ordered list of
//! [`Alternative`]s built from [`Element`]s. The table is constructed once
//! ([`GRAMMAR`]) together with its FIRST, FOLLOW and nullable sets, and is
//! shared read-only by every parse.
//!
//! Two expression rules are left-recursive. Their operator tiers live in
//! [`PrecedenceTable`]s; the table also records the left-recursive
//! alternatives they imply so that FIRST/FOLLOW see every operator, but the
//! parser only ever enters those rules through the precedence climber.

mod kerml;
mod kerml_expressions;
mod rule_id;
mod sets;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use super::syntax_kind::{SyntaxKind, TokenSet};
pub use kerml_expressions::{Associativity, OperatorForm, PrecedenceTable, PrecedenceTier};
pub use rule_id::RuleId;

/// The KerML rule table, built on first use.
pub static GRAMMAR: Lazy<Grammar> =
    Lazy::new(|| Grammar::build(kerml::rules(), kerml_expressions::precedence_tables()));

/// The relationship denoted by a token-synonym alternative.
///
/// Symbolic and keyword spellings of one relationship record the same
/// `Relation` in their labeled field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Specializes,
    Subsets,
    Redefines,
    References,
    Crosses,
    Typing,
    Conjugates,
    Annotates,
}

impl Relation {
    pub fn name(self) -> &'static str {
        match self {
            Relation::Specializes => "specializes",
            Relation::Subsets => "subsets",
            Relation::Redefines => "redefines",
            Relation::References => "references",
            Relation::Crosses => "crosses",
            Relation::Typing => "typed by",
            Relation::Conjugates => "conjugates",
            Relation::Annotates => "annotates",
        }
    }
}

/// One step of an alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A single token kind. `Token(EOF)` matches end of input without
    /// consuming it.
    Token(SyntaxKind),
    /// Any token in the set.
    OneOf(TokenSet),
    /// A token spelling of a relationship.
    Relation(SyntaxKind, Relation),
    /// A comment-channel body token.
    Comment,
    Rule(RuleId),
    /// A left-recursive rule entered at a minimum precedence level.
    RuleAt(RuleId, u8),
    Optional(Box<Element>),
    /// Zero-or-more (`min == 0`) or one-or-more (`min == 1`).
    ///
    /// A `resync` list skips tokens it cannot use; any other list stops and
    /// leaves them to whatever comes after it.
    Repeat {
        element: Box<Element>,
        min: u8,
        resync: bool,
    },
    Seq(Vec<Element>),
    /// Records what `element` produced under `name`.
    ///
    /// `many` fields collect a list; single fields keep the first result.
    Labeled {
        name: &'static str,
        many: bool,
        element: Box<Element>,
    },
}

impl Element {
    /// Whether a label over this element captures tokens rather than nodes.
    pub fn captures_tokens(&self) -> bool {
        match self {
            Element::Token(_) | Element::OneOf(_) | Element::Relation(..) | Element::Comment => true,
            Element::Rule(_) | Element::RuleAt(..) => false,
            Element::Optional(e)
            | Element::Repeat { element: e, .. }
            | Element::Labeled { element: e, .. } => e.captures_tokens(),
            Element::Seq(es) => !es.is_empty() && es.iter().all(Element::captures_tokens),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub elements: Vec<Element>,
    /// Implied by a precedence tier; never chosen by the decision resolver.
    pub left_recursive: bool,
}

/// How a rule's result is attached to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The rule produces its own node.
    Node,
    /// The rule's children and fields are spliced into the invoking node.
    Inline,
}

#[derive(Debug, Clone)]
pub struct RuleDef {
    pub id: RuleId,
    pub shape: Shape,
    pub alternatives: Vec<Alternative>,
    /// Lookahead inside this rule sees comment-channel tokens.
    pub comments: bool,
}

pub struct Grammar {
    rules: Vec<RuleDef>,
    sets: sets::GrammarSets,
    precedence: FxHashMap<RuleId, PrecedenceTable>,
}

impl Grammar {
    pub fn build(defs: Vec<RuleDef>, tables: Vec<PrecedenceTable>) -> Grammar {
        let mut rules: Vec<RuleDef> = RuleId::ALL
            .iter()
            .map(|&id| RuleDef {
                id,
                shape: Shape::Node,
                alternatives: Vec::new(),
                comments: false,
            })
            .collect();
        for def in defs {
            let index = def.id.index();
            rules[index] = def;
        }

        let mut precedence = FxHashMap::default();
        for table in tables {
            rules[table.rule.index()]
                .alternatives
                .extend(table.left_recursive_alternatives());
            precedence.insert(table.rule, table);
        }

        let sets = sets::compute(&rules);
        tracing::trace!(rules = rules.len(), "[GRAMMAR] rule table built");
        Grammar {
            rules,
            sets,
            precedence,
        }
    }

    pub fn rule(&self, rule: RuleId) -> &RuleDef {
        &self.rules[rule.index()]
    }

    pub fn alternatives_for(&self, rule: RuleId) -> &[Alternative] {
        &self.rules[rule.index()].alternatives
    }

    pub fn shape(&self, rule: RuleId) -> Shape {
        self.rules[rule.index()].shape
    }

    pub fn first_set(&self, rule: RuleId) -> TokenSet {
        self.sets.first[rule.index()]
    }

    pub fn follow_set(&self, rule: RuleId) -> TokenSet {
        self.sets.follow[rule.index()]
    }

    pub fn nullable(&self, rule: RuleId) -> bool {
        self.sets.nullable[rule.index()]
    }

    /// FIRST set and nullability of one alternative.
    pub fn alternative_first(&self, rule: RuleId, alt: usize) -> (TokenSet, bool) {
        self.sets.alternatives[rule.index()][alt]
    }

    pub fn first_of(&self, element: &Element) -> (TokenSet, bool) {
        sets::first_of(element, &self.sets.first, &self.sets.nullable)
    }

    pub fn first_of_seq(&self, elements: &[Element]) -> (TokenSet, bool) {
        sets::first_of_seq(elements, &self.sets.first, &self.sets.nullable)
    }

    pub fn precedence(&self, rule: RuleId) -> Option<&PrecedenceTable> {
        self.precedence.get(&rule)
    }

    /// Indices of the alternatives the decision resolver may choose.
    pub fn atom_alternatives(&self, rule: RuleId) -> Vec<usize> {
        self.alternatives_for(rule)
            .iter()
            .enumerate()
            .filter(|(_, alt)| !alt.left_recursive)
            .map(|(i, _)| i)
            .collect()
    }
}

// ============================================================================
// Rule construction helpers
// ============================================================================

/// Surface spellings of one relationship.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Synonym {
    pub relation: Relation,
    pub spellings: &'static [&'static [SyntaxKind]],
}

pub(crate) fn tok(kind: SyntaxKind) -> Element {
    Element::Token(kind)
}

pub(crate) fn one_of(kinds: &[SyntaxKind]) -> Element {
    Element::OneOf(TokenSet::new(kinds))
}

pub(crate) fn rule(id: RuleId) -> Element {
    Element::Rule(id)
}

pub(crate) fn rule_at(id: RuleId, level: u8) -> Element {
    Element::RuleAt(id, level)
}

pub(crate) fn opt(element: Element) -> Element {
    Element::Optional(Box::new(element))
}

pub(crate) fn many(element: Element) -> Element {
    Element::Repeat {
        element: Box::new(element),
        min: 0,
        resync: false,
    }
}

pub(crate) fn some(element: Element) -> Element {
    Element::Repeat {
        element: Box::new(element),
        min: 1,
        resync: false,
    }
}

/// Member list of a body: a stray token is reported and skipped here.
pub(crate) fn members(element: Element) -> Element {
    Element::Repeat {
        element: Box::new(element),
        min: 0,
        resync: true,
    }
}

pub(crate) fn seq(elements: Vec<Element>) -> Element {
    Element::Seq(elements)
}

pub(crate) fn field(name: &'static str, element: Element) -> Element {
    Element::Labeled {
        name,
        many: false,
        element: Box::new(element),
    }
}

pub(crate) fn list(name: &'static str, element: Element) -> Element {
    Element::Labeled {
        name,
        many: true,
        element: Box::new(element),
    }
}

pub(crate) fn comment_body() -> Element {
    Element::Comment
}

/// `first (',' next)*` where every item is an `item`, collected in `name`.
pub(crate) fn separated(name: &'static str, item: RuleId) -> Element {
    list(
        name,
        seq(vec![rule(item), many(seq(vec![tok(SyntaxKind::COMMA), rule(item)]))]),
    )
}

/// One alternative per spelling of `synonym`, each `prefix ++ spelling ++ rest`.
///
/// The first token of every spelling is recorded under the `relation` field.
pub(crate) fn spelled(prefix: Vec<Element>, synonym: Synonym, rest: Vec<Element>) -> Vec<Vec<Element>> {
    synonym
        .spellings
        .iter()
        .map(|spelling| {
            let mut elements = prefix.clone();
            if let Some((&head, tail)) = spelling.split_first() {
                elements.push(field("relation", Element::Relation(head, synonym.relation)));
                elements.extend(tail.iter().map(|&k| tok(k)));
            }
            elements.extend(rest.iter().cloned());
            elements
        })
        .collect()
}

fn def(id: RuleId, shape: Shape, alternatives: Vec<Vec<Element>>) -> RuleDef {
    RuleDef {
        id,
        shape,
        alternatives: alternatives
            .into_iter()
            .map(|elements| Alternative {
                elements,
                left_recursive: false,
            })
            .collect(),
        comments: false,
    }
}

pub(crate) fn node(id: RuleId, alternatives: Vec<Vec<Element>>) -> RuleDef {
    def(id, Shape::Node, alternatives)
}

pub(crate) fn inline(id: RuleId, alternatives: Vec<Vec<Element>>) -> RuleDef {
    def(id, Shape::Inline, alternatives)
}

/// A node rule whose lookahead sees comment-channel tokens.
pub(crate) fn commented(id: RuleId, alternatives: Vec<Vec<Element>>) -> RuleDef {
    RuleDef {
        comments: true,
        ..def(id, Shape::Node, alternatives)
    }
}
