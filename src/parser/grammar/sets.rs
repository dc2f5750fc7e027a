//! FIRST, FOLLOW and nullable sets
//!
//! Rules are mutually recursive, so all three are computed by iterating to a
//! fixed point over the whole table.

use super::{Element, RuleDef};
use crate::parser::syntax_kind::{SyntaxKind, TokenSet};

pub(super) struct GrammarSets {
    pub first: Vec<TokenSet>,
    pub nullable: Vec<bool>,
    pub follow: Vec<TokenSet>,
    /// FIRST set and nullability per alternative, indexed `[rule][alt]`
    pub alternatives: Vec<Vec<(TokenSet, bool)>>,
}

pub(super) fn first_of(element: &Element, first: &[TokenSet], nullable: &[bool]) -> (TokenSet, bool) {
    match element {
        Element::Token(kind) | Element::Relation(kind, _) => (TokenSet::single(*kind), false),
        Element::OneOf(set) => (*set, false),
        Element::Comment => (TokenSet::single(SyntaxKind::BLOCK_COMMENT), false),
        Element::Rule(r) | Element::RuleAt(r, _) => (first[r.index()], nullable[r.index()]),
        Element::Optional(e) => (first_of(e, first, nullable).0, true),
        Element::Repeat { element, min, .. } => {
            let (set, inner_nullable) = first_of(element, first, nullable);
            (set, *min == 0 || inner_nullable)
        }
        Element::Seq(elements) => first_of_seq(elements, first, nullable),
        Element::Labeled { element, .. } => first_of(element, first, nullable),
    }
}

pub(super) fn first_of_seq(elements: &[Element], first: &[TokenSet], nullable: &[bool]) -> (TokenSet, bool) {
    let mut set = TokenSet::EMPTY;
    for element in elements {
        let (f, n) = first_of(element, first, nullable);
        set.extend(f);
        if !n {
            return (set, false);
        }
    }
    (set, true)
}

pub(super) fn compute(rules: &[RuleDef]) -> GrammarSets {
    let count = rules.len();
    let mut first = vec![TokenSet::EMPTY; count];
    let mut nullable = vec![false; count];

    let mut changed = true;
    while changed {
        changed = false;
        for def in rules {
            let i = def.id.index();
            for alt in &def.alternatives {
                let (f, n) = first_of_seq(&alt.elements, &first, &nullable);
                changed |= first[i].extend(f);
                if n && !nullable[i] {
                    nullable[i] = true;
                    changed = true;
                }
            }
        }
    }

    // Any rule can be an entry point, so end of input may follow every rule.
    let mut follow = vec![TokenSet::single(SyntaxKind::EOF); count];
    let mut changed = true;
    while changed {
        changed = false;
        for def in rules {
            let trailer = follow[def.id.index()];
            for alt in &def.alternatives {
                changed |= add_follow_seq(&alt.elements, trailer, &first, &nullable, &mut follow);
            }
        }
    }

    let alternatives = rules
        .iter()
        .map(|def| {
            def.alternatives
                .iter()
                .map(|alt| first_of_seq(&alt.elements, &first, &nullable))
                .collect()
        })
        .collect();

    GrammarSets {
        first,
        nullable,
        follow,
        alternatives,
    }
}

/// Propagate `trailer` (what may follow the sequence) into the FOLLOW sets
/// of the rules referenced by `elements`, right to left.
fn add_follow_seq(
    elements: &[Element],
    trailer: TokenSet,
    first: &[TokenSet],
    nullable: &[bool],
    follow: &mut [TokenSet],
) -> bool {
    let mut changed = false;
    let mut trailer = trailer;
    for element in elements.iter().rev() {
        changed |= add_follow(element, trailer, first, nullable, follow);
        let (f, n) = first_of(element, first, nullable);
        trailer = if n { trailer.union(f) } else { f };
    }
    changed
}

fn add_follow(
    element: &Element,
    trailer: TokenSet,
    first: &[TokenSet],
    nullable: &[bool],
    follow: &mut [TokenSet],
) -> bool {
    match element {
        Element::Rule(r) | Element::RuleAt(r, _) => follow[r.index()].extend(trailer),
        Element::Optional(e) | Element::Labeled { element: e, .. } => {
            add_follow(e, trailer, first, nullable, follow)
        }
        Element::Repeat { element, .. } => {
            let again = first_of(element, first, nullable).0;
            add_follow(element, trailer.union(again), first, nullable, follow)
        }
        Element::Seq(elements) => add_follow_seq(elements, trailer, first, nullable, follow),
        Element::Token(_) | Element::OneOf(_) | Element::Relation(..) | Element::Comment => false,
    }
}
