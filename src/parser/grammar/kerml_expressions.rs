//! KerML expression rules and precedence tables
//!
//! `OwnedExpression` and `PrimaryExpression` are left-recursive in the
//! language grammar. Here each is declared by its non-left-recursive atoms
//! plus a [`PrecedenceTable`]; the precedence climber drives the operators.
//!
//! General expression tiers, loosest first:
//!
//! | level | operators                           | form        |
//! |-------|-------------------------------------|-------------|
//! | 1     | `??`                                | infix       |
//! | 2     | `implies`                           | infix       |
//! | 3     | `or` `\|`                           | infix       |
//! | 4     | `xor`                               | infix       |
//! | 5     | `and` `&`                           | infix       |
//! | 6     | `==` `!=` `===` `!==`               | infix       |
//! | 7     | `istype` `hastype` `@` `@@` `as` `meta` | type suffix |
//! | 8     | `<` `>` `<=` `>=`                   | infix       |
//! | 9     | `..`                                | infix       |
//! | 10    | `+` `-`                             | infix       |
//! | 11    | `*` `/` `%`                         | infix       |
//! | 12    | `**` `^`                            | infix, right |
//!
//! Primary expressions have a single postfix tier (13): `.` `#` `[` `->` `(`.

use super::{
    Alternative, Element, RuleDef, RuleId, field, list, many, node, one_of, opt, rule, rule_at,
    separated, inline, seq, tok,
};
use crate::parser::syntax_kind::{SyntaxKind, TokenSet};
use SyntaxKind::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorForm {
    /// `left op right`, right operand is a full expression at a higher tier
    Infix,
    /// `left op Type`, only a type reference follows
    TypeSuffix,
    /// `left op suffix`, the suffix grammar is the node rule's alternatives
    Postfix,
}

#[derive(Debug, Clone)]
pub struct PrecedenceTier {
    pub level: u8,
    /// Operator token and the node rule it builds
    pub operators: Vec<(SyntaxKind, RuleId)>,
    pub associativity: Associativity,
    pub form: OperatorForm,
}

impl PrecedenceTier {
    fn uniform(level: u8, ops: &[SyntaxKind], node: RuleId, form: OperatorForm) -> Self {
        Self {
            level,
            operators: ops.iter().map(|&k| (k, node)).collect(),
            associativity: Associativity::Left,
            form,
        }
    }

    pub fn infix(level: u8, ops: &[SyntaxKind]) -> Self {
        Self::uniform(level, ops, RuleId::OperatorExpression, OperatorForm::Infix)
    }

    pub fn type_suffix(level: u8, ops: &[SyntaxKind]) -> Self {
        Self::uniform(level, ops, RuleId::ClassificationExpression, OperatorForm::TypeSuffix)
    }

    pub fn postfix(level: u8, ops: &[(SyntaxKind, RuleId)]) -> Self {
        Self {
            level,
            operators: ops.to_vec(),
            associativity: Associativity::Left,
            form: OperatorForm::Postfix,
        }
    }

    pub fn right(mut self) -> Self {
        self.associativity = Associativity::Right;
        self
    }

    pub fn tokens(&self) -> TokenSet {
        self.operators.iter().map(|(k, _)| *k).collect()
    }

    pub fn node_for(&self, kind: SyntaxKind) -> Option<RuleId> {
        self.operators.iter().find(|(k, _)| *k == kind).map(|(_, r)| *r)
    }

    /// Minimum level in force while parsing the right operand.
    pub fn operand_level(&self) -> u8 {
        match self.associativity {
            Associativity::Left => self.level + 1,
            Associativity::Right => self.level,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrecedenceTable {
    pub rule: RuleId,
    /// Ordered loosest to tightest
    pub tiers: Vec<PrecedenceTier>,
    operators: TokenSet,
}

impl PrecedenceTable {
    pub fn new(rule: RuleId, tiers: Vec<PrecedenceTier>) -> Self {
        let operators = tiers
            .iter()
            .fold(TokenSet::EMPTY, |acc, tier| acc.union(tier.tokens()));
        Self {
            rule,
            tiers,
            operators,
        }
    }

    pub fn operators(&self) -> TokenSet {
        self.operators
    }

    /// The tier and node rule for an operator token.
    pub fn lookup(&self, kind: SyntaxKind) -> Option<(&PrecedenceTier, RuleId)> {
        if !self.operators.contains(kind) {
            return None;
        }
        self.tiers
            .iter()
            .find_map(|tier| tier.node_for(kind).map(|node| (tier, node)))
    }

    /// The left-recursive alternatives the tiers stand for, used only for
    /// FIRST/FOLLOW computation.
    pub(super) fn left_recursive_alternatives(&self) -> Vec<Alternative> {
        let mut alts = Vec::new();
        for tier in &self.tiers {
            let shapes: Vec<Vec<Element>> = match tier.form {
                OperatorForm::Infix => vec![vec![
                    rule(self.rule),
                    Element::OneOf(tier.tokens()),
                    rule_at(self.rule, tier.operand_level()),
                ]],
                OperatorForm::TypeSuffix | OperatorForm::Postfix => tier
                    .operators
                    .iter()
                    .map(|&(op, node)| vec![rule(self.rule), tok(op), rule(node)])
                    .collect(),
            };
            alts.extend(shapes.into_iter().map(|elements| Alternative {
                elements,
                left_recursive: true,
            }));
        }
        alts
    }
}

pub(super) fn precedence_tables() -> Vec<PrecedenceTable> {
    vec![
        PrecedenceTable::new(
            RuleId::OwnedExpression,
            vec![
                PrecedenceTier::infix(1, &[QUESTION_QUESTION]),
                PrecedenceTier::infix(2, &[IMPLIES_KW]),
                PrecedenceTier::infix(3, &[OR_KW, PIPE]),
                PrecedenceTier::infix(4, &[XOR_KW]),
                PrecedenceTier::infix(5, &[AND_KW, AMP]),
                PrecedenceTier::infix(6, &[EQ_EQ, BANG_EQ, EQ_EQ_EQ, BANG_EQ_EQ]),
                PrecedenceTier::type_suffix(7, &[ISTYPE_KW, HASTYPE_KW, AT, AT_AT, AS_KW, META_KW]),
                PrecedenceTier::infix(8, &[LT, GT, LT_EQ, GT_EQ]),
                PrecedenceTier::infix(9, &[DOT_DOT]),
                PrecedenceTier::infix(10, &[PLUS, MINUS]),
                PrecedenceTier::infix(11, &[STAR, SLASH, PERCENT]),
                PrecedenceTier::infix(12, &[STAR_STAR, CARET]).right(),
            ],
        ),
        PrecedenceTable::new(
            RuleId::PrimaryExpression,
            vec![PrecedenceTier::postfix(
                13,
                &[
                    (DOT, RuleId::FeatureChainExpression),
                    (HASH, RuleId::IndexExpression),
                    (L_BRACKET, RuleId::BracketExpression),
                    (ARROW, RuleId::ArrowInvocationExpression),
                    (L_PAREN, RuleId::InvocationExpression),
                ],
            )],
        ),
    ]
}

pub(super) fn rules() -> Vec<RuleDef> {
    use RuleId as R;
    vec![
        // Atoms of the general expression; operators come from the table.
        node(
            R::OwnedExpression,
            vec![
                vec![rule(R::ConditionalExpression)],
                vec![rule(R::UnaryExpression)],
                vec![rule(R::SelfClassificationExpression)],
                vec![rule(R::PrimaryExpression)],
            ],
        ),
        node(
            R::OperatorExpression,
            vec![vec![field("right", rule(R::OwnedExpression))]],
        ),
        node(
            R::ClassificationExpression,
            vec![vec![field("type", rule(R::QualifiedName))]],
        ),
        node(
            R::ConditionalExpression,
            vec![vec![
                tok(IF_KW),
                field("condition", rule(R::OwnedExpression)),
                tok(QUESTION),
                field("then", rule(R::OwnedExpression)),
                tok(ELSE_KW),
                field("else", rule(R::OwnedExpression)),
            ]],
        ),
        node(
            R::UnaryExpression,
            vec![vec![
                field("operator", one_of(&[PLUS, MINUS, TILDE, NOT_KW, ALL_KW])),
                field("operand", rule(R::PrimaryExpression)),
            ]],
        ),
        node(
            R::SelfClassificationExpression,
            vec![vec![
                field("operator", one_of(&[ISTYPE_KW, HASTYPE_KW, AT, AT_AT, AS_KW, META_KW])),
                field("type", rule(R::QualifiedName)),
            ]],
        ),
        // Atoms of the primary expression; postfix operators come from the table.
        node(
            R::PrimaryExpression,
            vec![
                vec![rule(R::NullExpression)],
                vec![rule(R::LiteralExpression)],
                vec![rule(R::SequenceExpression)],
                vec![rule(R::BodyExpression)],
                vec![rule(R::NewExpression)],
                vec![rule(R::FeatureReferenceExpression)],
            ],
        ),
        // Postfix suffixes: what follows the operator token.
        node(
            R::FeatureChainExpression,
            vec![
                vec![field("member", rule(R::QualifiedName))],
                vec![tok(QUESTION), field("select", rule(R::BodyExpression))],
                vec![field("collect", rule(R::BodyExpression))],
            ],
        ),
        node(
            R::IndexExpression,
            vec![vec![tok(L_PAREN), separated("indices", R::OwnedExpression), tok(R_PAREN)]],
        ),
        node(
            R::BracketExpression,
            vec![vec![separated("indices", R::OwnedExpression), tok(R_BRACKET)]],
        ),
        node(
            R::ArrowInvocationExpression,
            vec![
                vec![field("function", rule(R::QualifiedName)), field("arguments", rule(R::ArgumentList))],
                vec![field("function", rule(R::QualifiedName)), field("body", rule(R::BodyExpression))],
                vec![field("function", rule(R::QualifiedName))],
            ],
        ),
        node(
            R::InvocationExpression,
            vec![vec![opt(rule(R::Arguments)), tok(R_PAREN)]],
        ),
        node(
            R::NullExpression,
            vec![vec![tok(NULL_KW)], vec![tok(L_PAREN), tok(R_PAREN)]],
        ),
        node(
            R::LiteralExpression,
            vec![vec![field(
                "value",
                one_of(&[INTEGER, DECIMAL, STRING, TRUE_KW, FALSE_KW, STAR]),
            )]],
        ),
        node(
            R::SequenceExpression,
            vec![vec![
                tok(L_PAREN),
                separated("elements", R::OwnedExpression),
                opt(tok(COMMA)),
                tok(R_PAREN),
            ]],
        ),
        node(
            R::BodyExpression,
            vec![vec![
                tok(L_BRACE),
                list("parameters", many(rule(R::BodyParameter))),
                field("result", opt(rule(R::OwnedExpression))),
                tok(R_BRACE),
            ]],
        ),
        node(
            R::BodyParameter,
            vec![vec![
                field("direction", tok(IN_KW)),
                field("identification", rule(R::Identification)),
                list("specializations", many(rule(R::FeatureRelationship))),
                tok(SEMICOLON),
            ]],
        ),
        node(
            R::NewExpression,
            vec![vec![
                tok(NEW_KW),
                field("type", rule(R::QualifiedName)),
                field("arguments", rule(R::ArgumentList)),
            ]],
        ),
        node(
            R::FeatureReferenceExpression,
            vec![vec![field("reference", rule(R::QualifiedName))]],
        ),
        node(
            R::ArgumentList,
            vec![vec![tok(L_PAREN), opt(rule(R::Arguments)), tok(R_PAREN)]],
        ),
        inline(
            R::Arguments,
            vec![vec![
                list("arguments", rule(R::Argument)),
                many(seq(vec![tok(COMMA), list("arguments", rule(R::Argument))])),
            ]],
        ),
        inline(
            R::Argument,
            vec![vec![rule(R::NamedArgument)], vec![rule(R::PositionalArgument)]],
        ),
        node(
            R::NamedArgument,
            vec![vec![
                field("name", tok(IDENT)),
                tok(EQ),
                field("value", rule(R::OwnedExpression)),
            ]],
        ),
        node(
            R::PositionalArgument,
            vec![vec![field("value", rule(R::OwnedExpression))]],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_strictly_increase_in_binding_power() {
        for table in precedence_tables() {
            for pair in table.tiers.windows(2) {
                assert!(pair[0].level < pair[1].level);
            }
        }
    }

    #[test]
    fn test_operator_tokens_are_unique_per_table() {
        for table in precedence_tables() {
            let total: usize = table.tiers.iter().map(|t| t.operators.len()).sum();
            assert_eq!(table.operators().len(), total);
        }
    }

    #[test]
    fn test_lookup() {
        let tables = precedence_tables();
        let general = &tables[0];
        let (tier, node) = general.lookup(AND_KW).unwrap();
        assert_eq!(tier.level, 5);
        assert_eq!(node, RuleId::OperatorExpression);
        let (tier, node) = general.lookup(ISTYPE_KW).unwrap();
        assert_eq!(tier.form, OperatorForm::TypeSuffix);
        assert_eq!(node, RuleId::ClassificationExpression);
        assert!(general.lookup(SEMICOLON).is_none());

        let (tier, node) = tables[1].lookup(ARROW).unwrap();
        assert_eq!(tier.level, 13);
        assert_eq!(node, RuleId::ArrowInvocationExpression);
    }

    #[test]
    fn test_operand_levels() {
        let minus = PrecedenceTier::infix(10, &[MINUS]);
        assert_eq!(minus.operand_level(), 11);
        let power = PrecedenceTier::infix(12, &[CARET]).right();
        assert_eq!(power.operand_level(), 12);
    }

    #[test]
    fn test_left_recursive_alternatives_start_with_the_rule() {
        let tables = precedence_tables();
        for table in &tables {
            for alt in table.left_recursive_alternatives() {
                assert!(alt.left_recursive);
                assert_eq!(alt.elements[0], rule(table.rule));
            }
        }
        // One per infix tier plus one per type-suffix operator.
        assert_eq!(tables[0].left_recursive_alternatives().len(), 11 + 6);
        assert_eq!(tables[1].left_recursive_alternatives().len(), 5);
    }
}
