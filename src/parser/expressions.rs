//! Precedence climbing for the left-recursive expression rules
//!
//! `a - b * c . d` is parsed as one operand followed by a loop over operator
//! tokens. Each operator either takes a right operand climbed at a higher
//! minimum level (infix) or a suffix parsed from its node rule (type
//! suffix, postfix). Chains of equal-level operators grow the tree to the
//! left inside the loop, so their length never deepens the call stack.
//!
//! Every operator node carries `left` and `operator` fields; infix nodes add
//! `right`, suffix nodes add whatever their rule labels.

use super::errors::ParseError;
use super::grammar::{OperatorForm, RuleId};
use super::parser::Parser;
use super::syntax_kind::TokenSet;
use super::tree::{NodeBuilder, ParseNode};

impl Parser<'_> {
    /// Parse `rule` accepting only operators at `min_level` or tighter.
    pub(super) fn parse_climbed(&mut self, rule: RuleId, min_level: u8, follow: TokenSet) -> Result<ParseNode, ParseError> {
        let grammar = self.grammar;
        let Some(table) = grammar.precedence(rule) else {
            let mut node = NodeBuilder::new(rule);
            self.parse_rule_body(rule, &mut node, follow)?;
            return Ok(node.finish());
        };
        let follow = follow.union(table.operators());

        let mut left = self.parse_operand(rule, follow)?;
        loop {
            let Some((tier, node_rule)) = table.lookup(self.cursor.peek_kind(0)) else {
                break;
            };
            if tier.level < min_level {
                break;
            }
            self.check_cancelled()?;

            let operator = self.cursor.advance()?;
            tracing::trace!(%rule, level = tier.level, op = %operator.text, "[CLIMB] operator");
            let mut node = NodeBuilder::new(node_rule);
            node.push_labeled_node("left", left);
            node.push_labeled_token("operator", operator);
            match tier.form {
                OperatorForm::Infix => {
                    // right-associative chains recurse here, so this counts
                    // toward the nesting limit like any rule invocation
                    let start = node.len();
                    self.parse_rule_at(rule, tier.operand_level(), &mut node, follow)?;
                    node.label("right", false, start, false, None);
                }
                OperatorForm::TypeSuffix | OperatorForm::Postfix => {
                    self.parse_rule_body(node_rule, &mut node, follow)?;
                }
            }
            left = node.finish();
        }
        Ok(left)
    }

    /// One operand: a non-left-recursive alternative of `rule`.
    fn parse_operand(&mut self, rule: RuleId, follow: TokenSet) -> Result<ParseNode, ParseError> {
        let mut atom = NodeBuilder::new(rule);
        self.parse_rule_body(rule, &mut atom, follow)?;
        Ok(match atom.into_single_node() {
            Ok(node) => node,
            Err(atom) => atom.finish(),
        })
    }
}
