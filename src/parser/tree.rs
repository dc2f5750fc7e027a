//! Parse tree
//!
//! A [`ParseNode`] owns its children in source order. Labeled fields are
//! indices into that children list, so named access never duplicates or
//! shares a child.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;

use super::grammar::{Relation, RuleId};
use super::lexer::Token;
use crate::base::TextRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(ParseNode),
    Token(Token),
}

impl Child {
    pub fn as_node(&self) -> Option<&ParseNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Child::Token(token) => Some(token),
            Child::Node(_) => None,
        }
    }
}

/// Where a labeled field points in the children list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSlot {
    One(usize),
    Many(Vec<usize>),
    /// A relationship token, normalized across its spellings
    Relation(Relation, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    rule: RuleId,
    children: Vec<Child>,
    fields: IndexMap<&'static str, FieldSlot>,
    error: bool,
}

impl ParseNode {
    pub fn rule(&self) -> RuleId {
        self.rule
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter_map(Child::as_node)
    }

    /// Whether recovery happened directly inside this node.
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Whether recovery happened anywhere in this subtree.
    pub fn has_errors(&self) -> bool {
        self.error || self.child_nodes().any(ParseNode::has_errors)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The child recorded under `name`; the first element of list fields.
    pub fn field(&self, name: &str) -> Option<&Child> {
        let index = match self.fields.get(name)? {
            FieldSlot::One(i) | FieldSlot::Relation(_, i) => *i,
            FieldSlot::Many(items) => *items.first()?,
        };
        self.children.get(index)
    }

    pub fn field_node(&self, name: &str) -> Option<&ParseNode> {
        self.field(name).and_then(Child::as_node)
    }

    pub fn field_token(&self, name: &str) -> Option<&Token> {
        self.field(name).and_then(Child::as_token)
    }

    /// Every child recorded under `name`, in source order.
    pub fn field_all(&self, name: &str) -> Vec<&Child> {
        match self.fields.get(name) {
            Some(FieldSlot::One(i)) | Some(FieldSlot::Relation(_, i)) => {
                self.children.get(*i).into_iter().collect()
            }
            Some(FieldSlot::Many(items)) => items.iter().filter_map(|&i| self.children.get(i)).collect(),
            None => Vec::new(),
        }
    }

    pub fn field_nodes(&self, name: &str) -> Vec<&ParseNode> {
        self.field_all(name).into_iter().filter_map(Child::as_node).collect()
    }

    pub fn field_tokens(&self, name: &str) -> Vec<&Token> {
        self.field_all(name).into_iter().filter_map(Child::as_token).collect()
    }

    /// The normalized relationship recorded under `name`.
    pub fn relation(&self, name: &str) -> Option<Relation> {
        match self.fields.get(name)? {
            FieldSlot::Relation(relation, _) => Some(*relation),
            _ => None,
        }
    }

    /// The `name` token of this node's identification, if any.
    pub fn name(&self) -> Option<&str> {
        self.field_node("identification")
            .and_then(|id| id.field_token("name"))
            .map(|t| t.text.as_str())
    }

    /// Every token in the subtree, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                Child::Token(token) => out.push(token),
                Child::Node(node) => node.collect_tokens(out),
            }
        }
    }

    /// Token texts of the subtree, separated by a single space wherever the
    /// source had a gap.
    pub fn text(&self) -> String {
        let mut text = String::new();
        let mut end = None;
        for token in self.tokens() {
            if end.is_some_and(|e| e != token.offset) {
                text.push(' ');
            }
            text.push_str(&token.text);
            end = Some(token.range().end());
        }
        text
    }

    pub fn range(&self) -> Option<TextRange> {
        let tokens = self.tokens();
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(TextRange::new(first.offset, last.range().end()))
    }

    /// All nodes of the subtree in preorder, starting with `self`.
    pub fn descendants(&self) -> Vec<&ParseNode> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes<'a>(&'a self, out: &mut Vec<&'a ParseNode>) {
        out.push(self);
        for node in self.child_nodes() {
            node.collect_nodes(out);
        }
    }

    /// First node of `rule` in preorder.
    pub fn find(&self, rule: RuleId) -> Option<&ParseNode> {
        self.descendants().into_iter().find(|n| n.rule == rule)
    }

    /// Rule plus labeled fields, with relationship spellings normalized.
    ///
    /// Two nodes with the same shape carry the same information for a
    /// downstream consumer, whatever surface spelling produced them.
    pub fn shape(&self) -> NodeShape {
        let fields = self
            .fields
            .iter()
            .map(|(name, slot)| {
                let shape = match slot {
                    FieldSlot::Relation(relation, _) => FieldShape::Relation(*relation),
                    FieldSlot::One(i) => self.child_shape(*i),
                    FieldSlot::Many(items) => FieldShape::List(items.iter().map(|&i| self.child_shape(i)).collect()),
                };
                (*name, shape)
            })
            .collect();
        NodeShape {
            rule: self.rule,
            fields,
        }
    }

    fn child_shape(&self, index: usize) -> FieldShape {
        match &self.children[index] {
            Child::Node(node) => FieldShape::Node(node.shape()),
            Child::Token(token) => FieldShape::Token(token.text.clone()),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let marker = if self.error { " !" } else { "" };
        writeln!(f, "{:indent$}{}{}", "", self.rule, marker, indent = depth * 2)?;
        for child in &self.children {
            match child {
                Child::Node(node) => node.fmt_indented(f, depth + 1)?,
                Child::Token(token) => {
                    writeln!(f, "{:indent$}{:?}", "", token.text.as_str(), indent = (depth + 1) * 2)?
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeShape {
    pub rule: RuleId,
    pub fields: Vec<(&'static str, FieldShape)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    Node(NodeShape),
    Token(SmolStr),
    Relation(Relation),
    List(Vec<FieldShape>),
}

/// Accumulates the children and fields of one node while its rule runs.
#[derive(Debug)]
pub struct NodeBuilder {
    rule: RuleId,
    children: Vec<Child>,
    fields: IndexMap<&'static str, FieldSlot>,
    error: bool,
}

impl NodeBuilder {
    pub fn new(rule: RuleId) -> Self {
        Self {
            rule,
            children: Vec::new(),
            fields: IndexMap::new(),
            error: false,
        }
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn push_token(&mut self, token: Token) {
        self.children.push(Child::Token(token));
    }

    pub fn push_node(&mut self, node: ParseNode) {
        self.children.push(Child::Node(node));
    }

    pub fn mark_error(&mut self) {
        self.error = true;
    }

    /// Record the children added since `start` under `name`.
    ///
    /// Token labels capture tokens, rule labels capture nodes; recovery
    /// nodes are never captured. Single fields keep their first value.
    pub fn label(&mut self, name: &'static str, many: bool, start: usize, tokens: bool, relation: Option<Relation>) {
        let captured: Vec<usize> = (start..self.children.len())
            .filter(|&i| match &self.children[i] {
                Child::Token(_) => tokens,
                Child::Node(node) => !tokens && node.rule != RuleId::Error,
            })
            .collect();

        if many {
            match self.fields.entry(name) {
                Entry::Occupied(mut entry) => {
                    if let FieldSlot::Many(items) = entry.get_mut() {
                        items.extend(captured);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(FieldSlot::Many(captured));
                }
            }
            return;
        }

        let Some(&first) = captured.first() else {
            return;
        };
        if self.fields.contains_key(name) {
            return;
        }
        let slot = match relation {
            Some(relation) => FieldSlot::Relation(relation, first),
            None => FieldSlot::One(first),
        };
        self.fields.insert(name, slot);
    }

    /// Label a single child node directly (used by the precedence climber).
    pub fn push_labeled_node(&mut self, name: &'static str, node: ParseNode) {
        let start = self.children.len();
        self.push_node(node);
        self.label(name, false, start, false, None);
    }

    pub fn push_labeled_token(&mut self, name: &'static str, token: Token) {
        let start = self.children.len();
        self.push_token(token);
        self.label(name, false, start, true, None);
    }

    /// The node this builder holds when it wraps exactly one clean child
    /// node and nothing else; otherwise the builder back.
    pub fn into_single_node(mut self) -> Result<ParseNode, NodeBuilder> {
        let single = self.children.len() == 1 && self.fields.is_empty() && !self.error;
        if single && matches!(self.children[0], Child::Node(_)) {
            if let Some(Child::Node(node)) = self.children.pop() {
                return Ok(node);
            }
        }
        Err(self)
    }

    /// Reopen a finished node so more children can be appended.
    pub fn reopen(node: ParseNode) -> Self {
        Self {
            rule: node.rule,
            children: node.children,
            fields: node.fields,
            error: node.error,
        }
    }

    pub fn finish(self) -> ParseNode {
        ParseNode {
            rule: self.rule,
            children: self.children,
            fields: self.fields,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Position, TextSize};
    use crate::parser::syntax_kind::SyntaxKind;

    fn token(kind: SyntaxKind, text: &str, offset: u32) -> Token {
        Token::new(kind, text, TextSize::new(offset), Position::new(0, offset as usize))
    }

    fn qualified(text: &str, offset: u32) -> ParseNode {
        let mut b = NodeBuilder::new(RuleId::QualifiedName);
        b.push_token(token(SyntaxKind::IDENT, text, offset));
        b.label("segments", true, 0, true, None);
        b.finish()
    }

    #[test]
    fn test_labels_index_children() {
        let mut b = NodeBuilder::new(RuleId::Subsetting);
        b.push_token(token(SyntaxKind::COLON_GT, ":>", 2));
        b.label("relation", false, 0, true, Some(Relation::Subsets));
        let start = b.len();
        b.push_node(qualified("a", 5));
        b.push_token(token(SyntaxKind::COMMA, ",", 6));
        b.push_node(qualified("b", 8));
        b.label("targets", true, start, false, None);
        let node = b.finish();

        assert_eq!(node.relation("relation"), Some(Relation::Subsets));
        assert_eq!(node.field_token("relation").unwrap().text, ":>");
        let targets = node.field_nodes("targets");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].text(), "b");
        assert_eq!(node.children().len(), 4);
    }

    #[test]
    fn test_single_field_keeps_first_value() {
        let mut b = NodeBuilder::new(RuleId::Feature);
        b.push_node(qualified("a", 0));
        b.label("multiplicity", false, 0, false, None);
        b.push_node(qualified("b", 2));
        b.label("multiplicity", false, 1, false, None);
        assert_eq!(b.finish().field_node("multiplicity").unwrap().text(), "a");
    }

    #[test]
    fn test_empty_list_field_is_present() {
        let mut b = NodeBuilder::new(RuleId::Package);
        b.label("members", true, 0, false, None);
        let node = b.finish();
        assert!(node.has_field("members"));
        assert!(node.field_all("members").is_empty());
        assert!(node.field("members").is_none());
    }

    #[test]
    fn test_error_nodes_are_not_captured() {
        let mut b = NodeBuilder::new(RuleId::Package);
        let mut err = NodeBuilder::new(RuleId::Error);
        err.push_token(token(SyntaxKind::IDENT, "junk", 0));
        err.mark_error();
        b.push_node(err.finish());
        b.label("members", true, 0, false, None);
        let node = b.finish();
        assert!(node.field_all("members").is_empty());
        assert!(node.has_errors());
        assert!(!node.is_error());
    }

    #[test]
    fn test_text_preserves_gaps() {
        let mut b = NodeBuilder::new(RuleId::QualifiedName);
        b.push_token(token(SyntaxKind::IDENT, "A", 0));
        b.push_token(token(SyntaxKind::COLON_COLON, "::", 1));
        b.push_token(token(SyntaxKind::IDENT, "B", 3));
        b.push_token(token(SyntaxKind::SEMICOLON, ";", 5));
        assert_eq!(b.finish().text(), "A::B ;");
    }

    #[test]
    fn test_shape_ignores_spelling() {
        let build = |kind, text: &str| {
            let mut b = NodeBuilder::new(RuleId::Subsetting);
            b.push_token(token(kind, text, 0));
            b.label("relation", false, 0, true, Some(Relation::Subsets));
            b.push_node(qualified("y", 10));
            b.label("targets", true, 1, false, None);
            b.finish()
        };
        let symbolic = build(SyntaxKind::COLON_GT, ":>");
        let keyword = build(SyntaxKind::SUBSETS_KW, "subsets");
        assert_ne!(symbolic, keyword);
        assert_eq!(symbolic.shape(), keyword.shape());
    }

    #[test]
    fn test_into_single_node() {
        let mut b = NodeBuilder::new(RuleId::OwnedExpression);
        b.push_node(qualified("a", 0));
        let node = b.into_single_node().unwrap();
        assert_eq!(node.rule(), RuleId::QualifiedName);

        let mut b = NodeBuilder::new(RuleId::OwnedExpression);
        b.push_token(token(SyntaxKind::IDENT, "a", 0));
        assert!(b.into_single_node().is_err());
    }

    #[test]
    fn test_descendants_preorder() {
        let mut inner = NodeBuilder::new(RuleId::Class);
        inner.push_node(qualified("C", 6));
        let mut outer = NodeBuilder::new(RuleId::Package);
        outer.push_node(inner.finish());
        outer.push_node(qualified("D", 9));
        let root = outer.finish();
        let rules: Vec<_> = root.descendants().iter().map(|n| n.rule()).collect();
        assert_eq!(
            rules,
            vec![RuleId::Package, RuleId::Class, RuleId::QualifiedName, RuleId::QualifiedName]
        );
        assert_eq!(root.find(RuleId::QualifiedName).unwrap().text(), "C");
    }
}
