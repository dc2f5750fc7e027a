//! Parser Tests - Error recovery
//!
//! A syntax error is reported once, the parser resynchronizes, and the
//! surrounding declarations still come out of the tree.

use kerml::parser::Channel;
use kerml::{ErrorCode, ParseNode, ParserConfig, RuleId, SyntaxKind, parse, parse_rule, parse_tokens, tokenize};
use rstest::rstest;

fn names_of(root: &ParseNode, rule: RuleId) -> Vec<String> {
    root.descendants()
        .into_iter()
        .filter(|n| n.rule() == rule)
        .filter_map(|n| n.name().map(str::to_string))
        .collect()
}

#[test]
fn test_missing_semicolon_keeps_siblings() {
    let parsed = parse("package P { class A class B; class C; }");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["A", "B", "C"]);

    let error = &parsed.errors[0];
    assert_eq!(error.found, SyntaxKind::CLASS_KW);
    assert!(error.expected.contains(SyntaxKind::SEMICOLON));
    assert!(error.expected.contains(SyntaxKind::L_BRACE));
    assert_eq!(error.position.line, 0);
    assert_eq!(error.position.column, 20);
}

#[test]
fn test_garbage_between_members_is_skipped() {
    let parsed = parse("package P { class A; 42 + ; class B; }");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["A", "B"]);
    let package = parsed.root.find(RuleId::Package).unwrap();
    assert!(package.has_errors());
    assert!(package.find(RuleId::Error).is_some());
}

#[test]
fn test_missing_closing_brace() {
    let parsed = parse("package P { class A;");
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].code, ErrorCode::E0203);
    assert_eq!(parsed.errors[0].found, SyntaxKind::EOF);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["A"]);
}

#[test]
fn test_unexpected_closing_brace() {
    let parsed = parse("class A; } class B;");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    assert_eq!(parsed.errors[0].found, SyntaxKind::R_BRACE);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["A", "B"]);
}

#[test]
fn test_invalid_character() {
    let parsed = parse("class A; $ class B;");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    assert_eq!(parsed.errors[0].code, ErrorCode::E0101);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["A", "B"]);
}

#[test]
fn test_independent_errors_each_reported() {
    let parsed = parse("package P { class A class B; feature f : ; class C class D; }");
    assert_eq!(parsed.errors.len(), 3, "{:?}", parsed.errors);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["A", "B", "C", "D"]);
}

#[test]
fn test_error_in_expression() {
    let parsed = parse("feature x = 1 + ; feature y = 2;");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    assert_eq!(parsed.errors[0].code, ErrorCode::E0301);
    assert_eq!(names_of(&parsed.root, RuleId::Feature), ["x", "y"]);
}

#[rstest]
#[case("package")]
#[case("package P {")]
#[case("class C :> ;")]
#[case("feature f : T")]
#[case("import ;")]
#[case("connector from a to ;")]
#[case("comment about A")]
#[case("f(1, 2")]
#[case("}}}}")]
#[case(";;;;")]
fn test_malformed_input_terminates_with_errors(#[case] input: &str) {
    let parsed = parse(input);
    assert!(!parsed.ok(), "expected errors for {input:?}");
    assert_eq!(parsed.root.rule(), RuleId::RootNamespace);
}

#[rstest]
#[case("package P { class A class B; }")]
#[case("class A; } class B;")]
#[case("package P { class A; 42 + ; class B; }")]
#[case("feature x = 1 + ; feature y = 2;")]
#[case("class A; $ class B;")]
fn test_every_token_is_kept(#[case] input: &str) {
    let parsed = parse(input);
    let source: Vec<_> = tokenize(input)
        .into_iter()
        .filter(|t| t.channel == Channel::Default)
        .map(|t| t.text)
        .collect();
    let tree: Vec<_> = parsed.root.tokens().into_iter().map(|t| t.text.clone()).collect();
    assert_eq!(tree, source);
}

#[test]
fn test_trailing_input_after_expression() {
    let parsed = parse_rule(RuleId::OwnedExpression, "a + b c");
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].code, ErrorCode::E0302);
    assert_eq!(parsed.root.rule(), RuleId::OperatorExpression);
    assert!(parsed.root.has_errors());
    // the leftover token belongs to the root, not to the last name
    for name in parsed.root.descendants().into_iter().filter(|n| n.rule() == RuleId::QualifiedName) {
        assert!(!name.has_errors(), "{name}");
    }
}

#[test]
fn test_missing_paren_blames_sequence() {
    let parsed = parse("feature f = (a + b;");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    let error = &parsed.errors[0];
    assert_eq!(error.code, ErrorCode::E0203);
    assert_eq!(error.rule, RuleId::SequenceExpression);
    assert!(error.expected.contains(SyntaxKind::R_PAREN));
    assert_eq!(error.found, SyntaxKind::SEMICOLON);
    assert_eq!(names_of(&parsed.root, RuleId::Feature), ["f"]);
}

#[test]
fn test_moderate_nesting_parses() {
    let input = format!("feature x = {}a{};", "(".repeat(20), ")".repeat(20));
    let parsed = parse(&input);
    assert!(parsed.ok(), "{:?}", parsed.errors);
}

#[test]
fn test_deep_nesting_is_reported() {
    let input = format!("feature x = {}a{}; class C;", "(".repeat(500), ")".repeat(500));
    let parsed = parse(&input);
    assert!(!parsed.ok());
    assert_eq!(parsed.errors[0].code, ErrorCode::E0204);
    assert_eq!(names_of(&parsed.root, RuleId::Class), ["C"]);
}

#[test]
fn test_nesting_limit_is_configurable() {
    let input = format!("feature x = {}a{};", "(".repeat(20), ")".repeat(20));
    let config = ParserConfig::default().with_max_depth(16);
    let parsed = parse_tokens(RuleId::RootNamespace, tokenize(&input), &config, &mut ()).unwrap();
    assert_eq!(parsed.errors[0].code, ErrorCode::E0204);
}

#[test]
fn test_error_display() {
    let parsed = parse("package P { class A class B; }");
    let rendered = parsed.errors[0].to_string();
    assert!(rendered.starts_with("error[E0301] at 1:21"), "{rendered}");
    assert!(rendered.contains("found 'class'"), "{rendered}");
}
