//! Parser Tests - Entry points and configuration
//!
//! Batch parsing, externally produced token streams, diagnostic sinks,
//! cancellation and the lookahead/cache knobs.

use std::sync::mpsc;

use kerml::parser::{Channel, SinkFn};
use kerml::{
    ErrorCode, Parse, ParseError, ParserConfig, Position, RuleId, SyntaxError, SyntaxKind, TextSize, Token, parse,
    parse_batch, parse_tokens, tokenize,
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

const VEHICLES: &str = "package Vehicles {
    import Units::*;
    abstract class Vehicle {
        feature mass : Real[1] = 1000 * kg;
        feature engine : Engine;
    }
    class Car :> Vehicle {
        feature wheels : Wheel[4] ordered;
        connector drive from engine to wheels;
    }
    succession first start then finish;
    function Speed { in d : Real; in t : Real; d / t }
}";

fn with_config(input: &str, config: &ParserConfig) -> Parse {
    parse_tokens(RuleId::RootNamespace, tokenize(input), config, &mut ()).unwrap()
}

#[test]
fn test_parse_batch_matches_sequential() {
    let sources = vec![
        VEHICLES.to_string(),
        "package P { class A class B; }".to_string(),
        String::new(),
        "feature f : T;".to_string(),
    ];
    let batch = parse_batch(&sources);
    assert_eq!(batch.len(), sources.len());
    for (source, parsed) in sources.iter().zip(&batch) {
        let sequential = parse(source);
        assert_eq!(parsed.root, sequential.root);
        assert_eq!(parsed.errors, sequential.errors);
    }
    assert!(batch[0].ok());
    assert_eq!(batch[1].errors.len(), 1);
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse(VEHICLES);
    let second = parse(VEHICLES);
    assert!(first.ok(), "{:?}", first.errors);
    assert_eq!(first.root, second.root);
}

#[test]
fn test_hand_built_token_stream() {
    // `class C;` with positions computed by hand and no trivia
    let tokens = vec![
        Token::new(SyntaxKind::CLASS_KW, "class", TextSize::new(0), Position::new(0, 0)),
        Token::new(SyntaxKind::IDENT, "C", TextSize::new(6), Position::new(0, 6)),
        Token::new(SyntaxKind::SEMICOLON, ";", TextSize::new(7), Position::new(0, 7)),
    ];
    let parsed = parse_tokens(RuleId::RootNamespace, tokens, &ParserConfig::default(), &mut ()).unwrap();
    assert!(parsed.ok());
    assert_eq!(parsed.root.find(RuleId::Class).unwrap().name(), Some("C"));
}

#[test]
fn test_token_stream_with_hidden_tokens() {
    let mut tokens = tokenize("class C;");
    tokens.insert(
        0,
        Token::new(SyntaxKind::LINE_COMMENT, "// header", TextSize::new(0), Position::new(0, 0)),
    );
    assert_eq!(tokens[0].channel, Channel::Hidden);
    let parsed = parse_tokens(RuleId::RootNamespace, tokens, &ParserConfig::default(), &mut ()).unwrap();
    assert!(parsed.ok());
    assert!(parsed.root.find(RuleId::Class).is_some());
}

#[test]
fn test_vec_sink_receives_every_error() {
    let mut sink: Vec<SyntaxError> = Vec::new();
    let parsed = parse_tokens(
        RuleId::RootNamespace,
        tokenize("class A class B; } class C;"),
        &ParserConfig::default(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(parsed.errors.len(), 2);
    assert_eq!(sink, parsed.errors);
}

#[test]
fn test_channel_sink_streams_errors() {
    let (tx, rx) = mpsc::channel();
    let mut sink = tx;
    let parsed = parse_tokens(
        RuleId::RootNamespace,
        tokenize("package P {"),
        &ParserConfig::default(),
        &mut sink,
    )
    .unwrap();
    drop(sink);
    let streamed: Vec<_> = rx.iter().collect();
    assert_eq!(streamed, parsed.errors);
    assert_eq!(streamed[0].code, ErrorCode::E0203);
}

#[test]
fn test_closure_sink() {
    let mut codes = Vec::new();
    let mut sink = SinkFn(|error: &SyntaxError| codes.push(error.code));
    parse_tokens(RuleId::RootNamespace, tokenize("class A; $"), &ParserConfig::default(), &mut sink).unwrap();
    assert_eq!(codes, [ErrorCode::E0101]);
}

#[test]
fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let config = ParserConfig::default().with_cancellation(token);
    let result = parse_tokens(RuleId::RootNamespace, tokenize(VEHICLES), &config, &mut ());
    assert_eq!(result.unwrap_err(), ParseError::Cancelled);
}

#[test]
fn test_uncancelled_token_parses() {
    let config = ParserConfig::default().with_cancellation(CancellationToken::new());
    assert!(with_config(VEHICLES, &config).ok());
}

#[test]
fn test_cancel_from_sink() {
    // Cancelling while the parse is running stops it at the next rule
    let token = CancellationToken::new();
    let config = ParserConfig::default().with_cancellation(token.clone());
    let mut sink = SinkFn(|_: &SyntaxError| token.cancel());
    let result = parse_tokens(
        RuleId::RootNamespace,
        tokenize("class A class B; class C; class D;"),
        &config,
        &mut sink,
    );
    assert!(result.unwrap_err().is_cancelled());
}

#[rstest]
#[case(8)]
#[case(16)]
#[case(32)]
#[case(1000)]
fn test_lookahead_limit_does_not_change_valid_trees(#[case] limit: usize) {
    let config = ParserConfig::default().with_lookahead_limit(limit);
    let parsed = with_config(VEHICLES, &config);
    assert!(parsed.ok(), "limit {limit}: {:?}", parsed.errors);
    assert_eq!(parsed.root, parse(VEHICLES).root);
}

#[test]
fn test_decision_cache_does_not_change_trees() {
    let inputs = [VEHICLES, "package P { class A class B; }", "feature x = 1 + ; feature y = 2;"];
    for input in inputs {
        let cached = with_config(input, &ParserConfig::default());
        let uncached = with_config(input, &ParserConfig::default().with_decision_cache(false));
        assert_eq!(cached.root, uncached.root, "{input}");
        assert_eq!(cached.errors, uncached.errors, "{input}");
    }
}

#[test]
fn test_max_errors_still_completes_tree() {
    let input = "class A class B; class C class D; class E class F;";
    let config = ParserConfig::default().with_max_errors(2);
    let parsed = with_config(input, &config);
    assert_eq!(parsed.errors.len(), 2);
    let classes = parsed.root.descendants().into_iter().filter(|n| n.rule() == RuleId::Class).count();
    assert_eq!(classes, 6);
}
