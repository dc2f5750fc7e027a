//! Parser Tests - Connectors, bindings, successions and flows
//!
//! These declarations share long prefixes (feature prefix, identification,
//! specializations) before the token that tells them apart.

use kerml::{ParseNode, RuleId, parse};
use rstest::rstest;

fn parse_clean(input: &str) -> ParseNode {
    let parsed = parse(input);
    assert!(parsed.ok(), "Failed to parse {input:?}: {:?}", parsed.errors);
    parsed.root
}

#[rstest]
#[case("connector c : C from a to b;", RuleId::Connector)]
#[case("connector from a.x to b.y;", RuleId::Connector)]
#[case("connector (a, b, c);", RuleId::Connector)]
#[case("connector a to b;", RuleId::Connector)]
#[case("connector c;", RuleId::Connector)]
#[case("binding a = b;", RuleId::BindingConnector)]
#[case("binding bnd of a.x = b.y;", RuleId::BindingConnector)]
#[case("succession s first a then b;", RuleId::Succession)]
#[case("succession a then b;", RuleId::Succession)]
#[case("first a then b;", RuleId::Succession)]
#[case("flow f of Item from a.x to b.y;", RuleId::ItemFlow)]
#[case("flow a.x to b.y;", RuleId::ItemFlow)]
#[case("succession flow from a.x to b.y;", RuleId::SuccessionItemFlow)]
#[case("succession flow sf from a.x to b.y { }", RuleId::SuccessionItemFlow)]
#[case("abstract connector c;", RuleId::Connector)]
fn test_connector_forms(#[case] input: &str, #[case] rule: RuleId) {
    let root = parse_clean(input);
    assert!(root.find(rule).is_some(), "no {rule} in\n{root}");
}

#[test]
fn test_binary_connector_ends() {
    let root = parse_clean("connector c from [1] a.x to b;");
    let connector = root.find(RuleId::Connector).unwrap();
    let source = connector.field_node("source").unwrap();
    assert_eq!(source.rule(), RuleId::ConnectorEnd);
    assert!(source.has_field("multiplicity"));
    assert_eq!(source.field_node("reference").unwrap().text(), "a.x");
    assert_eq!(connector.field_node("target").unwrap().text(), "b");
}

#[test]
fn test_nary_connector_ends() {
    let root = parse_clean("connector (a, b, c);");
    let connector = root.find(RuleId::Connector).unwrap();
    assert_eq!(connector.field_nodes("ends").len(), 3);
}

#[test]
fn test_shorthand_succession() {
    let root = parse_clean("first start then finish;");
    let succession = root.find(RuleId::Succession).unwrap();
    assert!(succession.has_field("first"));
    assert_eq!(succession.field_node("source").unwrap().text(), "start");
    assert_eq!(succession.field_node("target").unwrap().text(), "finish");
}

#[test]
fn test_flow_item() {
    let root = parse_clean("flow f of Fuel from tank.out_port to engine.in_port;");
    let flow = root.find(RuleId::ItemFlow).unwrap();
    assert_eq!(flow.name(), Some("f"));
    assert_eq!(flow.field_node("item").unwrap().text(), "Fuel");
    assert_eq!(flow.field_node("source").unwrap().text(), "tank.out_port");
}

#[test]
fn test_connectors_inside_classifier() {
    let root = parse_clean(
        "struct Vehicle {
            feature engine : Engine;
            feature wheels : Wheel[4];
            connector drive from engine to wheels;
            binding engine.power = wheels.torque;
        }",
    );
    let vehicle = root.find(RuleId::Structure).unwrap();
    assert_eq!(vehicle.field_nodes("members").len(), 4);
    assert!(vehicle.find(RuleId::BindingConnector).is_some());
}
