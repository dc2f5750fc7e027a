//! KerML declaration rules
//!
//! Namespaces, classifiers, features, connectors, standalone relationships
//! and annotations. Expression rules live in [`super::kerml_expressions`].
//!
//! Relationships with two surface spellings (`:>` / `specializes`, `:` /
//! `typed by`, ...) are declared once per spelling with [`spelled`]; every
//! spelling records the same [`Relation`] under the `relation` field.

use super::{
    Element, Relation, RuleDef, RuleId, Synonym, comment_body, commented, field, inline,
    kerml_expressions, list, many, members, node, one_of, opt, rule, separated, seq, spelled, tok,
};
use crate::parser::syntax_kind::SyntaxKind;
use RuleId as R;
use SyntaxKind::*;

const SPECIALIZES: Synonym = Synonym {
    relation: Relation::Specializes,
    spellings: &[&[COLON_GT], &[SPECIALIZES_KW]],
};
const SUBSETS: Synonym = Synonym {
    relation: Relation::Subsets,
    spellings: &[&[COLON_GT], &[SUBSETS_KW]],
};
const REDEFINES: Synonym = Synonym {
    relation: Relation::Redefines,
    spellings: &[&[COLON_GT_GT], &[REDEFINES_KW]],
};
const REFERENCES: Synonym = Synonym {
    relation: Relation::References,
    spellings: &[&[COLON_COLON_GT], &[REFERENCES_KW]],
};
const CROSSES: Synonym = Synonym {
    relation: Relation::Crosses,
    spellings: &[&[FAT_ARROW], &[CROSSES_KW]],
};
const TYPED_BY: Synonym = Synonym {
    relation: Relation::Typing,
    spellings: &[&[COLON], &[TYPED_KW, BY_KW]],
};
const CONJUGATES: Synonym = Synonym {
    relation: Relation::Conjugates,
    spellings: &[&[TILDE], &[CONJUGATES_KW]],
};
const ANNOTATES: Synonym = Synonym {
    relation: Relation::Annotates,
    spellings: &[&[AT], &[METADATA_KW]],
};

const VISIBILITY: &[SyntaxKind] = &[PUBLIC_KW, PRIVATE_KW, PROTECTED_KW];
const DIRECTION: &[SyntaxKind] = &[IN_KW, OUT_KW, INOUT_KW];
const FEATURE_MODIFIERS: &[SyntaxKind] = &[
    ABSTRACT_KW,
    COMPOSITE_KW,
    PORTION_KW,
    CONST_KW,
    DERIVED_KW,
    END_KW,
    VAR_KW,
    MEMBER_KW,
];
const ORDERING: &[SyntaxKind] = &[ORDERED_KW, NONUNIQUE_KW];

pub(super) fn rules() -> Vec<RuleDef> {
    let mut rules = Vec::new();
    rules.extend(namespaces());
    rules.extend(names());
    rules.extend(classifiers());
    rules.extend(features());
    rules.extend(connectors());
    rules.extend(relationships());
    rules.extend(annotations());
    rules.extend(kerml_expressions::rules());
    rules
}

fn qualified(name: &'static str) -> Element {
    field(name, rule(R::QualifiedName))
}

fn identification() -> Element {
    field("identification", opt(rule(R::Identification)))
}

fn body() -> Element {
    rule(R::NamespaceBody)
}

fn feature_relationships() -> Element {
    list("specializations", many(rule(R::FeatureRelationship)))
}

/// `visibility? element`
fn member(id: RuleId, element: RuleId) -> RuleDef {
    node(
        id,
        vec![vec![
            field("visibility", opt(one_of(VISIBILITY))),
            field("element", rule(element)),
        ]],
    )
}

fn namespaces() -> Vec<RuleDef> {
    vec![
        node(
            R::RootNamespace,
            vec![vec![list("members", members(rule(R::NamespaceMember))), tok(EOF)]],
        ),
        inline(
            R::NamespaceMember,
            vec![
                vec![rule(R::PackageMember)],
                vec![rule(R::ImportMember)],
                vec![rule(R::AliasMember)],
                vec![rule(R::ClassifierMember)],
                vec![rule(R::FeatureMember)],
                vec![rule(R::RelationshipMember)],
                vec![rule(R::AnnotationMember)],
            ],
        ),
        member(R::PackageMember, R::PackageElement),
        member(R::ImportMember, R::ImportElement),
        member(R::AliasMember, R::Alias),
        member(R::ClassifierMember, R::ClassifierElement),
        member(R::FeatureMember, R::FeatureElement),
        member(R::RelationshipMember, R::RelationshipElement),
        member(R::AnnotationMember, R::AnnotationElement),
        node(
            R::ReturnParameterMember,
            vec![vec![
                field("visibility", opt(one_of(VISIBILITY))),
                tok(RETURN_KW),
                field("element", rule(R::Feature)),
            ]],
        ),
        inline(
            R::PackageElement,
            vec![
                vec![rule(R::Package)],
                vec![rule(R::LibraryPackage)],
                vec![rule(R::Namespace)],
            ],
        ),
        node(R::Package, vec![vec![tok(PACKAGE_KW), identification(), body()]]),
        node(
            R::LibraryPackage,
            vec![vec![
                field("standard", opt(tok(STANDARD_KW))),
                tok(LIBRARY_KW),
                tok(PACKAGE_KW),
                identification(),
                body(),
            ]],
        ),
        node(R::Namespace, vec![vec![tok(NAMESPACE_KW), identification(), body()]]),
        inline(
            R::NamespaceBody,
            vec![
                vec![tok(SEMICOLON)],
                vec![
                    tok(L_BRACE),
                    list("members", members(rule(R::NamespaceMember))),
                    tok(R_BRACE),
                ],
            ],
        ),
        inline(
            R::ImportElement,
            vec![vec![rule(R::Import)], vec![rule(R::ElementFilter)]],
        ),
        node(
            R::Import,
            vec![vec![
                tok(IMPORT_KW),
                field("all", opt(tok(ALL_KW))),
                qualified("target"),
                opt(seq(vec![tok(COLON_COLON), field("wildcard", tok(STAR))])),
                opt(seq(vec![tok(COLON_COLON), field("recursive", tok(STAR_STAR))])),
                list("filters", many(rule(R::FilterCondition))),
                tok(SEMICOLON),
            ]],
        ),
        node(
            R::ElementFilter,
            vec![vec![
                tok(FILTER_KW),
                field("condition", rule(R::OwnedExpression)),
                tok(SEMICOLON),
            ]],
        ),
        node(
            R::FilterCondition,
            vec![vec![
                tok(L_BRACKET),
                field("condition", rule(R::OwnedExpression)),
                tok(R_BRACKET),
            ]],
        ),
        node(
            R::Alias,
            vec![vec![
                tok(ALIAS_KW),
                identification(),
                tok(FOR_KW),
                qualified("target"),
                body(),
            ]],
        ),
    ]
}

fn names() -> Vec<RuleDef> {
    vec![
        node(
            R::Identification,
            vec![
                vec![
                    tok(LT),
                    field("short_name", tok(IDENT)),
                    tok(GT),
                    field("name", opt(tok(IDENT))),
                ],
                vec![field("name", tok(IDENT))],
            ],
        ),
        node(
            R::QualifiedName,
            vec![vec![
                list("segments", tok(IDENT)),
                many(seq(vec![tok(COLON_COLON), list("segments", tok(IDENT))])),
            ]],
        ),
        node(
            R::FeatureChain,
            vec![vec![
                list("segments", rule(R::QualifiedName)),
                many(seq(vec![tok(DOT), list("segments", rule(R::QualifiedName))])),
            ]],
        ),
        node(
            R::Multiplicity,
            vec![vec![
                tok(L_BRACKET),
                field("lower", rule(R::MultiplicityBound)),
                opt(seq(vec![tok(DOT_DOT), field("upper", rule(R::MultiplicityBound))])),
                tok(R_BRACKET),
            ]],
        ),
        node(
            R::MultiplicityBound,
            vec![
                vec![field("value", one_of(&[INTEGER, STAR]))],
                vec![field("value", rule(R::QualifiedName))],
            ],
        ),
    ]
}

/// `abstract? keywords ClassifierDeclaration body`
fn classifier(id: RuleId, keywords: &[SyntaxKind], body: RuleId) -> RuleDef {
    let mut elements = vec![field("modifier", opt(tok(ABSTRACT_KW)))];
    elements.extend(keywords.iter().map(|&k| tok(k)));
    elements.push(rule(R::ClassifierDeclaration));
    elements.push(rule(body));
    node(id, vec![elements])
}

fn classifiers() -> Vec<RuleDef> {
    vec![
        inline(
            R::ClassifierElement,
            [
                R::Type,
                R::Classifier,
                R::Class,
                R::DataType,
                R::Structure,
                R::Association,
                R::AssociationStructure,
                R::Behavior,
                R::Function,
                R::Predicate,
                R::Interaction,
                R::Metaclass,
            ]
            .into_iter()
            .map(|r| vec![rule(r)])
            .collect(),
        ),
        inline(
            R::ClassifierDeclaration,
            vec![vec![
                identification(),
                field("multiplicity", opt(rule(R::Multiplicity))),
                list("specializations", many(rule(R::ClassifierRelationship))),
            ]],
        ),
        classifier(R::Type, &[TYPE_KW], R::NamespaceBody),
        classifier(R::Classifier, &[CLASSIFIER_KW], R::NamespaceBody),
        classifier(R::Class, &[CLASS_KW], R::NamespaceBody),
        classifier(R::DataType, &[DATATYPE_KW], R::NamespaceBody),
        classifier(R::Structure, &[STRUCT_KW], R::NamespaceBody),
        classifier(R::Association, &[ASSOC_KW], R::NamespaceBody),
        classifier(R::AssociationStructure, &[ASSOC_KW, STRUCT_KW], R::NamespaceBody),
        classifier(R::Behavior, &[BEHAVIOR_KW], R::NamespaceBody),
        classifier(R::Function, &[FUNCTION_KW], R::FunctionBody),
        classifier(R::Predicate, &[PREDICATE_KW], R::FunctionBody),
        classifier(R::Interaction, &[INTERACTION_KW], R::NamespaceBody),
        classifier(R::Metaclass, &[METACLASS_KW], R::NamespaceBody),
        inline(
            R::ClassifierRelationship,
            vec![
                vec![rule(R::SpecializationPart)],
                vec![rule(R::ConjugationPart)],
                vec![rule(R::DisjoiningPart)],
                vec![rule(R::UnioningPart)],
                vec![rule(R::IntersectingPart)],
                vec![rule(R::DifferencingPart)],
            ],
        ),
        node(
            R::SpecializationPart,
            spelled(vec![], SPECIALIZES, vec![separated("targets", R::QualifiedName)]),
        ),
        node(
            R::ConjugationPart,
            spelled(vec![], CONJUGATES, vec![qualified("target")]),
        ),
        node(
            R::DisjoiningPart,
            vec![vec![
                tok(DISJOINT_KW),
                tok(FROM_KW),
                separated("targets", R::QualifiedName),
            ]],
        ),
        node(
            R::UnioningPart,
            vec![vec![tok(UNIONS_KW), separated("targets", R::QualifiedName)]],
        ),
        node(
            R::IntersectingPart,
            vec![vec![tok(INTERSECTS_KW), separated("targets", R::QualifiedName)]],
        ),
        node(
            R::DifferencingPart,
            vec![vec![tok(DIFFERENCES_KW), separated("targets", R::QualifiedName)]],
        ),
    ]
}

/// `FeaturePrefix keyword identification? FeatureTail body`
fn keyword_feature(id: RuleId, keyword: SyntaxKind, body: RuleId) -> RuleDef {
    node(
        id,
        vec![vec![
            rule(R::FeaturePrefix),
            tok(keyword),
            identification(),
            rule(R::FeatureTail),
            rule(body),
        ]],
    )
}

fn features() -> Vec<RuleDef> {
    vec![
        inline(
            R::FeatureElement,
            [
                R::Feature,
                R::Step,
                R::ExpressionDeclaration,
                R::BooleanExpression,
                R::Invariant,
                R::Connector,
                R::BindingConnector,
                R::Succession,
                R::ItemFlow,
                R::SuccessionItemFlow,
            ]
            .into_iter()
            .map(|r| vec![rule(r)])
            .collect(),
        ),
        inline(
            R::FeaturePrefix,
            vec![vec![
                field("direction", opt(one_of(DIRECTION))),
                list("modifiers", many(one_of(FEATURE_MODIFIERS))),
            ]],
        ),
        inline(
            R::FeatureTail,
            vec![vec![
                field("multiplicity", opt(rule(R::Multiplicity))),
                list("ordering", many(one_of(ORDERING))),
                feature_relationships(),
                field("multiplicity", opt(rule(R::Multiplicity))),
                list("ordering", many(one_of(ORDERING))),
                field("value", opt(rule(R::FeatureValue))),
            ]],
        ),
        node(
            R::Feature,
            vec![
                vec![
                    rule(R::FeaturePrefix),
                    tok(FEATURE_KW),
                    identification(),
                    rule(R::FeatureTail),
                    body(),
                ],
                vec![
                    rule(R::FeaturePrefix),
                    field("identification", rule(R::Identification)),
                    rule(R::FeatureTail),
                    body(),
                ],
            ],
        ),
        keyword_feature(R::Step, STEP_KW, R::NamespaceBody),
        keyword_feature(R::ExpressionDeclaration, EXPR_KW, R::FunctionBody),
        keyword_feature(R::BooleanExpression, BOOL_KW, R::FunctionBody),
        node(
            R::Invariant,
            vec![vec![
                rule(R::FeaturePrefix),
                tok(INV_KW),
                field("negated", opt(tok(NOT_KW))),
                identification(),
                rule(R::FeatureTail),
                rule(R::FunctionBody),
            ]],
        ),
        node(
            R::FeatureValue,
            vec![
                vec![
                    field("operator", one_of(&[EQ, COLON_EQ])),
                    field("value", rule(R::OwnedExpression)),
                ],
                vec![
                    field("default", tok(DEFAULT_KW)),
                    field("operator", opt(one_of(&[EQ, COLON_EQ]))),
                    field("value", rule(R::OwnedExpression)),
                ],
            ],
        ),
        inline(
            R::FeatureRelationship,
            [
                R::FeatureTyping,
                R::Subsetting,
                R::Redefinition,
                R::ReferenceSubsetting,
                R::CrossSubsetting,
                R::ConjugationPart,
                R::FeatureChaining,
                R::FeatureInverting,
                R::TypeFeaturing,
                R::DisjoiningPart,
                R::UnioningPart,
                R::IntersectingPart,
                R::DifferencingPart,
            ]
            .into_iter()
            .map(|r| vec![rule(r)])
            .collect(),
        ),
        node(
            R::FeatureTyping,
            spelled(vec![], TYPED_BY, vec![separated("types", R::QualifiedName)]),
        ),
        node(
            R::Subsetting,
            spelled(vec![], SUBSETS, vec![separated("targets", R::QualifiedName)]),
        ),
        node(
            R::Redefinition,
            spelled(vec![], REDEFINES, vec![separated("targets", R::QualifiedName)]),
        ),
        node(
            R::ReferenceSubsetting,
            spelled(vec![], REFERENCES, vec![field("target", rule(R::FeatureChain))]),
        ),
        node(
            R::CrossSubsetting,
            spelled(vec![], CROSSES, vec![field("target", rule(R::FeatureChain))]),
        ),
        node(
            R::FeatureChaining,
            vec![vec![tok(CHAINS_KW), field("chain", rule(R::FeatureChain))]],
        ),
        node(
            R::FeatureInverting,
            vec![vec![tok(INVERSE_KW), tok(OF_KW), qualified("target")]],
        ),
        node(
            R::TypeFeaturing,
            vec![vec![
                tok(FEATURED_KW),
                tok(BY_KW),
                separated("targets", R::QualifiedName),
            ]],
        ),
    ]
}

/// The part of a flow declaration after its keywords.
fn flow_tails() -> Vec<Vec<Element>> {
    vec![
        vec![
            identification(),
            feature_relationships(),
            opt(seq(vec![tok(OF_KW), qualified("item")])),
            tok(FROM_KW),
            field("source", rule(R::FeatureChain)),
            tok(TO_KW),
            field("target", rule(R::FeatureChain)),
            body(),
        ],
        vec![
            field("source", rule(R::FeatureChain)),
            tok(TO_KW),
            field("target", rule(R::FeatureChain)),
            body(),
        ],
    ]
}

fn prefixed(keywords: &[SyntaxKind], tails: Vec<Vec<Element>>) -> Vec<Vec<Element>> {
    tails
        .into_iter()
        .map(|tail| {
            let mut elements = vec![rule(R::FeaturePrefix)];
            elements.extend(keywords.iter().map(|&k| tok(k)));
            elements.extend(tail);
            elements
        })
        .collect()
}

fn connectors() -> Vec<RuleDef> {
    vec![
        node(
            R::ConnectorEnd,
            vec![vec![
                field("multiplicity", opt(rule(R::Multiplicity))),
                field("reference", rule(R::FeatureChain)),
            ]],
        ),
        inline(
            R::ConnectorEnds,
            vec![
                vec![
                    tok(FROM_KW),
                    field("source", rule(R::ConnectorEnd)),
                    tok(TO_KW),
                    field("target", rule(R::ConnectorEnd)),
                ],
                vec![tok(L_PAREN), separated("ends", R::ConnectorEnd), tok(R_PAREN)],
            ],
        ),
        node(
            R::Connector,
            prefixed(
                &[CONNECTOR_KW],
                vec![
                    vec![
                        identification(),
                        feature_relationships(),
                        rule(R::ConnectorEnds),
                        body(),
                    ],
                    vec![
                        field("source", rule(R::ConnectorEnd)),
                        tok(TO_KW),
                        field("target", rule(R::ConnectorEnd)),
                        body(),
                    ],
                    vec![identification(), feature_relationships(), body()],
                ],
            ),
        ),
        node(
            R::BindingConnector,
            prefixed(
                &[BINDING_KW],
                vec![vec![
                    opt(seq(vec![identification(), feature_relationships(), tok(OF_KW)])),
                    field("source", rule(R::ConnectorEnd)),
                    tok(EQ),
                    field("target", rule(R::ConnectorEnd)),
                    body(),
                ]],
            ),
        ),
        node(R::Succession, {
            let mut alts = prefixed(
                &[SUCCESSION_KW],
                vec![vec![
                    opt(seq(vec![identification(), feature_relationships(), tok(FIRST_KW)])),
                    field("source", rule(R::ConnectorEnd)),
                    tok(THEN_KW),
                    field("target", rule(R::ConnectorEnd)),
                    body(),
                ]],
            );
            alts.push(vec![
                field("first", tok(FIRST_KW)),
                field("source", rule(R::ConnectorEnd)),
                tok(THEN_KW),
                field("target", rule(R::ConnectorEnd)),
                body(),
            ]);
            alts
        }),
        node(R::ItemFlow, prefixed(&[FLOW_KW], flow_tails())),
        node(
            R::SuccessionItemFlow,
            prefixed(&[SUCCESSION_KW, FLOW_KW], flow_tails()),
        ),
        inline(
            R::FunctionBody,
            vec![
                vec![tok(SEMICOLON)],
                vec![
                    tok(L_BRACE),
                    list("members", members(rule(R::FunctionBodyMember))),
                    field("result", opt(rule(R::OwnedExpression))),
                    tok(R_BRACE),
                ],
            ],
        ),
        inline(
            R::FunctionBodyMember,
            vec![vec![rule(R::NamespaceMember)], vec![rule(R::ReturnParameterMember)]],
        ),
    ]
}

fn relationships() -> Vec<RuleDef> {
    let spec_prefix = || opt(rule(R::SpecializationPrefix));
    vec![
        inline(
            R::RelationshipElement,
            [
                R::SubclassificationDeclaration,
                R::ConjugationDeclaration,
                R::DisjoiningDeclaration,
                R::FeatureTypingDeclaration,
                R::SubsettingDeclaration,
                R::RedefinitionDeclaration,
                R::Dependency,
            ]
            .into_iter()
            .map(|r| vec![rule(r)])
            .collect(),
        ),
        inline(
            R::SpecializationPrefix,
            vec![vec![tok(SPECIALIZATION_KW), identification()]],
        ),
        node(
            R::SubclassificationDeclaration,
            spelled(
                vec![
                    spec_prefix(),
                    field("keyword", one_of(&[SUBCLASSIFIER_KW, SUBTYPE_KW])),
                    qualified("specific"),
                ],
                SPECIALIZES,
                vec![qualified("general"), body()],
            ),
        ),
        node(
            R::ConjugationDeclaration,
            spelled(
                vec![
                    opt(seq(vec![tok(CONJUGATION_KW), identification()])),
                    tok(CONJUGATE_KW),
                    qualified("conjugate"),
                ],
                CONJUGATES,
                vec![qualified("original"), body()],
            ),
        ),
        node(
            R::DisjoiningDeclaration,
            vec![vec![
                opt(seq(vec![tok(DISJOINING_KW), identification()])),
                tok(DISJOINT_KW),
                qualified("disjoined"),
                tok(FROM_KW),
                qualified("disjoining"),
                body(),
            ]],
        ),
        node(
            R::FeatureTypingDeclaration,
            spelled(
                vec![spec_prefix(), tok(TYPING_KW), qualified("typed")],
                TYPED_BY,
                vec![qualified("type"), body()],
            ),
        ),
        node(
            R::SubsettingDeclaration,
            spelled(
                vec![spec_prefix(), tok(SUBSET_KW), qualified("subsetting")],
                SUBSETS,
                vec![qualified("subsetted"), body()],
            ),
        ),
        node(
            R::RedefinitionDeclaration,
            spelled(
                vec![spec_prefix(), tok(REDEFINITION_KW), qualified("redefining")],
                REDEFINES,
                vec![qualified("redefined"), body()],
            ),
        ),
        node(
            R::Dependency,
            vec![vec![
                tok(DEPENDENCY_KW),
                opt(seq(vec![identification(), tok(FROM_KW)])),
                separated("clients", R::QualifiedName),
                tok(TO_KW),
                separated("suppliers", R::QualifiedName),
                body(),
            ]],
        ),
    ]
}

fn annotations() -> Vec<RuleDef> {
    vec![
        inline(
            R::AnnotationElement,
            vec![
                vec![rule(R::Comment)],
                vec![rule(R::Documentation)],
                vec![rule(R::TextualRepresentation)],
                vec![rule(R::MetadataFeature)],
            ],
        ),
        inline(
            R::AboutClause,
            vec![vec![tok(ABOUT_KW), separated("about", R::QualifiedName)]],
        ),
        inline(
            R::LocaleClause,
            vec![vec![tok(LOCALE_KW), field("locale", tok(STRING))]],
        ),
        commented(
            R::Comment,
            vec![vec![
                tok(COMMENT_KW),
                identification(),
                opt(rule(R::AboutClause)),
                opt(rule(R::LocaleClause)),
                field("body", comment_body()),
            ]],
        ),
        commented(
            R::Documentation,
            vec![vec![
                tok(DOC_KW),
                identification(),
                opt(rule(R::LocaleClause)),
                field("body", comment_body()),
            ]],
        ),
        commented(
            R::TextualRepresentation,
            vec![
                vec![
                    tok(REP_KW),
                    identification(),
                    tok(LANGUAGE_KW),
                    field("language", tok(STRING)),
                    field("body", comment_body()),
                ],
                vec![
                    tok(LANGUAGE_KW),
                    field("language", tok(STRING)),
                    field("body", comment_body()),
                ],
            ],
        ),
        node(
            R::MetadataFeature,
            spelled(
                vec![],
                ANNOTATES,
                vec![
                    field("declaration", opt(rule(R::MetadataTyping))),
                    qualified("type"),
                    opt(rule(R::AboutClause)),
                    body(),
                ],
            ),
        ),
        node(
            R::MetadataTyping,
            spelled(
                vec![field("identification", rule(R::Identification))],
                TYPED_BY,
                vec![],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::GRAMMAR;

    #[test]
    fn test_every_rule_defined_once() {
        let defs = rules();
        let mut seen = std::collections::HashSet::new();
        for def in &defs {
            assert!(seen.insert(def.id), "{} defined twice", def.id);
        }
        assert_eq!(seen.len(), RuleId::COUNT - 1);
    }

    #[test]
    fn test_synonyms_become_separate_alternatives() {
        assert_eq!(GRAMMAR.alternatives_for(R::Subsetting).len(), 2);
        assert_eq!(GRAMMAR.alternatives_for(R::FeatureTyping).len(), 2);
        assert_eq!(GRAMMAR.alternatives_for(R::MetadataFeature).len(), 2);
    }

    #[test]
    fn test_comment_rules_see_comment_channel() {
        assert!(GRAMMAR.rule(R::Comment).comments);
        assert!(GRAMMAR.rule(R::Documentation).comments);
        assert!(!GRAMMAR.rule(R::Package).comments);
    }

    #[test]
    fn test_member_groups_start_with_visibility() {
        for id in [R::PackageMember, R::ClassifierMember, R::FeatureMember] {
            let first = GRAMMAR.first_set(id);
            assert!(first.contains(PUBLIC_KW));
            assert!(first.contains(PRIVATE_KW));
        }
    }
}
