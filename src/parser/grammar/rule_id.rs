//! Rule identifiers
//!
//! One variant per nonterminal in the rule table. The discriminant doubles
//! as the index into the table's per-rule vectors.

use std::fmt;

macro_rules! rules {
    ($($name:ident),* $(,)?) => {
        /// A grammar nonterminal
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum RuleId {
            $($name),*
        }

        impl RuleId {
            /// Every rule, in discriminant order
            pub const ALL: &'static [RuleId] = &[$(RuleId::$name),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(RuleId::$name => stringify!($name)),*
                }
            }
        }
    };
}

rules! {
    // Namespaces and members
    RootNamespace,
    NamespaceMember,
    PackageMember,
    ImportMember,
    AliasMember,
    ClassifierMember,
    FeatureMember,
    RelationshipMember,
    AnnotationMember,
    ReturnParameterMember,
    PackageElement,
    Package,
    LibraryPackage,
    Namespace,
    NamespaceBody,
    ImportElement,
    Import,
    ElementFilter,
    FilterCondition,
    Alias,

    // Names
    Identification,
    QualifiedName,
    FeatureChain,
    Multiplicity,
    MultiplicityBound,

    // Classifiers
    ClassifierElement,
    ClassifierDeclaration,
    Type,
    Classifier,
    Class,
    DataType,
    Structure,
    Association,
    AssociationStructure,
    Behavior,
    Function,
    Predicate,
    Interaction,
    Metaclass,
    ClassifierRelationship,
    SpecializationPart,
    ConjugationPart,
    DisjoiningPart,
    UnioningPart,
    IntersectingPart,
    DifferencingPart,

    // Features
    FeatureElement,
    FeaturePrefix,
    FeatureTail,
    Feature,
    Step,
    ExpressionDeclaration,
    BooleanExpression,
    Invariant,
    FeatureValue,
    FeatureRelationship,
    FeatureTyping,
    Subsetting,
    Redefinition,
    ReferenceSubsetting,
    CrossSubsetting,
    FeatureChaining,
    FeatureInverting,
    TypeFeaturing,

    // Connectors
    Connector,
    ConnectorEnds,
    ConnectorEnd,
    BindingConnector,
    Succession,
    ItemFlow,
    SuccessionItemFlow,

    // Function bodies
    FunctionBody,
    FunctionBodyMember,

    // Standalone relationships
    RelationshipElement,
    SpecializationPrefix,
    SubclassificationDeclaration,
    ConjugationDeclaration,
    DisjoiningDeclaration,
    FeatureTypingDeclaration,
    SubsettingDeclaration,
    RedefinitionDeclaration,
    Dependency,

    // Annotations
    AnnotationElement,
    AboutClause,
    LocaleClause,
    Comment,
    Documentation,
    TextualRepresentation,
    MetadataFeature,
    MetadataTyping,

    // Expressions
    OwnedExpression,
    OperatorExpression,
    ClassificationExpression,
    ConditionalExpression,
    UnaryExpression,
    SelfClassificationExpression,
    PrimaryExpression,
    FeatureChainExpression,
    IndexExpression,
    BracketExpression,
    ArrowInvocationExpression,
    InvocationExpression,
    NullExpression,
    LiteralExpression,
    SequenceExpression,
    BodyExpression,
    BodyParameter,
    NewExpression,
    FeatureReferenceExpression,
    ArgumentList,
    Arguments,
    Argument,
    NamedArgument,
    PositionalArgument,

    // Skipped tokens collected by error recovery
    Error,
}

impl RuleId {
    pub const COUNT: usize = RuleId::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, rule) in RuleId::ALL.iter().enumerate() {
            assert_eq!(rule.index(), i);
        }
        assert_eq!(RuleId::COUNT, RuleId::Error.index() + 1);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(RuleId::OwnedExpression.name(), "OwnedExpression");
        assert_eq!(RuleId::Package.to_string(), "Package");
    }
}
