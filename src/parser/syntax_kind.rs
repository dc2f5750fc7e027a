//! Token kinds for the KerML scanner and parser
//!
//! This enum defines every token kind the parser can see. Grammar
//! nonterminals live in [`RuleId`](super::grammar::RuleId); a parse tree is
//! made of rule-labelled nodes over tokens of these kinds.

use std::fmt;

/// All token kinds in KerML
///
/// Trivia is split across channels by the scanner, literals and punctuation
/// follow, then keywords in alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (hidden or comment channel)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,       // // note
    BLOCK_COMMENT,      // /* regular comment */

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // identifier or 'unrestricted name'
    INTEGER,            // 42
    DECIMAL,            // 3.14, 1e10
    STRING,             // "hello"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    SEMICOLON,          // ;
    COLON,              // :  (typed by)
    COLON_COLON,        // ::
    COLON_GT,           // :>  (specializes/subsets)
    COLON_GT_GT,        // :>> (redefines)
    COLON_COLON_GT,     // ::> (references)
    COLON_EQ,           // :=
    DOT,                // .
    DOT_DOT,            // ..
    COMMA,              // ,
    EQ,                 // =
    EQ_EQ,              // ==
    EQ_EQ_EQ,           // ===
    BANG_EQ,            // !=
    BANG_EQ_EQ,         // !==
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    ARROW,              // ->
    FAT_ARROW,          // =>  (crosses)
    AT,                 // @
    AT_AT,              // @@
    HASH,               // #
    STAR,               // *
    STAR_STAR,          // **
    PLUS,               // +
    MINUS,              // -
    SLASH,              // /
    PERCENT,            // %
    CARET,              // ^
    TILDE,              // ~  (conjugates)
    QUESTION,           // ?
    QUESTION_QUESTION,  // ??
    PIPE,               // |
    AMP,                // &

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    ABOUT_KW,
    ABSTRACT_KW,
    ALIAS_KW,
    ALL_KW,
    AND_KW,
    AS_KW,
    ASSOC_KW,
    BEHAVIOR_KW,
    BINDING_KW,
    BOOL_KW,
    BY_KW,
    CHAINS_KW,
    CLASS_KW,
    CLASSIFIER_KW,
    COMMENT_KW,
    COMPOSITE_KW,
    CONJUGATE_KW,
    CONJUGATES_KW,
    CONJUGATION_KW,
    CONNECTOR_KW,
    CONST_KW,
    CROSSES_KW,
    DATATYPE_KW,
    DEFAULT_KW,
    DEPENDENCY_KW,
    DERIVED_KW,
    DIFFERENCES_KW,
    DISJOINING_KW,
    DISJOINT_KW,
    DOC_KW,
    ELSE_KW,
    END_KW,
    EXPR_KW,
    FALSE_KW,
    FEATURE_KW,
    FEATURED_KW,
    FILTER_KW,
    FIRST_KW,
    FLOW_KW,
    FOR_KW,
    FROM_KW,
    FUNCTION_KW,
    HASTYPE_KW,
    IF_KW,
    IMPLIES_KW,
    IMPORT_KW,
    IN_KW,
    INOUT_KW,
    INTERACTION_KW,
    INTERSECTS_KW,
    INV_KW,
    INVERSE_KW,
    ISTYPE_KW,
    LANGUAGE_KW,
    LIBRARY_KW,
    LOCALE_KW,
    MEMBER_KW,
    META_KW,
    METACLASS_KW,
    METADATA_KW,
    NAMESPACE_KW,
    NEW_KW,
    NONUNIQUE_KW,
    NOT_KW,
    NULL_KW,
    OF_KW,
    OR_KW,
    ORDERED_KW,
    OUT_KW,
    PACKAGE_KW,
    PORTION_KW,
    PREDICATE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    REDEFINES_KW,
    REDEFINITION_KW,
    REFERENCES_KW,
    REP_KW,
    RETURN_KW,
    SPECIALIZATION_KW,
    SPECIALIZES_KW,
    STANDARD_KW,
    STEP_KW,
    STRUCT_KW,
    SUBCLASSIFIER_KW,
    SUBSET_KW,
    SUBSETS_KW,
    SUBTYPE_KW,
    SUCCESSION_KW,
    THEN_KW,
    TO_KW,
    TRUE_KW,
    TYPE_KW,
    TYPED_KW,
    TYPING_KW,
    UNIONS_KW,
    VAR_KW,
    XOR_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
    /// End-of-input sentinel appended by the token cursor
    EOF,

    #[doc(hidden)]
    __LAST,
}

macro_rules! fixed_tokens {
    (
        punct { $($p_kind:ident => $p_text:literal,)* }
        keywords { $($k_kind:ident => $k_text:literal,)* }
    ) => {
        impl SyntaxKind {
            /// Map an identifier-shaped word to its keyword kind, if it is one
            pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
                match text {
                    $($k_text => Some(SyntaxKind::$k_kind),)*
                    _ => None,
                }
            }

            /// The fixed spelling of a punctuation or keyword token
            pub fn fixed_text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$p_kind => Some($p_text),)*
                    $(SyntaxKind::$k_kind => Some($k_text),)*
                    _ => None,
                }
            }
        }
    };
}

fixed_tokens! {
    punct {
        L_BRACE => "{", R_BRACE => "}", L_BRACKET => "[", R_BRACKET => "]",
        L_PAREN => "(", R_PAREN => ")", SEMICOLON => ";", COLON => ":",
        COLON_COLON => "::", COLON_GT => ":>", COLON_GT_GT => ":>>",
        COLON_COLON_GT => "::>", COLON_EQ => ":=", DOT => ".", DOT_DOT => "..",
        COMMA => ",", EQ => "=", EQ_EQ => "==", EQ_EQ_EQ => "===", BANG_EQ => "!=",
        BANG_EQ_EQ => "!==", LT => "<", GT => ">", LT_EQ => "<=", GT_EQ => ">=",
        ARROW => "->", FAT_ARROW => "=>", AT => "@", AT_AT => "@@", HASH => "#",
        STAR => "*", STAR_STAR => "**", PLUS => "+", MINUS => "-", SLASH => "/",
        PERCENT => "%", CARET => "^", TILDE => "~", QUESTION => "?",
        QUESTION_QUESTION => "??", PIPE => "|", AMP => "&",
    }
    keywords {
        ABOUT_KW => "about", ABSTRACT_KW => "abstract", ALIAS_KW => "alias",
        ALL_KW => "all", AND_KW => "and", AS_KW => "as", ASSOC_KW => "assoc",
        BEHAVIOR_KW => "behavior", BINDING_KW => "binding", BOOL_KW => "bool",
        BY_KW => "by", CHAINS_KW => "chains", CLASS_KW => "class",
        CLASSIFIER_KW => "classifier", COMMENT_KW => "comment",
        COMPOSITE_KW => "composite", CONJUGATE_KW => "conjugate",
        CONJUGATES_KW => "conjugates", CONJUGATION_KW => "conjugation",
        CONNECTOR_KW => "connector", CONST_KW => "const", CROSSES_KW => "crosses",
        DATATYPE_KW => "datatype", DEFAULT_KW => "default",
        DEPENDENCY_KW => "dependency", DERIVED_KW => "derived",
        DIFFERENCES_KW => "differences", DISJOINING_KW => "disjoining",
        DISJOINT_KW => "disjoint", DOC_KW => "doc", ELSE_KW => "else",
        END_KW => "end", EXPR_KW => "expr", FALSE_KW => "false",
        FEATURE_KW => "feature", FEATURED_KW => "featured", FILTER_KW => "filter",
        FIRST_KW => "first", FLOW_KW => "flow", FOR_KW => "for", FROM_KW => "from",
        FUNCTION_KW => "function", HASTYPE_KW => "hastype", IF_KW => "if",
        IMPLIES_KW => "implies", IMPORT_KW => "import", IN_KW => "in",
        INOUT_KW => "inout", INTERACTION_KW => "interaction",
        INTERSECTS_KW => "intersects", INV_KW => "inv", INVERSE_KW => "inverse",
        ISTYPE_KW => "istype", LANGUAGE_KW => "language", LIBRARY_KW => "library",
        LOCALE_KW => "locale", MEMBER_KW => "member", META_KW => "meta",
        METACLASS_KW => "metaclass", METADATA_KW => "metadata",
        NAMESPACE_KW => "namespace", NEW_KW => "new", NONUNIQUE_KW => "nonunique",
        NOT_KW => "not", NULL_KW => "null", OF_KW => "of", OR_KW => "or",
        ORDERED_KW => "ordered", OUT_KW => "out", PACKAGE_KW => "package",
        PORTION_KW => "portion", PREDICATE_KW => "predicate",
        PRIVATE_KW => "private", PROTECTED_KW => "protected", PUBLIC_KW => "public",
        REDEFINES_KW => "redefines", REDEFINITION_KW => "redefinition",
        REFERENCES_KW => "references", REP_KW => "rep", RETURN_KW => "return",
        SPECIALIZATION_KW => "specialization", SPECIALIZES_KW => "specializes",
        STANDARD_KW => "standard", STEP_KW => "step", STRUCT_KW => "struct",
        SUBCLASSIFIER_KW => "subclassifier", SUBSET_KW => "subset",
        SUBSETS_KW => "subsets", SUBTYPE_KW => "subtype",
        SUCCESSION_KW => "succession", THEN_KW => "then", TO_KW => "to",
        TRUE_KW => "true", TYPE_KW => "type", TYPED_KW => "typed",
        TYPING_KW => "typing", UNIONS_KW => "unions", VAR_KW => "var",
        XOR_KW => "xor",
    }
}

impl SyntaxKind {
    /// Number of real kinds (excludes the `__LAST` marker)
    pub const COUNT: usize = SyntaxKind::__LAST as usize;

    fn from_index(index: usize) -> Option<SyntaxKind> {
        if index >= Self::COUNT {
            return None;
        }
        // Safety: repr(u8), contiguous discriminants from 0, bound checked above
        Some(unsafe { std::mem::transmute::<u8, SyntaxKind>(index as u8) })
    }
}

/// Human-readable token name for diagnostics: `'class'`, `identifier`, ...
pub fn kind_to_name(kind: SyntaxKind) -> String {
    if let Some(text) = kind.fixed_text() {
        return format!("'{}'", text);
    }
    match kind {
        SyntaxKind::IDENT => "identifier",
        SyntaxKind::INTEGER => "integer",
        SyntaxKind::DECIMAL => "real number",
        SyntaxKind::STRING => "string",
        SyntaxKind::WHITESPACE => "whitespace",
        SyntaxKind::LINE_COMMENT => "line note",
        SyntaxKind::BLOCK_COMMENT => "comment",
        SyntaxKind::EOF => "end of input",
        _ => "invalid token",
    }
    .to_string()
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&kind_to_name(*self))
    }
}

// ============================================================================
// TokenSet
// ============================================================================

/// A set of token kinds, stored as a 256-bit bitset.
///
/// FIRST/FOLLOW sets and expected-token sets are all `TokenSet`s, so union and
/// membership are a handful of word operations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet([0; 4]);

    pub const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < kinds.len() {
            let k = kinds[i] as usize;
            bits[k / 64] |= 1 << (k % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn single(kind: SyntaxKind) -> TokenSet {
        TokenSet::new(&[kind])
    }

    pub fn contains(&self, kind: SyntaxKind) -> bool {
        let k = kind as usize;
        self.0[k / 64] & (1 << (k % 64)) != 0
    }

    pub fn insert(&mut self, kind: SyntaxKind) {
        let k = kind as usize;
        self.0[k / 64] |= 1 << (k % 64);
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    /// Union in place, returning whether anything changed
    pub fn extend(&mut self, other: TokenSet) -> bool {
        let merged = self.union(other);
        let changed = merged != *self;
        *self = merged;
        changed
    }

    pub fn intersects(&self, other: TokenSet) -> bool {
        self.0.iter().zip(other.0.iter()).any(|(a, b)| a & b != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        (0..SyntaxKind::COUNT)
            .filter(|i| self.0[i / 64] & (1 << (i % 64)) != 0)
            .filter_map(SyntaxKind::from_index)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(kind_to_name).collect();
        match names.len() {
            0 => f.write_str("nothing"),
            1 => f.write_str(&names[0]),
            _ => write!(f, "one of {}", names.join(", ")),
        }
    }
}

impl FromIterator<SyntaxKind> for TokenSet {
    fn from_iter<I: IntoIterator<Item = SyntaxKind>>(iter: I) -> Self {
        let mut set = TokenSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}
