//! SyntaxKind enum for all tokens and nodes in the markup CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the markup CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Whitespace inside or between tags
    WHITESPACE,
    /// Character data between tags
    TEXT,
    /// A run of name-like characters (tag names, attribute names, bare values)
    WORD,
    /// `<` opening a start tag
    LT,
    /// `</` opening an end tag
    LT_SLASH,
    /// `>` closing a tag
    GT,
    /// `/>` closing a self-closing tag
    SLASH_GT,
    /// A lone `/` inside a tag
    SLASH,
    /// `=` between attribute name and value
    EQ,
    /// A single- or double-quoted string
    QUOTED,
    /// `<!-- ... -->`
    COMMENT,
    /// Element name inside a start or end tag
    TAG_NAME,
    /// Attribute name inside a start tag
    ATTR_NAME,
    /// Attribute value (quoted or bare) inside a start tag
    ATTR_VALUE,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root fragment node
    ROOT,
    /// An element: start tag, children, optional end tag
    ELEMENT,
    /// `<name attr="value">`
    START_TAG,
    /// `</name>`
    END_TAG,
    /// `name="value"` inside a start tag
    ATTRIBUTE,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkupLang {}

impl rowan::Language for MarkupLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkupLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkupLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkupLang>;
