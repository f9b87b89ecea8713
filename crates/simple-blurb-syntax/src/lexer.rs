//! # Lexer - Tokenizing Block Markup
//!
//! This module provides the first stage of parsing: breaking saved block
//! markup into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. We never skip or
//! discard characters, which is what lets extraction read back the exact
//! source of a nested-content region:
//!
//! ```
//! use simple_blurb_syntax::lexer::lex;
//!
//! let input = r#"<div class="jc-blurb-info"><p>Hi</p></div>"#;
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether a `WORD` is a tag
//! name, an attribute name or a piece of paragraph text - the parser decides
//! and re-tags it (`TAG_NAME`, `ATTR_NAME`, `ATTR_VALUE`, `TEXT`).
//!
//! Quoted strings never contain a raw `<`. Serialized attribute values always
//! escape it, and the restriction keeps a stray apostrophe in text content
//! from swallowing the following tags.

use logos::{Lexer, Logos};

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Spaces, tabs, line breaks, form feeds
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    /// `<!-- ... -->`, running to end of input when unterminated
    #[token("<!--", comment)]
    Comment,

    /// `</`
    #[token("</")]
    LtSlash,

    /// `<`
    #[token("<")]
    Lt,

    /// `/>`
    #[token("/>")]
    SlashGt,

    /// `>`
    #[token(">")]
    Gt,

    /// `/`
    #[token("/")]
    Slash,

    /// `=`
    #[token("=")]
    Eq,

    /// Double- or single-quoted string
    #[regex(r#""[^"<]*""#)]
    #[regex(r"'[^'<]*'")]
    Quoted,

    /// Anything else up to the next structural character
    #[regex(r#"[^<>="'/ \t\r\n\x0C]+"#)]
    Word,
}

fn comment(lex: &mut Lexer<TokenKind>) -> bool {
    let len = match lex.remainder().find("-->") {
        Some(end) => end + "-->".len(),
        None => lex.remainder().len(),
    };
    lex.bump(len);
    true
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::LtSlash => SyntaxKind::LT_SLASH,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::SlashGt => SyntaxKind::SLASH_GT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Quoted => SyntaxKind::QUOTED,
            TokenKind::Word => SyntaxKind::WORD,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Logos error means an unmatched quote or similar - treat as TEXT
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
