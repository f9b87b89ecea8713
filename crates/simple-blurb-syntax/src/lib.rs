//! # simple-blurb-syntax
//!
//! A lossless syntax tree for saved block markup using [Rowan] + [Logos],
//! following the [rust-analyzer] architecture model, plus the small
//! selector engine that block attribute extraction runs on.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Why Lossless?
//!
//! Block markup is re-read by the editor host and compared byte for byte
//! against what the block would save now. A Concrete Syntax Tree keeps every
//! byte of the source, so the nested-content region of a block can be lifted
//! out exactly as it was written, and a fragment always prints back to the
//! input it came from.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//!                                                        │
//!                                    ast::Element views ◄┘──► Selector
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! simple-blurb-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── ast.rs           # Typed Fragment / Element / Attribute views
//! ├── selector.rs      # CSS-like selector subset
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root fragment and character data
//!         └── element.rs # Elements, tags, attributes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use simple_blurb_syntax::{Fragment, SyntaxKind};
//!
//! let fragment = Fragment::parse(r#"<img src="https://x/a.jpg" alt="cat"/>"#);
//! assert_eq!(fragment.syntax().kind(), SyntaxKind::ROOT);
//!
//! let img = fragment.elements().next().unwrap();
//! assert_eq!(img.attribute("alt").as_deref(), Some("cat"));
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod selector;
pub mod syntax_kind;

pub use ast::{Attribute, Element, Fragment};
pub use parser::parse;
pub use selector::{Combinator, Compound, Selector, SelectorError};
pub use syntax_kind::{MarkupLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    /// Format a syntax tree one node or token per line.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }

        result
    }

    #[test]
    fn tree_shape_of_simple_element() {
        let tree = parse(r#"<p class="x">Hi</p>"#);
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..19
          ELEMENT@0..19
            START_TAG@0..13
              LT@0..1 "<"
              TAG_NAME@1..2 "p"
              WHITESPACE@2..3 " "
              ATTRIBUTE@3..12
                ATTR_NAME@3..8 "class"
                EQ@8..9 "="
                ATTR_VALUE@9..12 "\"x\""
              GT@12..13 ">"
            TEXT@13..15 "Hi"
            END_TAG@15..19
              LT_SLASH@15..17 "</"
              TAG_NAME@17..18 "p"
              GT@18..19 ">"
        "#);
    }

    #[test]
    fn tree_shape_of_void_element_and_stray_end_tag() {
        let tree = parse("<img src=a></b>");
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..15
          ELEMENT@0..11
            START_TAG@0..11
              LT@0..1 "<"
              TAG_NAME@1..4 "img"
              WHITESPACE@4..5 " "
              ATTRIBUTE@5..10
                ATTR_NAME@5..8 "src"
                EQ@8..9 "="
                ATTR_VALUE@9..10 "a"
              GT@10..11 ">"
          ERROR@11..15
            LT_SLASH@11..13 "</"
            TAG_NAME@13..14 "b"
            GT@14..15 ">"
        "#);
    }

    #[test]
    fn blurb_markup_structure() {
        let input = concat!(
            r#"<div class="wp-block-jc-blocks-blurb-content jc-blurb-content has-text-align-center">"#,
            r#"<div class="jc-blurb-image"><img width="100" height="80" src="https://x/a.jpg" alt="cat" class="wp-image-42"/></div>"#,
            r#"<div class="jc-blurb-info"><h4 class="jc-blurb-title">Title</h4></div>"#,
            "</div>"
        );
        let fragment = Fragment::parse(input);
        let names: Vec<String> = fragment.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["div", "div", "img", "div", "h4"]);
        assert!(!fragment.has_errors());
    }

    // === Error tolerance / messy input tests ===
    // Hand-edited posts and third-party plugins produce all kinds of markup.
    // We produce a valid tree for anything, preserving all bytes.

    #[test]
    fn messy_markup_preserves_bytes() {
        let input = r#"<div class="jc-blurb-content"
<div class=jc-blurb-image><a href=https://y/z target="_blank>
<img src='a.jpg' alt="it's">
</span>
<p>Unclosed <b>bold
<!-- wp:paragraph -->
<!-- never closed
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "",
            "text only",
            "<p>a</p>",
            "<img/>",
            "<img src=\"a\">",
            "<a href='x'>y</a>",
            "<!-- wp:jc-blocks/simple-blurb -->",
            "<div><p>one</div>",
            "</orphan>",
            "< not a tag >",
            "<div class=\"a\" =\"b\" / >",
        ];

        for input in inputs {
            let tree = parse(input);
            assert_eq!(tree.text().to_string(), input, "Failed for: {input:?}");
        }
    }
}
