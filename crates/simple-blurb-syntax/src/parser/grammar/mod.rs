//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to inspect
//! tokens, consume them, and build tree structure with markers.
//!
//! ## Module Structure
//!
//! - this module - the root fragment and character data
//! - [`element`] - elements, start/end tags, attributes
//!
//! ## Error Recovery
//!
//! Saved block markup is usually machine-written, but a document edited by
//! hand or by a third-party plugin can be anything. Grammar functions are
//! lenient:
//!
//! - An unclosed element runs to the end of input
//! - An end tag matching an open ancestor implicitly closes inner elements
//! - A stray end tag or stray token inside a tag is wrapped in an ERROR node
//!
//! The goal is a valid tree that preserves all input bytes.

mod element;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Raw tokens per grouped TEXT event (bounded by `n_raw_tokens: u8`).
const MAX_TEXT_RUN: usize = u8::MAX as usize;

/// Parse the root fragment.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut open = Vec::new();

    while !p.at_end() {
        if p.at(SyntaxKind::LT_SLASH) {
            element::stray_end_tag(p);
        } else {
            content_item(p, &mut open);
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}

/// Parse one item of element content: a comment, a child element, or a run
/// of character data.
///
/// `open` holds the names of the enclosing elements, innermost last.
fn content_item(p: &mut Parser<'_, '_>, open: &mut Vec<String>) {
    match p.current() {
        SyntaxKind::COMMENT => p.bump(),
        SyntaxKind::LT if p.nth(1) == SyntaxKind::WORD => element::element(p, open),
        _ => text(p),
    }
}

/// True when the token at `n` starts markup rather than character data.
fn starts_markup(p: &Parser<'_, '_>, n: usize) -> bool {
    match p.nth(n) {
        SyntaxKind::COMMENT | SyntaxKind::LT_SLASH | SyntaxKind::EOF => true,
        SyntaxKind::LT => p.nth(n + 1) == SyntaxKind::WORD,
        _ => false,
    }
}

/// Group a run of character data into TEXT tokens.
fn text(p: &mut Parser<'_, '_>) {
    let mut n = 1;
    while n < MAX_TEXT_RUN && !starts_markup(p, n) {
        n += 1;
    }
    p.bump_n(n, SyntaxKind::TEXT);
}
