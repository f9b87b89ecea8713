//! Element-level grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::content_item;

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse an element starting at `<name`.
pub(super) fn element(p: &mut Parser<'_, '_>, open: &mut Vec<String>) {
    let m = p.start();
    let name = p.nth_text(1).to_ascii_lowercase();

    let self_closing = start_tag(p);
    if self_closing || is_void(&name) {
        m.complete(p, SyntaxKind::ELEMENT);
        return;
    }

    open.push(name);
    while !p.at_end() {
        if p.at(SyntaxKind::LT_SLASH) {
            if p.nth(1) == SyntaxKind::WORD {
                let closing = p.nth_text(1).to_ascii_lowercase();
                if open.last() == Some(&closing) {
                    end_tag(p);
                    break;
                }
                // Closes an ancestor: this element ends implicitly here
                if open.contains(&closing) {
                    break;
                }
            }
            stray_end_tag(p);
            continue;
        }
        content_item(p, open);
    }
    open.pop();

    m.complete(p, SyntaxKind::ELEMENT);
}

/// Parse `<name attr=value ...>`; returns true for `/>`.
fn start_tag(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();
    p.bump();
    p.bump_as(SyntaxKind::TAG_NAME);

    let mut self_closing = false;
    loop {
        match p.current() {
            SyntaxKind::WHITESPACE => p.bump(),
            SyntaxKind::WORD => attribute(p),
            SyntaxKind::GT => {
                p.bump();
                break;
            }
            SyntaxKind::SLASH_GT => {
                p.bump();
                self_closing = true;
                break;
            }
            SyntaxKind::QUOTED | SyntaxKind::EQ | SyntaxKind::SLASH | SyntaxKind::TEXT => {
                let e = p.start();
                p.bump();
                e.complete(p, SyntaxKind::ERROR);
            }
            // `<`, `</`, comment or EOF: the tag was never closed
            _ => break,
        }
    }

    m.complete(p, SyntaxKind::START_TAG);
    self_closing
}

/// Parse `name`, `name=value`, `name="value"` or `name = 'value'`.
fn attribute(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump_as(SyntaxKind::ATTR_NAME);

    let eq_ahead = p.at(SyntaxKind::EQ)
        || (p.at(SyntaxKind::WHITESPACE) && p.nth(1) == SyntaxKind::EQ);
    if eq_ahead {
        p.eat(SyntaxKind::WHITESPACE);
        p.bump();
        p.eat(SyntaxKind::WHITESPACE);

        if p.at(SyntaxKind::QUOTED) {
            p.bump_as(SyntaxKind::ATTR_VALUE);
        } else {
            let mut n = 0;
            while matches!(
                p.nth(n),
                SyntaxKind::WORD | SyntaxKind::SLASH | SyntaxKind::EQ | SyntaxKind::TEXT
            ) {
                n += 1;
            }
            p.bump_n(n.min(u8::MAX as usize), SyntaxKind::ATTR_VALUE);
        }
    }

    m.complete(p, SyntaxKind::ATTRIBUTE);
}

/// Parse `</name>` that closes the current element.
fn end_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    p.bump_as(SyntaxKind::TAG_NAME);
    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::GT);
    m.complete(p, SyntaxKind::END_TAG);
}

/// Wrap an end tag that closes nothing in an ERROR node.
pub(super) fn stray_end_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::WORD) {
        p.bump_as(SyntaxKind::TAG_NAME);
    }
    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::GT);
    m.complete(p, SyntaxKind::ERROR);
}
